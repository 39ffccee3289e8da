//! Field dictionary merging
//!
//! Merges the data dictionaries of all inputs into one catalog:
//! - New fields are appended in first-seen order
//! - A field seen again must agree on value type and operational type
//! - Value sets and interval sets follow "first non-empty wins": the
//!   accumulated set is only replaced while it is still empty
//!
//! No other attribute is compared or merged; the first declaration keeps
//! its display name and cyclic flag.

use crate::error::{AggregateError, Result};
use pmkit_common::pmml::{DataField, FieldDictionary, PmmlEnum};
use tracing::debug;

/// Merge `incoming` fields into `accumulated`
pub fn merge_fields<I>(accumulated: &mut FieldDictionary, incoming: I) -> Result<()>
where
    I: IntoIterator<Item = DataField>,
{
    for field in incoming {
        match accumulated.get_mut(&field.name) {
            Some(existing) => merge_data_field(existing, field)?,
            None => {
                debug!(field = %field.name, "Adding field");
                accumulated.insert(field);
            }
        }
    }
    Ok(())
}

/// Merge a re-declaration of an already known field into it
pub fn merge_data_field(existing: &mut DataField, incoming: DataField) -> Result<()> {
    check_equal(&existing.name, "dataType", existing.data_type, incoming.data_type)?;
    check_equal(&existing.name, "optype", existing.op_type, incoming.op_type)?;

    if existing.values.is_empty() && !incoming.values.is_empty() {
        debug!(field = %existing.name, values = incoming.values.len(), "Adopting value set");
        existing.values = incoming.values;
    }

    if existing.intervals.is_empty() && !incoming.intervals.is_empty() {
        debug!(field = %existing.name, intervals = incoming.intervals.len(), "Adopting intervals");
        existing.intervals = incoming.intervals;
    }

    Ok(())
}

fn check_equal<T: PmmlEnum + PartialEq>(
    field: &str,
    attribute: &'static str,
    existing: T,
    incoming: T,
) -> Result<()> {
    if existing != incoming {
        return Err(AggregateError::SchemaConflict {
            field: field.to_string(),
            attribute,
            existing: existing.as_str().to_string(),
            incoming: incoming.as_str().to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmkit_common::pmml::{Closure, DataType, Interval, OpType};

    fn field(name: &str, data_type: DataType, op_type: OpType) -> DataField {
        DataField::new(name, data_type, op_type)
    }

    fn values(field: &DataField) -> Vec<&str> {
        field.values.iter().map(|v| v.value.as_str()).collect()
    }

    fn sample() -> FieldDictionary {
        vec![
            field("x", DataType::Double, OpType::Continuous),
            field("risk", DataType::String, OpType::Categorical).with_values(["low", "high"]),
        ]
        .into_iter()
        .collect()
    }

    // ========================================================================
    // Insertion and order
    // ========================================================================

    #[test]
    fn test_new_fields_appended_in_first_seen_order() {
        let mut merged = FieldDictionary::new();
        merge_fields(&mut merged, sample().into_fields()).unwrap();
        merge_fields(
            &mut merged,
            vec![
                field("z", DataType::Integer, OpType::Ordinal),
                field("x", DataType::Double, OpType::Continuous),
            ],
        )
        .unwrap();

        let names: Vec<&str> = merged.names().collect();
        assert_eq!(names, vec!["x", "risk", "z"]);
    }

    #[test]
    fn test_merge_with_itself_is_idempotent() {
        let mut merged = sample();
        merge_fields(&mut merged, sample().into_fields()).unwrap();
        assert_eq!(merged, sample());
    }

    // ========================================================================
    // Conflicts
    // ========================================================================

    #[test]
    fn test_data_type_conflict() {
        let mut merged = sample();
        let err = merge_fields(&mut merged, vec![field("x", DataType::Float, OpType::Continuous)])
            .unwrap_err();

        match err {
            AggregateError::SchemaConflict {
                field,
                attribute,
                existing,
                incoming,
            } => {
                assert_eq!(field, "x");
                assert_eq!(attribute, "dataType");
                assert_eq!(existing, "double");
                assert_eq!(incoming, "float");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_op_type_conflict() {
        let mut merged = sample();
        let err = merge_fields(&mut merged, vec![field("x", DataType::Double, OpType::Ordinal)])
            .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::SchemaConflict { attribute: "optype", .. }
        ));
    }

    // ========================================================================
    // Value and interval sets
    // ========================================================================

    #[test]
    fn test_empty_value_set_adopts_incoming() {
        let mut merged: FieldDictionary =
            vec![field("X", DataType::String, OpType::Categorical)].into_iter().collect();
        merge_fields(
            &mut merged,
            vec![field("X", DataType::String, OpType::Categorical).with_values(["low", "high"])],
        )
        .unwrap();
        assert_eq!(values(merged.get("X").unwrap()), vec!["low", "high"]);
    }

    #[test]
    fn test_value_set_merge_order_independent_when_one_side_empty() {
        let mut reversed: FieldDictionary = vec![
            field("X", DataType::String, OpType::Categorical).with_values(["low", "high"]),
        ]
        .into_iter()
        .collect();
        merge_fields(
            &mut reversed,
            vec![field("X", DataType::String, OpType::Categorical)],
        )
        .unwrap();
        assert_eq!(values(reversed.get("X").unwrap()), vec!["low", "high"]);
    }

    #[test]
    fn test_first_non_empty_value_set_wins() {
        let mut merged = sample();
        merge_fields(
            &mut merged,
            vec![field("risk", DataType::String, OpType::Categorical).with_values(["medium"])],
        )
        .unwrap();
        // No union with the later set
        assert_eq!(values(merged.get("risk").unwrap()), vec!["low", "high"]);
    }

    #[test]
    fn test_intervals_follow_value_set_policy() {
        let interval = |left: f64| Interval {
            closure: Closure::ClosedClosed,
            left_margin: Some(left),
            right_margin: None,
        };

        let mut merged = sample();
        let mut with_interval = field("x", DataType::Double, OpType::Continuous);
        with_interval.intervals.push(interval(0.0));
        merge_fields(&mut merged, vec![with_interval]).unwrap();
        assert_eq!(merged.get("x").unwrap().intervals, vec![interval(0.0)]);

        let mut other_interval = field("x", DataType::Double, OpType::Continuous);
        other_interval.intervals.push(interval(5.0));
        merge_fields(&mut merged, vec![other_interval]).unwrap();
        assert_eq!(merged.get("x").unwrap().intervals, vec![interval(0.0)]);
    }

    #[test]
    fn test_first_declaration_keeps_display_name() {
        let mut first = field("x", DataType::Double, OpType::Continuous);
        first.display_name = Some("First".to_string());
        let mut second = field("x", DataType::Double, OpType::Continuous);
        second.display_name = Some("Second".to_string());

        let mut merged: FieldDictionary = vec![first].into_iter().collect();
        merge_fields(&mut merged, vec![second]).unwrap();
        assert_eq!(merged.get("x").unwrap().display_name.as_deref(), Some("First"));
    }
}

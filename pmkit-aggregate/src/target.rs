//! Target field extraction
//!
//! Locates the single field a model predicts and removes it from the
//! model's mining schema. The ensemble gets a fresh schema naming only the
//! target, so the members no longer declare it themselves.

use crate::error::{AggregateError, Result};
use pmkit_common::pmml::Model;
use tracing::debug;

/// Remove the target/predicted entry from `model` and return its field name
///
/// Returns `Ok(None)` when the model declares no target; the caller
/// decides whether that is an error. Two or more target entries fail with
/// [`AggregateError::MultipleTargets`] and leave the schema unchanged.
pub fn extract_target_field(model: &mut Model) -> Result<Option<String>> {
    let mut found: Option<usize> = None;

    for (index, field) in model.mining_schema.fields.iter().enumerate() {
        if !field.usage.is_target() {
            continue;
        }
        if let Some(first) = found {
            return Err(AggregateError::MultipleTargets {
                first: model.mining_schema.fields[first].name.clone(),
                second: field.name.clone(),
            });
        }
        found = Some(index);
    }

    Ok(found.map(|index| {
        let field = model.mining_schema.fields.remove(index);
        debug!(field = %field.name, usage = %field.usage, "Extracted target field");
        field.name
    }))
}

//! Cross-model consistency validation
//!
//! [`ConsistencyState`] is threaded through the input loop as a fold
//! accumulator. Each member is checked against what the earlier members
//! established:
//! 1. **Function kind**: adopted from the first member, then must match
//! 2. **Post-processing**: a member with a Targets block is rejected
//! 3. **Target field**: adopted from the first member, then must match
//!
//! [`ConsistencyState::finish`] resolves the agreed target against the
//! merged field dictionary.

use crate::error::{AggregateError, Result};
use pmkit_common::pmml::{DataField, FieldDictionary, MiningFunction, Model};
use tracing::debug;

/// What the members seen so far agree on
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsistencyState {
    function: Option<MiningFunction>,
    target_field: Option<String>,
    members: usize,
}

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq)]
pub struct Consensus {
    pub function: MiningFunction,
    pub target: DataField,
    pub members: usize,
}

impl ConsistencyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn function(&self) -> Option<MiningFunction> {
        self.function
    }

    pub fn target_field(&self) -> Option<&str> {
        self.target_field.as_deref()
    }

    pub fn members(&self) -> usize {
        self.members
    }

    /// Check one more member
    ///
    /// `target` is the field extracted from the member's mining schema.
    /// A member without a target fails here rather than being deferred.
    pub fn accept(self, model: &Model, target: Option<String>) -> Result<Self> {
        let position = self.members + 1;

        let function = match self.function {
            None => model.function,
            Some(expected) if expected == model.function => expected,
            Some(expected) => {
                return Err(AggregateError::FunctionMismatch {
                    expected,
                    found: model.function,
                    position,
                })
            }
        };

        if model.targets.is_some() {
            return Err(AggregateError::UnsupportedTargets { position });
        }

        let target = target.ok_or(AggregateError::MissingTargetField {
            field: None,
            position,
        })?;
        let target_field = match self.target_field {
            None => target,
            Some(expected) if expected == target => expected,
            Some(expected) => {
                return Err(AggregateError::TargetMismatch {
                    expected,
                    found: target,
                    position,
                })
            }
        };

        debug!(position, function = %function, target = %target_field, "Member is consistent");

        Ok(Self {
            function: Some(function),
            target_field: Some(target_field),
            members: position,
        })
    }

    /// Resolve the agreed target in the merged dictionary
    pub fn finish(self, dictionary: &FieldDictionary) -> Result<Consensus> {
        let (Some(function), Some(target_field)) = (self.function, self.target_field) else {
            return Err(AggregateError::EmptyInput);
        };

        let target = dictionary
            .get(&target_field)
            .cloned()
            .ok_or(AggregateError::MissingTargetField {
                field: Some(target_field),
                position: self.members,
            })?;

        Ok(Consensus {
            function,
            target,
            members: self.members,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmkit_common::pmml::{DataType, MiningSchema, ModelType, OpType};
    use pmkit_common::xml::Element;

    fn model(function: MiningFunction) -> Model {
        Model {
            model_type: ModelType::RegressionModel,
            function,
            attributes: Vec::new(),
            mining_schema: MiningSchema::default(),
            output: None,
            targets: None,
            content: Vec::new(),
        }
    }

    fn target(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn test_first_member_sets_expectations() {
        let state = ConsistencyState::new()
            .accept(&model(MiningFunction::Classification), target("y"))
            .unwrap();
        assert_eq!(state.function(), Some(MiningFunction::Classification));
        assert_eq!(state.target_field(), Some("y"));
        assert_eq!(state.members(), 1);
    }

    #[test]
    fn test_consistent_members_fold() {
        let state = (0..3).try_fold(ConsistencyState::new(), |state, _| {
            state.accept(&model(MiningFunction::Regression), target("y"))
        });
        assert_eq!(state.unwrap().members(), 3);
    }

    #[test]
    fn test_function_mismatch() {
        let state = ConsistencyState::new()
            .accept(&model(MiningFunction::Classification), target("y"))
            .unwrap();
        let err = state
            .accept(&model(MiningFunction::Regression), target("y"))
            .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::FunctionMismatch {
                expected: MiningFunction::Classification,
                found: MiningFunction::Regression,
                position: 2,
            }
        ));
    }

    #[test]
    fn test_target_mismatch() {
        let state = ConsistencyState::new()
            .accept(&model(MiningFunction::Regression), target("y"))
            .unwrap();
        let err = state
            .accept(&model(MiningFunction::Regression), target("z"))
            .unwrap_err();
        match err {
            AggregateError::TargetMismatch {
                expected,
                found,
                position,
            } => {
                assert_eq!(expected, "y");
                assert_eq!(found, "z");
                assert_eq!(position, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_post_processing_rejected() {
        let mut member = model(MiningFunction::Regression);
        member.targets = Some(Element::new("Targets"));
        let err = ConsistencyState::new().accept(&member, target("y")).unwrap_err();
        assert!(matches!(err, AggregateError::UnsupportedTargets { position: 1 }));
    }

    #[test]
    fn test_function_checked_before_post_processing() {
        let state = ConsistencyState::new()
            .accept(&model(MiningFunction::Classification), target("y"))
            .unwrap();
        let mut member = model(MiningFunction::Regression);
        member.targets = Some(Element::new("Targets"));
        assert!(matches!(
            state.accept(&member, target("y")),
            Err(AggregateError::FunctionMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_target_rejected() {
        let err = ConsistencyState::new()
            .accept(&model(MiningFunction::Regression), None)
            .unwrap_err();
        assert!(matches!(
            err,
            AggregateError::MissingTargetField { field: None, position: 1 }
        ));
    }

    #[test]
    fn test_finish_resolves_target() {
        let dictionary: FieldDictionary =
            vec![DataField::new("y", DataType::Double, OpType::Continuous)]
                .into_iter()
                .collect();
        let consensus = ConsistencyState::new()
            .accept(&model(MiningFunction::Regression), target("y"))
            .unwrap()
            .finish(&dictionary)
            .unwrap();
        assert_eq!(consensus.function, MiningFunction::Regression);
        assert_eq!(consensus.target.name, "y");
        assert_eq!(consensus.members, 1);
    }

    #[test]
    fn test_finish_with_undeclared_target() {
        let err = ConsistencyState::new()
            .accept(&model(MiningFunction::Regression), target("y"))
            .unwrap()
            .finish(&FieldDictionary::new())
            .unwrap_err();
        match err {
            AggregateError::MissingTargetField { field, .. } => {
                assert_eq!(field.as_deref(), Some("y"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_finish_without_members() {
        let err = ConsistencyState::new().finish(&FieldDictionary::new()).unwrap_err();
        assert!(matches!(err, AggregateError::EmptyInput));
    }
}

//! Error types for pmkit-aggregate
//!
//! Every variant is fatal to an aggregation run: nothing is recovered
//! locally and no output is written.

use pmkit_common::pmml::MiningFunction;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for aggregation operations
pub type Result<T> = std::result::Result<T, AggregateError>;

#[derive(Debug, Error)]
pub enum AggregateError {
    /// Weight count differs from input count
    #[error("Weight count mismatch: {weights} weights for {inputs} inputs")]
    WeightCount { inputs: usize, weights: usize },

    /// Weight that is NaN or infinite
    #[error("Invalid weight at position {position}: {value}")]
    InvalidWeight { position: usize, value: f64 },

    /// No inputs given
    #[error("Empty input: at least one model document is required")]
    EmptyInput,

    /// Same field declared with different value or operational types
    #[error("Schema conflict on field '{field}': {attribute} '{existing}' != '{incoming}'")]
    SchemaConflict {
        field: String,
        attribute: &'static str,
        existing: String,
        incoming: String,
    },

    /// Auxiliary definition key used by more than one input
    #[error("Duplicate key: {kind} '{key}' is defined more than once")]
    DuplicateKey { kind: &'static str, key: String },

    /// One model declares several target/predicted fields
    #[error("Multiple targets: model declares both '{first}' and '{second}'")]
    MultipleTargets { first: String, second: String },

    /// No target declared, or the target is absent from the field dictionary
    #[error("Missing target field: {}", describe_missing_target(.field, .position))]
    MissingTargetField { field: Option<String>, position: usize },

    /// Models of different function kinds
    #[error("Function mismatch: expected {expected}, model {position} is {found}")]
    FunctionMismatch {
        expected: MiningFunction,
        found: MiningFunction,
        position: usize,
    },

    /// Models predicting different fields
    #[error("Target mismatch: expected '{expected}', model {position} predicts '{found}'")]
    TargetMismatch {
        expected: String,
        found: String,
        position: usize,
    },

    /// Model with post-processing that cannot be combined
    #[error("Unsupported targets: model {position} carries a Targets post-processing block")]
    UnsupportedTargets { position: usize },

    /// Input document could not be read
    #[error("Failed to load {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: pmkit_common::Error,
    },

    /// Run summary could not be serialized
    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    /// pmkit-common error (save, configuration)
    #[error(transparent)]
    Document(#[from] pmkit_common::Error),
}

fn describe_missing_target(field: &Option<String>, position: &usize) -> String {
    match field {
        Some(field) => format!("'{}' is not declared in the data dictionary", field),
        None => format!("model {} declares no target or predicted field", position),
    }
}

impl AggregateError {
    /// Short kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            AggregateError::WeightCount { .. } => "WeightCountError",
            AggregateError::InvalidWeight { .. } => "InvalidWeightError",
            AggregateError::EmptyInput => "EmptyInputError",
            AggregateError::SchemaConflict { .. } => "SchemaConflictError",
            AggregateError::DuplicateKey { .. } => "DuplicateKeyError",
            AggregateError::MultipleTargets { .. } => "MultipleTargetsError",
            AggregateError::MissingTargetField { .. } => "MissingTargetFieldError",
            AggregateError::FunctionMismatch { .. } => "FunctionMismatchError",
            AggregateError::TargetMismatch { .. } => "TargetMismatchError",
            AggregateError::UnsupportedTargets { .. } => "UnsupportedTargetsError",
            AggregateError::Load { .. } => "LoadError",
            AggregateError::Report(_) => "ReportError",
            AggregateError::Document(_) => "DocumentError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_values() {
        let err = AggregateError::SchemaConflict {
            field: "age".to_string(),
            attribute: "dataType",
            existing: "double".to_string(),
            incoming: "integer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Schema conflict on field 'age': dataType 'double' != 'integer'"
        );

        let err = AggregateError::FunctionMismatch {
            expected: MiningFunction::Classification,
            found: MiningFunction::Regression,
            position: 2,
        };
        assert_eq!(
            err.to_string(),
            "Function mismatch: expected classification, model 2 is regression"
        );
    }

    #[test]
    fn test_missing_target_messages() {
        let undeclared = AggregateError::MissingTargetField {
            field: Some("y".to_string()),
            position: 1,
        };
        assert!(undeclared.to_string().contains("'y' is not declared"));

        let absent = AggregateError::MissingTargetField {
            field: None,
            position: 3,
        };
        assert!(absent.to_string().contains("model 3 declares no target"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(AggregateError::EmptyInput.kind(), "EmptyInputError");
        assert_eq!(
            AggregateError::WeightCount { inputs: 3, weights: 2 }.kind(),
            "WeightCountError"
        );
        assert_eq!(
            AggregateError::DuplicateKey {
                kind: "DerivedField",
                key: "k".to_string()
            }
            .kind(),
            "DuplicateKeyError"
        );
    }

    #[test]
    fn test_serialization_errors_keep_their_kind() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AggregateError::from(source);
        assert!(matches!(err, AggregateError::Report(_)));
        assert_eq!(err.kind(), "ReportError");
        assert!(err.to_string().starts_with("Report serialization failed"));
    }
}

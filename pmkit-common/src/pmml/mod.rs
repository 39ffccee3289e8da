//! Typed model-document object model
//!
//! Documents are instances of the Predictive Model Markup Language. Input
//! documents of any 3.x/4.x version are accepted; output is always
//! written as [`PMML_VERSION`].

pub mod cleanup;
pub mod dictionary;
pub mod document;
pub mod ensemble;
pub mod io;
pub mod model;
pub mod transformation;
pub mod types;

pub use cleanup::{cleanup, CleanupSummary};
pub use dictionary::{DataField, FieldDictionary, Interval, Value};
pub use document::{Application, Header, ModelDocument};
pub use ensemble::{DocumentModel, EnsembleModel, Output, OutputField, Segment, Segmentation};
pub use io::{load, save, SaveOptions};
pub use model::{MiningField, MiningSchema, Model};
pub use transformation::{DefineFunction, DerivedField, TransformationDictionary};
pub use types::{
    Closure, CombinationMethod, DataType, FieldUsage, MiningFunction, ModelType, OpType, PmmlEnum,
    ResultFeature, ValueProperty,
};

/// Version written into every saved document
pub const PMML_VERSION: &str = "4.2";

/// Namespace matching [`PMML_VERSION`]
pub const PMML_NAMESPACE: &str = "http://www.dmg.org/PMML-4_2";

/// Generator identifier written into saved headers
pub const GENERATOR_NAME: &str = "pmkit";

/// Generator version written into saved headers
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

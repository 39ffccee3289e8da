//! pmkit-aggregate - Combine model documents into one ensemble document
//!
//! Each input document contributes its field catalog, its transformation
//! entries and its single model. The models must agree on function kind
//! and target field; they become the members of a `MiningModel`
//! segmentation combined by (weighted) average.
//!
//! # Example
//!
//! ```no_run
//! use pmkit_aggregate::aggregate;
//! use pmkit_common::{save, SaveOptions};
//! use std::path::Path;
//!
//! # fn main() -> pmkit_aggregate::Result<()> {
//! let document = aggregate(&["tree.pmml", "forest.pmml"], Some(&[0.4, 0.6]))?;
//! save(&document, Path::new("ensemble.pmml"), &SaveOptions::default())?;
//! # Ok(())
//! # }
//! ```

pub mod auxiliary;
pub mod dictionary;
pub mod ensemble;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod target;
pub mod validator;

pub use error::{AggregateError, Result};
pub use pipeline::{aggregate, aggregate_with, check_weights, Aggregation};
pub use report::{AggregationReport, StagedReport};

//! # pmkit Common Library
//!
//! Shared code for the pmkit model-document tools:
//! - Generic XML element tree and its quick-xml codec
//! - Typed PMML document model (data dictionary, transformation
//!   dictionary, models, ensembles)
//! - Document load/save and the post-merge cleanup pass
//! - TOML bootstrap configuration

pub mod config;
pub mod error;
pub mod pmml;
pub mod time;
pub mod xml;

pub use error::{Error, Result};
pub use pmml::{cleanup, load, save, ModelDocument, SaveOptions};

//! Common error types for pmkit

use thiserror::Error;

/// Common result type for pmkit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across pmkit crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML (wraps quick_xml::Error)
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Well-formed XML that is not a usable model document
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Required attribute absent from an element
    #[error("Missing attribute '{attribute}' on <{element}>")]
    MissingAttribute { element: String, attribute: String },

    /// Attribute value outside its closed set of allowed values
    #[error("Unknown value '{value}' for attribute '{attribute}'")]
    UnknownValue { attribute: String, value: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed TOML configuration file
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

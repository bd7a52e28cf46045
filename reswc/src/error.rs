//! All error types for the reswc crate.
//!
//! These are returned from fallible operations (reading tables, parsing and
//! writing `.resw` files, configuration checks). Problems found *inside* valid
//! input (missing columns, bad rows, duplicate IDs) are not errors in this
//! sense; they are collected as [`crate::diagnostics::Diagnostic`]s.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("compilation failed with {errors} error(s)")]
    Compilation { errors: usize },
}

impl Error {
    /// Creates a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    /// Creates a new invalid resource error
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Error::InvalidResource(message.into())
    }
}

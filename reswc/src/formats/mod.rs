//! File formats read and written by reswc.
//!
//! This module re-exports the main types for each format and provides
//! the [`FormatType`] enum for recognizing inputs by extension.

pub mod csv;
pub mod resw;

use std::{
    fmt::{Display, Formatter},
    path::Path,
    str::FromStr,
};

// Reexporting the formats for easier access
pub use csv::{RawRow, TableReader};
pub use resw::{ReswDocument, ReswEntry};

use crate::Error;

/// The two file kinds the tool deals with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// Tabular translation source.
    Csv,
    /// Compiled resource file.
    Resw,
}

/// Implements [`std::fmt::Display`] for [`FormatType`].
///
/// # Example
/// ```rust
/// use reswc::formats::FormatType;
/// assert_eq!(FormatType::Csv.to_string(), "csv");
/// assert_eq!(FormatType::Resw.to_string(), "resw");
/// ```
impl Display for FormatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Accepts `csv` and `resw`, case-insensitively.
///
/// ```rust
/// use reswc::formats::FormatType;
/// use std::str::FromStr;
/// assert_eq!(FormatType::from_str("RESW").unwrap(), FormatType::Resw);
/// assert!(FormatType::from_str("xlsx").is_err());
/// ```
impl FromStr for FormatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(FormatType::Csv),
            "resw" => Ok(FormatType::Resw),
            other => Err(Error::configuration(format!("unknown format `{other}`"))),
        }
    }
}

impl FormatType {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            FormatType::Csv => crate::types::SOURCE_EXTENSION,
            FormatType::Resw => resw::RESW_EXTENSION,
        }
    }

    /// Infers the format from a path's extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    /// Whether `path` carries this format's extension.
    pub fn matches<P: AsRef<Path>>(&self, path: P) -> bool {
        Self::from_path(path) == Some(*self)
    }
}

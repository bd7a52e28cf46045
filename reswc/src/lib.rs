#![forbid(unsafe_code)]
//! Localization resource compiler for Windows App SDK applications.
//!
//! Compiles translation tables kept as CSV into one `.resw` file per language,
//! and generates typed accessors for the compiled resources.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use reswc::{CompileOptions, Compiler, SourceFile};
//!
//! let options = CompileOptions::new(["en-US", "fr-FR"])
//!     .with_default_language(Some("en-US".to_string()));
//! let compiler = Compiler::new(options)?;
//!
//! let sources = vec![SourceFile::new("strings/Pages/Settings.csv", "Pages/Settings.csv")];
//! let report = compiler.run(&sources, "out")?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<(), reswc::Error>(())
//! ```
//!
//! # Source tables
//!
//! Every table has an `Id` column, a `Property` column and one column per
//! language. A row becomes the resource `<path>_<Id>.<Property>`, where
//! `<path>` is the table's path relative to the source root with separators
//! replaced by `_`. Ids starting with `_` are code-behind resources and must
//! leave `Property` empty.
//!
//! # Output policy
//!
//! All tables are validated before anything is written. Any error leaves the
//! output directory untouched; missing translations are only warnings.

pub mod accessor;
pub mod assembler;
pub mod compiler;
pub mod diagnostics;
pub mod error;
pub mod formats;
pub mod options;
pub mod traits;
pub mod types;
pub mod validator;

// Re-export most used types for easy consumption
pub use crate::{
    accessor::{
        AccessorDeclaration, AccessorFormat, AccessorTarget, Generation, ReswSource,
        check_qualifier_consistency, generate,
    },
    compiler::{Compilation, CompileReport, Compiler, OutputFile},
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity},
    error::Error,
    formats::{FormatType, ReswDocument},
    options::{ColumnLayout, CompileOptions, OutputLayout, SchemaMode},
    traits::Parser,
    types::{ResourceId, ResourceTable, SourceFile, TranslationEntry},
};

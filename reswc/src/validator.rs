//! Row validation: turns raw table rows into [`TranslationEntry`] values.
//!
//! Column meaning is resolved once per file into a [`ResolvedSchema`]; rows
//! are then read positionally. Problems never stop the batch: they are
//! recorded as diagnostics and the offending file or row contributes nothing.

use std::io::Read;

use tracing::debug;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
    error::Error,
    formats::{RawRow, TableReader},
    options::{ColumnLayout, CompileOptions, SchemaMode},
    types::{SourceFile, TranslationEntry, is_code_behind_id},
};

pub const ID_COLUMN: &str = "Id";
pub const PROPERTY_COLUMN: &str = "Property";

/// Column indices of one table, resolved from its header (or from the
/// positional layout) before any row is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    id: usize,
    property: usize,
    /// Requested languages with their column; `None` means padded with empty values.
    languages: Vec<(String, Option<usize>)>,
    /// Exact cell count required per row, for positional tables.
    expected_cells: Option<usize>,
    mode: SchemaMode,
}

impl ResolvedSchema {
    /// Resolves the schema of a table, or returns the file-level diagnostics
    /// that invalidate it.
    pub fn resolve(
        header: Option<&[String]>,
        options: &CompileOptions,
        source: &str,
    ) -> Result<Self, Diagnostics> {
        match options.column_layout {
            ColumnLayout::Positional => Ok(Self::positional(options)),
            ColumnLayout::Named => Self::named(header.unwrap_or_default(), options, source),
        }
    }

    fn positional(options: &CompileOptions) -> Self {
        Self {
            id: 0,
            property: 1,
            languages: options
                .languages
                .iter()
                .enumerate()
                .map(|(i, lang)| (lang.clone(), Some(i + 2)))
                .collect(),
            expected_cells: Some(options.languages.len() + 2),
            mode: options.schema_mode,
        }
    }

    fn named(
        header: &[String],
        options: &CompileOptions,
        source: &str,
    ) -> Result<Self, Diagnostics> {
        let column = |name: &str| header.iter().position(|cell| cell.trim() == name);
        let mut diagnostics = Diagnostics::new();

        let id = column(ID_COLUMN);
        if id.is_none() {
            diagnostics.push(Diagnostic::file(
                DiagnosticKind::Schema,
                source,
                format!("Missing column \"{ID_COLUMN}\""),
            ));
        }

        let property = column(PROPERTY_COLUMN);
        if property.is_none() {
            diagnostics.push(Diagnostic::file(
                DiagnosticKind::Schema,
                source,
                format!("Missing column \"{PROPERTY_COLUMN}\""),
            ));
        }

        let mut languages = Vec::with_capacity(options.languages.len());
        for lang in &options.languages {
            let index = column(lang.as_str());
            if index.is_none() {
                match options.schema_mode {
                    SchemaMode::Strict => diagnostics.push(Diagnostic::file(
                        DiagnosticKind::Schema,
                        source,
                        format!("Missing column for translation to {lang}"),
                    )),
                    SchemaMode::Permissive => {
                        debug!(source, language = %lang, "padding missing language column");
                    }
                }
            }
            languages.push((lang.clone(), index));
        }

        match (id, property) {
            (Some(id), Some(property)) if diagnostics.is_empty() => Ok(Self {
                id,
                property,
                languages,
                expected_cells: None,
                mode: options.schema_mode,
            }),
            _ => Err(diagnostics),
        }
    }

    /// Validates one row. Every applicable diagnostic is recorded; an entry is
    /// produced only when the row has no errors.
    pub fn validate_row(
        &self,
        row: &RawRow,
        source: &str,
        diagnostics: &mut Diagnostics,
    ) -> Option<TranslationEntry> {
        let mut valid = true;
        let mut report = |kind: DiagnosticKind, message: String| {
            diagnostics.push(Diagnostic::row(kind, source, row.line, message));
        };

        if let Some(expected) = self.expected_cells {
            let found = row.cells.len();
            let padded = self.mode == SchemaMode::Permissive && found < expected;
            if found != expected && !padded {
                report(
                    DiagnosticKind::Row,
                    format!("Expected {expected} cells, found {found}"),
                );
                valid = false;
            }
        }

        let id = row.cell(self.id).trim();
        let property = row.cell(self.property).trim();

        if id.is_empty() {
            report(DiagnosticKind::Row, "Id must not be empty".to_string());
            valid = false;
        }

        if is_code_behind_id(id) && !property.is_empty() {
            report(
                DiagnosticKind::Row,
                "Property must be empty for strings for code-behind".to_string(),
            );
            valid = false;
        }

        let mut translations = Vec::with_capacity(self.languages.len());
        for (lang, index) in &self.languages {
            let text = index.map(|i| row.cell(i)).unwrap_or_default();
            if text.is_empty() && index.is_some() {
                report(
                    DiagnosticKind::MissingTranslation,
                    format!("Missing translation to {lang}"),
                );
            }
            if let Some(c) = text.chars().find(|c| is_forbidden_control(*c)) {
                report(
                    DiagnosticKind::Row,
                    format!(
                        "Translation to {lang} contains control character U+{:04X}",
                        u32::from(c)
                    ),
                );
                valid = false;
            }
            translations.push((lang.clone(), text.to_string()));
        }

        valid.then(|| TranslationEntry {
            id: id.to_string(),
            property: property.to_string(),
            translations,
            line: row.line,
        })
    }
}

/// C0 control characters other than tab, line feed and carriage return
/// cannot appear in an XML 1.0 document.
fn is_forbidden_control(c: char) -> bool {
    c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r')
}

/// Entries and diagnostics produced by one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceValidation {
    pub entries: Vec<TranslationEntry>,
    pub diagnostics: Diagnostics,
}

impl SourceValidation {
    /// Result for a table that could not be read at all.
    pub fn unreadable(source: &str, error: &Error) -> Self {
        Self {
            entries: Vec::new(),
            diagnostics: std::iter::once(Diagnostic::file(
                DiagnosticKind::Schema,
                source,
                format!("Cannot read table: {error}"),
            ))
            .collect(),
        }
    }
}

/// Validates every row of an already opened table.
pub fn validate_table<R: Read>(
    table: TableReader<R>,
    source: &str,
    options: &CompileOptions,
) -> SourceValidation {
    let mut result = SourceValidation::default();

    if options.column_layout == ColumnLayout::Named && table.header().is_none() {
        debug!(source, "empty table");
        return result;
    }

    let schema = match ResolvedSchema::resolve(table.header(), options, source) {
        Ok(schema) => schema,
        Err(diagnostics) => {
            result.diagnostics = diagnostics;
            return result;
        }
    };

    for row in table {
        let row = match row {
            Ok(row) => row,
            Err(e) => return SourceValidation::unreadable(source, &e),
        };
        if let Some(entry) = schema.validate_row(&row, source, &mut result.diagnostics) {
            result.entries.push(entry);
        }
    }
    result
}

/// Opens and validates one source file. A file that cannot be opened or
/// parsed yields a single schema error and no entries.
pub fn validate_source(source: &SourceFile, options: &CompileOptions) -> SourceValidation {
    let name = source.display_name();
    match TableReader::open(&source.path, options.column_layout) {
        Ok(table) => validate_table(table, &name, options),
        Err(e) => SourceValidation::unreadable(&name, &e),
    }
}

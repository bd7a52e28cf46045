//! The batch driver: reads and validates every source table, assembles
//! per-language resource tables and writes the `.resw` files.
//!
//! Output is all-or-nothing. Every source is validated before anything is
//! written, and a single error diagnostic anywhere suppresses every file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    assembler::Assembler,
    diagnostics::Diagnostics,
    error::Error,
    formats::{ReswDocument, TableReader},
    options::CompileOptions,
    traits::Parser,
    types::{ResourceTable, SourceFile},
    validator::{SourceValidation, validate_source, validate_table},
};

/// Outcome of validating and assembling a set of sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compilation {
    /// One table per requested language, in requested order.
    pub tables: Vec<ResourceTable>,
    /// Diagnostics from every source, in source order, followed by duplicate-id errors.
    pub diagnostics: Diagnostics,
}

impl Compilation {
    pub fn is_success(&self) -> bool {
        !self.diagnostics.has_errors()
    }

    pub fn table(&self, language: &str) -> Option<&ResourceTable> {
        self.tables.iter().find(|table| table.language == language)
    }

    /// Number of resources per language.
    pub fn resource_count(&self) -> usize {
        self.tables.first().map(ResourceTable::len).unwrap_or_default()
    }
}

/// A rendered output file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub language: String,
    /// Path relative to the output directory.
    pub relative_path: PathBuf,
    pub contents: String,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    pub written: Vec<PathBuf>,
    pub languages: usize,
    pub resources: usize,
    pub diagnostics: Diagnostics,
}

/// Compiles translation tables into `.resw` files.
#[derive(Debug, Clone)]
pub struct Compiler {
    options: CompileOptions,
}

impl Compiler {
    /// Creates a compiler after checking `options`.
    ///
    /// # Returns
    ///
    /// A configuration [`Error`] when the options are inconsistent, for
    /// example a default language that is not requested.
    pub fn new(options: CompileOptions) -> Result<Self, Error> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Reads, validates and assembles the given source files.
    ///
    /// Sources are validated in parallel; results are merged in the order of
    /// `sources`, which is also the insertion order of the tables.
    pub fn compile(&self, sources: &[SourceFile]) -> Compilation {
        let validations: Vec<SourceValidation> = sources
            .par_iter()
            .map(|source| validate_source(source, &self.options))
            .collect();
        self.assemble(sources, validations)
    }

    /// Same as [`Compiler::compile`] for tables already held in memory.
    pub fn compile_text(&self, sources: &[(SourceFile, String)]) -> Compilation {
        let validations: Vec<SourceValidation> = sources
            .par_iter()
            .map(|(source, text)| {
                let name = source.display_name();
                match TableReader::from_text(text, self.options.column_layout) {
                    Ok(table) => validate_table(table, &name, &self.options),
                    Err(e) => SourceValidation::unreadable(&name, &e),
                }
            })
            .collect();
        let sources: Vec<SourceFile> = sources.iter().map(|(source, _)| source.clone()).collect();
        self.assemble(&sources, validations)
    }

    fn assemble(&self, sources: &[SourceFile], validations: Vec<SourceValidation>) -> Compilation {
        let mut diagnostics = Diagnostics::new();
        let mut assembler = Assembler::new(self.options.languages.iter().cloned());

        for (source, validation) in sources.iter().zip(validations) {
            debug!(
                source = %source.display_name(),
                entries = validation.entries.len(),
                diagnostics = validation.diagnostics.len(),
                "validated source"
            );
            diagnostics.merge(validation.diagnostics);
            assembler.add_source(source, validation.entries);
        }

        let assembly = assembler.finish();
        diagnostics.merge(assembly.diagnostics);

        info!(
            sources = sources.len(),
            errors = diagnostics.error_count(),
            warnings = diagnostics.warning_count(),
            "compilation finished"
        );

        Compilation {
            tables: assembly.tables,
            diagnostics,
        }
    }

    /// Renders every language's file in memory.
    ///
    /// Fails with [`Error::Compilation`] when the compilation recorded errors.
    pub fn render(&self, compilation: &Compilation) -> Result<Vec<OutputFile>, Error> {
        if !compilation.is_success() {
            return Err(Error::Compilation {
                errors: compilation.diagnostics.error_count(),
            });
        }

        compilation
            .tables
            .iter()
            .map(|table| {
                let contents = ReswDocument::from(table).to_text()?;
                Ok(OutputFile {
                    language: table.language.clone(),
                    relative_path: self.options.output_file_name(&table.language),
                    contents,
                })
            })
            .collect()
    }

    /// Writes every language's file below `out_dir`.
    ///
    /// All files are rendered before the first one is written, so a failure
    /// while rendering leaves `out_dir` untouched.
    pub fn write<P: AsRef<Path>>(
        &self,
        compilation: &Compilation,
        out_dir: P,
    ) -> Result<Vec<PathBuf>, Error> {
        let files = self.render(compilation)?;
        let out_dir = out_dir.as_ref();

        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = out_dir.join(&file.relative_path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(Error::Io)?;
            }
            fs::write(&path, file.contents.as_bytes()).map_err(Error::Io)?;
            info!(language = %file.language, path = %path.display(), "generated translation");
            written.push(path);
        }
        Ok(written)
    }

    /// Compiles `sources` and, when no errors were recorded, writes the
    /// results below `out_dir`.
    ///
    /// The report is returned in both cases; `written` is empty when the
    /// compilation failed.
    pub fn run<P: AsRef<Path>>(
        &self,
        sources: &[SourceFile],
        out_dir: P,
    ) -> Result<CompileReport, Error> {
        let compilation = self.compile(sources);
        let written = if compilation.is_success() {
            self.write(&compilation, out_dir)?
        } else {
            Vec::new()
        };

        Ok(CompileReport {
            written,
            languages: compilation.tables.len(),
            resources: compilation.resource_count(),
            diagnostics: compilation.diagnostics,
        })
    }
}

//! Builds one [`ResourceTable`] per requested language from validated entries.

use std::collections::{HashMap, hash_map};

use tracing::trace;

use crate::{
    diagnostics::{Diagnostic, DiagnosticKind, Diagnostics},
    types::{ResourceId, ResourceTable, SourceFile, TranslationEntry},
};

/// Where a resource id was first defined.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Origin {
    source: String,
    line: u64,
}

/// Accumulates entries from every source of a run.
///
/// Each accepted entry adds exactly one value to every language's table, so
/// all tables end up with the same ids in the same order.
#[derive(Debug)]
pub struct Assembler {
    tables: Vec<ResourceTable>,
    origins: HashMap<ResourceId, Origin>,
    diagnostics: Diagnostics,
}

/// Result of assembling a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// One table per requested language, in requested order.
    pub tables: Vec<ResourceTable>,
    pub diagnostics: Diagnostics,
}

impl Assembly {
    pub fn table(&self, language: &str) -> Option<&ResourceTable> {
        self.tables.iter().find(|table| table.language == language)
    }
}

impl Assembler {
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tables: languages.into_iter().map(ResourceTable::new).collect(),
            origins: HashMap::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Adds the entries of one source, in row order.
    pub fn add_source<I>(&mut self, source: &SourceFile, entries: I)
    where
        I: IntoIterator<Item = TranslationEntry>,
    {
        let name = source.display_name();
        for entry in entries {
            let id = ResourceId::new(source, &entry);
            match self.origins.entry(id.clone()) {
                hash_map::Entry::Occupied(first) => {
                    let first = first.get();
                    self.diagnostics.push(Diagnostic::row(
                        DiagnosticKind::DuplicateId,
                        name.as_str(),
                        entry.line,
                        format!(
                            "Duplicate resource id \"{id}\" (first defined in {}, Line {})",
                            first.source, first.line
                        ),
                    ));
                }
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(Origin {
                        source: name.clone(),
                        line: entry.line,
                    });
                    trace!(%id, "adding resource");
                    self.insert(id, entry);
                }
            }
        }
    }

    fn insert(&mut self, id: ResourceId, entry: TranslationEntry) {
        for table in &mut self.tables {
            let value = entry
                .translation(&table.language)
                .unwrap_or_default()
                .to_string();
            table.push(id.clone(), value);
        }
    }

    pub fn finish(self) -> Assembly {
        Assembly {
            tables: self.tables,
            diagnostics: self.diagnostics,
        }
    }
}

//! Core types shared by the compiler stages.
//! The validator produces [`TranslationEntry`] values; the assembler turns them
//! into one [`ResourceTable`] per language.

use std::{
    fmt::Display,
    path::{Component, Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Ids starting with this prefix are addressed from code rather than bound to
/// a UI element property.
pub const CODE_BEHIND_PREFIX: char = '_';

/// Extension of tabular translation sources.
pub const SOURCE_EXTENSION: &str = "csv";

/// Join character replacing path separators inside resource ids.
pub const ID_SEPARATOR: char = '_';

/// One tabular source, as handed to the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path used to open the file.
    pub path: PathBuf,
    /// Path relative to the source root; resource ids and diagnostics are derived from it.
    pub relative_path: PathBuf,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, relative_path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Builds a source from a file below `root`.
    ///
    /// Returns `None` when `path` is not inside `root`.
    pub fn from_root(root: &Path, path: &Path) -> Option<Self> {
        let relative = path.strip_prefix(root).ok()?;
        Some(Self::new(path, relative))
    }

    /// Relative path with `/` separators, used in diagnostics.
    pub fn display_name(&self) -> String {
        normal_components(&self.relative_path).join("/")
    }

    /// Prefix shared by every resource id coming from this file.
    ///
    /// ```rust
    /// use reswc::types::SourceFile;
    ///
    /// let source = SourceFile::new("src/Pages/Settings.csv", "Pages/Settings.csv");
    /// assert_eq!(source.id_prefix(), "Pages_Settings");
    /// ```
    pub fn id_prefix(&self) -> String {
        let mut parts = normal_components(&self.relative_path);
        if let Some(last) = parts.last_mut() {
            let stem = Path::new(last.as_str())
                .extension()
                .filter(|ext| ext.eq_ignore_ascii_case(SOURCE_EXTENSION))
                .and_then(|_| Path::new(last.as_str()).file_stem())
                .map(|stem| stem.to_string_lossy().into_owned());
            if let Some(stem) = stem {
                *last = stem;
            }
        }
        parts.join(ID_SEPARATOR.to_string().as_str())
    }
}

/// Splits a relative path into its named components, accepting both `/` and
/// `\` as separators regardless of platform.
fn normal_components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .flat_map(|part| {
            part.split(['/', '\\'])
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// One localizable unit read from one table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationEntry {
    /// Element `x:Uid` for UI-bound strings, or the code-behind key.
    pub id: String,

    /// Target UI property; always empty for code-behind ids.
    pub property: String,

    /// `(language, text)` pairs in requested-language order. Every requested
    /// language is present; untranslated text is the empty string.
    pub translations: Vec<(String, String)>,

    /// 1-based line of the row in its table.
    pub line: u64,
}

impl TranslationEntry {
    pub fn is_code_behind(&self) -> bool {
        is_code_behind_id(&self.id)
    }

    /// Source-local name: the id alone for code-behind entries, `id.property` otherwise.
    pub fn name(&self) -> String {
        if self.is_code_behind() {
            self.id.clone()
        } else {
            format!("{}.{}", self.id, self.property)
        }
    }

    pub fn translation(&self, language: &str) -> Option<&str> {
        self.translations
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, text)| text.as_str())
    }
}

pub fn is_code_behind_id(id: &str) -> bool {
    id.starts_with(CODE_BEHIND_PREFIX)
}

/// Globally unique key of a compiled resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// `<relative path without extension, separators joined by '_'>_<entry name>`.
    pub fn new(source: &SourceFile, entry: &TranslationEntry) -> Self {
        Self(format!(
            "{}{}{}",
            source.id_prefix(),
            ID_SEPARATOR,
            entry.name()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ResourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single compiled key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: ResourceId,
    pub value: String,
}

/// The complete key to text mapping for one language, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResourceTable {
    pub language: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    #[serde(default)]
    pub entries: Vec<ResourceEntry>,
}

impl ResourceTable {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, id: ResourceId, value: String) {
        self.entries.push(ResourceEntry { id, value });
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.id.as_str() == id)
            .map(|entry| entry.value.as_str())
    }

    pub fn ids(&self) -> impl Iterator<Item = &ResourceId> {
        self.entries.iter().map(|entry| &entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, property: &str) -> TranslationEntry {
        TranslationEntry {
            id: id.to_string(),
            property: property.to_string(),
            translations: vec![("en-US".to_string(), "Hello".to_string())],
            line: 2,
        }
    }

    #[test]
    fn test_entry_name() {
        assert_eq!(entry("Greeting", "Text").name(), "Greeting.Text");
        assert_eq!(entry("_CodeKey", "").name(), "_CodeKey");
    }

    #[test]
    fn test_resource_id_nested_path() {
        let source = SourceFile::new("/src/Views/Pages/Home.csv", "Views/Pages/Home.csv");
        let id = ResourceId::new(&source, &entry("Title", "Content"));
        assert_eq!(id.as_str(), "Views_Pages_Home_Title.Content");
    }

    #[test]
    fn test_resource_id_backslash_path() {
        let source = SourceFile::new("Views\\Home.csv", "Views\\Home.csv");
        assert_eq!(source.id_prefix(), "Views_Home");
        assert_eq!(source.display_name(), "Views/Home.csv");
    }

    #[test]
    fn test_id_prefix_keeps_non_csv_extension() {
        let source = SourceFile::new("Notes.txt", "Notes.txt");
        assert_eq!(source.id_prefix(), "Notes.txt");
    }

    #[test]
    fn test_from_root() {
        let root = Path::new("/work/strings");
        let source = SourceFile::from_root(root, Path::new("/work/strings/Main.csv")).unwrap();
        assert_eq!(source.relative_path, PathBuf::from("Main.csv"));
        assert!(SourceFile::from_root(root, Path::new("/elsewhere/Main.csv")).is_none());
    }

    #[test]
    fn test_table_lookup() {
        let mut table = ResourceTable::new("en-US");
        table.push("Main_Greeting.Text".into(), "Hello".to_string());
        assert_eq!(table.get("Main_Greeting.Text"), Some("Hello"));
        assert_eq!(table.get("Main_Missing.Text"), None);
        assert_eq!(table.len(), 1);
    }
}

//! Options controlling how translation tables are validated and where the
//! compiled `.resw` files land.

use std::{
    collections::HashSet,
    fmt::{Display, Formatter},
    path::PathBuf,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use unic_langid::LanguageIdentifier;

use crate::error::Error;

/// Base file name used for compiled resources unless overridden.
pub const DEFAULT_BASE_NAME: &str = "Resources";

/// What to do when a table lacks a column for a requested language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaMode {
    /// A missing language column invalidates the whole file.
    #[default]
    Strict,
    /// Missing language columns are padded with empty values.
    Permissive,
}

/// How cells of a table are mapped to columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnLayout {
    /// The first record is a header naming `Id`, `Property` and one column per language.
    #[default]
    Named,
    /// No header; cells are `Id`, `Property`, then the requested languages in order.
    Positional,
}

/// Where each language's compiled file is written, relative to the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputLayout {
    /// `Resources.resw` for the default language, `Resources.lang-<tag>.resw` for the rest.
    #[default]
    Qualified,
    /// `<tag>/Resources.resw` for every language.
    Folders,
}

impl OutputLayout {
    /// Relative path of the file holding `language`.
    ///
    /// ```rust
    /// use reswc::options::OutputLayout;
    /// use std::path::PathBuf;
    ///
    /// let layout = OutputLayout::Qualified;
    /// assert_eq!(layout.file_name("Resources", "en-US", true), PathBuf::from("Resources.resw"));
    /// assert_eq!(
    ///     layout.file_name("Resources", "fr-FR", false),
    ///     PathBuf::from("Resources.lang-fr-FR.resw")
    /// );
    /// ```
    pub fn file_name(&self, base_name: &str, language: &str, is_default: bool) -> PathBuf {
        match self {
            OutputLayout::Qualified if is_default => PathBuf::from(format!("{base_name}.resw")),
            OutputLayout::Qualified => PathBuf::from(format!("{base_name}.lang-{language}.resw")),
            OutputLayout::Folders => PathBuf::from(language).join(format!("{base_name}.resw")),
        }
    }
}

impl Display for OutputLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputLayout::Qualified => write!(f, "qualified"),
            OutputLayout::Folders => write!(f, "folders"),
        }
    }
}

impl FromStr for OutputLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qualified" => Ok(OutputLayout::Qualified),
            "folders" | "folder" => Ok(OutputLayout::Folders),
            other => Err(Error::configuration(format!(
                "unknown output layout `{other}` (expected `qualified` or `folders`)"
            ))),
        }
    }
}

/// Options for one compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Requested language codes, in output order.
    pub languages: Vec<String>,
    /// Language written to the unqualified base file.
    pub default_language: Option<String>,
    pub schema_mode: SchemaMode,
    pub column_layout: ColumnLayout,
    pub output_layout: OutputLayout,
    /// File name stem of the compiled resources.
    pub base_name: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            languages: Vec::new(),
            default_language: None,
            schema_mode: SchemaMode::default(),
            column_layout: ColumnLayout::default(),
            output_layout: OutputLayout::default(),
            base_name: DEFAULT_BASE_NAME.to_string(),
        }
    }
}

impl CompileOptions {
    /// Creates options for the given languages with every other setting at its default.
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            languages: languages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Sets the default language.
    pub fn with_default_language(mut self, default_language: Option<String>) -> Self {
        self.default_language = default_language.filter(|lang| !lang.is_empty());
        self
    }

    /// Sets the schema mode.
    pub fn with_schema_mode(mut self, schema_mode: SchemaMode) -> Self {
        self.schema_mode = schema_mode;
        self
    }

    /// Sets the column layout.
    pub fn with_column_layout(mut self, column_layout: ColumnLayout) -> Self {
        self.column_layout = column_layout;
        self
    }

    /// Sets the output layout.
    pub fn with_output_layout(mut self, output_layout: OutputLayout) -> Self {
        self.output_layout = output_layout;
        self
    }

    /// Sets the base file name.
    pub fn with_base_name(mut self, base_name: impl Into<String>) -> Self {
        self.base_name = base_name.into();
        self
    }

    pub fn is_default_language(&self, language: &str) -> bool {
        self.default_language.as_deref() == Some(language)
    }

    /// Checks the options before any input is touched.
    pub fn validate(&self) -> Result<(), Error> {
        if self.languages.is_empty() {
            return Err(Error::configuration("at least one language is required"));
        }

        let mut seen = HashSet::new();
        for lang in &self.languages {
            if lang.parse::<LanguageIdentifier>().is_err() {
                return Err(Error::configuration(format!(
                    "invalid language code `{lang}`"
                )));
            }
            if !seen.insert(lang.as_str()) {
                return Err(Error::configuration(format!(
                    "language `{lang}` is requested more than once"
                )));
            }
        }

        if let Some(default) = &self.default_language {
            if !self.languages.contains(default) {
                return Err(Error::configuration(format!(
                    "default language `{default}` must be in the list of languages"
                )));
            }
        }

        if self.base_name.is_empty() || self.base_name.contains(['/', '\\', '.']) {
            return Err(Error::configuration(format!(
                "invalid base name `{}`",
                self.base_name
            )));
        }

        Ok(())
    }

    /// Relative output path of the file holding `language`.
    pub fn output_file_name(&self, language: &str) -> PathBuf {
        self.output_layout.file_name(
            &self.base_name,
            language,
            self.is_default_language(language),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_language_must_be_requested() {
        let options = CompileOptions::new(["en-US", "fr-FR"])
            .with_default_language(Some("de-DE".to_string()));
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("must be in the list of languages"));
    }

    #[test]
    fn test_empty_default_language_is_none() {
        let options = CompileOptions::new(["en-US"]).with_default_language(Some(String::new()));
        assert_eq!(options.default_language, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_no_languages() {
        let options = CompileOptions::new(Vec::<String>::new());
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_duplicate_language() {
        let options = CompileOptions::new(["en-US", "en-US"]);
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_invalid_language_code() {
        let options = CompileOptions::new(["en-US", "not a tag"]);
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_invalid_base_name() {
        let options = CompileOptions::new(["en-US"]).with_base_name("Strings/Resources");
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_output_file_names() {
        let options = CompileOptions::new(["en-US", "zh-Hans"])
            .with_default_language(Some("en-US".to_string()));
        assert_eq!(options.output_file_name("en-US"), PathBuf::from("Resources.resw"));
        assert_eq!(
            options.output_file_name("zh-Hans"),
            PathBuf::from("Resources.lang-zh-Hans.resw")
        );

        let folders = options.with_output_layout(OutputLayout::Folders);
        assert_eq!(
            folders.output_file_name("en-US"),
            PathBuf::from("en-US").join("Resources.resw")
        );
    }

    #[test]
    fn test_without_default_every_file_is_qualified() {
        let options = CompileOptions::new(["en-US"]);
        assert_eq!(
            options.output_file_name("en-US"),
            PathBuf::from("Resources.lang-en-US.resw")
        );
    }

    #[test]
    fn test_output_layout_from_str() {
        assert_eq!("Folders".parse::<OutputLayout>().unwrap(), OutputLayout::Folders);
        assert_eq!(" qualified ".parse::<OutputLayout>().unwrap(), OutputLayout::Qualified);
        assert!("flat".parse::<OutputLayout>().is_err());
    }
}

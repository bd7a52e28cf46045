//! Settings for `reswc compile`, read from a TOML or YAML file and overridden
//! by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use reswc::{ColumnLayout, CompileOptions, OutputLayout, SchemaMode};
use serde::Deserialize;

use crate::validation::{
    validate_base_name, validate_languages, validate_output_dir, validate_source_dir,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompileSettings {
    pub src: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub languages: Vec<String>,
    pub default_language: Option<String>,
    pub permissive: bool,
    pub positional: bool,
    pub base_name: Option<String>,
    pub layout: Option<OutputLayout>,
}

/// Fully checked settings, ready to run.
#[derive(Debug, Clone)]
pub struct ResolvedCompile {
    pub src: PathBuf,
    pub out: PathBuf,
    pub options: CompileOptions,
}

impl CompileSettings {
    /// Load settings from `path`; the format is chosen by extension.
    pub fn load(path: &Path) -> Result<Self, String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config file {}: {}", path.display(), e))?;

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "toml" => toml::from_str(&text)
                .map_err(|e| format!("Invalid config file {}: {}", path.display(), e)),
            "yaml" | "yml" => serde_yaml::from_str(&text)
                .map_err(|e| format!("Invalid config file {}: {}", path.display(), e)),
            _ => Err(format!(
                "Unsupported config file extension: {}. Expected: toml, yaml, yml",
                ext
            )),
        }
    }

    /// Values set in `overrides` win over the ones in `self`.
    pub fn merge(self, overrides: CompileSettings) -> CompileSettings {
        CompileSettings {
            src: overrides.src.or(self.src),
            out: overrides.out.or(self.out),
            languages: if overrides.languages.is_empty() {
                self.languages
            } else {
                overrides.languages
            },
            default_language: overrides.default_language.or(self.default_language),
            permissive: overrides.permissive || self.permissive,
            positional: overrides.positional || self.positional,
            base_name: overrides.base_name.or(self.base_name),
            layout: overrides.layout.or(self.layout),
        }
    }

    /// Check every setting and build the compiler options.
    pub fn resolve(self) -> Result<ResolvedCompile, String> {
        let src = self
            .src
            .ok_or_else(|| "A source directory is required (--src)".to_string())?;
        let out = self
            .out
            .ok_or_else(|| "An output directory is required (--out)".to_string())?;

        validate_source_dir(&src)?;
        validate_output_dir(&out)?;

        let languages: Vec<String> = self
            .languages
            .iter()
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty())
            .collect();
        let default_language = self
            .default_language
            .map(|lang| lang.trim().to_string())
            .filter(|lang| !lang.is_empty());
        validate_languages(&languages, default_language.as_deref())?;

        let mut options = CompileOptions::new(languages).with_default_language(default_language);
        if self.permissive {
            options = options.with_schema_mode(SchemaMode::Permissive);
        }
        if self.positional {
            options = options.with_column_layout(ColumnLayout::Positional);
        }
        if let Some(base_name) = self.base_name {
            validate_base_name(&base_name)?;
            options = options.with_base_name(base_name);
        }
        if let Some(layout) = self.layout {
            options = options.with_output_layout(layout);
        }
        options.validate().map_err(|e| e.to_string())?;

        Ok(ResolvedCompile { src, out, options })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reswc.toml");
        fs::write(
            &path,
            "src = \"strings\"\nout = \"out\"\nlanguages = [\"en-US\", \"fr-FR\"]\ndefault_language = \"en-US\"\nlayout = \"folders\"\n",
        )
        .unwrap();

        let settings = CompileSettings::load(&path).unwrap();
        assert_eq!(settings.languages, vec!["en-US", "fr-FR"]);
        assert_eq!(settings.default_language.as_deref(), Some("en-US"));
        assert_eq!(settings.layout, Some(OutputLayout::Folders));
        assert!(!settings.permissive);
    }

    #[test]
    fn test_load_yaml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reswc.yml");
        fs::write(&path, "languages:\n  - en-US\npermissive: true\n").unwrap();

        let settings = CompileSettings::load(&path).unwrap();
        assert_eq!(settings.languages, vec!["en-US"]);
        assert!(settings.permissive);
    }

    #[test]
    fn test_load_rejects_unknown_keys_and_extensions() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("reswc.toml");
        fs::write(&path, "langs = [\"en\"]\n").unwrap();
        assert!(CompileSettings::load(&path).is_err());

        let path = temp_dir.path().join("reswc.ini");
        fs::write(&path, "").unwrap();
        assert!(
            CompileSettings::load(&path)
                .unwrap_err()
                .contains("Unsupported config file extension")
        );
    }

    #[test]
    fn test_flags_override_file() {
        let file = CompileSettings {
            languages: vec!["en-US".into()],
            default_language: Some("en-US".into()),
            base_name: Some("Strings".into()),
            ..Default::default()
        };
        let flags = CompileSettings {
            languages: vec!["de-DE".into(), "fr-FR".into()],
            default_language: Some("fr-FR".into()),
            ..Default::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.languages, vec!["de-DE", "fr-FR"]);
        assert_eq!(merged.default_language.as_deref(), Some("fr-FR"));
        assert_eq!(merged.base_name.as_deref(), Some("Strings"));
    }

    #[test]
    fn test_resolve_requires_default_in_languages() {
        let temp_dir = TempDir::new().unwrap();
        let settings = CompileSettings {
            src: Some(temp_dir.path().to_path_buf()),
            out: Some(temp_dir.path().join("out")),
            languages: vec!["en-US".into()],
            default_language: Some("fr-FR".into()),
            ..Default::default()
        };
        let err = settings.resolve().unwrap_err();
        assert!(err.contains("must be in the list of languages"));
    }

    #[test]
    fn test_resolve_builds_options() {
        let temp_dir = TempDir::new().unwrap();
        let settings = CompileSettings {
            src: Some(temp_dir.path().to_path_buf()),
            out: Some(temp_dir.path().join("out")),
            languages: vec![" en-US ".into(), "fr-FR".into()],
            permissive: true,
            positional: true,
            ..Default::default()
        };
        let resolved = settings.resolve().unwrap();
        assert_eq!(resolved.options.languages, vec!["en-US", "fr-FR"]);
        assert_eq!(resolved.options.schema_mode, SchemaMode::Permissive);
        assert_eq!(resolved.options.column_layout, ColumnLayout::Positional);
    }
}

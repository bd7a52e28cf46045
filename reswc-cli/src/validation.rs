use std::path::Path;

use reswc::AccessorTarget;
use unic_langid::LanguageIdentifier;

/// Validate language code format using unic-langid (same as lib crate)
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.trim().is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    match lang.parse::<LanguageIdentifier>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        )),
    }
}

/// Validate the requested languages and the optional default language
pub fn validate_languages(languages: &[String], default: Option<&str>) -> Result<(), String> {
    if languages.is_empty() {
        return Err("At least one language is required (--languages)".to_string());
    }

    for (i, lang) in languages.iter().enumerate() {
        validate_language_code(lang)?;
        if languages[..i].contains(lang) {
            return Err(format!("Language {} is listed more than once", lang));
        }
    }

    if let Some(default) = default {
        validate_language_code(default)?;
        if !languages.iter().any(|lang| lang == default) {
            return Err(format!(
                "Default language {} must be in the list of languages ({})",
                default,
                languages.join(", ")
            ));
        }
    }

    Ok(())
}

/// Validate source directory exists and is a directory
pub fn validate_source_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Source directory does not exist: {}", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("Source path is not a directory: {}", path.display()));
    }

    Ok(())
}

/// Validate output directory is not an existing file
pub fn validate_output_dir(path: &Path) -> Result<(), String> {
    if path.as_os_str().is_empty() {
        return Err("Output directory cannot be empty".to_string());
    }

    if path.exists() && !path.is_dir() {
        return Err(format!("Output path is not a directory: {}", path.display()));
    }

    Ok(())
}

/// Validate resource file base name
pub fn validate_base_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Base name cannot be empty".to_string());
    }

    if name.contains(['/', '\\', '.']) {
        return Err(format!(
            "Invalid base name: {}. Base names cannot contain '/', '\\' or '.'",
            name
        ));
    }

    Ok(())
}

/// Parse an accessor target of the form `Namespace.Class`
pub fn parse_target(target: &str) -> Result<AccessorTarget, String> {
    target.parse().map_err(|e: reswc::Error| e.to_string())
}

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use reswc::{FormatType, SourceFile};

/// Build a case-insensitive GlobSet matching file names with one of the given extensions.
fn extension_set(extension: &str) -> Result<GlobSet, String> {
    let pattern = format!("*.{}", extension);
    let glob = GlobBuilder::new(&pattern)
        .case_insensitive(true)
        .literal_separator(true)
        .build()
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    builder
        .build()
        .map_err(|e| format!("Failed to build glob set: {}", e))
}

/// Walk `root` and collect files whose name matches `set`.
///
/// With `respect_ignore_files` the walk honours `.gitignore`, `.ignore` and
/// global excludes; otherwise every file below `root` is visited.
fn walk_matching(
    root: &Path,
    set: &GlobSet,
    respect_ignore_files: bool,
) -> Result<Vec<PathBuf>, String> {
    let mut builder = WalkBuilder::new(root);
    if respect_ignore_files {
        builder
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true);
    } else {
        builder.standard_filters(false);
    }
    let walker = builder.hidden(false).build();

    let mut out = Vec::new();
    for dent in walker {
        let dent = dent.map_err(|e| format!("Cannot walk {}: {}", root.display(), e))?;
        let is_file = dent.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        let matched = dent
            .path()
            .file_name()
            .map(|name| set.is_match(name))
            .unwrap_or(false);
        if matched {
            out.push(dent.into_path());
        }
    }
    Ok(out)
}

/// Discover every `.csv` translation table below `root`.
///
/// Ignore files are not consulted: every table under the source root is
/// compiled. Sources are sorted by their path relative to `root`, which fixes
/// the insertion order of the compiled tables.
pub fn discover_sources(root: &Path) -> Result<Vec<SourceFile>, String> {
    let set = extension_set(FormatType::Csv.extension())?;
    let mut sources: Vec<SourceFile> = walk_matching(root, &set, false)?
        .iter()
        .filter_map(|path| SourceFile::from_root(root, path))
        .collect();
    sources.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(sources)
}

/// Expand files and directories into `.resw` file paths.
/// Directories are walked; files are kept as given. The result is sorted and deduplicated.
pub fn expand_resw_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let set = extension_set(FormatType::Resw.extension())?;

    let mut collected = Vec::new();
    for input in inputs {
        if input.is_dir() {
            collected.extend(walk_matching(input, &set, true)?);
        } else if input.is_file() {
            collected.push(input.clone());
        } else {
            return Err(format!("Resource path does not exist: {}", input.display()));
        }
    }

    let mut seen: HashSet<PathBuf> = HashSet::new();
    collected.retain(|path| seen.insert(path.clone()));
    collected.sort();
    Ok(collected)
}

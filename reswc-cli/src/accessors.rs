use std::fs;
use std::path::{Path, PathBuf};

use reswc::{
    AccessorFormat, Diagnostic, DiagnosticKind, ReswSource, check_qualifier_consistency, generate,
};
use reswc_cli::{
    EXIT_CONFIG, EXIT_FAILURE, EXIT_SUCCESS, expand_resw_inputs, output::print_diagnostics,
    validation::{parse_target, validate_output_dir},
};
use tracing::info;

/// Run `reswc accessors` and return the process exit status.
pub fn run_accessors_command(
    inputs: &[PathBuf],
    targets: &[String],
    out: &Path,
    format: &str,
    check_qualifiers: bool,
) -> i32 {
    let format: AccessorFormat = match format.parse() {
        Ok(format) => format,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };
    let targets = match targets
        .iter()
        .map(|target| parse_target(target))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(targets) => targets,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };
    if let Err(e) = validate_output_dir(out) {
        eprintln!("Error: {}", e);
        return EXIT_CONFIG;
    }
    let paths = match expand_resw_inputs(inputs) {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let mut files = Vec::with_capacity(paths.len());
    let mut unreadable = Vec::new();
    for path in paths {
        match fs::read_to_string(&path) {
            Ok(contents) => files.push(ReswSource::new(path, contents)),
            Err(e) => unreadable.push(Diagnostic::file(
                DiagnosticKind::UnreadableResource,
                path.display().to_string(),
                format!("Cannot read resource file: {}", e),
            )),
        }
    }
    info!(files = files.len(), targets = targets.len(), "generating accessors");

    let mut generation = generate(&targets, &files);
    generation.diagnostics.extend(unreadable);
    if check_qualifiers {
        generation
            .diagnostics
            .merge(check_qualifier_consistency(&files));
    }

    if !generation.declarations.is_empty() {
        if let Err(e) = fs::create_dir_all(out) {
            eprintln!("Error: Cannot create output directory: {}", e);
            return EXIT_FAILURE;
        }
    }
    for declaration in &generation.declarations {
        let path = out.join(declaration.file_name(format));
        let written = declaration
            .render(format)
            .map_err(|e| e.to_string())
            .and_then(|text| fs::write(&path, text).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("Error: Cannot write {}: {}", path.display(), e);
            return EXIT_FAILURE;
        }
        info!(path = %path.display(), "generated accessors");
    }

    print_diagnostics(&generation.diagnostics);
    println!(
        "✅ Generated {} accessor file(s) in {}",
        generation.declarations.len(),
        out.display()
    );
    EXIT_SUCCESS
}

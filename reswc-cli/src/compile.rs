use std::fs;
use std::path::Path;

use reswc::{CompileReport, Compiler};
use reswc_cli::{
    CompileSettings, EXIT_CONFIG, EXIT_FAILURE, EXIT_SUCCESS, discover_sources,
    output::print_diagnostics,
};
use tracing::{info, warn};

/// Run `reswc compile` and return the process exit status.
pub fn run_compile_command(
    flags: CompileSettings,
    config: Option<&Path>,
    report_path: Option<&Path>,
) -> i32 {
    let settings = match config {
        Some(path) => match CompileSettings::load(path) {
            Ok(file) => file.merge(flags),
            Err(e) => {
                eprintln!("Error: {}", e);
                return EXIT_CONFIG;
            }
        },
        None => flags,
    };

    let resolved = match settings.resolve() {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let sources = match discover_sources(&resolved.src) {
        Ok(sources) => sources,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };
    if sources.is_empty() {
        warn!(src = %resolved.src.display(), "no translation tables found");
    }
    info!(count = sources.len(), "discovered translation tables");

    let compiler = match Compiler::new(resolved.options) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let report = match compiler.run(&sources, &resolved.out) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };

    print_diagnostics(&report.diagnostics);

    if let Some(path) = report_path {
        if let Err(e) = write_report(&report, path) {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    }

    if report.diagnostics.has_errors() {
        eprintln!("No files were written.");
        return EXIT_FAILURE;
    }

    println!(
        "✅ Compiled {} resource(s) into {} file(s) in {}",
        report.resources,
        report.written.len(),
        resolved.out.display()
    );
    EXIT_SUCCESS
}

fn write_report(report: &CompileReport, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| format!("Cannot serialize report: {}", e))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Cannot create report directory: {}", e))?;
    }
    fs::write(path, json).map_err(|e| format!("Cannot write report {}: {}", path.display(), e))
}

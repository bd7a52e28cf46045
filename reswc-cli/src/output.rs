//! Console rendering of diagnostics.

use crossterm::style::Stylize;
use reswc::{Diagnostic, Diagnostics, Severity};

/// Colors are only used when stderr is a terminal.
pub fn use_color() -> bool {
    atty::is(atty::Stream::Stderr)
}

/// Format one diagnostic as `[ERROR] path, Line N: message`.
pub fn format_diagnostic(diagnostic: &Diagnostic, color: bool) -> String {
    let label = format!("[{}]", diagnostic.severity());
    let label = match (color, diagnostic.severity()) {
        (false, _) => label,
        (true, Severity::Error) => label.as_str().red().bold().to_string(),
        (true, Severity::Warning) => label.as_str().yellow().bold().to_string(),
    };

    match diagnostic.line {
        Some(line) => format!(
            "{} {}, Line {}: {}",
            label, diagnostic.source, line, diagnostic.message
        ),
        None => format!("{} {}: {}", label, diagnostic.source, diagnostic.message),
    }
}

/// Summary printed after the diagnostics, e.g. `2 errors, 1 warning`.
pub fn summary_line(diagnostics: &Diagnostics) -> String {
    fn plural(count: usize, word: &str) -> String {
        if count == 1 {
            format!("{} {}", count, word)
        } else {
            format!("{} {}s", count, word)
        }
    }

    format!(
        "{}, {}",
        plural(diagnostics.error_count(), "error"),
        plural(diagnostics.warning_count(), "warning")
    )
}

/// Print every diagnostic and the summary to stderr.
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    let color = use_color();
    for diagnostic in diagnostics {
        eprintln!("{}", format_diagnostic(diagnostic, color));
    }
    if !diagnostics.is_empty() {
        eprintln!("{}", summary_line(diagnostics));
    }
}

mod accessors;
mod compile;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use reswc::OutputLayout;
use reswc_cli::CompileSettings;
use tracing_subscriber::EnvFilter;

use crate::{accessors::run_accessors_command, compile::run_compile_command};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug). RESWC_LOG overrides it.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    commands: Commands,
}

/// Supported subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile CSV translation tables into one .resw file per language.
    Compile {
        /// Directory containing the .csv tables (searched recursively)
        #[arg(short, long)]
        src: Option<PathBuf>,

        /// Directory the .resw files are written to
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Languages to compile (repeatable, or comma separated)
        #[arg(short, long, value_delimiter = ',', num_args = 1..)]
        languages: Vec<String>,

        /// Language written to the unqualified base file
        #[arg(short, long)]
        default_language: Option<String>,

        /// Pad missing language columns with empty values instead of failing
        #[arg(long)]
        permissive: bool,

        /// Tables have no header: Id, Property, then one cell per language in order
        #[arg(long)]
        positional: bool,

        /// File name stem of the compiled resources (default: Resources)
        #[arg(long)]
        base_name: Option<String>,

        /// Output layout: qualified (Resources.lang-fr-FR.resw) or folders (fr-FR/Resources.resw)
        #[arg(long, value_parser = parse_layout)]
        layout: Option<OutputLayout>,

        /// TOML or YAML file with default settings; flags override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write a JSON report of the run to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Generate typed accessor classes from .resw files.
    Accessors {
        /// .resw files or directories containing them
        #[arg(short, long, required = true, num_args = 1..)]
        resw: Vec<PathBuf>,

        /// Target class as Namespace.Class (repeatable)
        #[arg(short, long, required = true, num_args = 1..)]
        target: Vec<String>,

        /// Directory the generated files are written to
        #[arg(short, long)]
        out: PathBuf,

        /// Output format: csharp or json
        #[arg(short, long, default_value = "csharp")]
        format: String,

        /// Warn when qualifier-specific files declare different keys than the canonical file
        #[arg(long)]
        check_qualifiers: bool,
    },
}

fn parse_layout(value: &str) -> Result<OutputLayout, String> {
    value.parse::<OutputLayout>().map_err(|e| e.to_string())
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("RESWC_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let status = match args.commands {
        Commands::Compile {
            src,
            out,
            languages,
            default_language,
            permissive,
            positional,
            base_name,
            layout,
            config,
            report,
        } => {
            let flags = CompileSettings {
                src,
                out,
                languages,
                default_language,
                permissive,
                positional,
                base_name,
                layout,
            };
            run_compile_command(flags, config.as_deref(), report.as_deref())
        }
        Commands::Accessors {
            resw,
            target,
            out,
            format,
            check_qualifiers,
        } => run_accessors_command(&resw, &target, &out, &format, check_qualifiers),
    };

    std::process::exit(status);
}

//! pyfix CLI
//!
//! Command-line interface for the pyfix Python source fixer

mod output;

use anyhow::{Context, Result};
use clap::Parser;
use pyfix_core::{ConfigLoader, PyfixConfig, collect_source_files, init_tracing};
use pyfix_fixers::{FixerRegistry, RefactorOptions, RefactoringEngine};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, error};

use crate::output::{OutputPrinter, RefactorSummary};

#[derive(Parser)]
#[command(name = "pyfix")]
#[command(about = "pyfix: rewrite legacy Python idioms in place")]
#[command(version = pyfix_core::VERSION)]
#[command(
    long_about = "pyfix parses Python sources into a lossless syntax tree and applies\n\
source-to-source fixers to them, printing a unified diff of every change.\n\
\n\
Examples:\n  \
pyfix src/                   # Show what would change under src/\n  \
pyfix -w src/                # Rewrite files, keeping .bak backups\n  \
pyfix -w -n app.py           # Rewrite without backups\n  \
pyfix --check .              # Exit with code 1 if anything would change\n  \
pyfix -l                     # List available fixers"
)]
struct Cli {
    /// Files or directories to process
    #[arg(help = "Files or directories to process (default: current directory)")]
    paths: Vec<PathBuf>,

    /// Write changes back to the files
    #[arg(short, long, help = "Write back modified files")]
    write: bool,

    /// Don't keep backups of rewritten files
    #[arg(short = 'n', long, help = "Don't write backups for modified files")]
    nobackups: bool,

    /// Fixers to run
    #[arg(
        short = 'f',
        long = "fix",
        value_name = "NAME",
        help = "Each NAME selects a fixer to run (default: all)"
    )]
    fix: Vec<String>,

    /// Fixers to skip
    #[arg(
        short = 'x',
        long = "nofix",
        value_name = "NAME",
        help = "Prevent a fixer from being run"
    )]
    nofix: Vec<String>,

    /// List available fixers and exit
    #[arg(short = 'l', long, help = "List available fixers")]
    list_fixes: bool,

    /// Check mode
    #[arg(
        long,
        help = "Exit with code 1 if any file would change, without writing",
        conflicts_with = "write"
    )]
    check: bool,

    /// Don't print diffs
    #[arg(long, help = "Don't show diffs of the refactoring")]
    no_diff: bool,

    /// Include patterns (glob syntax)
    #[arg(
        long,
        help = "Include files matching pattern (can be used multiple times)"
    )]
    include: Vec<String>,

    /// Exclude patterns (glob syntax)
    #[arg(
        long,
        help = "Exclude files matching pattern (can be used multiple times)"
    )]
    exclude: Vec<String>,

    /// Configuration file path
    #[arg(
        short,
        long,
        help = "Path to configuration file (pyfix.toml/.pyfixrc.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let use_colors = !cli.no_color && std::env::var("NO_COLOR").is_err();
    colored::control::set_override(use_colors);

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "pyfix=error",
        1 => "pyfix=warn",
        2 => "pyfix=info",
        3 => "pyfix=debug",
        _ => "pyfix=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        return ExitCode::from(2);
    }

    match run(cli, use_colors) {
        Ok(code) => code,
        Err(e) => {
            error!("pyfix failed: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli, use_colors: bool) -> Result<ExitCode> {
    let registry = FixerRegistry::with_builtins();
    let printer = OutputPrinter::new(use_colors, !cli.no_diff);

    if cli.list_fixes {
        printer.print_fixers(&registry);
        return Ok(ExitCode::SUCCESS);
    }

    let paths = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };

    let mut config = load_config(cli.config.as_deref(), &paths)?;
    apply_overrides(&mut config, &cli);

    let fixers = registry
        .select(&config.selected_fixers(), &config.ignored_fixers())
        .context("Failed to select fixers")?;
    let options = RefactorOptions {
        backups: config.backups_enabled(),
        validate_output: config.validate_output(),
    };
    let engine = RefactoringEngine::new(fixers, options);
    debug!(
        "Running fixers: {:?}",
        engine.fixers().iter().map(|f| f.name()).collect::<Vec<_>>()
    );

    let files = collect_source_files(&paths, &config).context("Failed to collect source files")?;
    debug!("Refactoring {} file(s)", files.len());

    let mut summary = RefactorSummary {
        files_checked: files.len(),
        ..RefactorSummary::default()
    };

    for (path, result) in engine.refactor_files(&files) {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                printer.print_failure(&path, &e);
                summary.failures += 1;
                continue;
            }
        };
        if !result.changed() {
            continue;
        }

        summary.files_changed += 1;
        summary.fixes_applied += result.fixes.len();
        printer.print_result(&result);

        if cli.write {
            match engine.write_result(&result) {
                Ok(true) => summary.files_written += 1,
                Ok(false) => {}
                Err(e) => {
                    printer.print_failure(&path, &e);
                    summary.failures += 1;
                }
            }
        }
    }

    printer.print_summary(&summary, cli.write);

    let would_change = cli.check && summary.files_changed > 0;
    if summary.failures > 0 || would_change {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Load the explicit config, or discover one next to the first path
fn load_config(config_path: Option<&Path>, paths: &[PathBuf]) -> Result<PyfixConfig> {
    if let Some(path) = config_path {
        return ConfigLoader::load(Some(path), None)
            .with_context(|| format!("Failed to load config {}", path.display()));
    }

    let start_dir = match paths.first() {
        Some(path) if path.is_file() => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        },
        Some(path) => path.as_path(),
        None => Path::new("."),
    };
    ConfigLoader::load(None, Some(start_dir)).context("Failed to load configuration")
}

/// Command line flags win over config file values
fn apply_overrides(config: &mut PyfixConfig, cli: &Cli) {
    if !cli.fix.is_empty() {
        config.fixers.get_or_insert_with(Default::default).select = Some(cli.fix.clone());
    }
    if !cli.nofix.is_empty() {
        let fixers = config.fixers.get_or_insert_with(Default::default);
        fixers
            .ignore
            .get_or_insert_with(Vec::new)
            .extend(cli.nofix.iter().cloned());
    }
    if !cli.include.is_empty() {
        config.files.get_or_insert_with(Default::default).include = Some(cli.include.clone());
    }
    if !cli.exclude.is_empty() {
        config.files.get_or_insert_with(Default::default).exclude = Some(cli.exclude.clone());
    }
    if cli.nobackups {
        config.write.get_or_insert_with(Default::default).backups = Some(false);
    }
}

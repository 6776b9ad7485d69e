//! Output formatting and reporting

use colored::*;
use pyfix_core::{PyfixError, generate_unified_diff, generate_unified_diff_plain};
use pyfix_fixers::{FixerRegistry, RefactorResult};
use std::path::Path;

/// Counters for one run
#[derive(Debug, Clone, Default)]
pub struct RefactorSummary {
    pub files_checked: usize,
    pub files_changed: usize,
    pub files_written: usize,
    pub fixes_applied: usize,
    pub failures: usize,
}

/// Prints diffs, failures and the run summary
pub struct OutputPrinter {
    use_colors: bool,
    show_diff: bool,
}

impl OutputPrinter {
    pub fn new(use_colors: bool, show_diff: bool) -> Self {
        Self {
            use_colors,
            show_diff,
        }
    }

    pub fn print_fixers(&self, registry: &FixerRegistry) {
        println!("{}", "Available fixers:".bold());
        let width = registry.names().iter().map(|n| n.len()).max().unwrap_or(0);
        for fixer in registry.iter() {
            let name = format!("{:<width$}", fixer.name());
            println!("  {}  {}", name.cyan(), fixer.description());
        }
    }

    /// Diff of a changed file
    pub fn print_result(&self, result: &RefactorResult) {
        if !self.show_diff {
            return;
        }
        let diff = if self.use_colors {
            generate_unified_diff(&result.original, &result.output, &result.path)
        } else {
            generate_unified_diff_plain(&result.original, &result.output, &result.path)
        };
        print!("{diff}");
    }

    pub fn print_failure(&self, path: &Path, error: &PyfixError) {
        eprintln!(
            "{} {}: {}",
            "error:".red().bold(),
            path.display(),
            error
        );
    }

    pub fn print_summary(&self, summary: &RefactorSummary, write: bool) {
        println!("\n{}", "Summary:".bold());
        println!("  Files checked: {}", summary.files_checked);

        if summary.files_changed == 0 {
            println!("  {} No changes needed", "✓".green());
        } else if write {
            println!(
                "  Files rewritten: {}",
                summary.files_written.to_string().green()
            );
        } else {
            println!(
                "  Files that need changes: {}",
                summary.files_changed.to_string().yellow()
            );
        }

        if summary.fixes_applied > 0 {
            let label = if write { "Fixes applied" } else { "Fixes found" };
            println!("  {label}: {}", summary.fixes_applied.to_string().green());
        }
        if summary.failures > 0 {
            println!("  Failures: {}", summary.failures.to_string().red());
        }
    }
}

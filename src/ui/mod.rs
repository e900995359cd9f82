use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

use crate::splitter::Stats;

/// Console output for a run. Everything is suppressed in quiet mode.
pub struct Reporter {
    quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn root(&self, root: &Path) {
        if !self.quiet {
            println!("Project root: {}", root.display());
        }
    }

    pub fn spinner(&self) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]));
        }
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }

    pub fn completed(&self, backend_output: &Path, frontend_output: &Path) {
        if self.quiet {
            return;
        }
        println!("✅ Backend concatenated to {}", backend_output.display());
        println!("✅ Frontend concatenated to {}", frontend_output.display());
    }

    pub fn summary(&self, stats: &Stats) {
        if self.quiet {
            return;
        }
        println!(
            "   {} backend files ({} bytes), {} frontend files ({} bytes), {} skipped",
            stats.backend.files.to_string().bold(),
            stats.backend.bytes,
            stats.frontend.files.to_string().bold(),
            stats.frontend.bytes,
            stats.skipped,
        );
        if stats.binary > 0 {
            println!("   {} binary files recorded without content", stats.binary.to_string().yellow());
        }
        if stats.unreadable > 0 || stats.walk_errors > 0 {
            println!(
                "   {} {} unreadable files, {} walk errors",
                "⚠️ ".yellow(),
                stats.unreadable,
                stats.walk_errors
            );
        }
    }

    pub fn plan(&self, stats: &Stats) {
        if self.quiet {
            return;
        }
        println!("{}", "Dry run: no files written".bold().blue());
        println!("  Backend:  {} files", stats.backend.files);
        println!("  Frontend: {} files", stats.frontend.files);
        println!("  Skipped:  {} files", stats.skipped);
        println!("  Pruned:   {} directories", stats.pruned_dirs);
    }
}

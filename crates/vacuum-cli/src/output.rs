//! Terminal output for the CLI.

use crate::config::RunSettings;
use crate::error::Result;
use colored::*;
use std::io::{BufRead, Write};
use vacuum_domain::OperationStats;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Startup banner.
    pub fn banner(&self) -> String {
        let title = format!("Dust Vacuum {}", env!("CARGO_PKG_VERSION"));
        format!(
            "{}\n{}",
            self.colorize(&title, "cyan"),
            "Archives files that have not been modified for a given number of years."
        )
    }

    /// Echo the effective settings before a run.
    pub fn settings(&self, settings: &RunSettings) -> String {
        let journal = match &settings.log_dir {
            Some(dir) => dir.display().to_string(),
            None => "disabled".to_string(),
        };
        let mut lines = vec![
            format!("Root directory:   {}", settings.root_dir.display()),
            format!("Target directory: {}", settings.vacuum.target_dir.display()),
            format!("Recursive:        {}", settings.vacuum.recursive),
            format!("Older than:       {} years", settings.vacuum.min_age_years),
            format!("Shred originals:  {}", settings.vacuum.shred_original),
            format!("Journal:          {}", journal),
        ];
        if settings.vacuum.dry_run {
            lines.push(self.warning("Dry run: no files will be copied or deleted"));
        }
        lines.join("\n")
    }

    /// Warning shown when every file would be archived.
    pub fn zero_age_warning(&self) -> String {
        self.warning(
            "An age of 0 years archives every file below the root directory regardless of its age.",
        )
    }

    /// Final statistics of a run.
    pub fn summary(&self, stats: &OperationStats) -> String {
        let summary = stats.summary();
        if stats.error_count() == 0 {
            self.success(&summary)
        } else {
            self.colorize(&summary, "yellow")
        }
    }

    /// Format a success message.
    pub fn success(&self, msg: &str) -> String {
        self.colorize(msg, "green")
    }

    /// Format a warning message.
    pub fn warning(&self, msg: &str) -> String {
        self.colorize(&format!("Warning: {}", msg), "yellow")
    }

    /// Format an informational message.
    pub fn info(&self, msg: &str) -> String {
        self.colorize(msg, "blue")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().bold().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Ask the user to type `yes` before archiving regardless of age.
///
/// Any other answer, including end of input, declines.
pub fn confirm_zero_age(mut input: impl BufRead, mut output: impl Write) -> Result<bool> {
    write!(output, "Type 'yes' to continue: ")?;
    output.flush()?;

    let mut response = String::new();
    input.read_line(&mut response)?;
    Ok(response.trim() == "yes")
}

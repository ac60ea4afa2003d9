//! Colored console output for resolve results.

use crate::specifier::PackageTarget;
use crate::types::{ResolveReport, Result};
use colored::Colorize;
use serde::Serialize;

/// Console output handler with colors and formatting.
pub struct ConsoleOutput {
    verbose: bool,
    json_mode: bool,
}

/// JSON shape of one `alias` line.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AliasOutput<'a> {
    token: &'a str,
    alias: &'a str,
    install_name: &'a str,
    cache_path: String,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool, json_mode: bool) -> Self {
        Self { verbose, json_mode }
    }

    /// Print one resolve report.
    pub fn print_report(&self, report: &ResolveReport) {
        if self.json_mode {
            return;
        }

        match (&report.result, &report.error) {
            (Some(result), _) => {
                let marker = if result.short_circuit {
                    "[+]".green()
                } else {
                    "[=]".bright_blue()
                };
                println!("{} {}", marker, report.specifier.bright_white());
                println!("    +-- {}", result.url);
            }
            (None, error) => {
                println!("{} {}", "[!]".red().bold(), report.specifier.bright_white());
                println!(
                    "    +-- {}",
                    error.as_deref().unwrap_or("unknown error").red()
                );
            }
        }

        if self.verbose {
            println!("        {}", format!("{:.2}s", report.duration_secs).dimmed());
        }
    }

    /// Print all reports, as a JSON array in JSON mode.
    pub fn print_reports(&self, reports: &[ResolveReport]) -> Result<()> {
        if self.json_mode {
            println!("{}", serde_json::to_string_pretty(reports)?);
            return Ok(());
        }

        for report in reports {
            self.print_report(report);
        }

        let failed = reports.iter().filter(|r| !r.is_ok()).count();
        if failed > 0 {
            println!();
            println!(
                "{}",
                format!("{} of {} specifiers failed to resolve", failed, reports.len())
                    .red()
                    .bold()
            );
        }
        Ok(())
    }

    /// Print alias details for install tokens.
    pub fn print_targets(&self, targets: &[PackageTarget]) -> Result<()> {
        if self.json_mode {
            let rows: Vec<AliasOutput> = targets
                .iter()
                .map(|t| AliasOutput {
                    token: &t.token,
                    alias: &t.alias,
                    install_name: &t.install_name,
                    cache_path: t.cache_path.display().to_string(),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        for target in targets {
            println!("{} {}", "===".bright_cyan(), target.token.bright_white().bold());
            println!("    |-- Alias:   {}", target.alias);
            println!("    |-- Install: {}", target.install_name);
            println!("    +-- Path:    {}", target.cache_path.display().to_string().dimmed());
        }
        Ok(())
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false, false)
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later

//! Coloured terminal output for check results and documents

use super::{CheckResult, DocumentReport, ReportOutputFormat};
use crate::i18n::{language_name, native_name, Language};
use anyhow::Result;
use colored::*;
use std::fs;
use std::path::Path;

#[derive(Default)]
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_checks(&self, results: &[CheckResult]) {
        println!("\n{}", "=== LTF CHECK ===".bold().cyan());
        for result in results {
            match &result.error {
                None => println!(
                    "  [{}] {} ({} entries)",
                    "OK".green().bold(),
                    result.file.display(),
                    result.entries
                ),
                Some(error) => println!(
                    "  [{}] {}\n        {}",
                    "ERR".red().bold(),
                    result.file.display(),
                    error
                ),
            }
        }

        let failed = results.iter().filter(|r| !r.passed()).count();
        println!();
        if failed == 0 {
            println!("{}", format!("{} file(s) passed", results.len()).green());
        } else {
            println!(
                "{}",
                format!("{} of {} file(s) failed", failed, results.len()).red().bold()
            );
        }
    }

    pub fn print_document(&self, report: &DocumentReport) {
        let title = match &report.file {
            Some(path) => format!("=== {} ===", path.display()),
            None => "=== LTF DOCUMENT ===".to_string(),
        };
        println!("\n{}", title.bold().cyan());
        if let Some(kind) = report.kind {
            println!("  Mode: {}", kind);
        }
        println!("  Entries: {}", report.entry_count);
        println!();

        for (id, texts) in &report.entries {
            println!("  {}", id.bold().yellow());
            for (tag, text) in texts {
                // Continuation lines are indented under the tag.
                let shown = text.replace('\n', "\n           ");
                println!("    {:6} {}", tag.blue(), shown);
            }
        }
    }

    pub fn print_languages(&self) {
        println!("{}", "SUPPORTED LANGUAGES".bold().yellow());
        for language in Language::all() {
            println!(
                "  {}  {:12} {}",
                language.code().bold(),
                language_name(*language),
                native_name(*language)
            );
        }
    }

    pub fn save(&self, report: &DocumentReport, format: ReportOutputFormat, path: &Path) -> Result<()> {
        let content = format.serialize(report)?;
        fs::write(path, content)?;
        println!("Report saved to: {}", path.display());
        Ok(())
    }
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Colored console output for the smoke run.

use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;

/// Width of section rules.
const RULE_WIDTH: usize = 60;

/// Writes the human-readable report. Write failures are ignored: a closed
/// stdout must not turn a passing check into a failing one.
pub struct Reporter {
    out: Mutex<Box<dyn Write + Send>>,
}

impl Reporter {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    fn line(&self, text: impl std::fmt::Display) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{}", text);
            let _ = out.flush();
        }
    }

    /// Section banner between two rules.
    pub fn header(&self, text: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.line("");
        self.line(rule.blue().bold());
        self.line(format!("{:^width$}", text, width = RULE_WIDTH).blue().bold());
        self.line(rule.blue().bold());
        self.line("");
    }

    pub fn test(&self, name: &str) {
        self.line(format!("▶ Check: {}", name).yellow());
    }

    pub fn success(&self, message: &str) {
        self.line(format!("✓ {}", message).green());
    }

    pub fn error(&self, message: &str) {
        self.line(format!("✗ {}", message).red());
    }

    pub fn info(&self, message: &str) {
        self.line(format!("ℹ {}", message).blue());
    }

    pub fn warning(&self, message: &str) {
        self.line(format!("⚠ {}", message).yellow());
    }

    pub fn bold(&self, message: &str) {
        self.line(message.bold());
    }

    /// Prompt text without a trailing newline.
    pub fn prompt(&self, message: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = write!(out, "{}", message.yellow());
            let _ = out.flush();
        }
    }

    /// Closing summary block.
    pub fn summary(&self, summary: &crate::runner::Summary) {
        self.header("TEST SUMMARY");
        self.bold(&format!("Total: {} checks", summary.total));
        self.line(format!("✓ Passed: {}", summary.passed).green());
        self.line(format!("✗ Failed: {}", summary.failed).red());
        for name in &summary.failed_checks {
            self.line(format!("    - {}", name).red());
        }
        self.line("");
        self.bold(&format!("Success rate: {:.1}%", summary.success_rate()));

        if summary.all_passed() {
            self.line("");
            self.line("ALL CHECKS PASSED".green().bold());
            self.line("You can proceed with the deployment.".green());
        } else {
            self.line("");
            self.line("SOME CHECKS FAILED".red().bold());
            self.line("Fix the errors before deploying.".red());
        }
    }
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Check wrapper and result tally.
//!
//! Every automatic check goes through [`counted`], which announces it,
//! awaits it, and records the outcome. An error from a check is a failure,
//! never an abort.

use crate::error::Result;
use crate::report::Reporter;
use std::future::Future;
use tracing::{info, warn};

/// One recorded check outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRecord {
    pub name: String,
    pub passed: bool,
}

/// Pass/fail counters for one run.
#[derive(Debug, Default)]
pub struct Tally {
    total: u32,
    passed: u32,
    failed: u32,
    records: Vec<CheckRecord>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome; returns it unchanged.
    pub fn record(&mut self, name: &str, passed: bool) -> bool {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.records.push(CheckRecord {
            name: name.to_string(),
            passed,
        });
        passed
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn passed(&self) -> u32 {
        self.passed
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }

    pub fn summary(&self) -> Summary {
        Summary {
            total: self.total,
            passed: self.passed,
            failed: self.failed,
            failed_checks: self
                .records
                .iter()
                .filter(|r| !r.passed)
                .map(|r| r.name.clone())
                .collect(),
        }
    }
}

/// Final counts of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub failed_checks: Vec<String>,
}

impl Summary {
    /// Passed checks as a percentage of all checks.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64 * 100.0
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Run one automatic check and record its outcome.
pub async fn counted<F>(tally: &mut Tally, reporter: &Reporter, name: &str, check: F) -> bool
where
    F: Future<Output = Result<bool>>,
{
    reporter.test(name);

    let passed = match check.await {
        Ok(true) => {
            info!(check = name, "Check passed");
            true
        }
        Ok(false) => {
            warn!(check = name, "Check failed");
            reporter.error(&format!("{} failed", name));
            false
        }
        Err(err) => {
            warn!(check = name, error = %err, "Check errored");
            reporter.error(&format!("Error: {}", err));
            false
        }
    };

    tally.record(name, passed)
}

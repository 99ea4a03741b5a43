// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The individual smoke checks.
//!
//! Each automatic check is an async function taking a [`CheckContext`] and
//! returning `Result<bool>`. Threshold failures are reported by the check
//! and returned as `Ok(false)`; transport and decoding problems are errors.

pub mod auth;
pub mod backend;
pub mod email;
pub mod items;
pub mod likes;

use crate::client::{ApiResponse, BackendClient};
use crate::config::Config;
use crate::policy::QuotaVerdict;
use crate::report::Reporter;
use tracing::warn;

/// Everything a check needs.
pub struct CheckContext {
    pub client: BackendClient,
    pub config: Config,
    pub reporter: Reporter,
}

impl CheckContext {
    pub fn new(client: BackendClient, config: Config, reporter: Reporter) -> Self {
        Self {
            client,
            config,
            reporter,
        }
    }

    /// Report the final verdict of a quota probe and turn it into a pass/fail.
    pub(crate) fn settle_quota(
        &self,
        label: &str,
        verdict: QuotaVerdict,
        last: &ApiResponse,
    ) -> bool {
        let strict = self.config.strict_quotas;
        match verdict {
            QuotaVerdict::Enforced => {
                self.reporter.success(&format!("{}: request over quota refused", label));
                self.report_limit_details(last);
            }
            QuotaVerdict::AlreadyExhausted { at } => {
                warn!(check = label, at, strict, "Quota already spent before probe");
                self.reporter.warning(&format!(
                    "{}: request {} refused early, quota already spent by an earlier check or run",
                    label, at
                ));
                self.report_limit_details(last);
                if strict {
                    self.reporter
                        .error("Strict mode: an already-spent quota does not prove the threshold");
                } else {
                    self.reporter
                        .info("Rate limiting is active; the exact threshold was not verified");
                }
            }
            other => self.reporter.error(&format!("{}: {}", label, other)),
        }
        verdict.passed(strict)
    }

    /// Print the backend's limit message and Retry-After, when present.
    pub(crate) fn report_limit_details(&self, response: &ApiResponse) {
        if let Some(message) = response.error_message() {
            self.reporter.info(&format!("Backend says: {}", message));
        }
        if let Some(retry_after) = &response.retry_after {
            self.reporter.info(&format!("Retry-After: {}s", retry_after));
        }
    }
}

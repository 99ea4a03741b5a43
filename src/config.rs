// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the smoke test run.
//!
//! Default thresholds align with the limiter settings of the backend under
//! test: 3 code requests per email per 15 minutes, code lockout after 5
//! wrong attempts, 15 likes per minute.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a smoke test run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend base URL (default: http://localhost:3002)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Email used by every authentication check
    #[serde(default = "default_test_email")]
    pub test_email: String,

    /// Per-request timeout in seconds (default: 5)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Timeout for the structural check in seconds (default: 10)
    #[serde(default = "default_structure_timeout_secs")]
    pub structure_timeout_secs: u64,

    /// Count an already-exhausted quota as a failure instead of a warning
    #[serde(default)]
    pub strict_quotas: bool,

    /// Preset answer for the manual email check; `None` prompts on stdin
    #[serde(default)]
    pub email_confirmation: Option<bool>,

    /// Backend limiter thresholds
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Pauses between requests and checks
    #[serde(default)]
    pub pacing: Pacing,
}

/// Limits the backend is expected to enforce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thresholds {
    /// Code requests accepted per email before 429 (default: 3)
    #[serde(default = "default_auth_code_quota")]
    pub auth_code_quota: u32,

    /// Wrong codes tolerated before lockout (default: 5)
    #[serde(default = "default_max_code_failures")]
    pub max_code_failures: u32,

    /// Likes accepted per window before 429 (default: 15)
    #[serde(default = "default_like_quota")]
    pub like_quota: u32,

    /// Lowercase fragment of the lockout error message
    #[serde(default = "default_lockout_marker")]
    pub lockout_marker: String,
}

/// Fixed pauses that keep the run inside the backend's rate-limit windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pacing {
    /// After a successful code request (default: 1000)
    #[serde(default = "default_after_code_request_ms")]
    pub after_code_request_ms: u64,

    /// Between the three auth checks (default: 3000)
    #[serde(default = "default_between_auth_checks_ms")]
    pub between_auth_checks_ms: u64,

    /// Between code requests inside the auth quota probe (default: 500)
    #[serde(default = "default_auth_request_gap_ms")]
    pub auth_request_gap_ms: u64,

    /// Between wrong-code attempts (default: 500)
    #[serde(default = "default_verify_attempt_gap_ms")]
    pub verify_attempt_gap_ms: u64,

    /// Between the two like checks (default: 2000)
    #[serde(default = "default_between_like_checks_ms")]
    pub between_like_checks_ms: u64,

    /// Between likes inside the like quota probe (default: 100)
    #[serde(default = "default_like_request_gap_ms")]
    pub like_request_gap_ms: u64,

    /// Before the structural check (default: 2000)
    #[serde(default = "default_before_structure_ms")]
    pub before_structure_ms: u64,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_test_email() -> String {
    "admin@example.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_structure_timeout_secs() -> u64 {
    10
}

fn default_auth_code_quota() -> u32 {
    3 // request-code limiter: 3 per 15 minutes
}

fn default_max_code_failures() -> u32 {
    5
}

fn default_like_quota() -> u32 {
    15 // like limiter: 15 per minute
}

fn default_lockout_marker() -> String {
    "trop de tentatives".to_string()
}

fn default_after_code_request_ms() -> u64 {
    1000
}

fn default_between_auth_checks_ms() -> u64 {
    3000
}

fn default_auth_request_gap_ms() -> u64 {
    500
}

fn default_verify_attempt_gap_ms() -> u64 {
    500
}

fn default_between_like_checks_ms() -> u64 {
    2000
}

fn default_like_request_gap_ms() -> u64 {
    100
}

fn default_before_structure_ms() -> u64 {
    2000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            test_email: default_test_email(),
            request_timeout_secs: default_request_timeout_secs(),
            structure_timeout_secs: default_structure_timeout_secs(),
            strict_quotas: false,
            email_confirmation: None,
            thresholds: Thresholds::default(),
            pacing: Pacing::default(),
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            auth_code_quota: default_auth_code_quota(),
            max_code_failures: default_max_code_failures(),
            like_quota: default_like_quota(),
            lockout_marker: default_lockout_marker(),
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            after_code_request_ms: default_after_code_request_ms(),
            between_auth_checks_ms: default_between_auth_checks_ms(),
            auth_request_gap_ms: default_auth_request_gap_ms(),
            verify_attempt_gap_ms: default_verify_attempt_gap_ms(),
            between_like_checks_ms: default_between_like_checks_ms(),
            like_request_gap_ms: default_like_request_gap_ms(),
            before_structure_ms: default_before_structure_ms(),
        }
    }
}

impl Config {
    /// Get the per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the structural check timeout
    pub fn structure_timeout(&self) -> Duration {
        Duration::from_secs(self.structure_timeout_secs)
    }
}

impl Pacing {
    /// No pauses at all. Only sensible against a mock or a fresh backend.
    pub fn none() -> Self {
        Self {
            after_code_request_ms: 0,
            between_auth_checks_ms: 0,
            auth_request_gap_ms: 0,
            verify_attempt_gap_ms: 0,
            between_like_checks_ms: 0,
            like_request_gap_ms: 0,
            before_structure_ms: 0,
        }
    }
}

/// Sleep for `ms` milliseconds; zero returns immediately.
pub async fn pause(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

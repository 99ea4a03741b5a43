// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for running smoke checks against an in-process backend.
//!
//! This module provides a mock of the items/likes backend with the same
//! limiter behavior, plus helpers to build check contexts and capture the
//! console report.

#![allow(dead_code)]

pub mod backend;
pub mod capture;

use deploy_smoke::checks::CheckContext;
use deploy_smoke::config::{Config, Pacing};
use deploy_smoke::report::Reporter;

use capture::Capture;

/// Config for a fast run against `base_url`: no pauses, email preset to yes.
pub fn fast_config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        test_email: "admin@example.com".to_string(),
        request_timeout_secs: 2,
        structure_timeout_secs: 2,
        email_confirmation: Some(true),
        pacing: Pacing::none(),
        ..Default::default()
    }
}

/// Check context over `config` whose report is captured.
pub fn context_with(config: Config) -> (CheckContext, Capture) {
    let capture = Capture::default();
    let reporter = Reporter::new(Box::new(capture.clone()));
    let ctx = deploy_smoke::suite::context(config, reporter).expect("valid base url");
    (ctx, capture)
}

/// Check context for a fast run against `base_url`.
pub fn context(base_url: &str) -> (CheckContext, Capture) {
    context_with(fast_config(base_url))
}

/// A base URL nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

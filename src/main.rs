// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Deploy Smoke
//!
//! Runs the pre-deployment smoke checks against a backend and exits 0 when
//! every check passed, 1 otherwise.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file in the
//! working directory is read first):
//!
//! - `SMOKE_BASE_URL`: Backend base URL (default: http://localhost:3002)
//! - `SMOKE_TEST_EMAIL`: Email used by the authentication checks
//! - `SMOKE_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 5)
//! - `SMOKE_STRUCTURE_TIMEOUT_SECS`: Structural check timeout (default: 10)
//! - `SMOKE_STRICT_QUOTAS`: Fail when a quota was already spent (default: false)
//! - `SMOKE_EMAIL_CONFIRMED`: Preset answer for the manual email check
//! - `SMOKE_NO_PAUSE`: Skip the pauses between requests (default: false)
//! - `SMOKE_LOG_FORMAT`: `json` for JSON logs on stderr (default: text)

use anyhow::{ensure, Context};
use colored::Colorize;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use url::Url;

use deploy_smoke::{
    config::{Config, Pacing},
    report::Reporter,
    suite::{self, Suite},
};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing(std::env::var("SMOKE_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")));

    match run().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("\n\n{}", format!("Fatal error: {:#}", err).red());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);

    // stderr keeps log lines out of the report on stdout
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run() -> anyhow::Result<bool> {
    let config = load_config();
    info!(
        base_url = %config.base_url,
        strict_quotas = config.strict_quotas,
        auth_code_quota = config.thresholds.auth_code_quota,
        like_quota = config.thresholds.like_quota,
        "Starting smoke run"
    );

    let url = Url::parse(&config.base_url)
        .with_context(|| format!("invalid SMOKE_BASE_URL {:?}", config.base_url))?;
    ensure!(
        matches!(url.scheme(), "http" | "https"),
        "SMOKE_BASE_URL must use http or https, got {}",
        url.scheme()
    );

    let ctx = suite::context(config, Reporter::stdout())?;
    let answers = BufReader::new(tokio::io::stdin());

    tokio::select! {
        summary = Suite::new(ctx).run(answers) => Ok(summary.all_passed()),
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for Ctrl-C")?;
            println!("\n\n{}", "Interrupted by user.".yellow());
            // a pending stdin read would block runtime shutdown
            std::process::exit(1);
        }
    }
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let defaults = Config::default();
    Config {
        base_url: std::env::var("SMOKE_BASE_URL").unwrap_or(defaults.base_url),
        test_email: std::env::var("SMOKE_TEST_EMAIL").unwrap_or(defaults.test_email),
        request_timeout_secs: env_parse("SMOKE_REQUEST_TIMEOUT_SECS")
            .unwrap_or(defaults.request_timeout_secs),
        structure_timeout_secs: env_parse("SMOKE_STRUCTURE_TIMEOUT_SECS")
            .unwrap_or(defaults.structure_timeout_secs),
        strict_quotas: env_flag("SMOKE_STRICT_QUOTAS").unwrap_or(false),
        email_confirmation: env_flag("SMOKE_EMAIL_CONFIRMED"),
        pacing: if env_flag("SMOKE_NO_PAUSE").unwrap_or(false) {
            Pacing::none()
        } else {
            Pacing::default()
        },
        thresholds: defaults.thresholds,
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

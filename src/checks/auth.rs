// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Authentication flow checks.
//!
//! All three checks use the same email and run in a fixed order: the code
//! request spends one unit of the per-email quota, the quota probe spends
//! the rest, and the brute-force probe needs a fresh code of its own.

use super::CheckContext;
use crate::config::pause;
use crate::error::Result;
use crate::models::CodeRequestResponse;
use crate::policy::{LockoutProbe, QuotaProbe, TOO_MANY_REQUESTS};
use tracing::{debug, warn};

/// One code request is accepted and echoes the email.
pub async fn request_code(ctx: &CheckContext) -> Result<bool> {
    let email = &ctx.config.test_email;
    let response = ctx.client.request_code(email).await?;
    response.expect(200)?;

    let body: CodeRequestResponse = response.json()?;
    if !body.email.eq_ignore_ascii_case(email) {
        ctx.reporter.error(&format!(
            "Code request answered for {} instead of {}",
            body.email, email
        ));
        return Ok(false);
    }
    ctx.reporter.success(&format!("Code sent: {}", body.message));
    ctx.reporter.info(&format!(
        "Verify manually: an email should arrive at {}",
        body.email
    ));

    pause(ctx.config.pacing.after_code_request_ms).await;
    Ok(true)
}

/// The code request endpoint accepts `auth_code_quota` requests per email
/// and refuses the next one.
pub async fn rate_limit(ctx: &CheckContext) -> Result<bool> {
    let mut probe = QuotaProbe::new(ctx.config.thresholds.auth_code_quota);
    let quota = ctx.config.thresholds.auth_code_quota;

    loop {
        let at = probe.next_attempt();
        let response = ctx.client.request_code(&ctx.config.test_email).await?;
        debug!(at, status = response.status, "Code request");

        match probe.observe(response.status) {
            None => ctx.reporter.info(&format!("Request {}/{} accepted", at, quota)),
            Some(verdict) => return Ok(ctx.settle_quota("Code requests", verdict, &response)),
        }

        pause(ctx.config.pacing.auth_request_gap_ms).await;
    }
}

/// Wrong codes are refused until `max_code_failures`, then the code locks.
pub async fn brute_force(ctx: &CheckContext) -> Result<bool> {
    let email = &ctx.config.test_email;
    let response = ctx.client.request_code(email).await?;

    if response.is(TOO_MANY_REQUESTS) {
        let strict = ctx.config.strict_quotas;
        warn!(strict, "Code quota spent, brute-force probe skipped");
        ctx.reporter
            .warning("Code quota reached, cannot request a fresh code for the brute-force probe");
        if strict {
            ctx.reporter.error("Strict mode: brute-force protection was not exercised");
            return Ok(false);
        }
        ctx.reporter.info("Rate limiting already proven, check passed");
        return Ok(true);
    }
    response.expect(200)?;

    pause(ctx.config.pacing.after_code_request_ms).await;

    let marker = &ctx.config.thresholds.lockout_marker;
    let tolerated = ctx.config.thresholds.max_code_failures;
    let mut probe = LockoutProbe::new(tolerated);
    ctx.reporter.info(&format!(
        "Submitting up to {} wrong codes",
        probe.max_attempts()
    ));

    loop {
        let at = probe.next_attempt();
        let code = probe.next_code();
        let response = ctx.client.verify_code(email, &code).await?;
        let blocked_marker = response.body_contains(marker);
        debug!(at, code = %code, status = response.status, blocked_marker, "Code attempt");

        match probe.observe(response.status, blocked_marker) {
            None => ctx.reporter.info(&format!(
                "Attempt {}/{} refused (wrong code)",
                at, tolerated
            )),
            Some(verdict) if verdict.passed() => {
                ctx.reporter.success(&format!("Attempt {} blocked by brute-force protection", at));
                ctx.report_limit_details(&response);
                return Ok(true);
            }
            Some(verdict) => {
                ctx.reporter.error(&format!("Brute force: {}", verdict));
                return Ok(false);
            }
        }

        pause(ctx.config.pacing.verify_attempt_gap_ms).await;
    }
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runs the checks in their fixed order and produces the summary.

use crate::checks::{auth, backend, email, items, likes, CheckContext};
use crate::client::BackendClient;
use crate::config::{pause, Config};
use crate::report::Reporter;
use crate::runner::{counted, Summary, Tally};
use tokio::io::AsyncBufRead;
use tracing::info;

/// Name under which the manual email check is recorded.
pub const EMAIL_CHECK: &str = "email delivery";

/// One smoke run.
pub struct Suite {
    ctx: CheckContext,
    tally: Tally,
}

impl Suite {
    pub fn new(ctx: CheckContext) -> Self {
        Self {
            ctx,
            tally: Tally::new(),
        }
    }

    /// Run every check. `answers` feeds the manual email prompt unless the
    /// configuration presets the answer.
    pub async fn run<R>(mut self, answers: R) -> Summary
    where
        R: AsyncBufRead + Unpin,
    {
        self.banner();
        self.run_automatic().await;

        let received = self.email_check(answers).await;
        self.tally.record(EMAIL_CHECK, received);

        let summary = self.tally.summary();
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "Smoke run finished"
        );
        self.ctx.reporter.summary(&summary);
        summary
    }

    fn banner(&self) {
        let reporter = &self.ctx.reporter;
        reporter.header("PRE-DEPLOYMENT SMOKE TESTS");
        reporter.bold(&format!("Backend URL: {}", self.ctx.client.base_url()));
        reporter.bold(&format!(
            "Date: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
    }

    async fn run_automatic(&mut self) {
        let ctx = &self.ctx;
        let tally = &mut self.tally;
        let reporter = &ctx.reporter;
        let pacing = &ctx.config.pacing;

        reporter.header("BACKEND");
        counted(tally, reporter, "backend health", backend::health(ctx)).await;
        counted(tally, reporter, "backend info", backend::info(ctx)).await;

        reporter.header("AUTHENTICATION");
        reporter.info("Authentication checks share one email address.");
        reporter.info("If a check fails on rate limiting, wait 15 minutes");
        reporter.info("or restart the backend to reset the quotas.");
        counted(tally, reporter, "request code", auth::request_code(ctx)).await;
        pause(pacing.between_auth_checks_ms).await;
        counted(tally, reporter, "code request rate limit", auth::rate_limit(ctx)).await;
        pause(pacing.between_auth_checks_ms).await;
        counted(tally, reporter, "brute-force protection", auth::brute_force(ctx)).await;

        reporter.header("ITEMS");
        counted(tally, reporter, "public items", items::list(ctx)).await;

        reporter.header("LIKES");
        counted(tally, reporter, "like increment", likes::increment(ctx)).await;
        pause(pacing.between_like_checks_ms).await;
        counted(tally, reporter, "like rate limit", likes::rate_limit(ctx)).await;

        reporter.header("DATABASE");
        counted(tally, reporter, "item structure", items::structure(ctx)).await;
    }

    async fn email_check<R>(&self, answers: R) -> bool
    where
        R: AsyncBufRead + Unpin,
    {
        let ctx = &self.ctx;
        let email = &ctx.config.test_email;

        if let Some(received) = ctx.config.email_confirmation {
            return email::preset(&ctx.reporter, email, received);
        }

        match email::confirm(&ctx.reporter, email, answers).await {
            Ok(received) => received,
            Err(err) => {
                ctx.reporter.error(&format!("Could not read the answer: {}", err));
                false
            }
        }
    }
}

/// Build the check context for a run.
pub fn context(config: Config, reporter: Reporter) -> Result<CheckContext, url::ParseError> {
    let client = BackendClient::new(&config.base_url, config.request_timeout())?;
    Ok(CheckContext::new(client, config, reporter))
}

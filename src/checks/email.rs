// SPDX-License-Identifier: PMPL-1.0-or-later
//! Manual email delivery check
//!
//! Mail delivery cannot be observed over the API, so an operator confirms
//! it. The answer is read from any async line source; the suite passes
//! stdin.

use crate::error::Result;
use crate::report::Reporter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Whether an operator answer means "yes".
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn instructions(reporter: &Reporter, email: &str) {
    reporter.info("This check needs a manual confirmation.");
    reporter.info(&format!("1. A verification email should have been sent to {}", email));
    reporter.info("2. Check that inbox");
    reporter.info("3. In production make sure that:");
    reporter.info("   - SMTP_HOST, SMTP_PORT, SMTP_USER, SMTP_PASS are set");
    reporter.info("   - SMTP_PASS is an app password, not the account password");
}

fn verdict(reporter: &Reporter, received: bool) -> bool {
    if received {
        reporter.success("Email delivery works");
    } else {
        reporter.error("Email not received. Check the SMTP configuration.");
    }
    received
}

/// Ask the operator whether the email arrived. End of input counts as "no".
pub async fn confirm<R>(reporter: &Reporter, email: &str, input: R) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    reporter.header("EMAIL (MANUAL)");
    instructions(reporter, email);
    reporter.prompt("\nDid you receive the verification email? (y/n): ");

    let mut lines = input.lines();
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(verdict(reporter, is_affirmative(&answer)))
}

/// Use an answer given up front instead of prompting.
pub fn preset(reporter: &Reporter, email: &str, received: bool) -> bool {
    reporter.header("EMAIL (MANUAL)");
    instructions(reporter, email);
    reporter.info(&format!(
        "Answer preset by configuration: {}",
        if received { "yes" } else { "no" }
    ));
    verdict(reporter, received)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::captured;

    #[test]
    fn test_affirmative_answers() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("Y\n"));
        assert!(is_affirmative(" yes "));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("yep"));
    }

    #[tokio::test]
    async fn test_confirm_reads_yes() {
        let (reporter, capture) = captured();
        let received = confirm(&reporter, "admin@example.com", &b"y\n"[..])
            .await
            .unwrap();
        assert!(received);
        assert!(capture.text().contains("admin@example.com"));
    }

    #[tokio::test]
    async fn test_confirm_eof_is_no() {
        let (reporter, capture) = captured();
        let received = confirm(&reporter, "admin@example.com", &b""[..])
            .await
            .unwrap();
        assert!(!received);
        assert!(capture.text().contains("SMTP"));
    }

    #[test]
    fn test_preset_answer() {
        let (reporter, _) = captured();
        assert!(preset(&reporter, "admin@example.com", true));
        assert!(!preset(&reporter, "admin@example.com", false));
    }
}

// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Likes counter checks.

use super::CheckContext;
use crate::config::pause;
use crate::error::{CheckError, Result};
use crate::models::{ItemsResponse, LikeResponse};
use crate::policy::QuotaProbe;
use tracing::debug;

/// Fetch the public listing, or `None` when it is not usable.
async fn listing(ctx: &CheckContext) -> Result<Option<ItemsResponse>> {
    let response = ctx.client.list_items().await?;
    if !response.is(200) {
        debug!(status = response.status, "Item listing unavailable");
        return Ok(None);
    }
    Ok(Some(response.json()?))
}

/// A like on the first item raises its count.
pub async fn increment(ctx: &CheckContext) -> Result<bool> {
    let response = ctx.client.list_items().await?;
    response.expect(200)?;
    let body: ItemsResponse = response.json()?;

    let Some(item) = body.item(0) else {
        ctx.reporter.warning("No public item to like. Create one first.");
        return Ok(false);
    };
    let item = item?;

    let before = item.like_count();
    ctx.reporter.info(&format!("Target item #{} - current likes: {}", item.id, before));

    let response = ctx.client.like(&item.id).await?;
    if !response.is(200) {
        return Err(CheckError::UnexpectedStatus {
            url: response.url.clone(),
            status: response.status,
            body: response.excerpt(),
        });
    }

    let after = response.json::<LikeResponse>()?.likes;
    if after > before {
        ctx.reporter.success(&format!("Like added: {} -> {}", before, after));
        Ok(true)
    } else {
        ctx.reporter.error(&format!("Like count did not increase: {} -> {}", before, after));
        Ok(false)
    }
}

/// The like endpoint accepts `like_quota` likes per window and refuses the
/// next one.
pub async fn rate_limit(ctx: &CheckContext) -> Result<bool> {
    let target = match listing(ctx).await? {
        Some(body) => {
            // second item when there is one, so the increment check's target is left alone
            let index = if body.items.len() > 1 { 1 } else { 0 };
            body.item(index).transpose()?
        }
        None => None,
    };
    let Some(target) = target else {
        ctx.reporter.warning("No item to probe the like limit with, skipped");
        return Ok(true);
    };

    let quota = ctx.config.thresholds.like_quota;
    let mut probe = QuotaProbe::new(quota);
    ctx.reporter.info(&format!(
        "Probing item #{} with up to {} likes",
        target.id,
        probe.max_requests()
    ));

    loop {
        let at = probe.next_attempt();
        let response = ctx.client.like(&target.id).await?;

        match probe.observe(response.status) {
            None => ctx.reporter.info(&format!("Like {}/{} accepted", at, quota)),
            Some(verdict) => return Ok(ctx.settle_quota("Likes", verdict, &response)),
        }

        pause(ctx.config.pacing.like_request_gap_ms).await;
    }
}

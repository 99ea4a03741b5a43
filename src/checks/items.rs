// SPDX-License-Identifier: PMPL-1.0-or-later
//! Public item listing checks

use super::CheckContext;
use crate::config::pause;
use crate::error::{CheckError, Result};
use crate::models::{missing_fields, ItemsResponse};
use serde_json::Value;

/// The public listing answers 200.
pub async fn list(ctx: &CheckContext) -> Result<bool> {
    let response = ctx.client.list_items().await?;
    response.expect(200)?;

    let body: ItemsResponse = response.json()?;
    ctx.reporter.success(&format!("Fetched {} public items", body.items.len()));

    if let Some(first) = body.items.first() {
        ctx.reporter.info(&format!(
            "Example: {} ({})",
            first.get("title").and_then(Value::as_str).unwrap_or("untitled"),
            first.get("type").and_then(Value::as_str).unwrap_or("unknown type")
        ));
    }
    Ok(true)
}

/// Listed items carry the expected columns, including `likes`.
pub async fn structure(ctx: &CheckContext) -> Result<bool> {
    pause(ctx.config.pacing.before_structure_ms).await;

    let response = ctx
        .client
        .list_items_within(ctx.config.structure_timeout())
        .await?;
    response.expect(200)?;

    let body: ItemsResponse = response.json()?;
    let Some(item) = body.items.first() else {
        ctx.reporter.warning("No items stored, structure cannot be verified");
        return Ok(true);
    };

    let missing = missing_fields(item);
    if !missing.is_empty() {
        ctx.reporter.error(&format!("Missing fields: {}", missing.join(", ")));
        return Ok(false);
    }
    ctx.reporter.success("Item structure is correct");

    if !item.contains_key("likes") {
        ctx.reporter.error("Field `likes` missing: migration not applied");
        return Err(CheckError::missing("likes"));
    }
    ctx.reporter.success("Field `likes` present");
    Ok(true)
}

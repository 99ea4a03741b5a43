// SPDX-License-Identifier: PMPL-1.0-or-later
//! Backend availability checks

use super::CheckContext;
use crate::error::Result;
use crate::models::{HealthResponse, InfoResponse};

/// `GET /health` answers 200 with a status.
pub async fn health(ctx: &CheckContext) -> Result<bool> {
    let response = ctx.client.health().await?;
    response.expect(200)?;

    let body: HealthResponse = response.json()?;
    ctx.reporter.success(&format!("Backend online - status: {}", body.status));
    Ok(true)
}

/// `GET /` answers 200 with name, version and endpoint listing.
pub async fn info(ctx: &CheckContext) -> Result<bool> {
    let response = ctx.client.info().await?;
    response.expect(200)?;

    let body: InfoResponse = response.json()?;
    ctx.reporter.success(&format!("API: {}", body.message));
    ctx.reporter.info(&format!("Version: {}", body.version));

    let endpoints: Vec<&str> = body.endpoints.keys().map(String::as_str).collect();
    ctx.reporter.info(&format!("Endpoints: {}", endpoints.join(", ")));
    Ok(true)
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health HTTP handler.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{api::AppState, error::ServerError};

/// GET /health - liveness plus a store round trip.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, ServerError> {
	state.tenants.health_check().await.map_err(|e| {
		tracing::warn!(error = %e, "Health check failed");
		ServerError::Unavailable("tenant store unreachable".to_string())
	})?;

	Ok(Json(json!({ "status": "ok" })))
}

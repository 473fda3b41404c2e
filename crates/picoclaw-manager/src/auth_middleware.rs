// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Bearer API key check for `/api/v1`.

use axum::{
	extract::{Request, State},
	http::header::AUTHORIZATION,
	middleware::Next,
	response::Response,
};
use picoclaw_manager_config::SecretString;
use tracing::warn;

use crate::error::ServerError;

/// Reject requests whose bearer token does not match the configured key.
///
/// A missing or malformed header is 401; a well-formed but wrong key is 403.
pub async fn require_api_key(
	State(expected): State<SecretString>,
	request: Request,
	next: Next,
) -> Result<Response, ServerError> {
	let Some(auth_value) = request
		.headers()
		.get(AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
	else {
		warn!("API auth failed: missing Authorization header");
		return Err(ServerError::Unauthorized(
			"missing Authorization header".to_string(),
		));
	};

	let Some(token) = auth_value.strip_prefix("Bearer ").map(str::trim) else {
		warn!("API auth failed: invalid Authorization format");
		return Err(ServerError::Unauthorized(
			"expected a Bearer token".to_string(),
		));
	};

	if expected.matches(token) {
		Ok(next.run(request).await)
	} else {
		warn!("API auth failed: invalid API key");
		Err(ServerError::Forbidden("invalid API key".to_string()))
	}
}

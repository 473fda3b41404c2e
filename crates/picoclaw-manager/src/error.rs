// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP error mapping.

use axum::{
	extract::rejection::JsonRejection,
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use picoclaw_manager_tenant::TenantError;
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("bad request: {0}")]
	BadRequest(String),
	#[error("unauthorized: {0}")]
	Unauthorized(String),
	#[error("forbidden: {0}")]
	Forbidden(String),
	#[error("not found: {0}")]
	NotFound(String),
	#[error("conflict: {0}")]
	Conflict(String),
	#[error("upstream failure: {0}")]
	BadGateway(String),
	#[error("service unavailable: {0}")]
	Unavailable(String),
	#[error("internal error: {0}")]
	Internal(String),
}

impl ServerError {
	fn parts(&self) -> (StatusCode, &'static str, &str) {
		match self {
			ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, "bad_request", m),
			ServerError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, "unauthorized", m),
			ServerError::Forbidden(m) => (StatusCode::FORBIDDEN, "forbidden", m),
			ServerError::NotFound(m) => (StatusCode::NOT_FOUND, "not_found", m),
			ServerError::Conflict(m) => (StatusCode::CONFLICT, "conflict", m),
			ServerError::BadGateway(m) => (StatusCode::BAD_GATEWAY, "cluster_error", m),
			ServerError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable", m),
			ServerError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", m),
		}
	}
}

impl From<TenantError> for ServerError {
	fn from(e: TenantError) -> Self {
		let message = e.to_string();
		match e {
			TenantError::Validation { .. } => ServerError::BadRequest(message),
			TenantError::Conflict { .. } => ServerError::Conflict(message),
			TenantError::NotFound { .. } => ServerError::NotFound(message),
			TenantError::Remote(_) => ServerError::BadGateway(message),
			TenantError::Persistence { .. }
			| TenantError::Render(_)
			| TenantError::CorruptConfig { .. } => ServerError::Internal(message),
		}
	}
}

impl From<JsonRejection> for ServerError {
	fn from(rejection: JsonRejection) -> Self {
		ServerError::BadRequest(rejection.body_text())
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		let (status, code, message) = self.parts();
		if status.is_server_error() {
			tracing::error!(status = status.as_u16(), error = %message, "Request failed");
		}
		let body = ErrorResponse {
			error: code.to_string(),
			message: message.to_string(),
		};
		(status, Json(body)).into_response()
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant store errors.

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Tenant store query failed: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Cannot open tenant store: {0}")]
	Open(String),

	#[error("Tenant not found: {0}")]
	NotFound(String),

	/// Tenant ID or namespace already recorded.
	#[error("Tenant already exists: {0}")]
	Conflict(String),

	/// A stored row no longer decodes into a tenant.
	#[error("Stored tenant {id} is corrupt: {message}")]
	CorruptRow { id: String, message: String },

	#[error("Tenant config document could not be encoded: {0}")]
	Config(#[from] serde_json::Error),

	#[error("Tenant store unavailable: {0}")]
	Unavailable(String),
}

pub type Result<T> = std::result::Result<T, DbError>;

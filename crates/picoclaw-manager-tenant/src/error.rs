// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant lifecycle error types.

use picoclaw_manager_db::DbError;
use picoclaw_manager_k8s::K8sError;
use picoclaw_manager_templates::RendererError;

/// Errors returned by [`crate::TenantService`].
#[derive(Debug, thiserror::Error)]
pub enum TenantError {
	/// Request failed input checks; nothing was touched.
	#[error("Invalid request: {message}")]
	Validation { message: String },

	#[error("Tenant already exists: {id}")]
	Conflict { id: String },

	#[error("Tenant not found: {id}")]
	NotFound { id: String },

	/// Cluster call failed. The wrapped error names the resource.
	#[error(transparent)]
	Remote(#[from] K8sError),

	#[error("Tenant store failed for {id}: {source}")]
	Persistence {
		id: String,
		#[source]
		source: DbError,
	},

	#[error(transparent)]
	Render(#[from] RendererError),

	/// Stored config document is not a JSON object.
	#[error("Stored config for tenant {id} is corrupt: {message}")]
	CorruptConfig { id: String, message: String },
}

impl TenantError {
	pub fn validation(message: impl Into<String>) -> Self {
		TenantError::Validation {
			message: message.into(),
		}
	}

	pub(crate) fn persistence(id: &str, source: DbError) -> Self {
		TenantError::Persistence {
			id: id.to_string(),
			source,
		}
	}
}

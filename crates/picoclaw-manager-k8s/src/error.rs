// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Result type alias for K8s operations.
pub type K8sResult<T> = Result<T, K8sError>;

/// Errors that can occur during K8s operations.
///
/// Every variant raised while talking to the cluster names the resource
/// involved so callers can report exactly which step failed.
#[derive(Error, Debug)]
pub enum K8sError {
	#[error("K8s API error: {message}")]
	ApiError { message: String },

	#[error("K8s client configuration error: {message}")]
	Config { message: String },

	#[error("Invalid manifest: {message}")]
	ManifestParse { message: String },

	#[error("No resource mapping for {kind} ({api_version}): {message}")]
	MappingNotFound {
		api_version: String,
		kind: String,
		message: String,
	},

	#[error("Apply {kind} {namespace}/{name} failed: {message}")]
	ApplyFailed {
		kind: String,
		namespace: String,
		name: String,
		message: String,
	},

	#[error("Apply {kind} {namespace}/{name} conflicts with another field manager: {message}")]
	ApplyConflict {
		kind: String,
		namespace: String,
		name: String,
		message: String,
	},

	#[error("Namespace not found: {name}")]
	NamespaceNotFound { name: String },

	#[error("Delete namespace {name} failed: {message}")]
	NamespaceDeleteFailed { name: String, message: String },

	#[error("Deployment not found: {namespace}/{name}")]
	DeploymentNotFound { namespace: String, name: String },

	#[error("Restart deployment {namespace}/{name} failed: {message}")]
	RestartFailed {
		namespace: String,
		name: String,
		message: String,
	},

	#[error("Get deployment {namespace}/{name} failed: {message}")]
	DeploymentStatusFailed {
		namespace: String,
		name: String,
		message: String,
	},
}

impl From<kube::Error> for K8sError {
	fn from(err: kube::Error) -> Self {
		K8sError::ApiError {
			message: err.to_string(),
		}
	}
}

/// Returns the HTTP status code of a kube API error, if it carries one.
pub(crate) fn api_status(err: &kube::Error) -> Option<u16> {
	match err {
		kube::Error::Api(resp) => Some(resp.code),
		_ => None,
	}
}

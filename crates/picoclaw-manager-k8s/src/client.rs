// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use async_trait::async_trait;

use crate::error::K8sError;
use crate::types::{Deployment, GroupVersionKind, ResourceMapping};

/// Field manager recorded on every server-side apply.
pub const FIELD_MANAGER: &str = "picoclaw-manager";

/// Trait for K8s client operations.
///
/// Everything the manifest applier needs from the cluster goes through
/// here, so tests can swap in a recording mock.
#[async_trait]
pub trait K8sClient: Send + Sync {
	/// Resolve a group/version/kind to its REST resource using live discovery.
	async fn resolve_mapping(&self, gvk: &GroupVersionKind) -> Result<ResourceMapping, K8sError>;

	/// Server-side apply a single document as [`FIELD_MANAGER`], without
	/// forcing ownership. `namespace` is `None` for cluster-scoped resources.
	async fn apply_resource(
		&self,
		mapping: &ResourceMapping,
		namespace: Option<&str>,
		name: &str,
		body: &serde_json::Value,
	) -> Result<(), K8sError>;

	/// Delete a namespace. Cascading deletion is not awaited.
	async fn delete_namespace(&self, name: &str) -> Result<(), K8sError>;

	/// Apply a strategic-merge patch to a deployment.
	async fn patch_deployment(
		&self,
		namespace: &str,
		name: &str,
		patch: &serde_json::Value,
	) -> Result<(), K8sError>;

	/// Get a deployment by name.
	async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, K8sError>;
}

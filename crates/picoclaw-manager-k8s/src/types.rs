// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::{Deserialize, Serialize};

pub use k8s_openapi::api::apps::v1::Deployment;
pub use k8s_openapi::api::core::v1::Namespace;
pub use kube::core::GroupVersionKind;

/// Addressing scope of a server resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceScope {
	Namespaced,
	Cluster,
}

/// Resolution of a group/version/kind to its REST collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMapping {
	pub gvk: GroupVersionKind,
	/// Plural resource name used in the collection URL (e.g. "deployments").
	pub plural: String,
	pub scope: ResourceScope,
}

impl ResourceMapping {
	pub fn new(gvk: GroupVersionKind, plural: impl Into<String>, scope: ResourceScope) -> Self {
		Self {
			gvk,
			plural: plural.into(),
			scope,
		}
	}

	pub fn is_namespaced(&self) -> bool {
		self.scope == ResourceScope::Namespaced
	}
}

/// A single resource document parsed out of a manifest stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
	/// API group; empty for the core group.
	pub group: String,
	pub version: String,
	pub kind: String,
	pub namespace: Option<String>,
	pub name: String,
	/// Full document as submitted to the server.
	pub body: serde_json::Value,
}

impl ManifestDocument {
	pub fn gvk(&self) -> GroupVersionKind {
		GroupVersionKind::gvk(&self.group, &self.version, &self.kind)
	}

	pub fn api_version(&self) -> String {
		if self.group.is_empty() {
			self.version.clone()
		} else {
			format!("{}/{}", self.group, self.version)
		}
	}
}

/// A resource that was successfully applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedResource {
	pub kind: String,
	pub namespace: Option<String>,
	pub name: String,
}

/// Outcome of a successful apply call, in stream order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
	pub applied: Vec<AppliedResource>,
}

impl ApplySummary {
	pub fn len(&self) -> usize {
		self.applied.len()
	}

	pub fn is_empty(&self) -> bool {
		self.applied.is_empty()
	}
}

/// Point-in-time replica counts of a deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatus {
	pub ready_replicas: i32,
	pub replicas: i32,
}

impl DeploymentStatus {
	pub fn from_deployment(deployment: &Deployment) -> Self {
		let status = deployment.status.as_ref();
		Self {
			ready_replicas: status.and_then(|s| s.ready_replicas).unwrap_or(0),
			replicas: status.and_then(|s| s.replicas).unwrap_or(0),
		}
	}

	pub fn is_ready(&self) -> bool {
		self.replicas > 0 && self.ready_replicas >= self.replicas
	}
}

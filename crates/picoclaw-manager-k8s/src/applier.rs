// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Generic manifest applier.
//!
//! Applies an arbitrary stream of resource documents without knowing any
//! kind up front: every document's type is resolved against the server's
//! discovery data when the call runs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::client::K8sClient;
use crate::error::{K8sError, K8sResult};
use crate::manifest::parse_manifests;
use crate::types::{AppliedResource, ApplySummary, DeploymentStatus, ResourceMapping};

/// Pod template annotation bumped to trigger a rollout restart.
pub const RESTARTED_AT_ANNOTATION: &str = "kubectl.kubernetes.io/restartedAt";

/// Applies manifest streams and performs the handful of imperative
/// operations tenants need.
pub struct ManifestApplier {
	client: Arc<dyn K8sClient>,
}

impl ManifestApplier {
	pub fn new(client: Arc<dyn K8sClient>) -> Self {
		Self { client }
	}

	/// Server-side apply every document in `stream`, strictly in order.
	///
	/// The first failure aborts the call; documents applied before it stay
	/// applied. Mappings are resolved once per distinct type per call.
	#[instrument(skip(self, stream), fields(bytes = stream.len()))]
	pub async fn apply(&self, stream: &[u8]) -> K8sResult<ApplySummary> {
		let documents = parse_manifests(stream)?;
		let mut mappings: HashMap<(String, String, String), ResourceMapping> = HashMap::new();
		let mut summary = ApplySummary::default();

		for doc in documents {
			let key = (doc.group.clone(), doc.version.clone(), doc.kind.clone());
			let mapping = match mappings.get(&key) {
				Some(mapping) => mapping.clone(),
				None => {
					let mapping = self.client.resolve_mapping(&doc.gvk()).await?;
					mappings.insert(key, mapping.clone());
					mapping
				}
			};

			let namespace = if mapping.is_namespaced() {
				match doc.namespace.as_deref() {
					Some(ns) => Some(ns),
					None => {
						return Err(K8sError::ApplyFailed {
							kind: doc.kind.clone(),
							namespace: String::new(),
							name: doc.name.clone(),
							message: "namespaced resource has no metadata.namespace".to_string(),
						});
					}
				}
			} else {
				None
			};

			self
				.client
				.apply_resource(&mapping, namespace, &doc.name, &doc.body)
				.await?;
			debug!(kind = %doc.kind, namespace = ?namespace, name = %doc.name, "applied resource");

			summary.applied.push(AppliedResource {
				kind: doc.kind.clone(),
				namespace: namespace.map(str::to_string),
				name: doc.name.clone(),
			});
		}

		info!(count = summary.len(), "applied manifests");
		Ok(summary)
	}

	/// Delete a namespace and everything in it. Does not wait for the
	/// cascade to finish.
	#[instrument(skip(self))]
	pub async fn delete_namespace(&self, namespace: &str) -> K8sResult<()> {
		self.client.delete_namespace(namespace).await?;
		info!(namespace, "namespace deletion requested");
		Ok(())
	}

	/// Trigger a rolling restart by stamping the pod template. Returns once
	/// the patch is accepted.
	#[instrument(skip(self))]
	pub async fn restart_deployment(&self, namespace: &str, name: &str) -> K8sResult<()> {
		let patch = restart_patch(&Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
		self.client.patch_deployment(namespace, name, &patch).await?;
		info!(namespace, name, "deployment restart requested");
		Ok(())
	}

	/// Point-in-time ready and desired replica counts.
	#[instrument(skip(self))]
	pub async fn deployment_status(&self, namespace: &str, name: &str) -> K8sResult<DeploymentStatus> {
		let deployment = self.client.get_deployment(namespace, name).await?;
		Ok(DeploymentStatus::from_deployment(&deployment))
	}
}

fn restart_patch(timestamp: &str) -> serde_json::Value {
	json!({
		"spec": {
			"template": {
				"metadata": {
					"annotations": {
						RESTARTED_AT_ANNOTATION: timestamp
					}
				}
			}
		}
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::MockK8sClient;
	use crate::types::ResourceScope;

	const TENANT_STREAM: &str = r#"apiVersion: v1
kind: Namespace
metadata:
  name: picoclaw-tenant-acme
---
apiVersion: v1
kind: ConfigMap
metadata:
  name: picoclaw-config
  namespace: picoclaw-tenant-acme
data:
  config.json: "{}"
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: picoclaw-agent
  namespace: picoclaw-tenant-acme
---
apiVersion: apps/v1
kind: Deployment
metadata:
  name: picoclaw-gateway
  namespace: picoclaw-tenant-acme
"#;

	fn applier() -> (Arc<MockK8sClient>, ManifestApplier) {
		let client = Arc::new(MockK8sClient::new());
		let applier = ManifestApplier::new(client.clone());
		(client, applier)
	}

	#[tokio::test]
	async fn applies_documents_in_stream_order() {
		let (client, applier) = applier();

		let summary = applier.apply(TENANT_STREAM.as_bytes()).await.unwrap();

		assert_eq!(summary.len(), 4);
		let applied = client.applied();
		let kinds: Vec<_> = applied.iter().map(|a| a.kind.as_str()).collect();
		assert_eq!(kinds, ["Namespace", "ConfigMap", "Deployment", "Deployment"]);
		assert_eq!(applied[2].name, "picoclaw-agent");
		assert_eq!(applied[3].name, "picoclaw-gateway");
	}

	#[tokio::test]
	async fn cluster_scoped_resources_are_applied_without_namespace() {
		let (client, applier) = applier();
		let stream = "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: ns\n  namespace: ignored\n";

		applier.apply(stream.as_bytes()).await.unwrap();

		let applied = client.applied();
		assert_eq!(applied[0].namespace, None);
		assert_eq!(applied[0].scope, ResourceScope::Cluster);
	}

	#[tokio::test]
	async fn namespaced_resources_target_their_namespace() {
		let (client, applier) = applier();

		applier.apply(TENANT_STREAM.as_bytes()).await.unwrap();

		let applied = client.applied();
		assert_eq!(applied[1].namespace.as_deref(), Some("picoclaw-tenant-acme"));
		assert_eq!(applied[1].scope, ResourceScope::Namespaced);
	}

	#[tokio::test]
	async fn mappings_are_cached_within_a_call() {
		let (client, applier) = applier();

		applier.apply(TENANT_STREAM.as_bytes()).await.unwrap();
		assert_eq!(client.discovery_calls(), 3);

		applier.apply(TENANT_STREAM.as_bytes()).await.unwrap();
		assert_eq!(client.discovery_calls(), 6);
	}

	#[tokio::test]
	async fn documents_without_kind_are_never_submitted() {
		let (client, applier) = applier();
		let stream = "apiVersion: v1\nmetadata:\n  name: a\n---\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: b\n---\n---\n";

		let summary = applier.apply(stream.as_bytes()).await.unwrap();

		assert_eq!(summary.len(), 1);
		assert_eq!(client.applied().len(), 1);
	}

	#[tokio::test]
	async fn unknown_kind_aborts_after_earlier_documents() {
		let (client, applier) = applier();
		let stream = "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: a\n---\napiVersion: example.io/v1\nkind: Widget\nmetadata:\n  name: w\n  namespace: a\n---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\n  namespace: a\n";

		let err = applier.apply(stream.as_bytes()).await.unwrap_err();

		match err {
			K8sError::MappingNotFound { kind, api_version, .. } => {
				assert_eq!(kind, "Widget");
				assert_eq!(api_version, "example.io/v1");
			}
			other => panic!("unexpected error: {other:?}"),
		}
		assert_eq!(client.applied().len(), 1);
	}

	#[tokio::test]
	async fn apply_failure_names_the_resource() {
		let (client, applier) = applier();
		client.fail_apply_of("ConfigMap");

		let err = applier.apply(TENANT_STREAM.as_bytes()).await.unwrap_err();

		let message = err.to_string();
		assert!(message.contains("ConfigMap"));
		assert!(message.contains("picoclaw-tenant-acme/picoclaw-config"));
		assert_eq!(client.applied().len(), 1);
	}

	#[tokio::test]
	async fn namespaced_document_without_namespace_is_rejected() {
		let (client, applier) = applier();
		let stream = "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: c\n";

		let err = applier.apply(stream.as_bytes()).await.unwrap_err();

		assert!(matches!(err, K8sError::ApplyFailed { .. }));
		assert!(client.applied().is_empty());
	}

	#[tokio::test]
	async fn malformed_stream_applies_nothing() {
		let (client, applier) = applier();
		let stream = "apiVersion: v1\nkind: Namespace\nmetadata:\n  name: a\n---\nkind: [broken\n";

		let err = applier.apply(stream.as_bytes()).await.unwrap_err();

		assert!(matches!(err, K8sError::ManifestParse { .. }));
		assert!(client.applied().is_empty());
	}

	#[tokio::test]
	async fn restart_stamps_pod_template_annotation() {
		let (client, applier) = applier();

		applier
			.restart_deployment("picoclaw-tenant-acme", "picoclaw-agent")
			.await
			.unwrap();

		let patches = client.deployment_patches();
		assert_eq!(patches.len(), 1);
		let (namespace, name, patch) = &patches[0];
		assert_eq!(namespace, "picoclaw-tenant-acme");
		assert_eq!(name, "picoclaw-agent");
		let stamp = patch["spec"]["template"]["metadata"]["annotations"][RESTARTED_AT_ANNOTATION]
			.as_str()
			.unwrap();
		assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
	}

	#[tokio::test]
	async fn restart_failure_names_the_deployment() {
		let (client, applier) = applier();
		client.fail_restart_of("picoclaw-gateway");

		let err = applier
			.restart_deployment("picoclaw-tenant-acme", "picoclaw-gateway")
			.await
			.unwrap_err();

		assert!(err.to_string().contains("picoclaw-tenant-acme/picoclaw-gateway"));
	}

	#[tokio::test]
	async fn delete_namespace_is_recorded() {
		let (client, applier) = applier();

		applier.delete_namespace("picoclaw-tenant-acme").await.unwrap();

		assert_eq!(client.deleted_namespaces(), ["picoclaw-tenant-acme"]);
	}

	#[tokio::test]
	async fn deployment_status_reports_replica_counts() {
		let (client, applier) = applier();
		client.set_deployment_status(
			"picoclaw-tenant-acme",
			"picoclaw-agent",
			DeploymentStatus {
				ready_replicas: 0,
				replicas: 1,
			},
		);

		let status = applier
			.deployment_status("picoclaw-tenant-acme", "picoclaw-agent")
			.await
			.unwrap();
		assert_eq!(status.replicas, 1);
		assert!(!status.is_ready());

		let err = applier
			.deployment_status("picoclaw-tenant-acme", "missing")
			.await
			.unwrap_err();
		assert!(matches!(err, K8sError::DeploymentNotFound { .. }));
	}

	#[test]
	fn restart_patch_shape() {
		let patch = restart_patch("2026-01-01T00:00:00Z");
		assert_eq!(
			patch,
			json!({"spec": {"template": {"metadata": {"annotations": {
				"kubectl.kubernetes.io/restartedAt": "2026-01-01T00:00:00Z"
			}}}}})
		);
	}
}

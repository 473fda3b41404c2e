// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Recording in-memory [`K8sClient`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::DeploymentStatus as K8sDeploymentStatus;
use kube::api::ObjectMeta;

use crate::client::K8sClient;
use crate::error::K8sError;
use crate::types::{
	Deployment, DeploymentStatus, GroupVersionKind, ResourceMapping, ResourceScope,
};

/// A document as the mock received it.
#[derive(Debug, Clone)]
pub struct AppliedCall {
	pub api_version: String,
	pub kind: String,
	pub scope: ResourceScope,
	pub namespace: Option<String>,
	pub name: String,
	pub body: serde_json::Value,
}

#[derive(Default)]
struct MockState {
	applied: Vec<AppliedCall>,
	deleted_namespaces: Vec<String>,
	deployment_patches: Vec<(String, String, serde_json::Value)>,
	deployments: HashMap<(String, String), DeploymentStatus>,
	discovery_calls: usize,
	fail_apply_kinds: HashSet<String>,
	fail_restart_names: HashSet<String>,
	fail_namespace_delete: bool,
	fail_status: bool,
}

/// Mock client serving a fixed discovery table of the core kinds tenants use.
pub struct MockK8sClient {
	mappings: HashMap<(String, String, String), ResourceMapping>,
	state: Mutex<MockState>,
}

impl Default for MockK8sClient {
	fn default() -> Self {
		Self::new()
	}
}

impl MockK8sClient {
	pub fn new() -> Self {
		let table = [
			("", "v1", "Namespace", "namespaces", ResourceScope::Cluster),
			("", "v1", "ConfigMap", "configmaps", ResourceScope::Namespaced),
			(
				"",
				"v1",
				"PersistentVolumeClaim",
				"persistentvolumeclaims",
				ResourceScope::Namespaced,
			),
			("", "v1", "ServiceAccount", "serviceaccounts", ResourceScope::Namespaced),
			("", "v1", "Service", "services", ResourceScope::Namespaced),
			(
				"rbac.authorization.k8s.io",
				"v1",
				"Role",
				"roles",
				ResourceScope::Namespaced,
			),
			(
				"rbac.authorization.k8s.io",
				"v1",
				"RoleBinding",
				"rolebindings",
				ResourceScope::Namespaced,
			),
			("apps", "v1", "Deployment", "deployments", ResourceScope::Namespaced),
		];

		let mappings = table
			.into_iter()
			.map(|(group, version, kind, plural, scope)| {
				(
					(group.to_string(), version.to_string(), kind.to_string()),
					ResourceMapping::new(GroupVersionKind::gvk(group, version, kind), plural, scope),
				)
			})
			.collect();

		Self {
			mappings,
			state: Mutex::new(MockState::default()),
		}
	}

	fn state(&self) -> MutexGuard<'_, MockState> {
		self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Every successfully applied document, in order.
	pub fn applied(&self) -> Vec<AppliedCall> {
		self.state().applied.clone()
	}

	pub fn applied_kinds(&self) -> Vec<String> {
		self.state().applied.iter().map(|a| a.kind.clone()).collect()
	}

	pub fn deleted_namespaces(&self) -> Vec<String> {
		self.state().deleted_namespaces.clone()
	}

	/// `(namespace, name, patch)` for each accepted deployment patch.
	pub fn deployment_patches(&self) -> Vec<(String, String, serde_json::Value)> {
		self.state().deployment_patches.clone()
	}

	/// Number of discovery lookups served.
	pub fn discovery_calls(&self) -> usize {
		self.state().discovery_calls
	}

	/// Make every apply of `kind` fail.
	pub fn fail_apply_of(&self, kind: &str) {
		self.state().fail_apply_kinds.insert(kind.to_string());
	}

	/// Make restarts of the named deployment fail.
	pub fn fail_restart_of(&self, name: &str) {
		self.state().fail_restart_names.insert(name.to_string());
	}

	pub fn fail_namespace_delete(&self) {
		self.state().fail_namespace_delete = true;
	}

	pub fn fail_deployment_status(&self) {
		self.state().fail_status = true;
	}

	pub fn set_deployment_status(&self, namespace: &str, name: &str, status: DeploymentStatus) {
		self
			.state()
			.deployments
			.insert((namespace.to_string(), name.to_string()), status);
	}
}

#[async_trait]
impl K8sClient for MockK8sClient {
	async fn resolve_mapping(&self, gvk: &GroupVersionKind) -> Result<ResourceMapping, K8sError> {
		self.state().discovery_calls += 1;
		let key = (gvk.group.clone(), gvk.version.clone(), gvk.kind.clone());
		self
			.mappings
			.get(&key)
			.cloned()
			.ok_or_else(|| K8sError::MappingNotFound {
				api_version: gvk.api_version(),
				kind: gvk.kind.clone(),
				message: "the server could not find the requested resource".to_string(),
			})
	}

	async fn apply_resource(
		&self,
		mapping: &ResourceMapping,
		namespace: Option<&str>,
		name: &str,
		body: &serde_json::Value,
	) -> Result<(), K8sError> {
		let mut state = self.state();
		if state.fail_apply_kinds.contains(&mapping.gvk.kind) {
			return Err(K8sError::ApplyFailed {
				kind: mapping.gvk.kind.clone(),
				namespace: namespace.unwrap_or_default().to_string(),
				name: name.to_string(),
				message: "injected failure".to_string(),
			});
		}
		state.applied.push(AppliedCall {
			api_version: mapping.gvk.api_version(),
			kind: mapping.gvk.kind.clone(),
			scope: mapping.scope,
			namespace: namespace.map(str::to_string),
			name: name.to_string(),
			body: body.clone(),
		});
		Ok(())
	}

	async fn delete_namespace(&self, name: &str) -> Result<(), K8sError> {
		let mut state = self.state();
		if state.fail_namespace_delete {
			return Err(K8sError::NamespaceDeleteFailed {
				name: name.to_string(),
				message: "injected failure".to_string(),
			});
		}
		state.deleted_namespaces.push(name.to_string());
		Ok(())
	}

	async fn patch_deployment(
		&self,
		namespace: &str,
		name: &str,
		patch: &serde_json::Value,
	) -> Result<(), K8sError> {
		let mut state = self.state();
		if state.fail_restart_names.contains(name) {
			return Err(K8sError::RestartFailed {
				namespace: namespace.to_string(),
				name: name.to_string(),
				message: "injected failure".to_string(),
			});
		}
		state
			.deployment_patches
			.push((namespace.to_string(), name.to_string(), patch.clone()));
		Ok(())
	}

	async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, K8sError> {
		let state = self.state();
		if state.fail_status {
			return Err(K8sError::DeploymentStatusFailed {
				namespace: namespace.to_string(),
				name: name.to_string(),
				message: "injected failure".to_string(),
			});
		}
		let status = state
			.deployments
			.get(&(namespace.to_string(), name.to_string()))
			.copied()
			.ok_or_else(|| K8sError::DeploymentNotFound {
				namespace: namespace.to_string(),
				name: name.to_string(),
			})?;

		Ok(Deployment {
			metadata: ObjectMeta {
				name: Some(name.to_string()),
				namespace: Some(namespace.to_string()),
				..Default::default()
			},
			status: Some(K8sDeploymentStatus {
				ready_replicas: Some(status.ready_replicas),
				replicas: Some(status.replicas),
				..Default::default()
			}),
			..Default::default()
		})
	}
}

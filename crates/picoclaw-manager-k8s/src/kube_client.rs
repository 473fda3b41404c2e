// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;

use async_trait::async_trait;
use kube::{
	api::{Api, ApiResource, DeleteParams, DynamicObject, Patch, PatchParams},
	config::{KubeConfigOptions, Kubeconfig},
	discovery::{self, Scope},
	Client, Config,
};
use tracing::{debug, instrument};

use crate::client::{K8sClient, FIELD_MANAGER};
use crate::error::{api_status, K8sError};
use crate::types::{Deployment, GroupVersionKind, Namespace, ResourceMapping, ResourceScope};

/// Production K8s client implementation using the kube crate.
pub struct KubeClient {
	client: Client,
}

impl KubeClient {
	/// Create a new KubeClient.
	///
	/// Configuration is taken from, in order:
	/// 1. In-cluster service account (when running in K8s)
	/// 2. The explicit `kubeconfig` path, if given
	/// 3. KUBECONFIG environment variable, then ~/.kube/config
	pub async fn new(kubeconfig: Option<&Path>) -> Result<Self, K8sError> {
		let config = match Config::incluster() {
			Ok(config) => {
				debug!("using in-cluster K8s configuration");
				config
			}
			Err(incluster) => {
				debug!(error = %incluster, "not running in-cluster");
				match kubeconfig {
					Some(path) => Self::from_kubeconfig_path(path).await?,
					None => Config::infer().await.map_err(|e| K8sError::Config {
						message: e.to_string(),
					})?,
				}
			}
		};

		let client = Client::try_from(config)?;
		debug!("K8s client initialized");
		Ok(Self { client })
	}

	/// Wrap an already-configured kube client.
	pub fn from_client(client: Client) -> Self {
		Self { client }
	}

	async fn from_kubeconfig_path(path: &Path) -> Result<Config, K8sError> {
		let kubeconfig = Kubeconfig::read_from(path).map_err(|e| K8sError::Config {
			message: format!("reading kubeconfig {}: {e}", path.display()),
		})?;
		let config = Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
			.await
			.map_err(|e| K8sError::Config {
				message: format!("loading kubeconfig {}: {e}", path.display()),
			})?;
		debug!(path = %path.display(), "using kubeconfig file");
		Ok(config)
	}
}

fn api_resource(mapping: &ResourceMapping) -> ApiResource {
	ApiResource {
		group: mapping.gvk.group.clone(),
		version: mapping.gvk.version.clone(),
		api_version: mapping.gvk.api_version(),
		kind: mapping.gvk.kind.clone(),
		plural: mapping.plural.clone(),
	}
}

#[async_trait]
impl K8sClient for KubeClient {
	#[instrument(skip(self), fields(kind = %gvk.kind, api_version = %gvk.api_version()))]
	async fn resolve_mapping(&self, gvk: &GroupVersionKind) -> Result<ResourceMapping, K8sError> {
		let (resource, caps) = discovery::pinned_kind(&self.client, gvk)
			.await
			.map_err(|e| K8sError::MappingNotFound {
				api_version: gvk.api_version(),
				kind: gvk.kind.clone(),
				message: e.to_string(),
			})?;

		let scope = match caps.scope {
			Scope::Namespaced => ResourceScope::Namespaced,
			Scope::Cluster => ResourceScope::Cluster,
		};
		Ok(ResourceMapping::new(gvk.clone(), resource.plural, scope))
	}

	#[instrument(skip(self, mapping, body), fields(kind = %mapping.gvk.kind))]
	async fn apply_resource(
		&self,
		mapping: &ResourceMapping,
		namespace: Option<&str>,
		name: &str,
		body: &serde_json::Value,
	) -> Result<(), K8sError> {
		let resource = api_resource(mapping);
		let api: Api<DynamicObject> = match namespace {
			Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
			None => Api::all_with(self.client.clone(), &resource),
		};

		let params = PatchParams::apply(FIELD_MANAGER);
		match api.patch(name, &params, &Patch::Apply(body)).await {
			Ok(_) => Ok(()),
			Err(e) if api_status(&e) == Some(409) => Err(K8sError::ApplyConflict {
				kind: mapping.gvk.kind.clone(),
				namespace: namespace.unwrap_or_default().to_string(),
				name: name.to_string(),
				message: e.to_string(),
			}),
			Err(e) => Err(K8sError::ApplyFailed {
				kind: mapping.gvk.kind.clone(),
				namespace: namespace.unwrap_or_default().to_string(),
				name: name.to_string(),
				message: e.to_string(),
			}),
		}
	}

	#[instrument(skip(self))]
	async fn delete_namespace(&self, name: &str) -> Result<(), K8sError> {
		let namespaces: Api<Namespace> = Api::all(self.client.clone());
		match namespaces.delete(name, &DeleteParams::default()).await {
			Ok(_) => Ok(()),
			Err(e) if api_status(&e) == Some(404) => {
				Err(K8sError::NamespaceNotFound { name: name.into() })
			}
			Err(e) => Err(K8sError::NamespaceDeleteFailed {
				name: name.into(),
				message: e.to_string(),
			}),
		}
	}

	#[instrument(skip(self, patch))]
	async fn patch_deployment(
		&self,
		namespace: &str,
		name: &str,
		patch: &serde_json::Value,
	) -> Result<(), K8sError> {
		let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
		match deployments
			.patch(name, &PatchParams::default(), &Patch::Strategic(patch))
			.await
		{
			Ok(_) => Ok(()),
			Err(e) if api_status(&e) == Some(404) => Err(K8sError::DeploymentNotFound {
				namespace: namespace.into(),
				name: name.into(),
			}),
			Err(e) => Err(K8sError::RestartFailed {
				namespace: namespace.into(),
				name: name.into(),
				message: e.to_string(),
			}),
		}
	}

	#[instrument(skip(self))]
	async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, K8sError> {
		let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
		match deployments.get(name).await {
			Ok(deployment) => Ok(deployment),
			Err(e) if api_status(&e) == Some(404) => Err(K8sError::DeploymentNotFound {
				namespace: namespace.into(),
				name: name.into(),
			}),
			Err(e) => Err(K8sError::DeploymentStatusFailed {
				namespace: namespace.into(),
				name: name.into(),
				message: e.to_string(),
			}),
		}
	}
}

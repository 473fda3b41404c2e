// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant lifecycle orchestration.
//!
//! Every mutating operation runs validate, render, apply, persist in that
//! order under the tenant's lock. There are no retries; the only
//! compensation is removing the namespace when a fresh tenant's record
//! cannot be written.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use picoclaw_manager_db::{DbError, Tenant, TenantStatus, TenantStore};
use picoclaw_manager_k8s::{K8sError, ManifestApplier};
use picoclaw_manager_templates::{ManifestRenderer, RenderVars};

use crate::config::{build_config_document, TenantServiceConfig};
use crate::error::TenantError;
use crate::locks::TenantLocks;
use crate::types::{CreateTenantRequest, TenantWorkloadStatus, UpdateTenantRequest};
use crate::validation::{validate_display_name, validate_tenant_id};

pub const NAMESPACE_PREFIX: &str = "picoclaw-tenant-";
pub const AGENT_DEPLOYMENT: &str = "picoclaw-agent";
pub const GATEWAY_DEPLOYMENT: &str = "picoclaw-gateway";
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
pub const MANAGED_BY_VALUE: &str = "picoclaw-manager";
pub const TENANT_LABEL: &str = "picoclaw.io/tenant";
const AGENT_REPLICAS: u32 = 1;

/// Namespace owned by a tenant.
pub fn tenant_namespace(id: &str) -> String {
	format!("{NAMESPACE_PREFIX}{id}")
}

/// Result of the best-effort namespace removal after a failed create.
#[derive(Debug)]
pub enum CleanupOutcome {
	Completed,
	Failed(K8sError),
}

pub struct TenantService {
	store: Arc<dyn TenantStore>,
	renderer: Arc<ManifestRenderer>,
	applier: Arc<ManifestApplier>,
	config: TenantServiceConfig,
	locks: TenantLocks,
}

impl TenantService {
	pub fn new(
		store: Arc<dyn TenantStore>,
		renderer: Arc<ManifestRenderer>,
		applier: Arc<ManifestApplier>,
		config: TenantServiceConfig,
	) -> Self {
		Self {
			store,
			renderer,
			applier,
			config,
			locks: TenantLocks::new(),
		}
	}

	/// Provision a new tenant.
	///
	/// Cluster resources are applied before the record is written. If the
	/// write fails the namespace is deleted on a best-effort basis.
	#[tracing::instrument(skip(self, request), fields(tenant_id = %request.tenant_id))]
	pub async fn create(&self, request: CreateTenantRequest) -> Result<Tenant, TenantError> {
		validate_tenant_id(&request.tenant_id)?;
		validate_display_name(&request.display_name)?;

		let id = request.tenant_id.clone();
		let _lock = self.locks.lock(&id).await;

		let existing = self
			.store
			.get(&id)
			.await
			.map_err(|e| TenantError::persistence(&id, e))?;
		if existing.is_some() {
			return Err(TenantError::Conflict { id });
		}

		let config = build_config_document(&request);
		let resources = request
			.resources
			.as_ref()
			.map(|overrides| overrides.merge_onto(&Default::default()))
			.unwrap_or_default();

		let now = Utc::now();
		let mut tenant = Tenant {
			namespace: tenant_namespace(&id),
			id: id.clone(),
			display_name: request.display_name,
			config,
			resources,
			status: TenantStatus::Provisioning,
			created_at: now,
			updated_at: now,
		};

		tracing::info!(namespace = %tenant.namespace, image = %self.config.image, "Provisioning tenant");
		self.render_and_apply(&tenant).await?;

		if let Err(e) = self.store.create(&tenant).await {
			tracing::error!(error = %e, "Failed to persist tenant after apply");
			let outcome = self.remove_namespace(&tenant.namespace).await;
			tracing::debug!(?outcome, "create compensation finished");
			return Err(TenantError::persistence(&id, e));
		}

		tenant.status = TenantStatus::Active;
		match self.store.update(&tenant).await {
			Ok(stored) => tenant = stored,
			Err(e) => {
				// The stored record stays `provisioning`; callers still see `active`.
				tracing::warn!(error = %e, "Failed to mark tenant active");
			}
		}

		tracing::info!(namespace = %tenant.namespace, "Tenant provisioned");
		Ok(tenant)
	}

	pub async fn get(&self, id: &str) -> Result<Option<Tenant>, TenantError> {
		self
			.store
			.get(id)
			.await
			.map_err(|e| TenantError::persistence(id, e))
	}

	/// All tenants, oldest first.
	pub async fn list(&self) -> Result<Vec<Tenant>, TenantError> {
		self
			.store
			.list()
			.await
			.map_err(|e| TenantError::persistence("*", e))
	}

	/// Apply a partial update and re-apply the tenant's manifests.
	#[tracing::instrument(skip(self, request))]
	pub async fn update(
		&self,
		id: &str,
		request: UpdateTenantRequest,
	) -> Result<Tenant, TenantError> {
		let _lock = self.locks.lock(id).await;
		let mut tenant = self.fetch(id).await?;

		if let Some(name) = request.display_name.as_deref().filter(|n| !n.is_empty()) {
			tenant.display_name = name.to_string();
		}

		if request.has_config_sections() {
			let config = tenant
				.config
				.as_object_mut()
				.ok_or_else(|| TenantError::CorruptConfig {
					id: id.to_string(),
					message: "config document is not a JSON object".to_string(),
				})?;
			let sections = [
				("providers", request.providers),
				("agents", request.agents),
				("channels", request.channels),
			];
			for (key, value) in sections {
				if let Some(value) = value {
					config.insert(key.to_string(), value);
				}
			}
		}

		if let Some(overrides) = &request.resources {
			tenant.resources = overrides.merge_onto(&tenant.resources);
		}

		self.render_and_apply(&tenant).await?;

		let stored = self
			.store
			.update(&tenant)
			.await
			.map_err(|e| TenantError::persistence(id, e))?;

		tracing::info!(namespace = %stored.namespace, "Tenant updated");
		Ok(stored)
	}

	/// Delete the tenant's namespace, then its record.
	#[tracing::instrument(skip(self))]
	pub async fn delete(&self, id: &str) -> Result<(), TenantError> {
		let _lock = self.locks.lock(id).await;
		let tenant = self.fetch(id).await?;

		self.applier.delete_namespace(&tenant.namespace).await?;

		self
			.store
			.delete(id)
			.await
			.map_err(|e| TenantError::persistence(id, e))?;

		tracing::info!(namespace = %tenant.namespace, "Tenant deleted");
		Ok(())
	}

	/// Rolling-restart the agent, then the gateway. Does not wait for rollout.
	#[tracing::instrument(skip(self))]
	pub async fn restart(&self, id: &str) -> Result<(), TenantError> {
		let _lock = self.locks.lock(id).await;
		let tenant = self.fetch(id).await?;

		for deployment in [AGENT_DEPLOYMENT, GATEWAY_DEPLOYMENT] {
			self
				.applier
				.restart_deployment(&tenant.namespace, deployment)
				.await?;
		}

		tracing::info!(namespace = %tenant.namespace, "Tenant restart requested");
		Ok(())
	}

	/// Ready and desired replicas of the tenant's workloads.
	#[tracing::instrument(skip(self))]
	pub async fn status(&self, id: &str) -> Result<TenantWorkloadStatus, TenantError> {
		let tenant = self.fetch(id).await?;

		let agent = self
			.applier
			.deployment_status(&tenant.namespace, AGENT_DEPLOYMENT)
			.await?;
		let gateway = self
			.applier
			.deployment_status(&tenant.namespace, GATEWAY_DEPLOYMENT)
			.await?;

		Ok(TenantWorkloadStatus { agent, gateway })
	}

	/// Store liveness, for health checks.
	pub async fn health_check(&self) -> Result<(), DbError> {
		self.store.health_check().await
	}

	async fn fetch(&self, id: &str) -> Result<Tenant, TenantError> {
		self
			.get(id)
			.await?
			.ok_or_else(|| TenantError::NotFound { id: id.to_string() })
	}

	fn render_vars(&self, tenant: &Tenant) -> Result<RenderVars, TenantError> {
		let config_json =
			serde_json::to_string_pretty(&tenant.config).map_err(|e| TenantError::CorruptConfig {
				id: tenant.id.clone(),
				message: e.to_string(),
			})?;

		Ok(RenderVars {
			tenant_id: tenant.id.clone(),
			namespace: tenant.namespace.clone(),
			config_json,
			image: self.config.image.clone(),
			agent_replicas: AGENT_REPLICAS,
			agent_cpu: tenant.resources.agent_cpu.clone(),
			agent_memory: tenant.resources.agent_memory.clone(),
			gateway_cpu: tenant.resources.gateway_cpu.clone(),
			gateway_memory: tenant.resources.gateway_memory.clone(),
			workspace_size: tenant.resources.workspace_size.clone(),
			labels: BTreeMap::from([
				(MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string()),
				(TENANT_LABEL.to_string(), tenant.id.clone()),
			]),
		})
	}

	async fn render_and_apply(&self, tenant: &Tenant) -> Result<(), TenantError> {
		let vars = self.render_vars(tenant)?;
		let manifests = self.renderer.render_all(&vars)?;
		let summary = self.applier.apply(manifests.as_bytes()).await?;
		tracing::debug!(resources = summary.len(), "Tenant manifests applied");
		Ok(())
	}

	async fn remove_namespace(&self, namespace: &str) -> CleanupOutcome {
		match self.applier.delete_namespace(namespace).await {
			Ok(()) => {
				tracing::info!(namespace, "Removed namespace of unpersisted tenant");
				CleanupOutcome::Completed
			}
			Err(e) => {
				tracing::error!(namespace, error = %e, "Failed to remove namespace of unpersisted tenant");
				CleanupOutcome::Failed(e)
			}
		}
	}
}

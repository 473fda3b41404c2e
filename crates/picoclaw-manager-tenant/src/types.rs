// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant lifecycle request and response types.

use picoclaw_manager_db::ResourceLimits;
use picoclaw_manager_k8s::DeploymentStatus;
use serde::{Deserialize, Serialize};

/// Request to provision a new tenant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTenantRequest {
	#[serde(default)]
	pub tenant_id: String,
	#[serde(default)]
	pub display_name: String,
	#[serde(default)]
	pub providers: Option<serde_json::Value>,
	#[serde(default)]
	pub agents: Option<serde_json::Value>,
	#[serde(default)]
	pub channels: Option<serde_json::Value>,
	#[serde(default)]
	pub resources: Option<ResourceOverrides>,
}

/// Partial update of an existing tenant. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTenantRequest {
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub providers: Option<serde_json::Value>,
	#[serde(default)]
	pub agents: Option<serde_json::Value>,
	#[serde(default)]
	pub channels: Option<serde_json::Value>,
	#[serde(default)]
	pub resources: Option<ResourceOverrides>,
}

impl UpdateTenantRequest {
	pub(crate) fn has_config_sections(&self) -> bool {
		self.providers.is_some() || self.agents.is_some() || self.channels.is_some()
	}
}

/// Per-field resource overrides. Missing or empty fields keep the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOverrides {
	#[serde(default)]
	pub agent_cpu: Option<String>,
	#[serde(default)]
	pub agent_memory: Option<String>,
	#[serde(default)]
	pub gateway_cpu: Option<String>,
	#[serde(default)]
	pub gateway_memory: Option<String>,
	#[serde(default)]
	pub workspace_size: Option<String>,
}

impl ResourceOverrides {
	/// Apply these overrides field by field on top of `base`.
	pub fn merge_onto(&self, base: &ResourceLimits) -> ResourceLimits {
		fn pick(value: &Option<String>, base: &str) -> String {
			match value.as_deref() {
				Some(v) if !v.is_empty() => v.to_string(),
				_ => base.to_string(),
			}
		}

		ResourceLimits {
			agent_cpu: pick(&self.agent_cpu, &base.agent_cpu),
			agent_memory: pick(&self.agent_memory, &base.agent_memory),
			gateway_cpu: pick(&self.gateway_cpu, &base.gateway_cpu),
			gateway_memory: pick(&self.gateway_memory, &base.gateway_memory),
			workspace_size: pick(&self.workspace_size, &base.workspace_size),
		}
	}
}

/// Point-in-time replica counts of a tenant's two workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TenantWorkloadStatus {
	pub agent: DeploymentStatus,
	pub gateway: DeploymentStatus,
}

impl TenantWorkloadStatus {
	pub fn is_ready(&self) -> bool {
		self.agent.is_ready() && self.gateway.is_ready()
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant lifecycle management for the PicoClaw manager.
//!
//! # Architecture
//!
//! [`TenantService`] sits between the HTTP API and its three collaborators:
//!
//! - the manifest renderer (picoclaw-manager-templates)
//! - the manifest applier (picoclaw-manager-k8s)
//! - the tenant store (picoclaw-manager-db)

pub mod config;
pub mod error;
pub mod locks;
pub mod service;
pub mod types;
pub mod validation;

pub use config::{build_config_document, TenantServiceConfig, DEFAULT_IMAGE, GATEWAY_PORT};
pub use error::TenantError;
pub use locks::{TenantLockGuard, TenantLocks};
pub use picoclaw_manager_db::{ResourceLimits, Tenant, TenantStatus};
pub use service::{
	tenant_namespace, CleanupOutcome, TenantService, AGENT_DEPLOYMENT, GATEWAY_DEPLOYMENT,
	NAMESPACE_PREFIX,
};
pub use types::{
	CreateTenantRequest, ResourceOverrides, TenantWorkloadStatus, UpdateTenantRequest,
};
pub use validation::{validate_display_name, validate_tenant_id, MAX_TENANT_ID_LEN};

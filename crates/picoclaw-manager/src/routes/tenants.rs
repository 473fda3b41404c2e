// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tenant HTTP handlers.

use axum::{
	extract::{rejection::JsonRejection, Path, State},
	http::StatusCode,
	Json,
};
use chrono::{DateTime, Utc};
use picoclaw_manager_k8s::DeploymentStatus;
use picoclaw_manager_tenant::{
	CreateTenantRequest, ResourceLimits, Tenant, TenantStatus, UpdateTenantRequest,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{api::AppState, error::ServerError};

/// Tenant as returned by the API. The config document is never exposed.
#[derive(Debug, Serialize, Deserialize)]
pub struct TenantResponse {
	pub id: String,
	pub display_name: String,
	pub namespace: String,
	pub resources: ResourceLimits,
	pub status: TenantStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Tenant> for TenantResponse {
	fn from(tenant: Tenant) -> Self {
		Self {
			id: tenant.id,
			display_name: tenant.display_name,
			namespace: tenant.namespace,
			resources: tenant.resources,
			status: tenant.status,
			created_at: tenant.created_at,
			updated_at: tenant.updated_at,
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TenantStatusResponse {
	pub tenant_id: String,
	pub ready: bool,
	pub agent: DeploymentStatus,
	pub gateway: DeploymentStatus,
}

/// POST /api/v1/tenants
pub async fn create_tenant(
	State(state): State<AppState>,
	payload: Result<Json<CreateTenantRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TenantResponse>), ServerError> {
	let Json(request) = payload?;
	let tenant = state.tenants.create(request).await?;
	Ok((StatusCode::CREATED, Json(tenant.into())))
}

/// GET /api/v1/tenants - bare array, oldest first.
pub async fn list_tenants(
	State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponse>>, ServerError> {
	let tenants = state.tenants.list().await?;
	Ok(Json(tenants.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/tenants/{id}
pub async fn get_tenant(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<TenantResponse>, ServerError> {
	match state.tenants.get(&id).await? {
		Some(tenant) => Ok(Json(tenant.into())),
		None => Err(ServerError::NotFound(format!("Tenant not found: {id}"))),
	}
}

/// PUT /api/v1/tenants/{id}
pub async fn update_tenant(
	State(state): State<AppState>,
	Path(id): Path<String>,
	payload: Result<Json<UpdateTenantRequest>, JsonRejection>,
) -> Result<Json<TenantResponse>, ServerError> {
	let Json(request) = payload?;
	let tenant = state.tenants.update(&id, request).await?;
	Ok(Json(tenant.into()))
}

/// DELETE /api/v1/tenants/{id}
pub async fn delete_tenant(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
	state.tenants.delete(&id).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/tenants/{id}/restart
pub async fn restart_tenant(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Value>, ServerError> {
	state.tenants.restart(&id).await?;
	Ok(Json(json!({ "status": "restarting" })))
}

/// GET /api/v1/tenants/{id}/status
pub async fn tenant_status(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<TenantStatusResponse>, ServerError> {
	let status = state.tenants.status(&id).await?;
	Ok(Json(TenantStatusResponse {
		tenant_id: id,
		ready: status.is_ready(),
		agent: status.agent,
		gateway: status.gateway,
	}))
}

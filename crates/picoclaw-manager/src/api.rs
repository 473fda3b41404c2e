// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Router and shared handler state.

use std::sync::Arc;

use axum::{
	middleware,
	routing::{get, post},
	Router,
};
use picoclaw_manager_config::SecretString;
use picoclaw_manager_tenant::TenantService;
use tower_http::trace::TraceLayer;

use crate::{auth_middleware::require_api_key, routes};

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
	pub tenants: Arc<TenantService>,
	pub api_key: SecretString,
}

impl AppState {
	pub fn new(tenants: Arc<TenantService>, api_key: SecretString) -> Self {
		Self { tenants, api_key }
	}
}

/// Build the application router.
///
/// `/health` is public; everything under `/api/v1` requires the API key.
pub fn create_router(state: AppState) -> Router {
	let api = Router::new()
		.route(
			"/tenants",
			post(routes::tenants::create_tenant).get(routes::tenants::list_tenants),
		)
		.route(
			"/tenants/{id}",
			get(routes::tenants::get_tenant)
				.put(routes::tenants::update_tenant)
				.delete(routes::tenants::delete_tenant),
		)
		.route(
			"/tenants/{id}/restart",
			post(routes::tenants::restart_tenant),
		)
		.route("/tenants/{id}/status", get(routes::tenants::tenant_status))
		.route_layer(middleware::from_fn_with_state(
			state.api_key.clone(),
			require_api_key,
		));

	Router::new()
		.route("/health", get(routes::health::health_check))
		.nest("/api/v1", api)
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

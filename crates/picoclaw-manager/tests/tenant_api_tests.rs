// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Integration tests for the tenant API.
//!
//! Tests cover:
//! - API key enforcement on /api/v1
//! - Tenant lifecycle through the HTTP surface
//! - Error body shape and status mapping

use std::sync::Arc;

use axum::{
	body::Body,
	http::{header, Method, Request, StatusCode},
	Router,
};
use http_body_util::BodyExt;
use picoclaw_manager::{
	create_router, error::ErrorResponse, routes::tenants::TenantResponse, AppState,
};
use picoclaw_manager_config::SecretString;
use picoclaw_manager_db::testing::create_tenant_test_pool;
use picoclaw_manager_db::TenantRepository;
use picoclaw_manager_k8s::testing::MockK8sClient;
use picoclaw_manager_k8s::{DeploymentStatus, ManifestApplier};
use picoclaw_manager_templates::ManifestRenderer;
use picoclaw_manager_tenant::{TenantService, TenantServiceConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

const API_KEY: &str = "integration-key";

async fn setup_test_app() -> (Router, Arc<MockK8sClient>) {
	let client = Arc::new(MockK8sClient::new());
	let service = TenantService::new(
		Arc::new(TenantRepository::new(create_tenant_test_pool().await)),
		Arc::new(ManifestRenderer::embedded().unwrap()),
		Arc::new(ManifestApplier::new(client.clone())),
		TenantServiceConfig::default(),
	);
	let state = AppState::new(Arc::new(service), SecretString::from(API_KEY));
	(create_router(state), client)
}

fn authed(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
	let builder = Request::builder()
		.method(method)
		.uri(uri)
		.header(header::AUTHORIZATION, format!("Bearer {API_KEY}"));
	match body {
		Some(body) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(body.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	}
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	(status, bytes.to_vec())
}

async fn create_acme(app: &Router) -> TenantResponse {
	let (status, body) = send(
		app,
		authed(
			Method::POST,
			"/api/v1/tenants",
			Some(json!({"tenant_id": "acme", "display_name": "ACME"})),
		),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
	serde_json::from_slice(&body).unwrap()
}

// ============================================================================
// Auth
// ============================================================================

#[tokio::test]
async fn test_health_is_public() {
	let (app, _) = setup_test_app().await;

	let (status, body) = send(
		&app,
		Request::builder().uri("/health").body(Body::empty()).unwrap(),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	let body: Value = serde_json::from_slice(&body).unwrap();
	assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_missing_api_key_returns_401() {
	let (app, _) = setup_test_app().await;

	let (status, body) = send(
		&app,
		Request::builder()
			.uri("/api/v1/tenants")
			.body(Body::empty())
			.unwrap(),
	)
	.await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
	let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
	assert_eq!(body.error, "unauthorized");
}

#[tokio::test]
async fn test_malformed_authorization_returns_401() {
	let (app, _) = setup_test_app().await;

	let (status, _) = send(
		&app,
		Request::builder()
			.uri("/api/v1/tenants")
			.header(header::AUTHORIZATION, format!("Basic {API_KEY}"))
			.body(Body::empty())
			.unwrap(),
	)
	.await;

	assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_api_key_returns_403() {
	let (app, client) = setup_test_app().await;

	let (status, _) = send(
		&app,
		Request::builder()
			.method(Method::POST)
			.uri("/api/v1/tenants")
			.header(header::AUTHORIZATION, "Bearer wrong-key")
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(
				json!({"tenant_id": "acme", "display_name": "ACME"}).to_string(),
			))
			.unwrap(),
	)
	.await;

	assert_eq!(status, StatusCode::FORBIDDEN);
	assert!(client.applied().is_empty());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_create_and_get_tenant() {
	let (app, client) = setup_test_app().await;

	let created = create_acme(&app).await;
	assert_eq!(created.namespace, "picoclaw-tenant-acme");
	assert_eq!(created.resources.agent_cpu, "500m");
	assert_eq!(client.applied().len(), 9);

	let (status, body) = send(&app, authed(Method::GET, "/api/v1/tenants/acme", None)).await;
	assert_eq!(status, StatusCode::OK);
	let raw: Value = serde_json::from_slice(&body).unwrap();
	assert_eq!(raw["status"], "active");
	assert!(raw.get("config").is_none());
}

#[tokio::test]
async fn test_create_invalid_id_returns_400() {
	let (app, _) = setup_test_app().await;

	let (status, body) = send(
		&app,
		authed(
			Method::POST,
			"/api/v1/tenants",
			Some(json!({"tenant_id": "ACME", "display_name": "ACME"})),
		),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
	assert_eq!(body.error, "bad_request");
}

#[tokio::test]
async fn test_create_malformed_body_returns_400() {
	let (app, _) = setup_test_app().await;

	let request = Request::builder()
		.method(Method::POST)
		.uri("/api/v1/tenants")
		.header(header::AUTHORIZATION, format!("Bearer {API_KEY}"))
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from("{not json"))
		.unwrap();
	let (status, _) = send(&app, request).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_create_returns_409() {
	let (app, _) = setup_test_app().await;
	create_acme(&app).await;

	let (status, _) = send(
		&app,
		authed(
			Method::POST,
			"/api/v1/tenants",
			Some(json!({"tenant_id": "acme", "display_name": "Again"})),
		),
	)
	.await;

	assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cluster_failure_returns_502() {
	let (app, client) = setup_test_app().await;
	client.fail_apply_of("Service");

	let (status, body) = send(
		&app,
		authed(
			Method::POST,
			"/api/v1/tenants",
			Some(json!({"tenant_id": "acme", "display_name": "ACME"})),
		),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
	assert!(body.message.contains("Service"));
}

#[tokio::test]
async fn test_list_empty_is_array() {
	let (app, _) = setup_test_app().await;

	let (status, body) = send(&app, authed(Method::GET, "/api/v1/tenants", None)).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, b"[]");
}

#[tokio::test]
async fn test_list_tenants() {
	let (app, _) = setup_test_app().await;
	create_acme(&app).await;

	let (status, body) = send(&app, authed(Method::GET, "/api/v1/tenants", None)).await;

	assert_eq!(status, StatusCode::OK);
	let body: Value = serde_json::from_slice(&body).unwrap();
	let tenants = body.as_array().unwrap();
	assert_eq!(tenants.len(), 1);
	assert_eq!(tenants[0]["id"], "acme");
	assert!(tenants[0].get("config").is_none());
}

#[tokio::test]
async fn test_update_tenant_resources() {
	let (app, _) = setup_test_app().await;
	create_acme(&app).await;

	let (status, body) = send(
		&app,
		authed(
			Method::PUT,
			"/api/v1/tenants/acme",
			Some(json!({"resources": {"agent_memory": "2Gi"}})),
		),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	let updated: TenantResponse = serde_json::from_slice(&body).unwrap();
	assert_eq!(updated.resources.agent_memory, "2Gi");
	assert_eq!(updated.resources.gateway_memory, "512Mi");
}

#[tokio::test]
async fn test_get_unknown_returns_404() {
	let (app, _) = setup_test_app().await;

	let (status, body) = send(&app, authed(Method::GET, "/api/v1/tenants/ghost", None)).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	let body: ErrorResponse = serde_json::from_slice(&body).unwrap();
	assert_eq!(body.error, "not_found");
}

#[tokio::test]
async fn test_delete_tenant() {
	let (app, client) = setup_test_app().await;
	create_acme(&app).await;

	let (status, _) = send(&app, authed(Method::DELETE, "/api/v1/tenants/acme", None)).await;
	assert_eq!(status, StatusCode::NO_CONTENT);
	assert_eq!(client.deleted_namespaces(), ["picoclaw-tenant-acme"]);

	let (status, _) = send(&app, authed(Method::DELETE, "/api/v1/tenants/acme", None)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_restart_tenant() {
	let (app, client) = setup_test_app().await;
	create_acme(&app).await;

	let (status, body) = send(
		&app,
		authed(Method::POST, "/api/v1/tenants/acme/restart", None),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	let body: Value = serde_json::from_slice(&body).unwrap();
	assert_eq!(body, json!({"status": "restarting"}));
	assert_eq!(client.deployment_patches().len(), 2);
}

#[tokio::test]
async fn test_tenant_status() {
	let (app, client) = setup_test_app().await;
	create_acme(&app).await;
	let ready = DeploymentStatus {
		ready_replicas: 1,
		replicas: 1,
	};
	client.set_deployment_status("picoclaw-tenant-acme", "picoclaw-agent", ready);
	client.set_deployment_status("picoclaw-tenant-acme", "picoclaw-gateway", ready);

	let (status, body) = send(
		&app,
		authed(Method::GET, "/api/v1/tenants/acme/status", None),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	let body: Value = serde_json::from_slice(&body).unwrap();
	assert_eq!(body["ready"], true);
	assert_eq!(body["agent"]["ready_replicas"], 1);
	assert_eq!(body["gateway"]["replicas"], 1);
}

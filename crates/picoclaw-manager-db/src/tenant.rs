// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};

use crate::error::{DbError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantStatus {
	Provisioning,
	Active,
}

impl TenantStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			TenantStatus::Provisioning => "provisioning",
			TenantStatus::Active => "active",
		}
	}
}

impl std::str::FromStr for TenantStatus {
	type Err = String;

	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		match s {
			"provisioning" => Ok(TenantStatus::Provisioning),
			"active" => Ok(TenantStatus::Active),
			_ => Err(format!("unknown tenant status: {s}")),
		}
	}
}

/// Compute and storage sizing for a tenant's workloads, as K8s quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLimits {
	pub agent_cpu: String,
	pub agent_memory: String,
	pub gateway_cpu: String,
	pub gateway_memory: String,
	pub workspace_size: String,
}

impl Default for ResourceLimits {
	fn default() -> Self {
		Self {
			agent_cpu: "500m".to_string(),
			agent_memory: "1Gi".to_string(),
			gateway_cpu: "250m".to_string(),
			gateway_memory: "512Mi".to_string(),
			workspace_size: "500Mi".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
	pub id: String,
	pub display_name: String,
	pub namespace: String,
	/// Opaque agent configuration document.
	pub config: serde_json::Value,
	pub resources: ResourceLimits,
	pub status: TenantStatus,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

const TENANT_COLUMNS: &str = "id, display_name, namespace, config_json, agent_cpu, agent_memory, \
	gateway_cpu, gateway_memory, workspace_size, status, created_at, updated_at";

#[derive(Clone)]
pub struct TenantRepository {
	pool: SqlitePool,
}

impl TenantRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Insert a new tenant.
	///
	/// # Errors
	/// Returns `DbError::Conflict` if the ID or namespace is already taken.
	#[tracing::instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
	pub async fn create(&self, tenant: &Tenant) -> Result<()> {
		let config_json = serde_json::to_string(&tenant.config)?;

		sqlx::query(
			r#"
			INSERT INTO tenants (id, display_name, namespace, config_json, agent_cpu, agent_memory,
				gateway_cpu, gateway_memory, workspace_size, status, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(&tenant.id)
		.bind(&tenant.display_name)
		.bind(&tenant.namespace)
		.bind(&config_json)
		.bind(&tenant.resources.agent_cpu)
		.bind(&tenant.resources.agent_memory)
		.bind(&tenant.resources.gateway_cpu)
		.bind(&tenant.resources.gateway_memory)
		.bind(&tenant.resources.workspace_size)
		.bind(tenant.status.as_str())
		.bind(format_timestamp(&tenant.created_at))
		.bind(format_timestamp(&tenant.updated_at))
		.execute(&self.pool)
		.await
		.map_err(|e| match e {
			sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
				DbError::Conflict(tenant.id.clone())
			}
			other => DbError::Sqlx(other),
		})?;

		tracing::debug!(tenant_id = %tenant.id, "tenant created");
		Ok(())
	}

	#[tracing::instrument(skip(self))]
	pub async fn get(&self, id: &str) -> Result<Option<Tenant>> {
		let row = sqlx::query(&format!("SELECT {TENANT_COLUMNS} FROM tenants WHERE id = ?"))
			.bind(id)
			.fetch_optional(&self.pool)
			.await?;

		row.as_ref().map(parse_tenant_row).transpose()
	}

	/// All tenants, oldest first.
	#[tracing::instrument(skip(self))]
	pub async fn list(&self) -> Result<Vec<Tenant>> {
		let rows = sqlx::query(&format!(
			"SELECT {TENANT_COLUMNS} FROM tenants ORDER BY created_at ASC, id ASC"
		))
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(parse_tenant_row).collect()
	}

	/// Overwrite the mutable fields of a tenant and stamp `updated_at`.
	///
	/// # Errors
	/// Returns `DbError::NotFound` if no tenant has this ID.
	#[tracing::instrument(skip(self, tenant), fields(tenant_id = %tenant.id))]
	pub async fn update(&self, tenant: &Tenant) -> Result<Tenant> {
		let config_json = serde_json::to_string(&tenant.config)?;
		let now = Utc::now();

		let result = sqlx::query(
			r#"
			UPDATE tenants SET
				display_name = ?,
				config_json = ?,
				agent_cpu = ?,
				agent_memory = ?,
				gateway_cpu = ?,
				gateway_memory = ?,
				workspace_size = ?,
				status = ?,
				updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&tenant.display_name)
		.bind(&config_json)
		.bind(&tenant.resources.agent_cpu)
		.bind(&tenant.resources.agent_memory)
		.bind(&tenant.resources.gateway_cpu)
		.bind(&tenant.resources.gateway_memory)
		.bind(&tenant.resources.workspace_size)
		.bind(tenant.status.as_str())
		.bind(format_timestamp(&now))
		.bind(&tenant.id)
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(tenant.id.clone()));
		}

		Ok(Tenant {
			updated_at: now,
			..tenant.clone()
		})
	}

	#[tracing::instrument(skip(self))]
	pub async fn delete(&self, id: &str) -> Result<()> {
		let result = sqlx::query("DELETE FROM tenants WHERE id = ?")
			.bind(id)
			.execute(&self.pool)
			.await?;

		if result.rows_affected() == 0 {
			return Err(DbError::NotFound(id.to_string()));
		}

		tracing::debug!(tenant_id = %id, "tenant deleted");
		Ok(())
	}

	#[tracing::instrument(skip(self))]
	pub async fn health_check(&self) -> Result<()> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}
}

#[async_trait]
pub trait TenantStore: Send + Sync {
	async fn create(&self, tenant: &Tenant) -> Result<()>;
	async fn get(&self, id: &str) -> Result<Option<Tenant>>;
	async fn list(&self) -> Result<Vec<Tenant>>;
	async fn update(&self, tenant: &Tenant) -> Result<Tenant>;
	async fn delete(&self, id: &str) -> Result<()>;
	async fn health_check(&self) -> Result<()>;
}

#[async_trait]
impl TenantStore for TenantRepository {
	async fn create(&self, tenant: &Tenant) -> Result<()> {
		self.create(tenant).await
	}

	async fn get(&self, id: &str) -> Result<Option<Tenant>> {
		self.get(id).await
	}

	async fn list(&self) -> Result<Vec<Tenant>> {
		self.list().await
	}

	async fn update(&self, tenant: &Tenant) -> Result<Tenant> {
		self.update(tenant).await
	}

	async fn delete(&self, id: &str) -> Result<()> {
		self.delete(id).await
	}

	async fn health_check(&self) -> Result<()> {
		self.health_check().await
	}
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
	ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(id: &str, column: &str, value: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::CorruptRow {
			id: id.to_string(),
			message: format!("invalid {column}: {e}"),
		})
}

fn parse_tenant_row(row: &sqlx::sqlite::SqliteRow) -> Result<Tenant> {
	let id: String = row.get("id");
	let config_json: String = row.get("config_json");
	let status_str: String = row.get("status");
	let created_at_str: String = row.get("created_at");
	let updated_at_str: String = row.get("updated_at");

	let corrupt = |message: String| DbError::CorruptRow {
		id: id.clone(),
		message,
	};

	let config: serde_json::Value = serde_json::from_str(&config_json)
		.map_err(|e| corrupt(format!("invalid config_json: {e}")))?;
	let status = status_str.parse::<TenantStatus>().map_err(corrupt)?;
	let created_at = parse_timestamp(&id, "created_at", &created_at_str)?;
	let updated_at = parse_timestamp(&id, "updated_at", &updated_at_str)?;

	Ok(Tenant {
		id,
		display_name: row.get("display_name"),
		namespace: row.get("namespace"),
		config,
		resources: ResourceLimits {
			agent_cpu: row.get("agent_cpu"),
			agent_memory: row.get("agent_memory"),
			gateway_cpu: row.get("gateway_cpu"),
			gateway_memory: row.get("gateway_memory"),
			workspace_size: row.get("workspace_size"),
		},
		status,
		created_at,
		updated_at,
	})
}

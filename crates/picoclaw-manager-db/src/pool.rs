// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqliteSynchronous};
use std::str::FromStr;

use crate::error::DbError;

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./picoclaw-manager.db")
///
/// # Errors
/// Returns `DbError::Open` if the URL is invalid or the file cannot be opened.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Open(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePool::connect_with(options)
		.await
		.map_err(|e| DbError::Open(format!("Failed to open database: {e}")))?;

	tracing::debug!("database pool created");
	Ok(pool)
}

/// Create the tenant schema. Safe to run on every startup.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS tenants (
			id TEXT PRIMARY KEY,
			display_name TEXT NOT NULL,
			namespace TEXT NOT NULL UNIQUE,
			config_json TEXT NOT NULL,
			agent_cpu TEXT NOT NULL,
			agent_memory TEXT NOT NULL,
			gateway_cpu TEXT NOT NULL,
			gateway_memory TEXT NOT NULL,
			workspace_size TEXT NOT NULL,
			status TEXT NOT NULL,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_tenants_created_at ON tenants(created_at)")
		.execute(pool)
		.await?;

	tracing::debug!("tenant schema ready");
	Ok(())
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! PicoClaw manager server binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use picoclaw_manager::{create_router, version, AppState};
use picoclaw_manager_db::TenantRepository;
use picoclaw_manager_k8s::{KubeClient, ManifestApplier};
use picoclaw_manager_templates::ManifestRenderer;
use picoclaw_manager_tenant::{TenantService, TenantServiceConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// PicoClaw manager - provisions PicoClaw tenants on Kubernetes.
#[derive(Parser, Debug)]
#[command(
	name = "picoclaw-manager",
	about = "PicoClaw multi-tenant manager",
	version
)]
struct Args {
	/// Config file to load instead of /etc/picoclaw/manager.toml
	#[arg(long, env = "PICOCLAW_MANAGER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => picoclaw_manager_config::load_config_with_file(path),
		None => picoclaw_manager_config::load_config(),
	}
	.context("failed to load configuration")?;

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		image = %config.kubernetes.image,
		"starting picoclaw-manager"
	);

	if config.auth.uses_dev_key() {
		tracing::warn!("Using the development API key; set PICOCLAW_MANAGER_API_KEY");
	}

	let pool = picoclaw_manager_db::create_pool(&config.database.url)
		.await
		.context("failed to open database")?;
	picoclaw_manager_db::run_migrations(&pool)
		.await
		.context("failed to run migrations")?;

	let renderer = match &config.kubernetes.template_dir {
		Some(dir) => {
			tracing::info!(dir = %dir.display(), "Loading manifest templates from directory");
			ManifestRenderer::from_dir(dir)
		}
		None => ManifestRenderer::embedded(),
	}
	.context("failed to load manifest templates")?;

	let kube = KubeClient::new(config.kubernetes.kubeconfig.as_deref())
		.await
		.context("failed to create Kubernetes client")?;

	let service = TenantService::new(
		Arc::new(TenantRepository::new(pool)),
		Arc::new(renderer),
		Arc::new(ManifestApplier::new(Arc::new(kube))),
		TenantServiceConfig {
			image: config.kubernetes.image.clone(),
		},
	);

	let state = AppState::new(Arc::new(service), config.auth.api_key.clone());
	let app = create_router(state);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr)
		.await
		.with_context(|| format!("failed to bind {addr}"))?;

	axum::serve(listener, app)
		.with_graceful_shutdown(async {
			if let Err(e) = tokio::signal::ctrl_c().await {
				tracing::error!(error = %e, "Failed to listen for shutdown signal");
			}
			tracing::info!("Received shutdown signal");
		})
		.await
		.context("server error")?;

	tracing::info!("Server shutdown complete");
	Ok(())
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant store location.

use serde::Deserialize;

const DEFAULT_URL: &str = "sqlite:./picoclaw-manager.db";
const SQLITE_SCHEME: &str = "sqlite:";

/// Where tenant records live.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
	/// SQLite connection URL.
	pub url: String,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_URL.to_string(),
		}
	}
}

/// Accepts either a `sqlite:` URL or a bare file path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: DatabaseConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
	}

	pub fn finalize(self) -> DatabaseConfig {
		DatabaseConfig {
			url: self
				.url
				.filter(|url| !url.trim().is_empty())
				.map(|url| sqlite_url(url.trim()))
				.unwrap_or_else(|| DEFAULT_URL.to_string()),
		}
	}
}

/// Bare paths become `sqlite:` URLs. Anything carrying a scheme is kept so
/// the pool reports it.
fn sqlite_url(value: &str) -> String {
	if value.starts_with(SQLITE_SCHEME) || value.contains("://") {
		value.to_string()
	} else {
		format!("{SQLITE_SCHEME}{value}")
	}
}

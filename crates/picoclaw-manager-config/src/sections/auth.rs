// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! API authentication configuration.

use serde::Deserialize;

use crate::secret::SecretString;

/// Key accepted when none is configured. Rejected in production.
pub const DEV_API_KEY: &str = "test-api-key";

/// Authentication configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub api_key: SecretString,
	pub environment: String,
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment == "production"
	}

	pub fn uses_dev_key(&self) -> bool {
		self.api_key.expose() == DEV_API_KEY
	}
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			api_key: SecretString::from(DEV_API_KEY),
			environment: "development".to_string(),
		}
	}
}

/// Authentication configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub api_key: Option<SecretString>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.api_key.is_some() {
			self.api_key = other.api_key;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			api_key: self
				.api_key
				.filter(|key| !key.expose().is_empty())
				.unwrap_or_else(|| SecretString::from(DEV_API_KEY)),
			environment: self
				.environment
				.unwrap_or_else(|| "development".to_string()),
		}
	}
}

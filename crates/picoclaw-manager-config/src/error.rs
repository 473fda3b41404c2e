// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Errors raised while assembling the manager configuration.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// An environment override could not be parsed.
	#[error("{var}={value:?} is not a valid {expected}")]
	InvalidEnv {
		var: String,
		value: String,
		expected: &'static str,
	},

	#[error("Cannot read manager config {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Malformed manager config {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// The built-in development key would guard a production deployment.
	#[error("PICOCLAW_MANAGER_API_KEY must be set when PICOCLAW_MANAGER_ENV=production")]
	DevApiKeyInProduction,
}

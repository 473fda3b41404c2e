// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant service configuration and the agent config document.

use serde_json::{json, Map, Value};

use crate::types::CreateTenantRequest;

/// Image used for tenant workloads unless configured otherwise.
pub const DEFAULT_IMAGE: &str = "huy2408/picoclaw:latest";

/// Address the gateway binds inside its pod.
pub const GATEWAY_HOST: &str = "0.0.0.0";
pub const GATEWAY_PORT: u16 = 18790;

/// Top-level config keys callers may supply. Their contents are opaque.
pub const CONFIG_SECTIONS: [&str; 3] = ["providers", "agents", "channels"];

#[derive(Debug, Clone)]
pub struct TenantServiceConfig {
	/// Container image for both agent and gateway.
	pub image: String,
}

impl Default for TenantServiceConfig {
	fn default() -> Self {
		Self {
			image: DEFAULT_IMAGE.to_string(),
		}
	}
}

/// Build a fresh config document: the gateway skeleton, then whichever
/// sections the request supplied.
pub fn build_config_document(request: &CreateTenantRequest) -> Value {
	let mut config = Map::new();
	config.insert(
		"gateway".to_string(),
		json!({ "host": GATEWAY_HOST, "port": GATEWAY_PORT }),
	);

	let sections = [&request.providers, &request.agents, &request.channels];
	for (key, value) in CONFIG_SECTIONS.iter().zip(sections) {
		if let Some(value) = value {
			config.insert(key.to_string(), value.clone());
		}
	}

	Value::Object(config)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_skeleton_only() {
		let config = build_config_document(&CreateTenantRequest::default());
		assert_eq!(
			config,
			json!({"gateway": {"host": "0.0.0.0", "port": 18790}})
		);
		assert!(config.get("providers").is_none());
	}

	#[test]
	fn test_supplied_sections_follow_gateway() {
		let request = CreateTenantRequest {
			channels: Some(json!({"telegram": {"enabled": true}})),
			providers: Some(json!({"openai": {"api_key": "sk"}})),
			..Default::default()
		};
		let config = build_config_document(&request);

		let keys: Vec<&String> = config.as_object().unwrap().keys().collect();
		assert_eq!(keys, ["gateway", "providers", "channels"]);
		assert_eq!(config["channels"]["telegram"]["enabled"], true);
	}
}

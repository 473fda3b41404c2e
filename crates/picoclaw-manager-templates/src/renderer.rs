// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::path::Path;

use handlebars::{handlebars_helper, Handlebars};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::{RendererError, Result};

/// Template names, in the order their output is applied.
pub const TEMPLATE_NAMES: [&str; 7] = [
	"namespace",
	"configmap",
	"pvc",
	"rbac",
	"agent-deployment",
	"gateway-deployment",
	"gateway-service",
];

/// File extension of on-disk templates.
pub const TEMPLATE_EXTENSION: &str = "yaml.hbs";

const EMBEDDED: [(&str, &str); 7] = [
	("namespace", include_str!("../templates/namespace.yaml.hbs")),
	("configmap", include_str!("../templates/configmap.yaml.hbs")),
	("pvc", include_str!("../templates/pvc.yaml.hbs")),
	("rbac", include_str!("../templates/rbac.yaml.hbs")),
	(
		"agent-deployment",
		include_str!("../templates/agent-deployment.yaml.hbs"),
	),
	(
		"gateway-deployment",
		include_str!("../templates/gateway-deployment.yaml.hbs"),
	),
	(
		"gateway-service",
		include_str!("../templates/gateway-service.yaml.hbs"),
	),
];

/// Variables available to every manifest template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderVars {
	pub tenant_id: String,
	pub namespace: String,
	/// Tenant config document, serialized.
	pub config_json: String,
	pub image: String,
	pub agent_replicas: u32,
	pub agent_cpu: String,
	pub agent_memory: String,
	pub gateway_cpu: String,
	pub gateway_memory: String,
	pub workspace_size: String,
	pub labels: BTreeMap<String, String>,
}

handlebars_helper!(indent: |text: str, width: u64| {
	let pad = " ".repeat(width as usize);
	text
		.lines()
		.map(|line| if line.is_empty() { String::new() } else { format!("{pad}{line}") })
		.collect::<Vec<_>>()
		.join("\n")
});

/// Renders the tenant manifest set.
pub struct ManifestRenderer {
	registry: Handlebars<'static>,
}

impl ManifestRenderer {
	/// Renderer over the templates compiled into the binary.
	pub fn embedded() -> Result<Self> {
		let mut registry = new_registry();
		for (name, source) in EMBEDDED {
			register(&mut registry, name, source)?;
		}
		Ok(Self { registry })
	}

	/// Renderer over `<name>.yaml.hbs` files in `dir`. Every template in
	/// [`TEMPLATE_NAMES`] must be present.
	#[instrument]
	pub fn from_dir(dir: &Path) -> Result<Self> {
		std::fs::metadata(dir).map_err(|source| RendererError::TemplateDir {
			path: dir.to_path_buf(),
			source,
		})?;

		let mut registry = new_registry();
		for name in TEMPLATE_NAMES {
			let path = dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
			let source =
				std::fs::read_to_string(&path).map_err(|source| RendererError::TemplateRead {
					name: name.to_string(),
					path: path.clone(),
					source,
				})?;
			register(&mut registry, name, &source)?;
		}
		debug!(dir = %dir.display(), "loaded manifest templates");
		Ok(Self { registry })
	}

	/// Render every template in order, joined by document separators.
	pub fn render_all<T: Serialize>(&self, vars: &T) -> Result<String> {
		let mut out = String::new();
		for (i, name) in TEMPLATE_NAMES.iter().enumerate() {
			if i > 0 {
				out.push_str("---\n");
			}
			out.push_str(&self.render_one(name, vars)?);
		}
		Ok(out)
	}

	/// Render a single named template.
	pub fn render_one<T: Serialize>(&self, name: &str, vars: &T) -> Result<String> {
		if !self.registry.has_template(name) {
			return Err(RendererError::UnknownTemplate {
				name: name.to_string(),
			});
		}
		self
			.registry
			.render(name, vars)
			.map_err(|source| RendererError::Render {
				name: name.to_string(),
				source: Box::new(source),
			})
	}
}

fn new_registry() -> Handlebars<'static> {
	let mut registry = Handlebars::new();
	registry.set_strict_mode(true);
	registry.register_escape_fn(handlebars::no_escape);
	registry.register_helper("indent", Box::new(indent));
	registry
}

fn register(registry: &mut Handlebars<'static>, name: &str, source: &str) -> Result<()> {
	registry
		.register_template_string(name, source)
		.map_err(|source| RendererError::TemplateParse {
			name: name.to_string(),
			source: Box::new(source),
		})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn vars() -> RenderVars {
		let config = serde_json::json!({
			"gateway": {"host": "0.0.0.0", "port": 18790},
			"providers": {"openai": {"api_key": "sk-test"}}
		});
		RenderVars {
			tenant_id: "acme".to_string(),
			namespace: "picoclaw-tenant-acme".to_string(),
			config_json: serde_json::to_string_pretty(&config).unwrap(),
			image: "huy2408/picoclaw:latest".to_string(),
			agent_replicas: 1,
			agent_cpu: "500m".to_string(),
			agent_memory: "1Gi".to_string(),
			gateway_cpu: "250m".to_string(),
			gateway_memory: "512Mi".to_string(),
			workspace_size: "500Mi".to_string(),
			labels: BTreeMap::from([
				(
					"app.kubernetes.io/managed-by".to_string(),
					"picoclaw-manager".to_string(),
				),
				("picoclaw.io/tenant".to_string(), "acme".to_string()),
			]),
		}
	}

	fn documents(stream: &str) -> Vec<serde_yaml::Value> {
		stream
			.split("\n---\n")
			.map(|doc| serde_yaml::from_str(doc).unwrap())
			.collect()
	}

	#[test]
	fn renders_documents_in_fixed_order() {
		let renderer = ManifestRenderer::embedded().unwrap();
		let stream = renderer.render_all(&vars()).unwrap();

		let kinds: Vec<String> = documents(&stream)
			.iter()
			.map(|d| d["kind"].as_str().unwrap().to_string())
			.collect();
		assert_eq!(
			kinds,
			[
				"Namespace",
				"ConfigMap",
				"PersistentVolumeClaim",
				"ServiceAccount",
				"Role",
				"RoleBinding",
				"Deployment",
				"Deployment",
				"Service",
			]
		);
	}

	#[test]
	fn every_document_carries_tenant_labels() {
		let renderer = ManifestRenderer::embedded().unwrap();
		let stream = renderer.render_all(&vars()).unwrap();

		for doc in documents(&stream) {
			let labels = &doc["metadata"]["labels"];
			assert_eq!(labels["app.kubernetes.io/managed-by"], "picoclaw-manager");
			assert_eq!(labels["picoclaw.io/tenant"], "acme");
		}
	}

	#[test]
	fn config_json_survives_the_config_map() {
		let renderer = ManifestRenderer::embedded().unwrap();
		let rendered = renderer.render_one("configmap", &vars()).unwrap();

		let doc: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
		let embedded = doc["data"]["config.json"].as_str().unwrap();
		let config: serde_json::Value = serde_json::from_str(embedded).unwrap();
		assert_eq!(config["gateway"]["port"], 18790);
		assert_eq!(config["providers"]["openai"]["api_key"], "sk-test");
	}

	#[test]
	fn resources_reach_the_deployments() {
		let renderer = ManifestRenderer::embedded().unwrap();
		let mut vars = vars();
		vars.agent_memory = "2Gi".to_string();

		let agent: serde_yaml::Value =
			serde_yaml::from_str(&renderer.render_one("agent-deployment", &vars).unwrap()).unwrap();
		let container = &agent["spec"]["template"]["spec"]["containers"][0];
		assert_eq!(container["resources"]["limits"]["memory"], "2Gi");
		assert_eq!(container["resources"]["requests"]["cpu"], "500m");
		assert_eq!(agent["spec"]["replicas"], 1);

		let pvc: serde_yaml::Value =
			serde_yaml::from_str(&renderer.render_one("pvc", &vars).unwrap()).unwrap();
		assert_eq!(pvc["spec"]["resources"]["requests"]["storage"], "500Mi");
	}

	#[test]
	fn gateway_service_targets_gateway_port() {
		let renderer = ManifestRenderer::embedded().unwrap();
		let svc: serde_yaml::Value =
			serde_yaml::from_str(&renderer.render_one("gateway-service", &vars()).unwrap()).unwrap();
		assert_eq!(svc["spec"]["ports"][0]["port"], 18790);
		assert_eq!(svc["spec"]["selector"]["picoclaw.io/tenant"], "acme");
	}

	#[test]
	fn missing_variable_is_an_error() {
		let renderer = ManifestRenderer::embedded().unwrap();
		let err = renderer
			.render_one("namespace", &serde_json::json!({"tenant_id": "acme"}))
			.unwrap_err();
		assert!(matches!(err, RendererError::Render { .. }));
	}

	#[test]
	fn unknown_template_is_an_error() {
		let renderer = ManifestRenderer::embedded().unwrap();
		let err = renderer.render_one("ingress", &vars()).unwrap_err();
		assert!(matches!(err, RendererError::UnknownTemplate { .. }));
	}

	#[test]
	fn indent_helper_skips_blank_lines() {
		let mut registry = new_registry();
		registry
			.register_template_string("t", "{{indent text 2}}")
			.unwrap();
		let out = registry
			.render("t", &serde_json::json!({"text": "a\n\nb"}))
			.unwrap();
		assert_eq!(out, "  a\n\n  b");
	}

	#[test]
	fn from_dir_loads_overrides() {
		let dir = tempfile::tempdir().unwrap();
		for (name, source) in EMBEDDED {
			std::fs::write(dir.path().join(format!("{name}.yaml.hbs")), source).unwrap();
		}
		std::fs::write(
			dir.path().join("namespace.yaml.hbs"),
			"apiVersion: v1\nkind: Namespace\nmetadata:\n  name: {{namespace}}\n",
		)
		.unwrap();

		let renderer = ManifestRenderer::from_dir(dir.path()).unwrap();
		let rendered = renderer.render_one("namespace", &vars()).unwrap();
		assert_eq!(
			rendered,
			"apiVersion: v1\nkind: Namespace\nmetadata:\n  name: picoclaw-tenant-acme\n"
		);
	}

	#[test]
	fn from_dir_requires_every_template() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("namespace.yaml.hbs"), "kind: Namespace\n").unwrap();

		let err = ManifestRenderer::from_dir(dir.path()).err().unwrap();
		match err {
			RendererError::TemplateRead { name, .. } => assert_eq!(name, "configmap"),
			other => panic!("unexpected error: {other:?}"),
		}
	}

	#[test]
	fn from_dir_rejects_missing_directory() {
		let err = ManifestRenderer::from_dir(Path::new("/nonexistent/picoclaw-templates"))
			.err()
			.unwrap();
		assert!(matches!(err, RendererError::TemplateDir { .. }));
	}
}

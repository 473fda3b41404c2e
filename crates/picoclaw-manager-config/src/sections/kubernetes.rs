// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Cluster access and tenant workload configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Container image used for tenant workloads when none is configured.
pub const DEFAULT_IMAGE: &str = "huy2408/picoclaw:latest";

/// Kubernetes configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct KubernetesConfig {
	/// Explicit kubeconfig; `None` falls back to in-cluster or inferred config.
	pub kubeconfig: Option<PathBuf>,
	pub image: String,
	/// Directory of `<name>.yaml.hbs` overrides; `None` uses the built-in templates.
	pub template_dir: Option<PathBuf>,
}

impl Default for KubernetesConfig {
	fn default() -> Self {
		Self {
			kubeconfig: None,
			image: DEFAULT_IMAGE.to_string(),
			template_dir: None,
		}
	}
}

/// Kubernetes configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KubernetesConfigLayer {
	#[serde(default)]
	pub kubeconfig: Option<PathBuf>,
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub template_dir: Option<PathBuf>,
}

impl KubernetesConfigLayer {
	pub fn merge(&mut self, other: KubernetesConfigLayer) {
		if other.kubeconfig.is_some() {
			self.kubeconfig = other.kubeconfig;
		}
		if other.image.is_some() {
			self.image = other.image;
		}
		if other.template_dir.is_some() {
			self.template_dir = other.template_dir;
		}
	}

	pub fn finalize(self) -> KubernetesConfig {
		KubernetesConfig {
			kubeconfig: self.kubeconfig,
			image: self.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
			template_dir: self.template_dir,
		}
	}
}

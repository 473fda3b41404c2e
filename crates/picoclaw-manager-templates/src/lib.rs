// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Kubernetes manifest templates for PicoClaw tenants.
//!
//! Seven handlebars templates render one tenant's namespace, config,
//! storage, RBAC, workloads and service as a single multi-document YAML
//! stream.

mod error;
mod renderer;

pub use error::{RendererError, Result};
pub use renderer::{ManifestRenderer, RenderVars, TEMPLATE_EXTENSION, TEMPLATE_NAMES};

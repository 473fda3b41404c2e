// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! K8s access for PicoClaw tenant provisioning.
//!
//! This crate provides:
//! - A trait-based K8s client abstraction for testability
//! - Production implementation using the kube crate
//! - A generic manifest applier driven by live API discovery

mod applier;
mod client;
mod error;
mod kube_client;
mod manifest;
mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use applier::{ManifestApplier, RESTARTED_AT_ANNOTATION};
pub use client::{K8sClient, FIELD_MANAGER};
pub use error::{K8sError, K8sResult};
pub use kube_client::KubeClient;
pub use manifest::{parse_manifests, DOCUMENT_SEPARATOR};
pub use types::{
	AppliedResource, ApplySummary, Deployment, DeploymentStatus, GroupVersionKind,
	ManifestDocument, Namespace, ResourceMapping, ResourceScope,
};

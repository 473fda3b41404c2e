// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod auth;
mod database;
mod http;
mod kubernetes;
mod logging;

pub use auth::{AuthConfig, AuthConfigLayer, DEV_API_KEY};
pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use http::{HttpConfig, HttpConfigLayer};
pub use kubernetes::{KubernetesConfig, KubernetesConfigLayer, DEFAULT_IMAGE};
pub use logging::{LoggingConfig, LoggingConfigLayer};

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! PicoClaw manager HTTP server.
//!
//! Exposes tenant lifecycle operations over a bearer-authenticated JSON API.

pub mod api;
pub mod auth_middleware;
pub mod error;
pub mod routes;
pub mod version;

pub use api::{create_router, AppState};
pub use error::ServerError;
pub use picoclaw_manager_config::ServerConfig;

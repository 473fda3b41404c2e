// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant metadata persistence for the PicoClaw manager.
//!
//! [`TenantRepository`] stores tenants in SQLite; services depend on the
//! [`TenantStore`] trait so tests can substitute their own.

pub mod error;
pub mod pool;
pub mod tenant;
pub mod testing;

pub use error::{DbError, Result};
pub use pool::{create_pool, run_migrations};
pub use tenant::{ResourceLimits, Tenant, TenantRepository, TenantStatus, TenantStore};

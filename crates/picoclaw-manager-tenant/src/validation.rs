// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Input validation for tenant requests.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::TenantError;

/// Longest accepted tenant ID.
pub const MAX_TENANT_ID_LEN: usize = 53;

static TENANT_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").expect("tenant id pattern is valid")
});

/// Tenant IDs are lowercase DNS labels short enough to prefix into a namespace.
pub fn validate_tenant_id(id: &str) -> Result<(), TenantError> {
	if id.is_empty() {
		return Err(TenantError::validation("tenant_id is required"));
	}
	if id.len() > MAX_TENANT_ID_LEN {
		return Err(TenantError::validation(format!(
			"tenant_id too long (max {MAX_TENANT_ID_LEN} characters)"
		)));
	}
	if !TENANT_ID_REGEX.is_match(id) {
		return Err(TenantError::validation(
			"tenant_id must be a valid DNS label (lowercase alphanumeric and hyphens)",
		));
	}
	Ok(())
}

pub fn validate_display_name(name: &str) -> Result<(), TenantError> {
	if name.is_empty() {
		return Err(TenantError::validation("display_name is required"));
	}
	Ok(())
}

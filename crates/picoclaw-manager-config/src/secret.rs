// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential string that never reaches logs.
//!
//! The manager keeps its API key in a [`SecretString`]. Formatting prints
//! `[REDACTED]`, the buffer is zeroized on drop, and comparison against a
//! presented bearer token runs in constant time.

use std::fmt;

use serde::{Deserialize, Deserializer};
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

pub const REDACTED: &str = "[REDACTED]";

#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretString {
	inner: String,
}

impl SecretString {
	pub fn new(inner: impl Into<String>) -> Self {
		Self {
			inner: inner.into(),
		}
	}

	pub fn expose(&self) -> &str {
		&self.inner
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	/// Constant-time comparison with a presented credential.
	///
	/// Length is not hidden; contents are.
	pub fn matches(&self, candidate: &str) -> bool {
		let expected = self.inner.as_bytes();
		let candidate = candidate.as_bytes();
		expected.len() == candidate.len() && bool::from(expected.ct_eq(candidate))
	}
}

impl fmt::Debug for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("SecretString").field(&REDACTED).finish()
	}
}

impl fmt::Display for SecretString {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl PartialEq for SecretString {
	fn eq(&self, other: &Self) -> bool {
		self.matches(other.expose())
	}
}

impl<'de> Deserialize<'de> for SecretString {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		String::deserialize(deserializer).map(SecretString::new)
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		SecretString::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		SecretString::new(value)
	}
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Multi-document YAML manifest parsing.

use tracing::debug;

use crate::error::{K8sError, K8sResult};
use crate::types::ManifestDocument;

/// Line that separates documents in a manifest stream.
pub const DOCUMENT_SEPARATOR: &str = "---";

/// Parse a manifest stream into resource documents, in stream order.
///
/// Empty documents, bare separators, and documents without a `kind` are
/// dropped. Any remaining document must carry `apiVersion` and
/// `metadata.name`.
pub fn parse_manifests(stream: &[u8]) -> K8sResult<Vec<ManifestDocument>> {
	let text = std::str::from_utf8(stream).map_err(|e| K8sError::ManifestParse {
		message: format!("manifest stream is not UTF-8: {e}"),
	})?;

	let mut documents = Vec::new();
	for (index, raw) in split_documents(text).into_iter().enumerate() {
		let raw = raw.trim();
		if raw.is_empty() || raw == DOCUMENT_SEPARATOR {
			continue;
		}

		let body: serde_json::Value =
			serde_yaml::from_str(raw).map_err(|e| K8sError::ManifestParse {
				message: format!("document {index}: {e}"),
			})?;

		if let Some(doc) = to_document(index, body)? {
			documents.push(doc);
		}
	}

	Ok(documents)
}

/// `---` followed by nothing but whitespace and an optional `#` comment.
fn is_separator(line: &str) -> bool {
	let Some(rest) = line.trim_end().strip_prefix(DOCUMENT_SEPARATOR) else {
		return false;
	};
	if rest.is_empty() {
		return true;
	}
	rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with('#')
}

/// Split on separator lines.
fn split_documents(text: &str) -> Vec<&str> {
	let mut documents = Vec::new();
	let mut start = 0;
	let mut offset = 0;

	for line in text.split_inclusive('\n') {
		if is_separator(line) {
			documents.push(&text[start..offset]);
			start = offset + line.len();
		}
		offset += line.len();
	}
	documents.push(&text[start..]);

	documents
}

fn to_document(index: usize, body: serde_json::Value) -> K8sResult<Option<ManifestDocument>> {
	if body.is_null() {
		return Ok(None);
	}
	if !body.is_object() {
		return Err(K8sError::ManifestParse {
			message: format!("document {index} is not a mapping"),
		});
	}

	let kind = body
		.get("kind")
		.and_then(|v| v.as_str())
		.unwrap_or_default()
		.to_string();
	if kind.is_empty() {
		debug!(index, "skipping manifest document without kind");
		return Ok(None);
	}

	let api_version = body
		.get("apiVersion")
		.and_then(|v| v.as_str())
		.unwrap_or_default();
	if api_version.is_empty() {
		return Err(K8sError::ManifestParse {
			message: format!("document {index} ({kind}) has no apiVersion"),
		});
	}
	let (group, version) = match api_version.split_once('/') {
		Some((group, version)) => (group.to_string(), version.to_string()),
		None => (String::new(), api_version.to_string()),
	};

	let metadata = body.get("metadata");
	let name = metadata
		.and_then(|m| m.get("name"))
		.and_then(|v| v.as_str())
		.unwrap_or_default()
		.to_string();
	if name.is_empty() {
		return Err(K8sError::ManifestParse {
			message: format!("document {index} ({kind}) has no metadata.name"),
		});
	}
	let namespace = metadata
		.and_then(|m| m.get("namespace"))
		.and_then(|v| v.as_str())
		.filter(|ns| !ns.is_empty())
		.map(str::to_string);

	Ok(Some(ManifestDocument {
		group,
		version,
		kind,
		namespace,
		name,
		body,
	}))
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RendererError {
	#[error("template directory {path}: {source}")]
	TemplateDir {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("read template {name} from {path}: {source}")]
	TemplateRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("parse template {name}: {source}")]
	TemplateParse {
		name: String,
		#[source]
		source: Box<handlebars::TemplateError>,
	},

	#[error("render template {name}: {source}")]
	Render {
		name: String,
		#[source]
		source: Box<handlebars::RenderError>,
	},

	#[error("unknown template: {name}")]
	UnknownTemplate { name: String },
}

pub type Result<T> = std::result::Result<T, RendererError>;

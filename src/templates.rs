//! Template engine wrapper.
//!
//! Thin layer over [`tera`] so views can render by template name without
//! caring where templates come from: a directory glob in deployments, raw
//! strings in tests.

use std::collections::HashMap;

use serde_json::Value;
use tera::Tera;

use crate::conf::Settings;
use crate::exception::{Error, Result};

/// Template context: variable name to JSON value
pub type Context = HashMap<String, Value>;

/// Named-template registry with Jinja-style rendering
#[derive(Debug, Default)]
pub struct TemplateEngine {
	tera: Tera,
}

impl TemplateEngine {
	/// Empty engine; templates are added with [`add_raw`](Self::add_raw)
	pub fn new() -> Self {
		Self {
			tera: Tera::default(),
		}
	}

	/// Load every `.html` file under `dir`, recursively.
	/// Template names are paths relative to `dir`.
	pub fn from_dir(dir: &str) -> Result<Self> {
		let glob = format!("{}/**/*.html", dir.trim_end_matches('/'));
		let tera = Tera::new(&glob)
			.map_err(|e| Error::Template(format!("Failed to load templates from '{}': {}", dir, e)))?;
		Ok(Self { tera })
	}

	/// Engine for the configured template directory, or an empty engine
	/// when none is configured
	pub fn from_settings(settings: &Settings) -> Result<Self> {
		match &settings.template_dir {
			Some(dir) => Self::from_dir(dir),
			None => Ok(Self::new()),
		}
	}

	/// Register a template from a string
	pub fn add_raw(&mut self, name: &str, content: &str) -> Result<()> {
		self.tera
			.add_raw_template(name, content)
			.map_err(|e| Error::Template(format!("Invalid template '{}': {}", name, e)))
	}

	/// Render `name` with the given context
	pub fn render(&self, name: &str, context: &Context) -> Result<String> {
		let mut tera_context = tera::Context::new();
		for (key, value) in context {
			tera_context.insert(key.as_str(), value);
		}
		self.tera.render(name, &tera_context).map_err(|e| match e.kind {
			tera::ErrorKind::TemplateNotFound(_) => {
				Error::Template(format!("Template '{}' not found", name))
			}
			_ => Error::Template(format!("Failed to render '{}': {}", name, e)),
		})
	}

	/// True if a template with this name is registered
	pub fn has_template(&self, name: &str) -> bool {
		self.tera.get_template_names().any(|n| n == name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_render_raw_template() {
		let mut engine = TemplateEngine::new();
		engine
			.add_raw("hello.html", "Hello {{ name }}!")
			.unwrap();

		let mut context = Context::new();
		context.insert("name".to_string(), json!("Django"));
		assert_eq!(engine.render("hello.html", &context).unwrap(), "Hello Django!");
	}

	#[test]
	fn test_missing_template_is_template_error() {
		let engine = TemplateEngine::new();
		let result = engine.render("nope.html", &Context::new());
		assert!(matches!(result, Err(Error::Template(_))));
	}

	#[test]
	fn test_from_dir_loads_nested_templates() {
		let dir = tempfile::tempdir().unwrap();
		let nested = dir.path().join("views");
		std::fs::create_dir_all(&nested).unwrap();
		std::fs::write(nested.join("about.html"), "About {{ key }}").unwrap();

		let engine = TemplateEngine::from_dir(dir.path().to_str().unwrap()).unwrap();
		assert!(engine.has_template("views/about.html"));
	}

	#[test]
	fn test_from_settings_without_dir_is_empty() {
		let engine = TemplateEngine::from_settings(&Settings::default()).unwrap();
		assert!(!engine.has_template("views/about.html"));
	}
}

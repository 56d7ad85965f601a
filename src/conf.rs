//! Ambient settings for the view layer.

use serde::Deserialize;

use crate::exception::{Error, Result};

/// Settings consulted by views and wrappers.
///
/// Loaded from TOML, e.g.:
///
/// ```toml
/// login_url = "/accounts/login/"
/// template_dir = "templates"
/// paginate_orphans = 2
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Where unauthenticated requests are redirected
	pub login_url: String,
	/// Directory templates are loaded from, when set
	pub template_dir: Option<String>,
	/// Default orphan count for paginated list views
	pub paginate_orphans: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			login_url: "/accounts/login/".to_string(),
			template_dir: None,
			paginate_orphans: 0,
		}
	}
}

impl Settings {
	/// Parse settings from a TOML string
	pub fn from_toml_str(raw: &str) -> Result<Self> {
		toml::from_str(raw).map_err(|e| Error::Configuration(format!("Invalid settings: {}", e)))
	}

	/// Read and parse a TOML settings file
	pub fn from_file(path: &str) -> Result<Self> {
		let raw = std::fs::read_to_string(path)
			.map_err(|e| Error::Configuration(format!("Cannot read settings '{}': {}", path, e)))?;
		Self::from_toml_str(&raw)
	}
}

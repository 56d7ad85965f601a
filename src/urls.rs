//! Named routes and reverse URL resolution.
//!
//! Views that redirect after a write look their target up by route name
//! rather than hardcoding paths. Patterns use `{param}` placeholders:
//!
//! ```
//! nuages::urls::register("author_detail", "/detail/author/{pk}/");
//! let url = nuages::urls::reverse("author_detail", &[("pk", "7")]).unwrap();
//! assert_eq!(url, "/detail/author/7/");
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::exception::{Error, Result};

static ROUTES: Lazy<RwLock<HashMap<String, String>>> = Lazy::new(|| RwLock::new(HashMap::new()));

/// Register (or replace) a named route pattern
pub fn register(name: impl Into<String>, pattern: impl Into<String>) {
	ROUTES.write().insert(name.into(), pattern.into());
}

/// Resolve a route name and parameters into a URL.
///
/// Unknown names and unfilled placeholders are configuration errors.
pub fn reverse(name: &str, params: &[(&str, &str)]) -> Result<String> {
	let pattern = ROUTES
		.read()
		.get(name)
		.cloned()
		.ok_or_else(|| Error::Configuration(format!("Reverse for '{}' not found", name)))?;
	substitute(&pattern, name, params)
}

fn substitute(pattern: &str, name: &str, params: &[(&str, &str)]) -> Result<String> {
	let mut result = String::with_capacity(pattern.len());
	let mut chars = pattern.chars();

	while let Some(ch) = chars.next() {
		if ch != '{' {
			result.push(ch);
			continue;
		}
		let placeholder: String = chars.by_ref().take_while(|&c| c != '}').collect();
		match params.iter().find(|(key, _)| *key == placeholder) {
			Some((_, value)) => result.push_str(value),
			None => {
				return Err(Error::Configuration(format!(
					"Reverse for '{}' is missing parameter '{}'",
					name, placeholder
				)));
			}
		}
	}

	Ok(result)
}

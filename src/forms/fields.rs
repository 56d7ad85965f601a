//! Form field types.

use serde_json::Value;

/// A single form field: knows its name and how to clean a raw value
pub trait FormField: Send + Sync {
	fn name(&self) -> &str;

	/// Validate and normalize a submitted value.
	/// Returns the cleaned value or an error message.
	fn clean(&self, value: Option<&Value>) -> Result<Value, String>;
}

/// Character field with length validation
#[derive(Debug, Clone)]
pub struct CharField {
	pub name: String,
	pub required: bool,
	pub max_length: Option<usize>,
	pub min_length: Option<usize>,
	pub strip: bool,
}

impl CharField {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			required: false,
			max_length: None,
			min_length: None,
			strip: true,
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn with_max_length(mut self, max_length: usize) -> Self {
		self.max_length = Some(max_length);
		self
	}

	pub fn with_min_length(mut self, min_length: usize) -> Self {
		self.min_length = Some(min_length);
		self
	}
}

impl FormField for CharField {
	fn name(&self) -> &str {
		&self.name
	}

	fn clean(&self, value: Option<&Value>) -> Result<Value, String> {
		let raw = match value {
			None | Some(Value::Null) => String::new(),
			Some(Value::String(s)) => s.clone(),
			Some(other) => other.to_string(),
		};
		let cleaned = if self.strip {
			raw.trim().to_string()
		} else {
			raw
		};

		if cleaned.is_empty() {
			if self.required {
				return Err("This field is required.".to_string());
			}
			return Ok(Value::String(cleaned));
		}

		let length = cleaned.chars().count();
		if let Some(max) = self.max_length {
			if length > max {
				return Err(format!(
					"Ensure this value has at most {} characters (it has {}).",
					max, length
				));
			}
		}
		if let Some(min) = self.min_length {
			if length < min {
				return Err(format!(
					"Ensure this value has at least {} characters (it has {}).",
					min, length
				));
			}
		}

		Ok(Value::String(cleaned))
	}
}

//! Forms and document-bound forms.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::documents::{Document, DocumentStore};
use crate::exception::{Error, Result};
use crate::forms::FormField;

/// Key for form-level (non-field-specific) errors
pub const ALL_FIELDS_KEY: &str = "_all";

/// A set of fields with bound data, validation state and errors
#[derive(Default)]
pub struct Form {
	fields: Vec<Box<dyn FormField>>,
	data: HashMap<String, Value>,
	initial: HashMap<String, Value>,
	errors: HashMap<String, Vec<String>>,
	cleaned_data: HashMap<String, Value>,
	is_bound: bool,
}

impl Form {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a field, builder style
	pub fn with_field(mut self, field: impl FormField + 'static) -> Self {
		self.fields.push(Box::new(field));
		self
	}

	pub fn add_field(&mut self, field: Box<dyn FormField>) {
		self.fields.push(field);
	}

	/// Initial values shown when rendering an unbound form
	pub fn set_initial(&mut self, initial: HashMap<String, Value>) {
		self.initial = initial;
	}

	/// Bind submitted data for validation
	pub fn bind(&mut self, data: HashMap<String, Value>) {
		self.data = data;
		self.is_bound = true;
	}

	pub fn is_bound(&self) -> bool {
		self.is_bound
	}

	/// Run field validation; true when every field cleaned without errors.
	/// An unbound form is never valid.
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}
		self.errors.clear();
		self.cleaned_data.clear();

		for field in &self.fields {
			let raw = self.data.get(field.name());
			match field.clean(raw) {
				Ok(value) => {
					self.cleaned_data.insert(field.name().to_string(), value);
				}
				Err(message) => {
					self.errors
						.entry(field.name().to_string())
						.or_default()
						.push(message);
				}
			}
		}

		self.errors.is_empty()
	}

	/// Record a form-level error
	pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
		self.errors
			.entry(field.to_string())
			.or_default()
			.push(message.into());
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}

	pub fn cleaned_data(&self) -> &HashMap<String, Value> {
		&self.cleaned_data
	}

	/// Context representation for template rendering: each field with its
	/// current value and errors, plus the error map
	pub fn to_context(&self) -> Value {
		let fields: Vec<Value> = self
			.fields
			.iter()
			.map(|field| {
				let name = field.name();
				let value = self
					.data
					.get(name)
					.or_else(|| self.initial.get(name))
					.cloned()
					.unwrap_or(Value::Null);
				let errors = self.errors.get(name).cloned().unwrap_or_default();
				json!({"name": name, "value": value, "errors": errors})
			})
			.collect();
		json!({
			"fields": fields,
			"errors": self.errors,
			"is_bound": self.is_bound,
		})
	}
}

/// A form bound to a document type.
///
/// With an inner [`Form`] the declared fields validate the submitted data
/// first; without one, the document type itself is the schema and
/// deserialization failures become form errors. [`save`](Self::save)
/// inserts new documents and replaces existing ones, depending on whether
/// the bound instance carries an ID.
pub struct DocumentForm<D: Document> {
	form: Option<Form>,
	instance: Option<D>,
	data: HashMap<String, Value>,
	errors: HashMap<String, Vec<String>>,
	document: Option<D>,
	is_bound: bool,
}

impl<D: Document> Default for DocumentForm<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D: Document> DocumentForm<D> {
	pub fn new() -> Self {
		Self {
			form: None,
			instance: None,
			data: HashMap::new(),
			errors: HashMap::new(),
			document: None,
			is_bound: false,
		}
	}

	/// Validate through the given field set before document binding
	pub fn with_form(mut self, form: Form) -> Self {
		self.form = Some(form);
		self
	}

	/// Bind to an existing document (update semantics)
	pub fn with_instance(mut self, instance: D) -> Self {
		self.instance = Some(instance);
		self
	}

	/// Bind submitted string data
	pub fn bind(&mut self, data: HashMap<String, String>) {
		self.data = data
			.into_iter()
			.map(|(key, value)| (key, Value::String(value)))
			.collect();
		self.is_bound = true;
	}

	/// Validate the bound data against the field set (when present) and
	/// the document type. On success the candidate document is ready to
	/// [`save`](Self::save).
	pub fn is_valid(&mut self) -> bool {
		if !self.is_bound {
			return false;
		}
		self.errors.clear();
		self.document = None;

		let mut values = self.data.clone();

		if let Some(form) = self.form.as_mut() {
			form.bind(self.data.clone());
			if !form.is_valid() {
				self.errors = form.errors().clone();
				return false;
			}
			for (key, value) in form.cleaned_data() {
				values.insert(key.clone(), value.clone());
			}
		}

		// Merge submitted values over the existing instance, then let the
		// document type itself validate the shape
		let mut object = match &self.instance {
			Some(instance) => match serde_json::to_value(instance) {
				Ok(Value::Object(map)) => map,
				Ok(_) | Err(_) => {
					self.errors
						.entry(ALL_FIELDS_KEY.to_string())
						.or_default()
						.push("Document instance is not a JSON object".to_string());
					return false;
				}
			},
			None => serde_json::Map::new(),
		};
		for (key, value) in values {
			object.insert(key, value);
		}

		match serde_json::from_value::<D>(Value::Object(object)) {
			Ok(document) => {
				if let Err(error) = document.validate() {
					self.errors
						.entry(ALL_FIELDS_KEY.to_string())
						.or_default()
						.push(error.to_string());
					return false;
				}
				self.document = Some(document);
				true
			}
			Err(error) => {
				self.errors
					.entry(ALL_FIELDS_KEY.to_string())
					.or_default()
					.push(error.to_string());
				false
			}
		}
	}

	pub fn errors(&self) -> &HashMap<String, Vec<String>> {
		&self.errors
	}

	/// Context representation for template rendering
	pub fn to_context(&self) -> Value {
		match &self.form {
			Some(form) => {
				let mut context = form.to_context();
				if let Some(object) = context.as_object_mut() {
					object.insert("errors".to_string(), json!(self.errors));
				}
				context
			}
			None => json!({
				"fields": [],
				"errors": self.errors,
				"is_bound": self.is_bound,
			}),
		}
	}

	/// Persist the validated document.
	///
	/// Inserts when the document has no ID, otherwise replaces the stored
	/// document with the same ID. Must follow a successful
	/// [`is_valid`](Self::is_valid) call.
	pub async fn save(&mut self, store: &Arc<dyn DocumentStore>) -> Result<D> {
		let document = self.document.take().ok_or_else(|| {
			Error::Validation("The form could not be saved because the data didn't validate".to_string())
		})?;

		match document.id() {
			None => {
				let stored = store
					.insert_one(D::COLLECTION_NAME, serde_json::to_value(&document)?)
					.await?;
				let saved: D = serde_json::from_value(stored)?;
				tracing::debug!(collection = D::COLLECTION_NAME, "inserted document");
				Ok(saved)
			}
			Some(id) => {
				let filter = json!({"id": serde_json::to_value(id)?});
				let updated = store
					.update_one(
						D::COLLECTION_NAME,
						filter,
						serde_json::to_value(&document)?,
					)
					.await?;
				if updated == 0 {
					return Err(Error::NotFound(format!(
						"{} matching query does not exist",
						D::COLLECTION_NAME
					)));
				}
				tracing::debug!(collection = D::COLLECTION_NAME, "updated document");
				Ok(document)
			}
		}
	}
}

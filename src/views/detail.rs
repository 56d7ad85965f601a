//! DetailView: render a single document.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;
use serde_json::Value;

use crate::documents::{Document, QuerySet};
use crate::exception::{Error, Result};
use crate::http::{Request, Response};
use crate::templates::{Context, TemplateEngine};
use crate::views::View;

enum ObjectSource<D> {
	Queryset(QuerySet<D>),
	Object(D),
	Unset,
}

/// Renders one document looked up from a queryset by the `pk` path
/// parameter, or a fixed object supplied up front.
///
/// The template is resolved in order: the per-object field named by
/// [`with_template_name_field`](Self::with_template_name_field), then
/// [`with_template_name`](Self::with_template_name), then
/// `<collection>_detail.html`.
pub struct DetailView<D> {
	engine: Arc<TemplateEngine>,
	source: ObjectSource<D>,
	template_name: Option<String>,
	template_name_field: Option<String>,
	context_object_name: Option<String>,
	pk_url_param: String,
}

impl<D: Document> DetailView<D> {
	pub fn new(engine: Arc<TemplateEngine>) -> Self {
		Self {
			engine,
			source: ObjectSource::Unset,
			template_name: None,
			template_name_field: None,
			context_object_name: None,
			pk_url_param: "pk".to_string(),
		}
	}

	/// Look the object up in this queryset
	pub fn with_queryset(mut self, queryset: QuerySet<D>) -> Self {
		self.source = ObjectSource::Queryset(queryset);
		self
	}

	/// Serve this object instead of resolving one from the request
	pub fn with_object(mut self, object: D) -> Self {
		self.source = ObjectSource::Object(object);
		self
	}

	pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
		self.template_name = Some(name.into());
		self
	}

	/// Document field holding the template name to render it with
	pub fn with_template_name_field(mut self, field: impl Into<String>) -> Self {
		self.template_name_field = Some(field.into());
		self
	}

	pub fn with_context_object_name(mut self, name: impl Into<String>) -> Self {
		self.context_object_name = Some(name.into());
		self
	}

	pub fn with_pk_url_param(mut self, name: impl Into<String>) -> Self {
		self.pk_url_param = name.into();
		self
	}

	async fn get_object(&self, request: &Request) -> Result<D> {
		match &self.source {
			ObjectSource::Object(object) => Ok(object.clone()),
			ObjectSource::Queryset(queryset) => {
				let raw = request.path_param(&self.pk_url_param).ok_or_else(|| {
					Error::Http(format!(
						"Missing '{}' path parameter",
						self.pk_url_param
					))
				})?;
				queryset.clone().filter("id", raw).get().await
			}
			ObjectSource::Unset => Err(Error::Configuration(
				"DetailView has neither a queryset nor an object".to_string(),
			)),
		}
	}

	fn resolve_template(&self, object: &Value) -> String {
		if let Some(field) = &self.template_name_field {
			let name = object.get(field).and_then(Value::as_str).unwrap_or("");
			if !name.is_empty() {
				return name.to_string();
			}
		}
		self.template_name
			.clone()
			.unwrap_or_else(|| format!("{}_detail.html", D::COLLECTION_NAME))
	}

	fn get_context_data(&self, object: Value) -> Context {
		let mut context = Context::new();
		context.insert("object".to_string(), object.clone());
		if let Some(name) = &self.context_object_name {
			context.insert(name.clone(), object);
		}
		context
	}
}

#[async_trait]
impl<D: Document> View for DetailView<D> {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let object = self.get_object(&request).await?;
				let value = serde_json::to_value(&object)?;
				let template = self.resolve_template(&value);
				let context = self.get_context_data(value);
				let html = self.engine.render(&template, &context)?;
				Ok(Response::ok().with_html(html))
			}
			_ => Err(Error::Http("Method not allowed".to_string())),
		}
	}
}

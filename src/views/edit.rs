//! CreateView, UpdateView and DeleteView: write operations through forms.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;
use serde_json::json;

use crate::documents::{Document, DocumentStore, QuerySet};
use crate::exception::{Error, Result};
use crate::forms::{DocumentForm, Form};
use crate::http::{Request, Response};
use crate::templates::{Context, TemplateEngine};
use crate::views::View;

type FormFactory = dyn Fn() -> Form + Send + Sync;
type SuccessUrlFn<D> = dyn Fn(&D) -> Result<String> + Send + Sync;

/// Redirect target after a successful write
enum SuccessUrl<D> {
	Unset,
	Literal(String),
	Compute(Arc<SuccessUrlFn<D>>),
}

impl<D: Document> SuccessUrl<D> {
	fn resolve(&self, object: &D) -> Result<String> {
		match self {
			SuccessUrl::Literal(url) => Ok(url.clone()),
			SuccessUrl::Compute(compute) => compute(object),
			SuccessUrl::Unset => object.absolute_url().ok_or_else(|| {
				Error::Configuration(
					"No URL to redirect to: provide a success URL or an absolute_url on the document"
						.to_string(),
				)
			}),
		}
	}
}

/// How Update/Delete views find their object
enum ObjectLookup {
	/// Take the ID from this path parameter
	PathParam(String),
	/// Always use this fixed ID
	Fixed(String),
}

impl ObjectLookup {
	fn value<'a>(&'a self, request: &'a Request) -> Result<&'a str> {
		match self {
			ObjectLookup::Fixed(raw) => Ok(raw.as_str()),
			ObjectLookup::PathParam(name) => request
				.path_param(name)
				.ok_or_else(|| Error::Http(format!("Missing '{}' path parameter", name))),
		}
	}
}

fn id_filter<D: Document>(object: &D) -> Result<serde_json::Value> {
	let id = object
		.id()
		.ok_or_else(|| Error::Internal("Document has no primary key".to_string()))?;
	Ok(json!({"id": serde_json::to_value(id)?}))
}

/// Creates a document from posted form data.
///
/// GET renders the (unbound) form; POST validates and saves, then
/// redirects to the configured success URL. Invalid submissions re-render
/// the form with its errors.
pub struct CreateView<D: Document> {
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
	form_factory: Option<Arc<FormFactory>>,
	template_name: Option<String>,
	context_object_name: Option<String>,
	success_url: SuccessUrl<D>,
}

impl<D: Document> CreateView<D> {
	pub fn new(engine: Arc<TemplateEngine>, store: Arc<dyn DocumentStore>) -> Self {
		Self {
			engine,
			store,
			form_factory: None,
			template_name: None,
			context_object_name: None,
			success_url: SuccessUrl::Unset,
		}
	}

	/// Validate submissions through this field set
	pub fn with_form_factory(mut self, factory: impl Fn() -> Form + Send + Sync + 'static) -> Self {
		self.form_factory = Some(Arc::new(factory));
		self
	}

	pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
		self.template_name = Some(name.into());
		self
	}

	pub fn with_context_object_name(mut self, name: impl Into<String>) -> Self {
		self.context_object_name = Some(name.into());
		self
	}

	pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
		self.success_url = SuccessUrl::Literal(url.into());
		self
	}

	/// Compute the redirect target from the saved document
	pub fn with_success_url_fn(
		mut self,
		compute: impl Fn(&D) -> Result<String> + Send + Sync + 'static,
	) -> Self {
		self.success_url = SuccessUrl::Compute(Arc::new(compute));
		self
	}

	fn make_form(&self) -> DocumentForm<D> {
		match &self.form_factory {
			Some(factory) => DocumentForm::new().with_form(factory()),
			None => DocumentForm::new(),
		}
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| format!("{}_form.html", D::COLLECTION_NAME))
	}

	/// The object is `None` until a submission has been saved, matching the
	/// single-object context convention of the other views
	fn render_form(&self, form: &DocumentForm<D>, object: Option<&D>) -> Result<Response> {
		let mut context = Context::new();
		context.insert("form".to_string(), form.to_context());
		if let Some(object) = object {
			let value = serde_json::to_value(object)?;
			context.insert("object".to_string(), value.clone());
			if let Some(name) = &self.context_object_name {
				context.insert(name.clone(), value);
			}
		}
		let html = self.engine.render(&self.template_name(), &context)?;
		Ok(Response::ok().with_html(html))
	}
}

#[async_trait]
impl<D: Document> View for CreateView<D> {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => self.render_form(&self.make_form(), None),
			Method::POST => {
				let data = request.form_data()?;
				let mut form = self.make_form();
				form.bind(data);
				if form.is_valid() {
					let saved = form.save(&self.store).await?;
					let url = self.success_url.resolve(&saved)?;
					Response::redirect(url)
				} else {
					tracing::debug!(
						collection = D::COLLECTION_NAME,
						"create form failed validation"
					);
					self.render_form(&form, None)
				}
			}
			_ => Err(Error::Http("Method not allowed".to_string())),
		}
	}

	fn allowed_methods(&self) -> Vec<&'static str> {
		vec!["GET", "HEAD", "POST", "OPTIONS"]
	}
}

/// Updates an existing document through a form.
///
/// The object is resolved from the queryset by the `pk` path parameter
/// (or a fixed ID); GET renders the form with the object's current
/// values, POST validates, saves and redirects.
pub struct UpdateView<D: Document> {
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
	queryset: Option<QuerySet<D>>,
	lookup: ObjectLookup,
	form_factory: Option<Arc<FormFactory>>,
	template_name: Option<String>,
	context_object_name: Option<String>,
	success_url: SuccessUrl<D>,
}

impl<D: Document> UpdateView<D> {
	pub fn new(engine: Arc<TemplateEngine>, store: Arc<dyn DocumentStore>) -> Self {
		Self {
			engine,
			store,
			queryset: None,
			lookup: ObjectLookup::PathParam("pk".to_string()),
			form_factory: None,
			template_name: None,
			context_object_name: None,
			success_url: SuccessUrl::Unset,
		}
	}

	/// Resolve the object from this queryset instead of the whole collection
	pub fn with_queryset(mut self, queryset: QuerySet<D>) -> Self {
		self.queryset = Some(queryset);
		self
	}

	/// Always edit the document with this ID, ignoring the URL
	pub fn with_lookup_value(mut self, raw: impl Into<String>) -> Self {
		self.lookup = ObjectLookup::Fixed(raw.into());
		self
	}

	pub fn with_pk_url_param(mut self, name: impl Into<String>) -> Self {
		self.lookup = ObjectLookup::PathParam(name.into());
		self
	}

	pub fn with_form_factory(mut self, factory: impl Fn() -> Form + Send + Sync + 'static) -> Self {
		self.form_factory = Some(Arc::new(factory));
		self
	}

	pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
		self.template_name = Some(name.into());
		self
	}

	pub fn with_context_object_name(mut self, name: impl Into<String>) -> Self {
		self.context_object_name = Some(name.into());
		self
	}

	pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
		self.success_url = SuccessUrl::Literal(url.into());
		self
	}

	pub fn with_success_url_fn(
		mut self,
		compute: impl Fn(&D) -> Result<String> + Send + Sync + 'static,
	) -> Self {
		self.success_url = SuccessUrl::Compute(Arc::new(compute));
		self
	}

	fn queryset(&self) -> QuerySet<D> {
		self.queryset
			.clone()
			.unwrap_or_else(|| QuerySet::new(Arc::clone(&self.store)))
	}

	async fn get_object(&self, request: &Request) -> Result<D> {
		let raw = self.lookup.value(request)?;
		self.queryset().filter("id", raw).get().await
	}

	fn make_form(&self, instance: D) -> Result<DocumentForm<D>> {
		let form = match &self.form_factory {
			Some(factory) => {
				let mut inner = factory();
				let initial: std::collections::HashMap<String, serde_json::Value> =
					match serde_json::to_value(&instance)? {
						serde_json::Value::Object(map) => map.into_iter().collect(),
						_ => std::collections::HashMap::new(),
					};
				inner.set_initial(initial);
				DocumentForm::new().with_form(inner)
			}
			None => DocumentForm::new(),
		};
		Ok(form.with_instance(instance))
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| format!("{}_form.html", D::COLLECTION_NAME))
	}

	fn render_form(&self, form: &DocumentForm<D>, object: &D) -> Result<Response> {
		let value = serde_json::to_value(object)?;
		let mut context = Context::new();
		context.insert("form".to_string(), form.to_context());
		context.insert("object".to_string(), value.clone());
		if let Some(name) = &self.context_object_name {
			context.insert(name.clone(), value);
		}
		let html = self.engine.render(&self.template_name(), &context)?;
		Ok(Response::ok().with_html(html))
	}
}

#[async_trait]
impl<D: Document> View for UpdateView<D> {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let object = self.get_object(&request).await?;
				let form = self.make_form(object.clone())?;
				self.render_form(&form, &object)
			}
			Method::POST | Method::PUT => {
				let object = self.get_object(&request).await?;
				let data = request.form_data()?;
				let mut form = self.make_form(object.clone())?;
				form.bind(data);
				if form.is_valid() {
					let saved = form.save(&self.store).await?;
					let url = self.success_url.resolve(&saved)?;
					Response::redirect(url)
				} else {
					tracing::debug!(
						collection = D::COLLECTION_NAME,
						"update form failed validation"
					);
					self.render_form(&form, &object)
				}
			}
			_ => Err(Error::Http("Method not allowed".to_string())),
		}
	}

	fn allowed_methods(&self) -> Vec<&'static str> {
		vec!["GET", "HEAD", "POST", "PUT", "OPTIONS"]
	}
}

/// Deletes a document after confirmation.
///
/// GET renders the confirmation template with the object; POST or DELETE
/// removes it and redirects to the success URL.
pub struct DeleteView<D: Document> {
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
	queryset: Option<QuerySet<D>>,
	lookup: ObjectLookup,
	template_name: Option<String>,
	context_object_name: Option<String>,
	success_url: SuccessUrl<D>,
}

impl<D: Document> DeleteView<D> {
	pub fn new(engine: Arc<TemplateEngine>, store: Arc<dyn DocumentStore>) -> Self {
		Self {
			engine,
			store,
			queryset: None,
			lookup: ObjectLookup::PathParam("pk".to_string()),
			template_name: None,
			context_object_name: None,
			success_url: SuccessUrl::Unset,
		}
	}

	pub fn with_queryset(mut self, queryset: QuerySet<D>) -> Self {
		self.queryset = Some(queryset);
		self
	}

	pub fn with_pk_url_param(mut self, name: impl Into<String>) -> Self {
		self.lookup = ObjectLookup::PathParam(name.into());
		self
	}

	pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
		self.template_name = Some(name.into());
		self
	}

	pub fn with_context_object_name(mut self, name: impl Into<String>) -> Self {
		self.context_object_name = Some(name.into());
		self
	}

	pub fn with_success_url(mut self, url: impl Into<String>) -> Self {
		self.success_url = SuccessUrl::Literal(url.into());
		self
	}

	pub fn with_success_url_fn(
		mut self,
		compute: impl Fn(&D) -> Result<String> + Send + Sync + 'static,
	) -> Self {
		self.success_url = SuccessUrl::Compute(Arc::new(compute));
		self
	}

	fn queryset(&self) -> QuerySet<D> {
		self.queryset
			.clone()
			.unwrap_or_else(|| QuerySet::new(Arc::clone(&self.store)))
	}

	async fn get_object(&self, request: &Request) -> Result<D> {
		let raw = self.lookup.value(request)?;
		self.queryset().filter("id", raw).get().await
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| format!("{}_confirm_delete.html", D::COLLECTION_NAME))
	}

	async fn perform_delete(&self, object: &D) -> Result<()> {
		let deleted = self
			.store
			.delete_one(D::COLLECTION_NAME, id_filter(object)?)
			.await?;
		if deleted == 0 {
			return Err(Error::NotFound(format!(
				"{} matching query does not exist",
				D::COLLECTION_NAME
			)));
		}
		tracing::debug!(collection = D::COLLECTION_NAME, "deleted document");
		Ok(())
	}
}

#[async_trait]
impl<D: Document> View for DeleteView<D> {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let object = self.get_object(&request).await?;
				let value = serde_json::to_value(&object)?;
				let mut context = Context::new();
				context.insert("object".to_string(), value.clone());
				if let Some(name) = &self.context_object_name {
					context.insert(name.clone(), value);
				}
				let html = self.engine.render(&self.template_name(), &context)?;
				Ok(Response::ok().with_html(html))
			}
			Method::POST | Method::DELETE => {
				let object = self.get_object(&request).await?;
				self.perform_delete(&object).await?;
				let url = self.success_url.resolve(&object)?;
				Response::redirect(url)
			}
			_ => Err(Error::Http("Method not allowed".to_string())),
		}
	}

	fn allowed_methods(&self) -> Vec<&'static str> {
		vec!["GET", "HEAD", "POST", "DELETE", "OPTIONS"]
	}
}

/// Form wiring shared by custom edit views.
///
/// Implementors supply the store; the queryset, form and object
/// resolution have overridable defaults, mirroring how the generic edit
/// views are wired internally.
#[async_trait]
pub trait DocumentFormMixin<D: Document>: Send + Sync {
	fn store(&self) -> Arc<dyn DocumentStore>;

	fn get_queryset(&self) -> QuerySet<D> {
		QuerySet::new(self.store())
	}

	fn get_form(&self) -> DocumentForm<D> {
		DocumentForm::new()
	}

	async fn get_object(&self, request: &Request) -> Result<D> {
		let raw = request
			.path_param("pk")
			.ok_or_else(|| Error::Http("Missing 'pk' path parameter".to_string()))?;
		self.get_queryset().filter("id", raw).get().await
	}
}

//! TemplateView: render a named template with request context.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;

use crate::exception::{Error, Result};
use crate::http::{Request, Response};
use crate::templates::{Context, TemplateEngine};
use crate::views::View;

type ContextFn = dyn Fn(&Request) -> Context + Send + Sync;

/// Renders a fixed template on GET.
///
/// The default context carries the request's path parameters under
/// `params`; [`with_context_fn`](Self::with_context_fn) extends or
/// overrides it.
pub struct TemplateView {
	engine: Arc<TemplateEngine>,
	template_name: String,
	context_fn: Option<Arc<ContextFn>>,
}

impl TemplateView {
	pub fn new(engine: Arc<TemplateEngine>, template_name: impl Into<String>) -> Self {
		Self {
			engine,
			template_name: template_name.into(),
			context_fn: None,
		}
	}

	/// Extra context per request; same keys replace the defaults
	pub fn with_context_fn(
		mut self,
		context_fn: impl Fn(&Request) -> Context + Send + Sync + 'static,
	) -> Self {
		self.context_fn = Some(Arc::new(context_fn));
		self
	}

	fn get_context_data(&self, request: &Request) -> Context {
		let mut context = Context::new();
		context.insert(
			"params".to_string(),
			serde_json::json!(request.path_params),
		);
		if let Some(context_fn) = &self.context_fn {
			for (key, value) in context_fn(request) {
				context.insert(key, value);
			}
		}
		context
	}
}

#[async_trait]
impl View for TemplateView {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let context = self.get_context_data(&request);
				let html = self.engine.render(&self.template_name, &context)?;
				Ok(Response::ok().with_html(html))
			}
			_ => Err(Error::Http("Method not allowed".to_string())),
		}
	}
}

//! Generic class-based views.
//!
//! Every view is a struct configured through builder methods and driven by
//! the async [`View`] trait. Where Django-style frameworks use subclassing
//! and method overrides, these views take closures and builder options for
//! the same knobs: template name, success URL, context object name,
//! paginator construction, object resolution.

mod detail;
mod edit;
mod list;
mod template;

pub use detail::DetailView;
pub use edit::{CreateView, DeleteView, DocumentFormMixin, UpdateView};
pub use list::ListView;
pub use template::TemplateView;

use async_trait::async_trait;

use crate::exception::Result;
use crate::http::{Request, Response};

/// Base trait for all views
#[async_trait]
pub trait View: Send + Sync {
	async fn dispatch(&self, request: Request) -> Result<Response>;

	/// HTTP methods this view accepts
	fn allowed_methods(&self) -> Vec<&'static str> {
		vec!["GET", "HEAD", "OPTIONS"]
	}
}

/// Dispatch `request` to `view`, turning errors into their HTTP responses.
///
/// This is the framework-default error handling: a missing object becomes
/// a 404, a disallowed method a 405, and so on per
/// [`Error::status`](crate::Error::status).
pub async fn serve<V: View>(view: &V, request: Request) -> Response {
	let method = request.method.clone();
	let path = request.path().to_string();
	match view.dispatch(request).await {
		Ok(response) => response,
		Err(error) => {
			tracing::warn!(%method, path, %error, "view error");
			Response::new(error.status()).with_html(error.to_string())
		}
	}
}

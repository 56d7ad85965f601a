//! Authentication state and the login-required view wrapper.

use async_trait::async_trait;
use hyper::Method;

use crate::conf::Settings;
use crate::exception::Result;
use crate::http::{Request, Response};
use crate::views::View;

/// Authentication state carried on a request.
///
/// Populated by whatever authenticates the request (middleware, a session
/// layer, or the test harness) before the view sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
	/// The authenticated user's ID, empty when anonymous
	pub user_id: String,
	pub is_authenticated: bool,
	pub is_admin: bool,
	pub is_active: bool,
}

impl AuthState {
	/// State for an authenticated user
	pub fn authenticated(user_id: impl Into<String>, is_admin: bool, is_active: bool) -> Self {
		Self {
			user_id: user_id.into(),
			is_authenticated: true,
			is_admin,
			is_active,
		}
	}

	/// State for an unauthenticated request
	pub fn anonymous() -> Self {
		Self {
			user_id: String::new(),
			is_authenticated: false,
			is_admin: false,
			is_active: false,
		}
	}

	pub fn is_anonymous(&self) -> bool {
		!self.is_authenticated
	}
}

/// Wraps a view so that unauthenticated requests are redirected to the
/// login page with a `next` parameter pointing back at the request path.
///
/// By default every method is guarded; [`guard_only`](Self::guard_only)
/// narrows the guard to specific methods (e.g. just `POST`, leaving the
/// form page itself public).
pub struct LoginRequired<V> {
	view: V,
	login_url: String,
	guarded_methods: Option<Vec<Method>>,
}

impl<V: View> LoginRequired<V> {
	pub fn new(view: V) -> Self {
		Self {
			view,
			login_url: Settings::default().login_url,
			guarded_methods: None,
		}
	}

	pub fn from_settings(settings: &Settings, view: V) -> Self {
		Self {
			view,
			login_url: settings.login_url.clone(),
			guarded_methods: None,
		}
	}

	pub fn with_login_url(mut self, login_url: impl Into<String>) -> Self {
		self.login_url = login_url.into();
		self
	}

	/// Guard only the given methods; others pass straight through
	pub fn guard_only(mut self, methods: Vec<Method>) -> Self {
		self.guarded_methods = Some(methods);
		self
	}

	fn redirect_target(&self, request: &Request) -> String {
		let next: String = url::form_urlencoded::Serializer::new(String::new())
			.append_pair("next", request.path())
			.finish();
		format!("{}?{}", self.login_url, next)
	}

	fn guards(&self, method: &Method) -> bool {
		self.guarded_methods
			.as_ref()
			.is_none_or(|methods| methods.contains(method))
	}
}

#[async_trait]
impl<V: View> View for LoginRequired<V> {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		if self.guards(&request.method) && request.auth.is_anonymous() {
			tracing::debug!(path = request.path(), "redirecting anonymous request to login");
			return Response::redirect(self.redirect_target(&request));
		}
		self.view.dispatch(request).await
	}

	fn allowed_methods(&self) -> Vec<&'static str> {
		self.view.allowed_methods()
	}
}

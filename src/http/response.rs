//! HTTP response representation.

use bytes::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::exception::{Error, Result};

/// HTTP response produced by a view
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a response with the given status code
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	/// HTTP 200 OK
	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	/// HTTP 201 Created
	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	/// HTTP 204 No Content
	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	/// HTTP 404 Not Found
	pub fn not_found() -> Self {
		Self::new(StatusCode::NOT_FOUND)
	}

	/// HTTP 405 Method Not Allowed
	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	/// HTTP 302 Found pointing at `location`
	pub fn redirect(location: impl AsRef<str>) -> Result<Self> {
		Ok(Self::new(StatusCode::FOUND).with_location(location.as_ref())?)
	}

	/// HTTP 301 Moved Permanently pointing at `location`
	pub fn permanent_redirect(location: impl AsRef<str>) -> Result<Self> {
		Ok(Self::new(StatusCode::MOVED_PERMANENTLY).with_location(location.as_ref())?)
	}

	/// Set the Location header
	pub fn with_location(mut self, location: &str) -> Result<Self> {
		let value = HeaderValue::from_str(location)
			.map_err(|e| Error::Http(format!("Invalid redirect location '{}': {}", location, e)))?;
		self.headers.insert(LOCATION, value);
		Ok(self)
	}

	/// Set an HTML body with the matching content type
	pub fn with_html(mut self, html: impl Into<String>) -> Self {
		self.body = Bytes::from(html.into());
		self.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("text/html; charset=utf-8"),
		);
		self
	}

	/// Serialize `data` as the JSON body with the matching content type
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		self.body = Bytes::from(serde_json::to_vec(data)?);
		self.headers.insert(
			CONTENT_TYPE,
			HeaderValue::from_static("application/json"),
		);
		Ok(self)
	}

	/// Set a raw body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// The Location header, if any
	pub fn location(&self) -> Option<&str> {
		self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
	}

	/// The body decoded as UTF-8 (lossy)
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

//! HTTP request representation.

use std::collections::HashMap;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use serde::de::DeserializeOwned;

use crate::auth::AuthState;
use crate::exception::{Error, Result};

/// HTTP request as seen by a view.
///
/// `path_params` are filled in by whatever routed the request to the view
/// (or by the test harness); `query_params` are parsed from the URI once at
/// construction time.
#[derive(Debug, Clone)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	pub path_params: HashMap<String, String>,
	pub query_params: HashMap<String, String>,
	pub auth: AuthState,
}

impl Request {
	/// Create a request from its parts
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = parse_query(uri.query().unwrap_or(""));
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			query_params,
			auth: AuthState::anonymous(),
		}
	}

	/// Start building a request
	pub fn builder() -> RequestBuilder {
		RequestBuilder::new()
	}

	/// Path component of the request URI
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Single query parameter by name
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query_params.get(name).map(String::as_str)
	}

	/// Single path parameter by name
	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// Decode the body as `application/x-www-form-urlencoded` data
	pub fn form_data(&self) -> Result<HashMap<String, String>> {
		serde_urlencoded::from_bytes(&self.body)
			.map_err(|e| Error::Http(format!("Malformed form body: {}", e)))
	}

	/// Decode the body as JSON
	pub fn json_body<T: DeserializeOwned>(&self) -> Result<T> {
		serde_json::from_slice(&self.body)
			.map_err(|e| Error::Serialization(format!("Malformed JSON body: {}", e)))
	}
}

fn parse_query(query: &str) -> HashMap<String, String> {
	url::form_urlencoded::parse(query.as_bytes())
		.into_owned()
		.collect()
}

/// Builder for [`Request`]
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	headers: HeaderMap,
	body: Bytes,
	path_params: HashMap<String, String>,
	auth: Option<AuthState>,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl RequestBuilder {
	pub fn new() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			headers: HeaderMap::new(),
			body: Bytes::new(),
			path_params: HashMap::new(),
			auth: None,
		}
	}

	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.path_params.insert(name.into(), value.into());
		self
	}

	pub fn auth(mut self, auth: AuthState) -> Self {
		self.auth = Some(auth);
		self
	}

	pub fn build(self) -> Result<Request> {
		let uri = self
			.uri
			.parse::<Uri>()
			.map_err(|e| Error::Http(format!("Invalid URI '{}': {}", self.uri, e)))?;
		let mut request = Request::new(
			self.method,
			uri,
			Version::HTTP_11,
			self.headers,
			self.body,
		);
		request.path_params = self.path_params;
		if let Some(auth) = self.auth {
			request.auth = auth;
		}
		Ok(request)
	}
}

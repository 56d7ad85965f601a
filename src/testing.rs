//! Test utilities.
//!
//! Request builders and response assertions shared by the crate's own
//! tests and by applications testing their views.

use bytes::Bytes;
use hyper::{Method, StatusCode};

use crate::auth::AuthState;
use crate::http::{Request, Response};

/// Build a GET request for `path`
pub fn get(path: &str) -> Request {
	request(Method::GET, path)
}

/// Build a bodyless request
pub fn request(method: Method, path: &str) -> Request {
	Request::builder()
		.method(method)
		.uri(path)
		.build()
		.unwrap()
}

/// Build a request with path parameters (as a router would set them)
pub fn request_with_path_params(method: Method, path: &str, params: &[(&str, &str)]) -> Request {
	let mut builder = Request::builder().method(method).uri(path);
	for (name, value) in params {
		builder = builder.path_param(*name, *value);
	}
	builder.build().unwrap()
}

/// Build a request carrying an urlencoded form body
pub fn form_request(method: Method, path: &str, fields: &[(&str, &str)]) -> Request {
	let body = url::form_urlencoded::Serializer::new(String::new())
		.extend_pairs(fields.iter().copied())
		.finish();
	Request::builder()
		.method(method)
		.uri(path)
		.body(Bytes::from(body))
		.build()
		.unwrap()
}

/// Mark a request as authenticated
pub fn as_user(mut request: Request, user_id: &str) -> Request {
	request.auth = AuthState::authenticated(user_id, false, true);
	request
}

/// Assert the response status code
pub fn assert_status(response: &Response, expected: StatusCode) {
	assert_eq!(
		response.status, expected,
		"Expected status {:?}, got {:?}",
		expected, response.status
	);
}

/// Assert the response body contains `expected`
pub fn assert_body_contains(response: &Response, expected: &str) {
	let body = response.text();
	assert!(
		body.contains(expected),
		"Expected body to contain '{}', got '{}'",
		expected,
		body
	);
}

/// Assert the response is a 302 to `location`
pub fn assert_redirects_to(response: &Response, location: &str) {
	assert_status(response, StatusCode::FOUND);
	assert_eq!(
		response.location(),
		Some(location),
		"Expected redirect to '{}', got {:?}",
		location,
		response.location()
	);
}

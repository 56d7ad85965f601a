//! Unified error type for the view layer.
//!
//! Every fallible operation in the crate returns [`Result`]. Each variant
//! carries a human-readable message and maps to an HTTP status code via
//! [`Error::status`], which the dispatch layer uses when turning an error
//! into a response.

use hyper::StatusCode;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for view, document and template operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Document or resource not found
	#[error("Not found: {0}")]
	NotFound(String),

	/// Form or document validation failure
	#[error("Validation error: {0}")]
	Validation(String),

	/// Requested page does not exist or is not a valid page number
	#[error("Invalid page: {0}")]
	InvalidPage(String),

	/// Request is not authenticated
	#[error("Authentication required: {0}")]
	Authentication(String),

	/// Authenticated but not allowed
	#[error("Permission denied: {0}")]
	Authorization(String),

	/// Template missing or failed to render
	#[error("Template error: {0}")]
	Template(String),

	/// Malformed request or unsupported method
	#[error("HTTP error: {0}")]
	Http(String),

	/// Serialization or deserialization failure
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// View or route is misconfigured
	#[error("Improperly configured: {0}")]
	Configuration(String),

	/// Anything else
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code this error renders as
	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound(_) | Error::InvalidPage(_) => StatusCode::NOT_FOUND,
			Error::Validation(_) | Error::Serialization(_) => StatusCode::BAD_REQUEST,
			Error::Authentication(_) => StatusCode::UNAUTHORIZED,
			Error::Authorization(_) => StatusCode::FORBIDDEN,
			Error::Http(_) => StatusCode::METHOD_NOT_ALLOWED,
			Error::Template(_) | Error::Configuration(_) | Error::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}

impl From<tera::Error> for Error {
	fn from(err: tera::Error) -> Self {
		Error::Template(err.to_string())
	}
}

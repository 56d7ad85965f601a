//! HTTP request and response types used by the view layer.

mod request;
mod response;

pub use request::{Request, RequestBuilder};
pub use response::Response;

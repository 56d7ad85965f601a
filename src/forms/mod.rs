//! Form handling and document binding.

mod fields;
mod form;

pub use fields::{CharField, FormField};
pub use form::{DocumentForm, Form, ALL_FIELDS_KEY};

//! Core `Document` trait definition.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::exception::Result;

/// A type mapped to a document collection.
///
/// ## Example
///
/// ```
/// use nuages::Document;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Author {
///     id: Option<String>,
///     name: String,
/// }
///
/// impl Document for Author {
///     type Id = String;
///     const COLLECTION_NAME: &'static str = "authors";
///
///     fn id(&self) -> Option<&String> {
///         self.id.as_ref()
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = Some(id);
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
	/// Primary key type (e.g. `String`, `i64`)
	type Id: Serialize + DeserializeOwned + Clone + PartialEq + ToString + Send + Sync + 'static;

	/// Collection name in the document store
	const COLLECTION_NAME: &'static str;

	/// The document's ID, `None` if it has not been persisted yet
	fn id(&self) -> Option<&Self::Id>;

	/// Set the document's ID, typically after insertion
	fn set_id(&mut self, id: Self::Id);

	/// Application-level validation hook, run before save
	fn validate(&self) -> Result<()> {
		Ok(())
	}

	/// Canonical URL for this document, used as the fallback redirect
	/// target after a write operation
	fn absolute_url(&self) -> Option<String> {
		None
	}
}

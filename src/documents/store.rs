//! Storage backends for documents.
//!
//! [`DocumentStore`] mirrors the surface of a document database driver
//! (find/insert/update/delete over JSON documents keyed by collection name).
//! [`MemoryStore`] is the in-process engine used by tests and small
//! deployments; other backends plug in behind the same trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::exception::{Error, Result};

/// Sort direction for a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
	Ascending,
	Descending,
}

/// Query options for [`DocumentStore::find_many`]
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
	pub sort: Vec<(String, SortOrder)>,
	pub skip: Option<usize>,
	pub limit: Option<usize>,
}

impl FindOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
		self.sort.push((field.into(), order));
		self
	}

	pub fn skip(mut self, skip: usize) -> Self {
		self.skip = Some(skip);
		self
	}

	pub fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}
}

/// Storage seam for document collections.
///
/// Filters are JSON objects matched by field equality; an empty filter
/// matches every document in the collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
	/// Find the first document matching the filter
	async fn find_one(&self, collection: &str, filter: Value) -> Result<Option<Value>>;

	/// Find all documents matching the filter, honoring sort/skip/limit
	async fn find_many(
		&self,
		collection: &str,
		filter: Value,
		options: FindOptions,
	) -> Result<Vec<Value>>;

	/// Insert a document, assigning an ID when it has none.
	/// Returns the document as stored.
	async fn insert_one(&self, collection: &str, document: Value) -> Result<Value>;

	/// Replace the first document matching the filter.
	/// Returns the number of documents updated (0 or 1).
	async fn update_one(&self, collection: &str, filter: Value, document: Value) -> Result<u64>;

	/// Delete the first document matching the filter.
	/// Returns the number of documents deleted (0 or 1).
	async fn delete_one(&self, collection: &str, filter: Value) -> Result<u64>;

	/// Count documents matching the filter
	async fn count(&self, collection: &str, filter: Value) -> Result<u64>;
}

/// In-process document store backed by a map of collections
#[derive(Debug)]
pub struct MemoryStore {
	collections: RwLock<HashMap<String, Vec<Value>>>,
	next_id: AtomicU64,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self {
			collections: RwLock::new(HashMap::new()),
			next_id: AtomicU64::new(1),
		}
	}

	fn assign_id(&self, document: &mut Value) -> Result<()> {
		let object = document
			.as_object_mut()
			.ok_or_else(|| Error::Serialization("Document must be a JSON object".to_string()))?;
		let missing = matches!(object.get("id"), None | Some(Value::Null));
		if missing {
			let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
			object.insert("id".to_string(), Value::String(id.to_string()));
		}
		Ok(())
	}
}

fn matches(document: &Value, filter: &Value) -> bool {
	match filter {
		Value::Null => true,
		Value::Object(fields) => fields
			.iter()
			.all(|(key, expected)| document.get(key) == Some(expected)),
		_ => false,
	}
}

/// Total order over JSON values so documents can be sorted on any field.
/// Missing fields sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
	use std::cmp::Ordering;

	fn rank(value: &Value) -> u8 {
		match value {
			Value::Null => 0,
			Value::Bool(_) => 1,
			Value::Number(_) => 2,
			Value::String(_) => 3,
			Value::Array(_) => 4,
			Value::Object(_) => 5,
		}
	}

	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(a), Some(b)) => match (a, b) {
			(Value::Bool(x), Value::Bool(y)) => x.cmp(y),
			(Value::Number(x), Value::Number(y)) => {
				let x = x.as_f64().unwrap_or(f64::NAN);
				let y = y.as_f64().unwrap_or(f64::NAN);
				x.partial_cmp(&y).unwrap_or(Ordering::Equal)
			}
			(Value::String(x), Value::String(y)) => x.cmp(y),
			_ => rank(a).cmp(&rank(b)),
		},
	}
}

#[async_trait]
impl DocumentStore for MemoryStore {
	async fn find_one(&self, collection: &str, filter: Value) -> Result<Option<Value>> {
		let collections = self.collections.read();
		Ok(collections
			.get(collection)
			.and_then(|documents| documents.iter().find(|d| matches(d, &filter)).cloned()))
	}

	async fn find_many(
		&self,
		collection: &str,
		filter: Value,
		options: FindOptions,
	) -> Result<Vec<Value>> {
		let mut results: Vec<Value> = {
			let collections = self.collections.read();
			collections
				.get(collection)
				.map(|documents| {
					documents
						.iter()
						.filter(|d| matches(d, &filter))
						.cloned()
						.collect()
				})
				.unwrap_or_default()
		};

		for (field, order) in options.sort.iter().rev() {
			results.sort_by(|a, b| {
				let ordering = compare_values(a.get(field), b.get(field));
				match order {
					SortOrder::Ascending => ordering,
					SortOrder::Descending => ordering.reverse(),
				}
			});
		}

		let skip = options.skip.unwrap_or(0);
		let mut results: Vec<Value> = results.into_iter().skip(skip).collect();
		if let Some(limit) = options.limit {
			results.truncate(limit);
		}

		tracing::debug!(
			collection,
			count = results.len(),
			"find_many on memory store"
		);
		Ok(results)
	}

	async fn insert_one(&self, collection: &str, document: Value) -> Result<Value> {
		let mut document = document;
		self.assign_id(&mut document)?;
		let mut collections = self.collections.write();
		collections
			.entry(collection.to_string())
			.or_default()
			.push(document.clone());
		Ok(document)
	}

	async fn update_one(&self, collection: &str, filter: Value, document: Value) -> Result<u64> {
		let mut collections = self.collections.write();
		let Some(documents) = collections.get_mut(collection) else {
			return Ok(0);
		};
		match documents.iter_mut().find(|d| matches(d, &filter)) {
			Some(existing) => {
				*existing = document;
				Ok(1)
			}
			None => Ok(0),
		}
	}

	async fn delete_one(&self, collection: &str, filter: Value) -> Result<u64> {
		let mut collections = self.collections.write();
		let Some(documents) = collections.get_mut(collection) else {
			return Ok(0);
		};
		match documents.iter().position(|d| matches(d, &filter)) {
			Some(index) => {
				documents.remove(index);
				Ok(1)
			}
			None => Ok(0),
		}
	}

	async fn count(&self, collection: &str, filter: Value) -> Result<u64> {
		let collections = self.collections.read();
		Ok(collections
			.get(collection)
			.map(|documents| documents.iter().filter(|d| matches(d, &filter)).count() as u64)
			.unwrap_or(0))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[tokio::test]
	async fn test_insert_assigns_id() {
		let store = MemoryStore::new();
		let stored = store
			.insert_one("authors", json!({"id": null, "name": "Django"}))
			.await
			.unwrap();
		assert!(stored["id"].is_string());
	}

	#[tokio::test]
	async fn test_insert_keeps_existing_id() {
		let store = MemoryStore::new();
		let stored = store
			.insert_one("authors", json!({"id": "42", "name": "Django"}))
			.await
			.unwrap();
		assert_eq!(stored["id"], json!("42"));
	}

	#[tokio::test]
	async fn test_find_many_sorted_and_limited() {
		let store = MemoryStore::new();
		for name in ["Charlie", "Alice", "Bob"] {
			store
				.insert_one("authors", json!({"name": name}))
				.await
				.unwrap();
		}

		let options = FindOptions::new()
			.sort("name", SortOrder::Ascending)
			.limit(2);
		let results = store
			.find_many("authors", json!({}), options)
			.await
			.unwrap();
		let names: Vec<&str> = results.iter().map(|d| d["name"].as_str().unwrap()).collect();
		assert_eq!(names, vec!["Alice", "Bob"]);
	}

	#[tokio::test]
	async fn test_update_one_replaces_matching_document() {
		let store = MemoryStore::new();
		let stored = store
			.insert_one("authors", json!({"name": "Old"}))
			.await
			.unwrap();
		let id = stored["id"].clone();

		let updated = store
			.update_one(
				"authors",
				json!({"id": id.clone()}),
				json!({"id": id.clone(), "name": "New"}),
			)
			.await
			.unwrap();
		assert_eq!(updated, 1);

		let found = store
			.find_one("authors", json!({"id": id}))
			.await
			.unwrap()
			.unwrap();
		assert_eq!(found["name"], json!("New"));
	}

	#[tokio::test]
	async fn test_delete_one_missing_is_zero() {
		let store = MemoryStore::new();
		let deleted = store
			.delete_one("authors", json!({"id": "404"}))
			.await
			.unwrap();
		assert_eq!(deleted, 0);
	}
}

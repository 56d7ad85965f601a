//! Lazily-evaluated query expressions over a document store.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;

use crate::documents::{Document, DocumentStore, FindOptions, SortOrder};
use crate::exception::{Error, Result};

/// A query over the documents of one collection.
///
/// Combinators (`filter`, `order_by`, `skip`, `limit`) accumulate without
/// touching the store; only the executors (`all`, `get`, `first`, `count`)
/// run the query.
pub struct QuerySet<D> {
	store: Arc<dyn DocumentStore>,
	filters: Vec<(String, Value)>,
	ordering: Vec<(String, SortOrder)>,
	skip: Option<usize>,
	limit: Option<usize>,
	_document: PhantomData<fn() -> D>,
}

impl<D> Clone for QuerySet<D> {
	fn clone(&self) -> Self {
		Self {
			store: Arc::clone(&self.store),
			filters: self.filters.clone(),
			ordering: self.ordering.clone(),
			skip: self.skip,
			limit: self.limit,
			_document: PhantomData,
		}
	}
}

impl<D: Document> QuerySet<D> {
	/// Query over every document in `D`'s collection
	pub fn new(store: Arc<dyn DocumentStore>) -> Self {
		Self {
			store,
			filters: Vec::new(),
			ordering: Vec::new(),
			skip: None,
			limit: None,
			_document: PhantomData,
		}
	}

	/// Restrict to documents whose `field` equals `value`
	pub fn filter(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
		self.filters.push((field.into(), value.into()));
		self
	}

	/// Order by `field`; prefix with `-` for descending.
	/// Repeated calls add secondary sort keys.
	pub fn order_by(mut self, field: &str) -> Self {
		let (name, order) = match field.strip_prefix('-') {
			Some(name) => (name, SortOrder::Descending),
			None => (field, SortOrder::Ascending),
		};
		self.ordering.push((name.to_string(), order));
		self
	}

	/// Skip the first `n` results
	pub fn skip(mut self, n: usize) -> Self {
		self.skip = Some(n);
		self
	}

	/// Return at most `n` results
	pub fn limit(mut self, n: usize) -> Self {
		self.limit = Some(n);
		self
	}

	fn filter_value(&self) -> Value {
		let mut object = serde_json::Map::new();
		for (field, value) in &self.filters {
			object.insert(field.clone(), value.clone());
		}
		Value::Object(object)
	}

	fn options(&self) -> FindOptions {
		FindOptions {
			sort: self.ordering.clone(),
			skip: self.skip,
			limit: self.limit,
		}
	}

	fn decode(value: Value) -> Result<D> {
		serde_json::from_value(value).map_err(|e| {
			Error::Serialization(format!(
				"Stored document in '{}' does not match its type: {}",
				D::COLLECTION_NAME,
				e
			))
		})
	}

	/// Execute and return every matching document
	pub async fn all(&self) -> Result<Vec<D>> {
		let values = self
			.store
			.find_many(D::COLLECTION_NAME, self.filter_value(), self.options())
			.await?;
		values.into_iter().map(Self::decode).collect()
	}

	/// Execute and return the first matching document, if any
	pub async fn first(&self) -> Result<Option<D>> {
		let mut options = self.options();
		options.limit = Some(1);
		let values = self
			.store
			.find_many(D::COLLECTION_NAME, self.filter_value(), options)
			.await?;
		values.into_iter().next().map(Self::decode).transpose()
	}

	/// Execute expecting exactly one match
	pub async fn get(&self) -> Result<D> {
		let mut options = self.options();
		options.limit = Some(2);
		let mut values = self
			.store
			.find_many(D::COLLECTION_NAME, self.filter_value(), options)
			.await?;
		match values.len() {
			0 => Err(Error::NotFound(format!(
				"{} matching query does not exist",
				D::COLLECTION_NAME
			))),
			1 => Self::decode(values.remove(0)),
			_ => Err(Error::Validation(format!(
				"get() returned more than one {} document",
				D::COLLECTION_NAME
			))),
		}
	}

	/// Count matching documents without decoding them
	pub async fn count(&self) -> Result<u64> {
		self.store
			.count(D::COLLECTION_NAME, self.filter_value())
			.await
	}
}

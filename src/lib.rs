//! # nuages
//!
//! Generic class-based views for document-mapper backed web applications,
//! inspired by Django's generic view layer.
//!
//! A view is a struct configured with builder methods and dispatched
//! through the async [`View`] trait:
//!
//! ```
//! use std::sync::Arc;
//! use nuages::{DetailView, Document, MemoryStore, QuerySet, TemplateEngine};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Author {
//!     id: Option<String>,
//!     name: String,
//! }
//!
//! impl Document for Author {
//!     type Id = String;
//!     const COLLECTION_NAME: &'static str = "authors";
//!     fn id(&self) -> Option<&String> { self.id.as_ref() }
//!     fn set_id(&mut self, id: String) { self.id = Some(id); }
//! }
//!
//! let store = Arc::new(MemoryStore::new());
//! let mut engine = TemplateEngine::new();
//! engine.add_raw("authors_detail.html", "{{ object.name }}").unwrap();
//!
//! let view = DetailView::<Author>::new(Arc::new(engine))
//!     .with_queryset(QuerySet::new(store));
//! ```
//!
//! The document layer ([`Document`], [`DocumentStore`], [`QuerySet`]) is
//! the storage seam; [`MemoryStore`] is the in-process engine. Pagination
//! ([`Paginator`]) folds orphaned trailing items into the previous page.

pub mod auth;
pub mod conf;
pub mod documents;
pub mod exception;
pub mod forms;
pub mod http;
pub mod pagination;
pub mod templates;
pub mod testing;
pub mod urls;
pub mod views;

pub use auth::{AuthState, LoginRequired};
pub use conf::Settings;
pub use documents::{Document, DocumentStore, FindOptions, MemoryStore, QuerySet, SortOrder};
pub use exception::{Error, Result};
pub use forms::{CharField, DocumentForm, Form, FormField};
pub use http::{Request, RequestBuilder, Response};
pub use pagination::{Page, Paginator};
pub use templates::{Context, TemplateEngine};
pub use views::{
	serve, CreateView, DeleteView, DetailView, DocumentFormMixin, ListView, TemplateView,
	UpdateView, View,
};

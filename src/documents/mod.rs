//! Document-object-mapper layer.
//!
//! [`Document`] describes a mapped type, [`DocumentStore`] is the storage
//! seam, and [`QuerySet`] is the lazily-evaluated query expression views
//! bind to.

mod document;
mod queryset;
mod store;

pub use document::Document;
pub use queryset::QuerySet;
pub use store::{DocumentStore, FindOptions, MemoryStore, SortOrder};

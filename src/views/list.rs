//! ListView: render a sequence of documents, optionally paginated.

use std::sync::Arc;

use async_trait::async_trait;
use hyper::Method;
use serde_json::{json, Value};

use crate::documents::{Document, QuerySet};
use crate::exception::{Error, Result};
use crate::http::{Request, Response};
use crate::pagination::Paginator;
use crate::templates::{Context, TemplateEngine};
use crate::views::View;

enum ListSource<D> {
	Queryset(QuerySet<D>),
	Objects(Vec<D>),
}

type PaginatorFactory = dyn Fn(Vec<Value>, usize) -> Paginator<Value> + Send + Sync;

/// Renders the documents of a queryset, or a fixed in-memory sequence,
/// with optional page-number pagination.
///
/// With [`with_paginate_by`](Self::with_paginate_by) set, the `page` query
/// parameter selects the page and the context carries `paginator`,
/// `page_obj` and `is_paginated` alongside `object_list`. The paginator
/// itself can be replaced through
/// [`with_paginator_factory`](Self::with_paginator_factory), e.g. to force
/// a fixed orphan count.
pub struct ListView<D> {
	engine: Arc<TemplateEngine>,
	source: ListSource<D>,
	template_name: Option<String>,
	context_object_name: Option<String>,
	paginate_by: Option<usize>,
	paginate_orphans: usize,
	paginator_factory: Option<Arc<PaginatorFactory>>,
	allow_empty: bool,
}

impl<D: Document> ListView<D> {
	pub fn new(engine: Arc<TemplateEngine>, queryset: QuerySet<D>) -> Self {
		Self {
			engine,
			source: ListSource::Queryset(queryset),
			template_name: None,
			context_object_name: None,
			paginate_by: None,
			paginate_orphans: 0,
			paginator_factory: None,
			allow_empty: true,
		}
	}

	/// List over a fixed sequence instead of a queryset
	pub fn with_objects(engine: Arc<TemplateEngine>, objects: Vec<D>) -> Self {
		Self {
			engine,
			source: ListSource::Objects(objects),
			template_name: None,
			context_object_name: None,
			paginate_by: None,
			paginate_orphans: 0,
			paginator_factory: None,
			allow_empty: true,
		}
	}

	pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
		self.template_name = Some(name.into());
		self
	}

	pub fn with_context_object_name(mut self, name: impl Into<String>) -> Self {
		self.context_object_name = Some(name.into());
		self
	}

	pub fn with_paginate_by(mut self, page_size: usize) -> Self {
		self.paginate_by = Some(page_size);
		self
	}

	/// Orphan count for the default paginator
	pub fn with_paginate_orphans(mut self, orphans: usize) -> Self {
		self.paginate_orphans = orphans;
		self
	}

	/// Replace paginator construction entirely
	pub fn with_paginator_factory(
		mut self,
		factory: impl Fn(Vec<Value>, usize) -> Paginator<Value> + Send + Sync + 'static,
	) -> Self {
		self.paginator_factory = Some(Arc::new(factory));
		self
	}

	/// Whether an empty list renders (true) or 404s (false)
	pub fn with_allow_empty(mut self, allow: bool) -> Self {
		self.allow_empty = allow;
		self
	}

	async fn get_objects(&self) -> Result<Vec<Value>> {
		let objects = match &self.source {
			ListSource::Queryset(queryset) => queryset.all().await?,
			ListSource::Objects(objects) => objects.clone(),
		};
		objects
			.iter()
			.map(|object| serde_json::to_value(object).map_err(Into::into))
			.collect()
	}

	fn get_paginator(&self, objects: Vec<Value>, page_size: usize) -> Paginator<Value> {
		match &self.paginator_factory {
			Some(factory) => factory(objects, page_size),
			None => Paginator::new(objects, page_size).orphans(self.paginate_orphans),
		}
	}

	fn template_name(&self) -> String {
		self.template_name
			.clone()
			.unwrap_or_else(|| format!("{}_list.html", D::COLLECTION_NAME))
	}

	fn get_context_data(&self, request: &Request, objects: Vec<Value>) -> Result<Context> {
		let mut context = Context::new();

		let object_list = match self.paginate_by {
			Some(page_size) => {
				let paginator = self.get_paginator(objects, page_size);
				let page = paginator.page_from_param(request.query_param("page"))?;
				context.insert(
					"paginator".to_string(),
					json!({
						"count": paginator.count(),
						"num_pages": paginator.num_pages(),
						"per_page": paginator.per_page(),
					}),
				);
				context.insert(
					"page_obj".to_string(),
					json!({
						"number": page.number,
						"num_pages": page.num_pages,
						"has_next": page.has_next(),
						"has_previous": page.has_previous(),
						"start_index": page.start_index(),
						"end_index": page.end_index(),
					}),
				);
				context.insert("is_paginated".to_string(), json!(page.has_other_pages()));
				page.object_list
			}
			None => {
				context.insert("is_paginated".to_string(), json!(false));
				objects
			}
		};

		context.insert("object_list".to_string(), json!(object_list));
		if let Some(name) = &self.context_object_name {
			context.insert(name.clone(), json!(object_list));
		}
		Ok(context)
	}
}

#[async_trait]
impl<D: Document> View for ListView<D> {
	async fn dispatch(&self, request: Request) -> Result<Response> {
		match request.method {
			Method::GET | Method::HEAD => {
				let objects = self.get_objects().await?;
				if objects.is_empty() && !self.allow_empty {
					return Err(Error::NotFound(format!(
						"Empty list and allow_empty is false for {}",
						D::COLLECTION_NAME
					)));
				}
				let context = self.get_context_data(&request, objects)?;
				let html = self.engine.render(&self.template_name(), &context)?;
				Ok(Response::ok().with_html(html))
			}
			_ => Err(Error::Http("Method not allowed".to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::documents::{DocumentStore, MemoryStore};
	use serde::{Deserialize, Serialize};

	#[derive(Debug, Clone, Serialize, Deserialize)]
	struct Venue {
		id: Option<String>,
		name: String,
	}

	impl Document for Venue {
		type Id = String;
		const COLLECTION_NAME: &'static str = "venues";

		fn id(&self) -> Option<&String> {
			self.id.as_ref()
		}

		fn set_id(&mut self, id: String) {
			self.id = Some(id);
		}
	}

	fn engine() -> Arc<TemplateEngine> {
		let mut engine = TemplateEngine::new();
		engine
			.add_raw(
				"venues_list.html",
				"{% for v in object_list %}{{ v.name }};{% endfor %}",
			)
			.unwrap();
		Arc::new(engine)
	}

	async fn seeded(count: usize) -> Arc<dyn DocumentStore> {
		let store = MemoryStore::new();
		for i in 0..count {
			store
				.insert_one("venues", serde_json::json!({"name": format!("v{:02}", i)}))
				.await
				.unwrap();
		}
		Arc::new(store)
	}

	#[tokio::test]
	async fn test_renders_queryset_in_order() {
		let store = seeded(3).await;
		let view = ListView::new(
			engine(),
			QuerySet::<Venue>::new(Arc::clone(&store)).order_by("name"),
		);
		let request = Request::builder().uri("/venues/").build().unwrap();
		let response = view.dispatch(request).await.unwrap();
		assert_eq!(response.text(), "v00;v01;v02;");
	}

	#[tokio::test]
	async fn test_fixed_objects_ignore_request() {
		let objects = vec![
			Venue { id: None, name: "a".into() },
			Venue { id: None, name: "b".into() },
		];
		let view = ListView::with_objects(engine(), objects).with_template_name("venues_list.html");
		let request = Request::builder()
			.uri("/venues/?page=9&q=zzz")
			.build()
			.unwrap();
		let response = view.dispatch(request).await.unwrap();
		assert_eq!(response.text(), "a;b;");
	}

	#[tokio::test]
	async fn test_pagination_selects_page() {
		let store = seeded(7).await;
		let view = ListView::new(
			engine(),
			QuerySet::<Venue>::new(Arc::clone(&store)).order_by("name"),
		)
		.with_paginate_by(3);
		let request = Request::builder().uri("/venues/?page=2").build().unwrap();
		let response = view.dispatch(request).await.unwrap();
		assert_eq!(response.text(), "v03;v04;v05;");
	}

	#[tokio::test]
	async fn test_invalid_page_is_error() {
		let store = seeded(7).await;
		let view =
			ListView::new(engine(), QuerySet::<Venue>::new(Arc::clone(&store))).with_paginate_by(3);
		let request = Request::builder().uri("/venues/?page=99").build().unwrap();
		let result = view.dispatch(request).await;
		assert!(matches!(result, Err(Error::InvalidPage(_))));
	}

	#[tokio::test]
	async fn test_empty_disallowed_is_not_found() {
		let store = seeded(0).await;
		let view = ListView::new(engine(), QuerySet::<Venue>::new(Arc::clone(&store)))
			.with_allow_empty(false);
		let request = Request::builder().uri("/venues/").build().unwrap();
		let result = view.dispatch(request).await;
		assert!(matches!(result, Err(Error::NotFound(_))));
	}

	#[tokio::test]
	async fn test_paginator_factory_overrides_orphans() {
		let store = seeded(7).await;
		let view = ListView::new(
			engine(),
			QuerySet::<Venue>::new(Arc::clone(&store)).order_by("name"),
		)
		.with_paginate_by(5)
		.with_paginator_factory(|objects, page_size| {
			Paginator::new(objects, page_size).orphans(2)
		});
		// 7 items, 5 per page, forced 2 orphans: single page of 7
		let request = Request::builder().uri("/venues/").build().unwrap();
		let response = view.dispatch(request).await.unwrap();
		assert_eq!(
			response.text(),
			"v00;v01;v02;v03;v04;v05;v06;"
		);
	}
}

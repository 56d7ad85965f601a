//! Shared fixtures: the document models, form, templates and routes the
//! view suites exercise.

#![allow(dead_code)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use nuages::{
	urls, CharField, CreateView, DeleteView, DetailView, Document, DocumentStore, Form,
	ListView, LoginRequired, MemoryStore, Paginator, QuerySet, TemplateEngine, TemplateView,
	UpdateView,
};

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
	pub id: Option<String>,
	pub name: String,
}

impl Document for Author {
	type Id = String;
	const COLLECTION_NAME: &'static str = "authors";

	fn id(&self) -> Option<&String> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: String) {
		self.id = Some(id);
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
	pub id: Option<String>,
	pub name: String,
}

impl Document for Artist {
	type Id = String;
	const COLLECTION_NAME: &'static str = "artists";

	fn id(&self) -> Option<&String> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: String) {
		self.id = Some(id);
	}

	fn absolute_url(&self) -> Option<String> {
		let id = self.id.as_deref()?;
		urls::reverse("artist_detail", &[("pk", id)]).ok()
	}
}

/// A page that knows which template renders it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
	pub id: Option<String>,
	pub content: String,
	pub template: String,
}

impl Document for Page {
	type Id = String;
	const COLLECTION_NAME: &'static str = "pages";

	fn id(&self) -> Option<&String> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: String) {
		self.id = Some(id);
	}
}

/// Declared alongside the others; no view binds it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
	pub id: Option<String>,
	pub name: String,
}

impl Document for Book {
	type Id = String;
	const COLLECTION_NAME: &'static str = "books";

	fn id(&self) -> Option<&String> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: String) {
		self.id = Some(id);
	}
}

/// Single fixed object served by `object_detail`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
	pub id: Option<String>,
	pub foo: String,
}

impl Document for Item {
	type Id = String;
	const COLLECTION_NAME: &'static str = "items";

	fn id(&self) -> Option<&String> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: String) {
		self.id = Some(id);
	}
}

/// In-memory record for the model-less list view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
	pub id: Option<String>,
	pub first: String,
	pub last: String,
}

impl Document for Person {
	type Id = String;
	const COLLECTION_NAME: &'static str = "people";

	fn id(&self) -> Option<&String> {
		self.id.as_ref()
	}

	fn set_id(&mut self, id: String) {
		self.id = Some(id);
	}
}

// ---------------------------------------------------------------------------
// Form, routes, templates, store
// ---------------------------------------------------------------------------

/// Author form: a required name capped at 100 characters
pub fn author_form() -> Form {
	Form::new().with_field(CharField::new("name").required().with_max_length(100))
}

/// Routes the fixture views reverse against
pub fn register_routes() {
	urls::register("author_detail", "/detail/author/{pk}/");
	urls::register("artist_detail", "/detail/artist/{pk}/");
	urls::register("authors_list", "/list/authors/");
}

pub fn engine() -> Arc<TemplateEngine> {
	let mut engine = TemplateEngine::new();
	let templates = [
		("views/about.html", "key={{ key }}"),
		(
			"views/detail.html",
			"object:{% if object.name %}{{ object.name }}{% endif %}{% if object.foo %}{{ object.foo }}{% endif %}",
		),
		(
			"views/list.html",
			"{% for obj in object_list %}{% if obj.first %}{{ obj.first }} {{ obj.last }}{% else %}{{ obj.name }}{% endif %};{% endfor %}",
		),
		(
			"views/form.html",
			"bound={{ form.is_bound }};errors={{ form.errors | length }};{% if thingy.name %}thingy={{ thingy.name }};{% endif %}",
		),
		(
			"views/confirm_delete.html",
			"really delete {% if thingy.name %}{{ thingy.name }}{% else %}{{ object.name }}{% endif %}?",
		),
		("artists_detail.html", "artist:{{ object.name }}"),
		("authors_detail.html", "author:{{ object.name }}"),
		(
			"authors_list.html",
			"{% for a in object_list %}{{ a.name }};{% endfor %}{% if is_paginated %}[page {{ page_obj.number }}/{{ page_obj.num_pages }}]{% endif %}",
		),
		(
			"authors_form.html",
			"author form bound={{ form.is_bound }} errors={{ form.errors | length }}",
		),
		(
			"artists_form.html",
			"artist form bound={{ form.is_bound }} errors={{ form.errors | length }}",
		),
		("authors_confirm_delete.html", "delete {{ object.name }}?"),
		("pages_detail.html", "fallback:{{ object.content }}"),
		("pages/custom.html", "custom:{{ object.content }}"),
	];
	for (name, content) in templates {
		engine
			.add_raw(name, content)
			.unwrap_or_else(|e| panic!("bad fixture template {}: {}", name, e));
	}
	Arc::new(engine)
}

pub fn store() -> Arc<dyn DocumentStore> {
	Arc::new(MemoryStore::new())
}

/// Seed the handful of documents most suites start from.
///
/// Authors are inserted out of name order on purpose; the first insert
/// gets ID `"1"`.
pub async fn seed(store: &Arc<dyn DocumentStore>) {
	for name in ["George Orwell", "Amy Tan", "Chinua Achebe"] {
		store
			.insert_one("authors", json!({"name": name}))
			.await
			.expect("seed author");
	}
	store
		.insert_one("artists", json!({"name": "Rene Magritte"}))
		.await
		.expect("seed artist");
	store
		.insert_one(
			"pages",
			json!({"content": "I was once bitten by a moose", "template": "pages/custom.html"}),
		)
		.await
		.expect("seed page");
}

/// Seed `count` authors with zero-padded names so name order is stable
pub async fn seed_many_authors(store: &Arc<dyn DocumentStore>, count: usize) {
	for i in 0..count {
		store
			.insert_one("authors", json!({"name": format!("Author {:02}", i)}))
			.await
			.expect("seed author");
	}
}

// ---------------------------------------------------------------------------
// Fixture views, one constructor per view class of the original suite
// ---------------------------------------------------------------------------

pub fn custom_template_view(engine: Arc<TemplateEngine>) -> TemplateView {
	TemplateView::new(engine, "views/about.html").with_context_fn(|request| {
		let mut context = nuages::Context::new();
		context.insert("params".to_string(), json!(request.path_params));
		context.insert("key".to_string(), json!("value"));
		context
	})
}

pub fn object_detail(engine: Arc<TemplateEngine>) -> DetailView<Item> {
	DetailView::new(engine)
		.with_object(Item {
			id: None,
			foo: "bar".to_string(),
		})
		.with_template_name("views/detail.html")
}

pub fn artist_detail(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> DetailView<Artist> {
	DetailView::new(engine).with_queryset(QuerySet::new(store))
}

pub fn author_detail(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> DetailView<Author> {
	DetailView::new(engine).with_queryset(QuerySet::new(store))
}

pub fn page_detail(engine: Arc<TemplateEngine>, store: Arc<dyn DocumentStore>) -> DetailView<Page> {
	DetailView::new(engine)
		.with_queryset(QuerySet::new(store))
		.with_template_name_field("template")
}

/// A list view that doesn't touch the store
pub fn dict_list(engine: Arc<TemplateEngine>) -> ListView<Person> {
	ListView::with_objects(
		engine,
		vec![
			Person {
				id: None,
				first: "John".to_string(),
				last: "Lennon".to_string(),
			},
			Person {
				id: None,
				first: "Yoko".to_string(),
				last: "Ono".to_string(),
			},
		],
	)
	.with_template_name("views/list.html")
}

pub fn artist_list(engine: Arc<TemplateEngine>, store: Arc<dyn DocumentStore>) -> ListView<Artist> {
	ListView::new(engine, QuerySet::new(store)).with_template_name("views/list.html")
}

pub fn author_list(engine: Arc<TemplateEngine>, store: Arc<dyn DocumentStore>) -> ListView<Author> {
	ListView::new(engine, QuerySet::new(store).order_by("name"))
}

/// Paginator that forces two orphans regardless of what the caller asks for
pub fn custom_paginator(
	objects: Vec<Value>,
	page_size: usize,
	_orphans: usize,
	allow_empty_first_page: bool,
) -> Paginator<Value> {
	Paginator::new(objects, page_size)
		.orphans(2)
		.allow_empty_first_page(allow_empty_first_page)
}

pub fn author_list_custom_paginator(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> ListView<Author> {
	author_list(engine, store)
		.with_paginate_by(5)
		.with_paginator_factory(|objects, page_size| custom_paginator(objects, page_size, 0, true))
}

pub fn artist_create(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> CreateView<Artist> {
	CreateView::new(engine, store)
}

pub fn naive_author_create(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> CreateView<Author> {
	CreateView::new(engine, store)
}

pub fn author_create(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> CreateView<Author> {
	CreateView::new(engine, store).with_success_url("/list/authors/")
}

pub fn specialized_author_create(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> CreateView<Author> {
	CreateView::new(engine, store)
		.with_form_factory(author_form)
		.with_template_name("views/form.html")
		.with_context_object_name("thingy")
		.with_success_url_fn(|author: &Author| {
			let id = author
				.id
				.as_deref()
				.ok_or_else(|| nuages::Error::Internal("Saved author has no ID".to_string()))?;
			urls::reverse("author_detail", &[("pk", id)])
		})
}

/// Author creation with the write method behind a login wall
pub fn author_create_restricted(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> LoginRequired<CreateView<Author>> {
	LoginRequired::new(author_create(engine, store)).guard_only(vec![hyper::Method::POST])
}

pub fn artist_update(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> UpdateView<Artist> {
	UpdateView::new(engine, store)
}

pub fn naive_author_update(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> UpdateView<Author> {
	UpdateView::new(engine, store.clone()).with_queryset(QuerySet::new(store))
}

pub fn author_update(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> UpdateView<Author> {
	UpdateView::new(engine, store).with_success_url("/list/authors/")
}

/// Always edits the author with ID 1, whatever the URL says
pub fn one_author_update(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> UpdateView<Author> {
	UpdateView::new(engine, store)
		.with_lookup_value("1")
		.with_success_url("/list/authors/")
}

pub fn specialized_author_update(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> UpdateView<Author> {
	UpdateView::new(engine, store)
		.with_form_factory(author_form)
		.with_template_name("views/form.html")
		.with_context_object_name("thingy")
		.with_success_url_fn(|author: &Author| {
			let id = author
				.id
				.as_deref()
				.ok_or_else(|| nuages::Error::Internal("Saved author has no ID".to_string()))?;
			urls::reverse("author_detail", &[("pk", id)])
		})
}

pub fn naive_author_delete(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> DeleteView<Author> {
	DeleteView::new(engine, store.clone()).with_queryset(QuerySet::new(store))
}

pub fn author_delete(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> DeleteView<Author> {
	DeleteView::new(engine, store).with_success_url("/list/authors/")
}

pub fn specialized_author_delete(
	engine: Arc<TemplateEngine>,
	store: Arc<dyn DocumentStore>,
) -> DeleteView<Author> {
	DeleteView::new(engine, store.clone())
		.with_queryset(QuerySet::new(store))
		.with_template_name("views/confirm_delete.html")
		.with_context_object_name("thingy")
		.with_success_url_fn(|_author: &Author| urls::reverse("authors_list", &[]))
}

//! Page-number pagination with orphan folding.
//!
//! A [`Paginator`] slices a sequence into pages of `per_page` items. When
//! the trailing page would hold `orphans` items or fewer, those items are
//! folded into the previous page instead of forming their own page, so the
//! last page always carries more than `orphans` items unless it is the only
//! page.

use crate::exception::{Error, Result};

/// Splits a sequence of items into [`Page`]s
#[derive(Debug, Clone)]
pub struct Paginator<T> {
	object_list: Vec<T>,
	per_page: usize,
	orphans: usize,
	allow_empty_first_page: bool,
}

impl<T: Clone> Paginator<T> {
	/// Create a paginator over `object_list` with `per_page` items per page
	pub fn new(object_list: Vec<T>, per_page: usize) -> Self {
		Self {
			object_list,
			per_page,
			orphans: 0,
			allow_empty_first_page: true,
		}
	}

	/// Minimum number of items required for the final page to stand alone
	pub fn orphans(mut self, orphans: usize) -> Self {
		self.orphans = orphans;
		self
	}

	/// Whether an empty sequence produces a single empty first page
	pub fn allow_empty_first_page(mut self, allow: bool) -> Self {
		self.allow_empty_first_page = allow;
		self
	}

	/// Total number of items
	pub fn count(&self) -> usize {
		self.object_list.len()
	}

	/// Items per page
	pub fn per_page(&self) -> usize {
		self.per_page
	}

	/// Total number of pages after orphan folding
	pub fn num_pages(&self) -> usize {
		let count = self.count();
		if count == 0 {
			return if self.allow_empty_first_page { 1 } else { 0 };
		}
		let hits = count.saturating_sub(self.orphans).max(1);
		hits.div_ceil(self.per_page.max(1))
	}

	/// Iterator over all page numbers (1-indexed)
	pub fn page_range(&self) -> std::ops::RangeInclusive<usize> {
		1..=self.num_pages()
	}

	fn validate_number(&self, number: usize) -> Result<usize> {
		if self.per_page == 0 {
			return Err(Error::InvalidPage(
				"Page size must be a positive integer".to_string(),
			));
		}
		if number < 1 {
			return Err(Error::InvalidPage(
				"That page number is less than 1".to_string(),
			));
		}
		if number > self.num_pages() {
			return Err(Error::InvalidPage(
				"That page contains no results".to_string(),
			));
		}
		Ok(number)
	}

	/// Return page `number` (1-indexed)
	pub fn page(&self, number: usize) -> Result<Page<T>> {
		let number = self.validate_number(number)?;
		let bottom = (number - 1) * self.per_page;
		let mut top = bottom + self.per_page;
		// Fold trailing orphans into the final page
		if top + self.orphans >= self.count() {
			top = self.count();
		}
		tracing::debug!(number, bottom, top, "slicing page");
		Ok(Page {
			object_list: self.object_list[bottom..top].to_vec(),
			number,
			num_pages: self.num_pages(),
			count: self.count(),
			per_page: self.per_page,
		})
	}

	/// Resolve a raw `page` query parameter into a page.
	///
	/// Accepts a 1-indexed number or the string `"last"`; absent means the
	/// first page. Anything else is an [`Error::InvalidPage`].
	pub fn page_from_param(&self, param: Option<&str>) -> Result<Page<T>> {
		let number = match param {
			None => 1,
			Some("last") => self.num_pages(),
			Some(raw) => raw
				.parse::<usize>()
				.map_err(|_| Error::InvalidPage("Invalid page number".to_string()))?,
		};
		self.page(number)
	}
}

/// One page of results with its position metadata
#[derive(Debug, Clone)]
pub struct Page<T> {
	pub object_list: Vec<T>,
	pub number: usize,
	pub num_pages: usize,
	pub count: usize,
	pub per_page: usize,
}

impl<T> Page<T> {
	/// True if a page follows this one
	pub fn has_next(&self) -> bool {
		self.number < self.num_pages
	}

	/// True if a page precedes this one
	pub fn has_previous(&self) -> bool {
		self.number > 1
	}

	/// True if this is not the only page
	pub fn has_other_pages(&self) -> bool {
		self.has_previous() || self.has_next()
	}

	/// Number of the following page
	pub fn next_page_number(&self) -> Result<usize> {
		if self.has_next() {
			Ok(self.number + 1)
		} else {
			Err(Error::InvalidPage(
				"That page contains no results".to_string(),
			))
		}
	}

	/// Number of the preceding page
	pub fn previous_page_number(&self) -> Result<usize> {
		if self.has_previous() {
			Ok(self.number - 1)
		} else {
			Err(Error::InvalidPage(
				"That page number is less than 1".to_string(),
			))
		}
	}

	/// 1-based index of the first item on this page, 0 when empty
	pub fn start_index(&self) -> usize {
		if self.object_list.is_empty() {
			0
		} else {
			(self.number - 1) * self.per_page + 1
		}
	}

	/// 1-based index of the last item on this page, 0 when empty
	pub fn end_index(&self) -> usize {
		if self.object_list.is_empty() {
			0
		} else {
			self.start_index() + self.object_list.len() - 1
		}
	}

	pub fn len(&self) -> usize {
		self.object_list.len()
	}

	pub fn is_empty(&self) -> bool {
		self.object_list.is_empty()
	}
}

impl<T> IntoIterator for Page<T> {
	type Item = T;
	type IntoIter = std::vec::IntoIter<T>;

	fn into_iter(self) -> Self::IntoIter {
		self.object_list.into_iter()
	}
}

impl<'a, T> IntoIterator for &'a Page<T> {
	type Item = &'a T;
	type IntoIter = std::slice::Iter<'a, T>;

	fn into_iter(self) -> Self::IntoIter {
		self.object_list.iter()
	}
}

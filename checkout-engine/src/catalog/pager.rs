//! Catalog pager
//!
//! Holds one page of products at a time. A load is split into
//! [`CatalogPager::begin_load`] and [`CatalogPager::apply`] so that
//! overlapping requests can be resolved: every request carries a generation
//! number, and only the response to the most recent request is applied.
//! A slow earlier response arriving after a newer request was issued is
//! dropped.
//!
//! A failed load keeps the previous page and sets an error message. There is
//! no retry; the caller issues a new load.

use super::{CatalogError, CatalogSource};
use shared::{Product, ProductPage};

/// Message surfaced when a page fails to load
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load products.";

/// One outstanding page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub skip: u64,
    generation: u64,
}

/// Paged view over a [`CatalogSource`]
#[derive(Debug, Clone)]
pub struct CatalogPager {
    page_size: u32,
    current_page: u32,
    total_count: u64,
    items: Vec<Product>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl CatalogPager {
    /// A page size of zero is treated as one
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            current_page: 1,
            total_count: 0,
            items: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    /// Find a product on the current page
    pub fn item(&self, product_id: i64) -> Option<&Product> {
        self.items.iter().find(|p| p.id == product_id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_go_back(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_forward(&self) -> bool {
        u64::from(self.current_page) * u64::from(self.page_size) < self.total_count
    }

    /// `max(1, ceil(total / page_size))`
    pub fn total_pages(&self) -> u64 {
        self.total_count.div_ceil(u64::from(self.page_size)).max(1)
    }

    /// Start loading `page` (1-based; 0 is treated as 1)
    ///
    /// Supersedes any request still in flight.
    pub fn begin_load(&mut self, page: u32) -> PageRequest {
        let page = page.max(1);
        self.generation += 1;
        self.loading = true;
        self.error = None;

        PageRequest {
            page,
            limit: self.page_size,
            skip: u64::from(page - 1) * u64::from(self.page_size),
            generation: self.generation,
        }
    }

    /// Apply the outcome of `request`
    ///
    /// Returns `false` when the request has been superseded and its outcome
    /// was discarded.
    pub fn apply(
        &mut self,
        request: &PageRequest,
        result: Result<ProductPage, CatalogError>,
    ) -> bool {
        if request.generation != self.generation {
            tracing::debug!(
                page = request.page,
                latest = self.generation,
                stale = request.generation,
                "Discarding superseded catalog response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.products;
                self.total_count = page.total;
                self.current_page = request.page;
                self.error = None;
                tracing::debug!(
                    page = request.page,
                    items = self.items.len(),
                    total = self.total_count,
                    "Catalog page loaded"
                );
            }
            Err(e) => {
                tracing::warn!(page = request.page, error = %e, "Catalog page failed to load");
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// Fetch and apply `page` in one go
    pub async fn load<S: CatalogSource + ?Sized>(&mut self, source: &S, page: u32) -> bool {
        let request = self.begin_load(page);
        let result = source.fetch_page(request.limit, request.skip).await;
        self.apply(&request, result)
    }

    /// Load the next page if there is one
    pub async fn next_page<S: CatalogSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.load(source, self.current_page + 1).await
    }

    /// Load the previous page if there is one
    pub async fn previous_page<S: CatalogSource + ?Sized>(&mut self, source: &S) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.load(source, self.current_page - 1).await
    }
}

//! Catalog access
//!
//! - **source**: the external product source behind [`CatalogSource`]
//! - **pager**: page index / total count tracking over a source

pub mod pager;

pub use pager::{CatalogPager, PageRequest};

use async_trait::async_trait;
use catalog_client::{CatalogClient, ClientError};
use shared::ProductPage;
use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Client(#[from] ClientError),

    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Paged product source
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// `limit` products starting at offset `skip`
    async fn fetch_page(&self, limit: u32, skip: u64) -> Result<ProductPage, CatalogError>;
}

#[async_trait]
impl CatalogSource for CatalogClient {
    async fn fetch_page(&self, limit: u32, skip: u64) -> Result<ProductPage, CatalogError> {
        Ok(self.fetch_products(limit, skip).await?)
    }
}

//! Port for article storage.
use async_trait::async_trait;

use crate::domain::{Article, Slug};

use super::define_port_error;

define_port_error! {
    /// Errors raised by article repository adapters.
    pub enum ArticleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "article repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "article repository query failed: {message}",
        /// Another article already uses the slug.
        DuplicateSlug { slug: String } => "article slug already in use: {slug}",
    }
}

/// Storage for published articles, keyed by slug.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Insert a new article; the slug must be unused.
    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError>;

    /// Fetch an article by slug.
    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticleRepositoryError>;

    /// Distinct tags across all articles.
    async fn list_tags(&self) -> Result<Vec<String>, ArticleRepositoryError>;
}

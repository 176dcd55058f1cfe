//! Tag listing.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::article::normalise_tags;
use crate::domain::pipeline::{Auth, Handler, Request};
use crate::domain::port_errors::map_article_error;
use crate::domain::ports::ArticleRepository;
use crate::domain::{Error, RequestContext};

/// Every distinct tag in use, sorted ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListTags;

impl Request for ListTags {
    type Response = Vec<String>;
    const NAME: &'static str = "ListTags";
    const AUTH: Auth = Auth::Optional;
}

/// Collects the distinct tags of every article.
pub struct ListTagsHandler {
    articles: Arc<dyn ArticleRepository>,
}

impl ListTagsHandler {
    /// Build a handler over the article store.
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl Handler<ListTags> for ListTagsHandler {
    async fn handle(&self, _request: ListTags, _ctx: &RequestContext) -> Result<Vec<String>, Error> {
        let tags = self
            .articles
            .list_tags()
            .await
            .map_err(map_article_error)?;
        Ok(normalise_tags(tags))
    }
}

//! Article publication and lookup.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::{find_article, load_author};
use crate::domain::article::normalise_tags;
use crate::domain::pipeline::{Auth, Handler, Request};
use crate::domain::port_errors::map_article_error;
use crate::domain::ports::{ArticleRepository, UserRepository};
use crate::domain::validation::{non_blank, parse_field};
use crate::domain::{
    Article, ArticleId, ArticleView, Error, ProfileProjector, RequestContext, RuleSet, Slug,
    Violation, Violations,
};

/// Publish an article as the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    pub tags: Vec<String>,
}

impl Request for CreateArticle {
    type Response = ArticleView;
    const NAME: &'static str = "CreateArticle";
    const AUTH: Auth = Auth::Required;
}

/// Non-empty title, description, and body; the title's slug must be unused.
pub struct CreateArticleRules {
    articles: Arc<dyn ArticleRepository>,
}

impl CreateArticleRules {
    /// Check slug availability against `articles`.
    pub fn new(articles: Arc<dyn ArticleRepository>) -> Self {
        Self { articles }
    }
}

#[async_trait]
impl RuleSet<CreateArticle> for CreateArticleRules {
    async fn validate(
        &self,
        request: &CreateArticle,
        _ctx: &RequestContext,
    ) -> Result<Violations, Error> {
        let mut violations = Violations::default();
        if let Some(slug) = violations.check("article.title", Slug::from_title(&request.title)) {
            let existing = self
                .articles
                .find_by_slug(&slug)
                .await
                .map_err(map_article_error)?;
            if existing.is_some() {
                violations.push(Violation::new(
                    "article.title",
                    "taken",
                    "has already been taken",
                ));
            }
        }
        violations.check("article.description", non_blank(&request.description));
        violations.check("article.body", non_blank(&request.body));
        Ok(violations)
    }
}

/// Derives the slug, normalises tags, and stores the article.
pub struct CreateArticleHandler {
    articles: Arc<dyn ArticleRepository>,
    projector: ProfileProjector,
    clock: Arc<dyn Clock>,
}

impl CreateArticleHandler {
    /// Build a handler that stamps articles with `clock`.
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        projector: ProfileProjector,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            articles,
            projector,
            clock,
        }
    }
}

#[async_trait]
impl Handler<CreateArticle> for CreateArticleHandler {
    async fn handle(
        &self,
        request: CreateArticle,
        ctx: &RequestContext,
    ) -> Result<ArticleView, Error> {
        let author = ctx.identity().require_user()?;
        let slug = parse_field("article.title", Slug::from_title(&request.title))?;
        let now = self.clock.utc();
        let article = Article {
            id: ArticleId::random(),
            slug,
            title: request.title,
            description: request.description,
            body: request.body,
            tags: normalise_tags(&request.tags),
            author: *author.id(),
            created_at: now,
            updated_at: now,
        };

        ctx.ensure_active()?;
        self.articles
            .insert(&article)
            .await
            .map_err(map_article_error)?;
        debug!(article = %article.slug, author = %article.author, "article created");

        let author_view = self.projector.project(author, ctx.identity()).await?;
        Ok(ArticleView::new(&article, author_view))
    }
}

/// Fetch an article by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetArticle {
    pub slug: String,
}

impl Request for GetArticle {
    type Response = ArticleView;
    const NAME: &'static str = "GetArticle";
    const AUTH: Auth = Auth::Optional;
}

/// Loads an article and projects its author for the caller.
pub struct GetArticleHandler {
    articles: Arc<dyn ArticleRepository>,
    users: Arc<dyn UserRepository>,
    projector: ProfileProjector,
}

impl GetArticleHandler {
    /// Build a handler over the article and user stores.
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        users: Arc<dyn UserRepository>,
        projector: ProfileProjector,
    ) -> Self {
        Self {
            articles,
            users,
            projector,
        }
    }
}

#[async_trait]
impl Handler<GetArticle> for GetArticleHandler {
    async fn handle(&self, request: GetArticle, ctx: &RequestContext) -> Result<ArticleView, Error> {
        let article = find_article(self.articles.as_ref(), &request.slug).await?;
        let author = load_author(self.users.as_ref(), &article.author).await?;
        let author_view = self.projector.project(&author, ctx.identity()).await?;
        Ok(ArticleView::new(&article, author_view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockArticleRepository, MockSocialGraph};
    use crate::domain::requests::test_support::{authenticated, fixture_clock, user};
    use rstest::rstest;

    fn request(title: &str) -> CreateArticle {
        CreateArticle {
            title: title.to_owned(),
            description: "Description".to_owned(),
            body: "Body".to_owned(),
            tags: vec!["Tag2".to_owned(), "Tag1".to_owned(), "Tag2".to_owned()],
        }
    }

    #[rstest]
    #[tokio::test]
    async fn rules_flag_duplicate_titles() {
        let mut articles = MockArticleRepository::new();
        articles
            .expect_find_by_slug()
            .withf(|slug| slug.as_ref() == "test-title")
            .returning(|slug| {
                Ok(Some(Article {
                    id: ArticleId::random(),
                    slug: slug.clone(),
                    title: "Test Title".to_owned(),
                    description: String::new(),
                    body: String::new(),
                    tags: Vec::new(),
                    author: crate::domain::UserId::random(),
                    created_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
                    updated_at: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
                }))
            });
        let rules = CreateArticleRules::new(Arc::new(articles));

        let violations = rules
            .validate(&request("Test  Title!"), &RequestContext::guest())
            .await
            .expect("rules run");

        let found: Vec<_> = violations.iter().map(|v| (v.field(), v.code())).collect();
        assert_eq!(found, vec![("article.title", "taken")]);
    }

    #[rstest]
    #[tokio::test]
    async fn rules_flag_every_blank_field() {
        // Titles without letters never reach the store.
        let rules = CreateArticleRules::new(Arc::new(MockArticleRepository::new()));

        let violations = rules
            .validate(&CreateArticle::default(), &RequestContext::guest())
            .await
            .expect("rules run");

        let fields: Vec<_> = violations.iter().map(Violation::field).collect();
        assert_eq!(
            fields,
            vec!["article.title", "article.description", "article.body"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn create_derives_slug_and_sorts_tags() {
        let mut articles = MockArticleRepository::new();
        articles.expect_insert().times(1).returning(|_| Ok(()));
        let mut graph = MockSocialGraph::new();
        graph.expect_is_following().returning(|_, _| Ok(false));
        let clock = fixture_clock();
        let now = clock.utc();
        let handler = CreateArticleHandler::new(
            Arc::new(articles),
            ProfileProjector::new(Arc::new(graph)),
            Arc::new(clock),
        );

        let view = handler
            .handle(request("Test Title"), &authenticated(user("John Doe")))
            .await
            .expect("article created");

        assert_eq!(view.slug, "test-title");
        assert_eq!(view.tag_list, vec!["Tag1", "Tag2"]);
        assert_eq!(view.created_at, now);
        assert_eq!(view.author.username, "John Doe");
    }
}

//! Article comments: listing, creation, and deletion.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use super::{find_article, load_author};
use crate::domain::comment::sort_newest_first;
use crate::domain::pipeline::{Auth, Handler, Request};
use crate::domain::port_errors::map_comment_error;
use crate::domain::ports::{ArticleRepository, CommentRepository, UserRepository};
use crate::domain::validation::parse_field;
use crate::domain::{
    CommentBody, CommentId, CommentView, Error, NewComment, ProfileProjector, ProfileView,
    RequestContext, RuleSet, UserId, Violations,
};

/// List an article's comments, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListComments {
    pub slug: String,
}

impl Request for ListComments {
    type Response = Vec<CommentView>;
    const NAME: &'static str = "ListComments";
    const AUTH: Auth = Auth::Optional;
}

/// Lists an article's comments, newest first.
pub struct ListCommentsHandler {
    articles: Arc<dyn ArticleRepository>,
    comments: Arc<dyn CommentRepository>,
    users: Arc<dyn UserRepository>,
    projector: ProfileProjector,
}

impl ListCommentsHandler {
    /// Build a handler over the article, comment, and user stores.
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        comments: Arc<dyn CommentRepository>,
        users: Arc<dyn UserRepository>,
        projector: ProfileProjector,
    ) -> Self {
        Self {
            articles,
            comments,
            users,
            projector,
        }
    }
}

#[async_trait]
impl Handler<ListComments> for ListCommentsHandler {
    async fn handle(
        &self,
        request: ListComments,
        ctx: &RequestContext,
    ) -> Result<Vec<CommentView>, Error> {
        let article = find_article(self.articles.as_ref(), &request.slug).await?;
        let mut comments = self
            .comments
            .list_for_article(&article.id)
            .await
            .map_err(map_comment_error)?;
        sort_newest_first(&mut comments);

        // Each author is projected once however many comments they wrote.
        let mut authors: HashMap<UserId, ProfileView> = HashMap::new();
        let mut views = Vec::with_capacity(comments.len());
        for comment in &comments {
            let author = match authors.get(&comment.author) {
                Some(view) => view.clone(),
                None => {
                    let user = load_author(self.users.as_ref(), &comment.author).await?;
                    let view = self.projector.project(&user, ctx.identity()).await?;
                    authors.insert(comment.author, view.clone());
                    view
                }
            };
            views.push(CommentView::new(comment, author));
        }
        Ok(views)
    }
}

/// Add a comment to an article as the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateComment {
    pub slug: String,
    pub body: String,
}

impl Request for CreateComment {
    type Response = CommentView;
    const NAME: &'static str = "CreateComment";
    const AUTH: Auth = Auth::Required;
}

/// `comment.body` must be non-empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct CreateCommentRules;

#[async_trait]
impl RuleSet<CreateComment> for CreateCommentRules {
    async fn validate(
        &self,
        request: &CreateComment,
        _ctx: &RequestContext,
    ) -> Result<Violations, Error> {
        let mut violations = Violations::default();
        violations.check("comment.body", CommentBody::new(request.body.as_str()));
        Ok(violations)
    }
}

/// Stores a comment authored by the caller.
pub struct CreateCommentHandler {
    articles: Arc<dyn ArticleRepository>,
    comments: Arc<dyn CommentRepository>,
    projector: ProfileProjector,
    clock: Arc<dyn Clock>,
}

impl CreateCommentHandler {
    /// Build a handler that stamps comments with `clock`.
    pub fn new(
        articles: Arc<dyn ArticleRepository>,
        comments: Arc<dyn CommentRepository>,
        projector: ProfileProjector,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            articles,
            comments,
            projector,
            clock,
        }
    }
}

#[async_trait]
impl Handler<CreateComment> for CreateCommentHandler {
    async fn handle(
        &self,
        request: CreateComment,
        ctx: &RequestContext,
    ) -> Result<CommentView, Error> {
        let author = ctx.identity().require_user()?;
        let article = find_article(self.articles.as_ref(), &request.slug).await?;
        let body = parse_field("comment.body", CommentBody::new(request.body))?;

        ctx.ensure_active()?;
        let comment = self
            .comments
            .insert(NewComment {
                article: article.id,
                author: *author.id(),
                body,
                created_at: self.clock.utc(),
            })
            .await
            .map_err(map_comment_error)?;
        debug!(comment = %comment.id, article = %article.slug, "comment created");

        let author_view = self.projector.project(author, ctx.identity()).await?;
        Ok(CommentView::new(&comment, author_view))
    }
}

/// Delete one of the caller's own comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteComment {
    pub slug: String,
    pub comment_id: u64,
}

impl Request for DeleteComment {
    type Response = ();
    const NAME: &'static str = "DeleteComment";
    const AUTH: Auth = Auth::Required;
}

/// Removes a comment on behalf of its author.
pub struct DeleteCommentHandler {
    articles: Arc<dyn ArticleRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl DeleteCommentHandler {
    /// Build a handler over the article and comment stores.
    pub fn new(articles: Arc<dyn ArticleRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { articles, comments }
    }
}

#[async_trait]
impl Handler<DeleteComment> for DeleteCommentHandler {
    async fn handle(&self, request: DeleteComment, ctx: &RequestContext) -> Result<(), Error> {
        let caller = ctx.identity().require_user()?;
        let article = find_article(self.articles.as_ref(), &request.slug).await?;
        let id = CommentId::new(request.comment_id);
        let not_found = || Error::not_found(format!("comment {id} not found"));

        let comment = self
            .comments
            .find_by_id(id)
            .await
            .map_err(map_comment_error)?
            .filter(|comment| comment.article == article.id)
            .ok_or_else(not_found)?;
        if comment.author != *caller.id() {
            return Err(Error::forbidden("only the author may delete a comment"));
        }

        ctx.ensure_active()?;
        let removed = self
            .comments
            .delete(id)
            .await
            .map_err(map_comment_error)?;
        if !removed {
            return Err(not_found());
        }
        debug!(comment = %id, article = %article.slug, "comment deleted");
        Ok(())
    }
}

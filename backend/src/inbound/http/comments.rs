//! Comment API handlers.
//!
//! ```text
//! GET /api/articles/{slug}/comments
//! POST /api/articles/{slug}/comments {"comment":{"body":"Thank you so much!"}}
//! DELETE /api/articles/{slug}/comments/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{CommentView, CreateComment, DeleteComment, ListComments};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// `{"comments": [...]}` response envelope.
#[derive(Debug, Deserialize, Serialize)]
pub struct CommentsEnvelope {
    pub comments: Vec<CommentView>,
}

/// `{"comment": ...}` envelope shared by requests and responses.
#[derive(Debug, Deserialize, Serialize)]
pub struct CommentEnvelope<T> {
    pub comment: T,
}

/// Body for `POST /api/articles/{slug}/comments`.
#[derive(Debug, Deserialize, Serialize)]
pub struct NewCommentRequest {
    pub body: String,
}

/// Comments on an article, newest first.
#[get("/articles/{slug}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<CommentsEnvelope>> {
    let request = ListComments {
        slug: path.into_inner(),
    };
    let comments = state.mediator.send(request, session.caller()?).await?;
    Ok(web::Json(CommentsEnvelope { comments }))
}

/// Comment on an article as the signed-in user.
#[post("/articles/{slug}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<CommentEnvelope<NewCommentRequest>>,
) -> ApiResult<web::Json<CommentEnvelope<CommentView>>> {
    let request = CreateComment {
        slug: path.into_inner(),
        body: payload.into_inner().comment.body,
    };
    let comment = state.mediator.send(request, session.caller()?).await?;
    Ok(web::Json(CommentEnvelope { comment }))
}

/// Delete one of the signed-in user's comments.
#[delete("/articles/{slug}/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(String, u64)>,
) -> ApiResult<HttpResponse> {
    let (slug, comment_id) = path.into_inner();
    let request = DeleteComment { slug, comment_id };
    state.mediator.send(request, session.caller()?).await?;
    Ok(HttpResponse::Ok().finish())
}

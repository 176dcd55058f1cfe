//! Article API handlers.
//!
//! ```text
//! POST /api/articles {"article":{"title":"How to train your dragon","description":"Ever wonder how?","body":"You have to believe","tagList":["dragons"]}}
//! GET /api/articles/{slug}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{ArticleView, CreateArticle, GetArticle};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// `{"article": ...}` envelope shared by requests and responses.
#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleEnvelope<T> {
    pub article: T,
}

/// Body for `POST /api/articles`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticleRequest {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(default)]
    pub tag_list: Vec<String>,
}

impl From<NewArticleRequest> for CreateArticle {
    fn from(value: NewArticleRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            body: value.body,
            tags: value.tag_list,
        }
    }
}

/// Publish an article as the signed-in user.
#[post("/articles")]
pub async fn create_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ArticleEnvelope<NewArticleRequest>>,
) -> ApiResult<web::Json<ArticleEnvelope<ArticleView>>> {
    let request = CreateArticle::from(payload.into_inner().article);
    let article = state.mediator.send(request, session.caller()?).await?;
    Ok(web::Json(ArticleEnvelope { article }))
}

/// Fetch one article by slug.
#[get("/articles/{slug}")]
pub async fn get_article(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ArticleEnvelope<ArticleView>>> {
    let request = GetArticle {
        slug: path.into_inner(),
    };
    let article = state.mediator.send(request, session.caller()?).await?;
    Ok(web::Json(ArticleEnvelope { article }))
}

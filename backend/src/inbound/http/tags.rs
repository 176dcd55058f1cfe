//! Tag API handler.
//!
//! ```text
//! GET /api/tags
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::ListTags;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// `{"tags": [...]}` response envelope.
#[derive(Debug, Deserialize, Serialize)]
pub struct TagsEnvelope {
    pub tags: Vec<String>,
}

/// Every tag in use, sorted ascending.
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<TagsEnvelope>> {
    let tags = state.mediator.send(ListTags, session.caller()?).await?;
    Ok(web::Json(TagsEnvelope { tags }))
}

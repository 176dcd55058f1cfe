//! Profile API handlers.
//!
//! ```text
//! GET /api/profiles/{username}
//! POST /api/profiles/{username}/follow
//! DELETE /api/profiles/{username}/follow
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{FollowProfile, GetProfile, ProfileView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// `{"profile": ...}` response envelope.
#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileEnvelope {
    pub profile: ProfileView,
}

/// A profile as seen by the caller.
#[get("/profiles/{username}")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileEnvelope>> {
    let request = GetProfile {
        username: path.into_inner(),
    };
    let profile = state.mediator.send(request, session.caller()?).await?;
    Ok(web::Json(ProfileEnvelope { profile }))
}

async fn set_following(
    state: web::Data<HttpState>,
    session: SessionContext,
    username: String,
    should_follow: bool,
) -> ApiResult<web::Json<ProfileEnvelope>> {
    let request = FollowProfile {
        username,
        follow: should_follow,
    };
    let profile = state.mediator.send(request, session.caller()?).await?;
    Ok(web::Json(ProfileEnvelope { profile }))
}

/// Follow a user. Following twice is a no-op.
#[post("/profiles/{username}/follow")]
pub async fn follow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileEnvelope>> {
    set_following(state, session, path.into_inner(), true).await
}

/// Stop following a user. Unfollowing a stranger is a no-op.
#[delete("/profiles/{username}/follow")]
pub async fn unfollow(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileEnvelope>> {
    set_following(state, session, path.into_inner(), false).await
}

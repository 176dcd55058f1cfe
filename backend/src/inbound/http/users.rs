//! Users API handlers.
//!
//! ```text
//! POST /api/users {"user":{"username":"Jacob","email":"jake@jake.jake","password":"jakejake"}}
//! POST /api/users/login {"user":{"email":"jake@jake.jake","password":"jakejake"}}
//! GET /api/user
//! PUT /api/user {"user":{"bio":"I like to skateboard"}}
//! ```

use actix_web::{get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{GetCurrentUser, LoginUser, RegisterUser, UpdateUser, UserView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// `{"user": ...}` envelope shared by requests and responses.
#[derive(Debug, Deserialize, Serialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

/// Registration body for `POST /api/users`.
#[derive(Deserialize, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(value: RegisterRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            password: value.password,
        }
    }
}

/// Login body for `POST /api/users/login`.
#[derive(Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for LoginUser {
    fn from(value: LoginRequest) -> Self {
        Self {
            email: value.email,
            password: value.password,
        }
    }
}

/// Partial update body for `PUT /api/user`; absent fields stay unchanged.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl From<UpdateRequest> for UpdateUser {
    fn from(value: UpdateRequest) -> Self {
        Self {
            username: value.username,
            email: value.email,
            bio: value.bio,
            image: value.image,
        }
    }
}

/// Register a user and sign them in.
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserEnvelope<RegisterRequest>>,
) -> ApiResult<web::Json<UserEnvelope<UserView>>> {
    let request = RegisterUser::from(payload.into_inner().user);
    let registered = state.mediator.send(request, session.caller()?).await?;
    session.persist_user(&registered.id)?;
    Ok(web::Json(UserEnvelope {
        user: registered.user,
    }))
}

/// Authenticate by email and password and establish a session.
#[post("/users/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserEnvelope<LoginRequest>>,
) -> ApiResult<web::Json<UserEnvelope<UserView>>> {
    let request = LoginUser::from(payload.into_inner().user);
    let authenticated = state.mediator.send(request, session.caller()?).await?;
    session.persist_user(&authenticated.id)?;
    Ok(web::Json(UserEnvelope {
        user: authenticated.user,
    }))
}

/// The signed-in user.
#[get("/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserEnvelope<UserView>>> {
    let user = state
        .mediator
        .send(GetCurrentUser, session.caller()?)
        .await?;
    Ok(web::Json(UserEnvelope { user }))
}

/// Update the signed-in user's own fields.
#[put("/user")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UserEnvelope<UpdateRequest>>,
) -> ApiResult<web::Json<UserEnvelope<UserView>>> {
    let request = UpdateUser::from(payload.into_inner().user);
    let user = state.mediator.send(request, session.caller()?).await?;
    Ok(web::Json(UserEnvelope { user }))
}

//! HTTP inbound adapter exposing REST endpoints.
//!
//! Every handler turns its path and body into a domain request, builds a
//! [`Caller`](crate::domain::Caller) from the session cookie, and hands both
//! to the [`Mediator`](crate::domain::Mediator).

pub mod articles;
pub mod comments;
pub mod error;
pub mod profiles;
pub mod session;
pub mod state;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::web;

pub use error::ApiResult;

/// Register every endpoint on `cfg`, relative to the API prefix.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use conduit::inbound::http::configure;
///
/// let _app = App::new().service(web::scope("/api").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(users::update_user)
        .service(profiles::get_profile)
        .service(profiles::follow)
        .service(profiles::unfollow)
        .service(articles::create_article)
        .service(articles::get_article)
        .service(comments::list_comments)
        .service(comments::add_comment)
        .service(comments::delete_comment)
        .service(tags::list_tags);
}

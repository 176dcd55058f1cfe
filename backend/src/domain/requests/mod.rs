//! Request types, their rule sets, and their handlers.

mod articles;
mod comments;
mod profiles;
mod tags;
mod users;

pub use articles::{
    CreateArticle, CreateArticleHandler, CreateArticleRules, GetArticle, GetArticleHandler,
};
pub use comments::{
    CreateComment, CreateCommentHandler, CreateCommentRules, DeleteComment, DeleteCommentHandler,
    ListComments, ListCommentsHandler,
};
pub use profiles::{FollowProfile, FollowProfileHandler, GetProfile, GetProfileHandler};
pub use tags::{ListTags, ListTagsHandler};
pub use users::{
    AuthenticatedUser, GetCurrentUser, GetCurrentUserHandler, LoginUser, LoginUserHandler,
    LoginUserRules, RegisterUser, RegisterUserHandler, RegisterUserRules, UpdateUser,
    UpdateUserHandler, UpdateUserRules,
};

use super::port_errors::{map_article_error, map_user_error};
use super::ports::{ArticleRepository, UserRepository};
use super::{Article, Error, Slug, User, UserId, Username};

/// Look up a user by the username in a request path.
///
/// The name must match a stored username exactly, so padded names never
/// resolve. A name that cannot be a valid username cannot exist either, so
/// every miss reports [`crate::domain::ErrorCode::NotFound`].
async fn find_user_by_name(users: &dyn UserRepository, raw: &str) -> Result<User, Error> {
    let not_found = || Error::not_found(format!("profile {raw} not found"));
    if raw.trim() != raw {
        return Err(not_found());
    }
    let username = Username::new(raw).map_err(|_| not_found())?;
    users
        .find_by_username(&username)
        .await
        .map_err(map_user_error)?
        .ok_or_else(not_found)
}

/// Look up an article by the slug in a request path.
async fn find_article(articles: &dyn ArticleRepository, raw: &str) -> Result<Article, Error> {
    let not_found = || Error::not_found(format!("article {raw} not found"));
    let slug = Slug::new(raw).map_err(|_| not_found())?;
    articles
        .find_by_slug(&slug)
        .await
        .map_err(map_article_error)?
        .ok_or_else(not_found)
}

/// Load the author of stored content. A dangling reference is a store fault.
async fn load_author(users: &dyn UserRepository, id: &UserId) -> Result<User, Error> {
    users
        .find_by_id(id)
        .await
        .map_err(map_user_error)?
        .ok_or_else(|| Error::internal("content author missing"))
}

#[cfg(test)]
pub(crate) mod test_support;

//! Static request routing.
//!
//! [`Mediator`] owns one [`Pipeline`] per request type and implements
//! [`Routes`] once for each, so [`Mediator::send`] resolves the pipeline at
//! compile time.

use std::sync::Arc;

use mockable::Clock;
use tracing::{Instrument, debug, info_span};

use super::pipeline::{Pipeline, Request};
use super::ports::{
    ArticleRepository, CommentRepository, CredentialResolver, PasswordHasher, SocialGraph,
    UserRepository,
};
use super::requests::{
    CreateArticle, CreateArticleHandler, CreateArticleRules, CreateComment, CreateCommentHandler,
    CreateCommentRules, DeleteComment, DeleteCommentHandler, FollowProfile, FollowProfileHandler,
    GetArticle, GetArticleHandler, GetCurrentUser, GetCurrentUserHandler, GetProfile,
    GetProfileHandler, ListComments, ListCommentsHandler, ListTags, ListTagsHandler, LoginUser,
    LoginUserHandler, LoginUserRules, RegisterUser, RegisterUserHandler, RegisterUserRules,
    UpdateUser, UpdateUserHandler, UpdateUserRules,
};
use super::{Caller, Error, NoRules, ProfileProjector, RequestContext};

/// Adapters the request handlers run against.
#[derive(Clone)]
pub struct Ports {
    /// Registered accounts.
    pub users: Arc<dyn UserRepository>,
    /// Follow edges between users.
    pub graph: Arc<dyn SocialGraph>,
    /// Published articles and their tags.
    pub articles: Arc<dyn ArticleRepository>,
    /// Article comments.
    pub comments: Arc<dyn CommentRepository>,
    /// Password hashing for registration and login.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Turns transport credentials into identities.
    pub credentials: Arc<dyn CredentialResolver>,
    /// Source of creation timestamps.
    pub clock: Arc<dyn Clock>,
}

/// Selects the pipeline for request type `R`.
pub trait Routes<R>
where
    R: Request,
{
    /// The pipeline bound to `R`.
    fn pipeline(&self) -> &Pipeline<R>;
}

/// Entry point for every request.
#[derive(Clone)]
pub struct Mediator {
    credentials: Arc<dyn CredentialResolver>,
    get_profile: Pipeline<GetProfile>,
    follow_profile: Pipeline<FollowProfile>,
    list_comments: Pipeline<ListComments>,
    create_comment: Pipeline<CreateComment>,
    delete_comment: Pipeline<DeleteComment>,
    register_user: Pipeline<RegisterUser>,
    login_user: Pipeline<LoginUser>,
    get_current_user: Pipeline<GetCurrentUser>,
    update_user: Pipeline<UpdateUser>,
    create_article: Pipeline<CreateArticle>,
    get_article: Pipeline<GetArticle>,
    list_tags: Pipeline<ListTags>,
}

impl Mediator {
    /// Bind every request type to its rule set and handler.
    pub fn new(ports: Ports) -> Self {
        let Ports {
            users,
            graph,
            articles,
            comments,
            hasher,
            credentials,
            clock,
        } = ports;
        let projector = ProfileProjector::new(Arc::clone(&graph));
        let no_rules = Arc::new(NoRules);

        Self {
            credentials,
            get_profile: Pipeline::new(
                no_rules.clone(),
                Arc::new(GetProfileHandler::new(users.clone(), projector.clone())),
            ),
            follow_profile: Pipeline::new(
                no_rules.clone(),
                Arc::new(FollowProfileHandler::new(
                    users.clone(),
                    graph,
                    projector.clone(),
                )),
            ),
            list_comments: Pipeline::new(
                no_rules.clone(),
                Arc::new(ListCommentsHandler::new(
                    articles.clone(),
                    comments.clone(),
                    users.clone(),
                    projector.clone(),
                )),
            ),
            create_comment: Pipeline::new(
                Arc::new(CreateCommentRules),
                Arc::new(CreateCommentHandler::new(
                    articles.clone(),
                    comments.clone(),
                    projector.clone(),
                    clock.clone(),
                )),
            ),
            delete_comment: Pipeline::new(
                no_rules.clone(),
                Arc::new(DeleteCommentHandler::new(articles.clone(), comments)),
            ),
            register_user: Pipeline::new(
                Arc::new(RegisterUserRules::new(users.clone())),
                Arc::new(RegisterUserHandler::new(users.clone(), hasher.clone())),
            ),
            login_user: Pipeline::new(
                Arc::new(LoginUserRules),
                Arc::new(LoginUserHandler::new(users.clone(), hasher)),
            ),
            get_current_user: Pipeline::new(no_rules.clone(), Arc::new(GetCurrentUserHandler)),
            update_user: Pipeline::new(
                Arc::new(UpdateUserRules::new(users.clone())),
                Arc::new(UpdateUserHandler::new(users.clone())),
            ),
            create_article: Pipeline::new(
                Arc::new(CreateArticleRules::new(articles.clone())),
                Arc::new(CreateArticleHandler::new(
                    articles.clone(),
                    projector.clone(),
                    clock,
                )),
            ),
            get_article: Pipeline::new(
                no_rules.clone(),
                Arc::new(GetArticleHandler::new(articles.clone(), users, projector)),
            ),
            list_tags: Pipeline::new(no_rules, Arc::new(ListTagsHandler::new(articles))),
        }
    }

    /// Dispatch `request` on behalf of `caller`.
    ///
    /// Resolves the caller's identity, then runs the request's pipeline.
    ///
    /// # Examples
    /// ```no_run
    /// use conduit::domain::{Caller, GetProfile, Mediator};
    ///
    /// # async fn example(mediator: Mediator) -> Result<(), conduit::domain::Error> {
    /// let profile = mediator
    ///     .send(GetProfile { username: "Jane Doe".to_owned() }, Caller::guest())
    ///     .await?;
    /// assert!(!profile.following);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send<R>(&self, request: R, caller: Caller) -> Result<R::Response, Error>
    where
        R: Request,
        Self: Routes<R>,
    {
        let span = info_span!("request", name = R::NAME);
        async move {
            if caller.cancellation().is_cancelled() {
                return Err(Error::cancelled("request cancelled"));
            }
            let identity = self.credentials.resolve(caller.credential()).await?;
            debug!(authenticated = identity.is_authenticated(), "identity resolved");
            let ctx = RequestContext::new(identity, caller.cancellation().clone());
            Routes::<R>::pipeline(self).run(request, &ctx).await
        }
        .instrument(span)
        .await
    }
}

macro_rules! routes {
    ($($request:ty => $field:ident),* $(,)?) => {
        $(
            impl Routes<$request> for Mediator {
                fn pipeline(&self) -> &Pipeline<$request> {
                    &self.$field
                }
            }
        )*
    };
}

routes! {
    GetProfile => get_profile,
    FollowProfile => follow_profile,
    ListComments => list_comments,
    CreateComment => create_comment,
    DeleteComment => delete_comment,
    RegisterUser => register_user,
    LoginUser => login_user,
    GetCurrentUser => get_current_user,
    UpdateUser => update_user,
    CreateArticle => create_article,
    GetArticle => get_article,
    ListTags => list_tags,
}

//! Profile reads and follow/unfollow.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::find_user_by_name;
use crate::domain::pipeline::{Auth, Handler, Request};
use crate::domain::port_errors::map_social_graph_error;
use crate::domain::ports::{SocialGraph, UserRepository};
use crate::domain::{Error, FollowEdge, ProfileProjector, ProfileView, RequestContext};

/// Fetch a profile by username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetProfile {
    pub username: String,
}

impl Request for GetProfile {
    type Response = ProfileView;
    const NAME: &'static str = "GetProfile";
    const AUTH: Auth = Auth::Optional;
}

/// Looks up a profile by exact username.
pub struct GetProfileHandler {
    users: Arc<dyn UserRepository>,
    projector: ProfileProjector,
}

impl GetProfileHandler {
    /// Build a handler over the user store.
    pub fn new(users: Arc<dyn UserRepository>, projector: ProfileProjector) -> Self {
        Self { users, projector }
    }
}

#[async_trait]
impl Handler<GetProfile> for GetProfileHandler {
    async fn handle(&self, request: GetProfile, ctx: &RequestContext) -> Result<ProfileView, Error> {
        let user = find_user_by_name(self.users.as_ref(), &request.username).await?;
        self.projector.project(&user, ctx.identity()).await
    }
}

/// Follow (`follow == true`) or unfollow a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowProfile {
    pub username: String,
    pub follow: bool,
}

impl Request for FollowProfile {
    type Response = ProfileView;
    const NAME: &'static str = "FollowProfile";
    const AUTH: Auth = Auth::Required;
}

/// Adds or removes the caller's follow edge to a profile.
pub struct FollowProfileHandler {
    users: Arc<dyn UserRepository>,
    graph: Arc<dyn SocialGraph>,
    projector: ProfileProjector,
}

impl FollowProfileHandler {
    /// Build a handler over the user store and social graph.
    pub fn new(
        users: Arc<dyn UserRepository>,
        graph: Arc<dyn SocialGraph>,
        projector: ProfileProjector,
    ) -> Self {
        Self {
            users,
            graph,
            projector,
        }
    }
}

#[async_trait]
impl Handler<FollowProfile> for FollowProfileHandler {
    async fn handle(
        &self,
        request: FollowProfile,
        ctx: &RequestContext,
    ) -> Result<ProfileView, Error> {
        let viewer = ctx.identity().require_user()?;
        let target = find_user_by_name(self.users.as_ref(), &request.username).await?;
        let edge = FollowEdge::new(*viewer.id(), *target.id())?;

        ctx.ensure_active()?;
        if request.follow {
            let outcome = self
                .graph
                .follow(&edge)
                .await
                .map_err(map_social_graph_error)?;
            debug!(follower = %edge.follower(), followed = %edge.followed(), ?outcome, "follow");
        } else {
            let outcome = self
                .graph
                .unfollow(edge.follower(), edge.followed())
                .await
                .map_err(map_social_graph_error)?;
            debug!(follower = %edge.follower(), followed = %edge.followed(), ?outcome, "unfollow");
        }

        self.projector.project(&target, ctx.identity()).await
    }
}

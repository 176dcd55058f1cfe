//! Viewer-scoped profile projection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::identity::IdentityContext;
use super::port_errors::map_social_graph_error;
use super::ports::SocialGraph;
use super::user::User;
use super::Error;

/// Public profile as seen by one viewer. Derived on every read, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub following: bool,
}

/// Builds [`ProfileView`]s against the social graph.
#[derive(Clone)]
pub struct ProfileProjector {
    graph: Arc<dyn SocialGraph>,
}

impl ProfileProjector {
    /// Project against `graph`.
    pub fn new(graph: Arc<dyn SocialGraph>) -> Self {
        Self { graph }
    }

    /// Project `subject` for `viewer`.
    ///
    /// `following` is true only when the viewer is authenticated and follows
    /// the subject. Guests never trigger a graph lookup.
    pub async fn project(
        &self,
        subject: &User,
        viewer: &IdentityContext,
    ) -> Result<ProfileView, Error> {
        let following = match viewer.user_id() {
            Some(viewer_id) => self
                .graph
                .is_following(viewer_id, subject.id())
                .await
                .map_err(map_social_graph_error)?,
            None => false,
        };
        Ok(ProfileView {
            username: subject.username().to_string(),
            bio: subject.bio().map(str::to_owned),
            image: subject.image().map(str::to_owned),
            following,
        })
    }
}

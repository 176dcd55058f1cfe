//! Process-local store implementing every persistence port.
//!
//! All state sits behind one [`std::sync::Mutex`], which is the single
//! transactional boundary: each port call locks once, checks its uniqueness
//! constraints, and writes within the same critical section. No lock is held
//! across an `.await`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    ArticleRepository, ArticleRepositoryError, CommentRepository, CommentRepositoryError,
    SocialGraph, SocialGraphError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Article, ArticleId, Comment, CommentId, Email, FollowEdge, FollowOutcome, NewComment, Slug,
    UnfollowOutcome, User, UserChanges, UserId, Username,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    usernames: HashMap<Username, UserId>,
    emails: HashMap<Email, UserId>,
    follows: HashSet<(UserId, UserId)>,
    articles: HashMap<Slug, Article>,
    comments: BTreeMap<CommentId, Comment>,
    last_comment_id: u64,
}

impl State {
    /// Name the unique user column `user` would clash on, ignoring its own row.
    fn user_conflict(&self, user: &User) -> Option<&'static str> {
        let clashes = |owner: Option<&UserId>| owner.is_some_and(|id| id != user.id());
        if clashes(self.usernames.get(user.username())) {
            Some("username")
        } else if clashes(self.emails.get(user.email())) {
            Some("email")
        } else {
            None
        }
    }

    fn index_user(&mut self, user: &User) {
        self.usernames.insert(user.username().clone(), *user.id());
        self.emails.insert(user.email().clone(), *user.id());
        self.users.insert(*user.id(), user.clone());
    }
}

/// Shared in-memory backing store.
///
/// Clone the surrounding `Arc` to hand the same store to every port.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state
            .usernames
            .get(username)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.state().map_err(UserPersistenceError::query)?;
        Ok(state
            .emails
            .get(email)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.state().map_err(UserPersistenceError::query)?;
        if state.users.contains_key(user.id()) {
            return Err(UserPersistenceError::query(format!(
                "user {} already exists",
                user.id()
            )));
        }
        if let Some(field) = state.user_conflict(user) {
            return Err(UserPersistenceError::conflict(field));
        }
        state.index_user(user);
        Ok(())
    }

    async fn apply_changes(
        &self,
        id: &UserId,
        changes: UserChanges,
    ) -> Result<User, UserPersistenceError> {
        let mut state = self.state().map_err(UserPersistenceError::query)?;
        let Some(previous) = state.users.get(id).cloned() else {
            return Err(UserPersistenceError::query(format!("user {id} does not exist")));
        };
        let updated = previous.clone().apply(changes);
        if let Some(field) = state.user_conflict(&updated) {
            return Err(UserPersistenceError::conflict(field));
        }
        state.usernames.remove(previous.username());
        state.emails.remove(previous.email());
        state.index_user(&updated);
        Ok(updated)
    }
}

#[async_trait]
impl SocialGraph for InMemoryStore {
    async fn follow(&self, edge: &FollowEdge) -> Result<FollowOutcome, SocialGraphError> {
        let mut state = self.state().map_err(SocialGraphError::query)?;
        let inserted = state.follows.insert((*edge.follower(), *edge.followed()));
        let outcome = if inserted {
            FollowOutcome::Inserted
        } else {
            FollowOutcome::AlreadyFollowing
        };
        debug!(follower = %edge.follower(), followed = %edge.followed(), ?outcome, "follow edge");
        Ok(outcome)
    }

    async fn unfollow(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<UnfollowOutcome, SocialGraphError> {
        if follower == followed {
            return Err(SocialGraphError::self_follow());
        }
        let mut state = self.state().map_err(SocialGraphError::query)?;
        let outcome = if state.follows.remove(&(*follower, *followed)) {
            UnfollowOutcome::Removed
        } else {
            UnfollowOutcome::NotFollowing
        };
        debug!(%follower, %followed, ?outcome, "unfollow edge");
        Ok(outcome)
    }

    async fn is_following(
        &self,
        follower: &UserId,
        followed: &UserId,
    ) -> Result<bool, SocialGraphError> {
        let state = self.state().map_err(SocialGraphError::query)?;
        Ok(state.follows.contains(&(*follower, *followed)))
    }
}

#[async_trait]
impl ArticleRepository for InMemoryStore {
    async fn insert(&self, article: &Article) -> Result<(), ArticleRepositoryError> {
        let mut state = self.state().map_err(ArticleRepositoryError::query)?;
        if state.articles.contains_key(&article.slug) {
            return Err(ArticleRepositoryError::duplicate_slug(article.slug.to_string()));
        }
        state.articles.insert(article.slug.clone(), article.clone());
        Ok(())
    }

    async fn find_by_slug(&self, slug: &Slug) -> Result<Option<Article>, ArticleRepositoryError> {
        let state = self.state().map_err(ArticleRepositoryError::query)?;
        Ok(state.articles.get(slug).cloned())
    }

    async fn list_tags(&self) -> Result<Vec<String>, ArticleRepositoryError> {
        let state = self.state().map_err(ArticleRepositoryError::query)?;
        let tags: BTreeSet<&String> = state
            .articles
            .values()
            .flat_map(|article| article.tags.iter())
            .collect();
        Ok(tags.into_iter().cloned().collect())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn insert(&self, comment: NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut state = self.state().map_err(CommentRepositoryError::query)?;
        state.last_comment_id += 1;
        let comment = Comment::from_new(CommentId::new(state.last_comment_id), comment);
        state.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn list_for_article(
        &self,
        article: &ArticleId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        let state = self.state().map_err(CommentRepositoryError::query)?;
        Ok(state
            .comments
            .values()
            .filter(|comment| comment.article == *article)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: CommentId) -> Result<Option<Comment>, CommentRepositoryError> {
        let state = self.state().map_err(CommentRepositoryError::query)?;
        Ok(state.comments.get(&id).cloned())
    }

    async fn delete(&self, id: CommentId) -> Result<bool, CommentRepositoryError> {
        let mut state = self.state().map_err(CommentRepositoryError::query)?;
        Ok(state.comments.remove(&id).is_some())
    }
}

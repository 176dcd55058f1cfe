//! Registration, login, and self-service account updates.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::pipeline::{Auth, Handler, Request};
use crate::domain::port_errors::{map_hasher_error, map_user_error};
use crate::domain::ports::{PasswordHasher, UserRepository};
use crate::domain::validation::{non_blank, parse_field};
use crate::domain::{
    Email, Error, Password, PasswordHash, RequestContext, RuleSet, User, UserChanges, UserId, UserView,
    Username, Violation, Violations,
};

/// Outcome of registration or login: the user's view plus the identifier a
/// transport stores as the caller's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Identifier to persist as the session credential.
    pub id: UserId,
    /// Account view returned to the client.
    pub user: UserView,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            user: UserView::from(user),
        }
    }
}

fn taken(field: &str) -> Violation {
    Violation::new(field, "taken", "has already been taken")
}

/// Record a violation when `username` belongs to someone other than `owner`.
async fn check_username_free(
    users: &dyn UserRepository,
    violations: &mut Violations,
    username: &Username,
    owner: Option<&UserId>,
) -> Result<(), Error> {
    let existing = users
        .find_by_username(username)
        .await
        .map_err(map_user_error)?;
    if existing.is_some_and(|user| Some(user.id()) != owner) {
        violations.push(taken("user.username"));
    }
    Ok(())
}

/// Record a violation when `email` belongs to someone other than `owner`.
async fn check_email_free(
    users: &dyn UserRepository,
    violations: &mut Violations,
    email: &Email,
    owner: Option<&UserId>,
) -> Result<(), Error> {
    let existing = users.find_by_email(email).await.map_err(map_user_error)?;
    if existing.is_some_and(|user| Some(user.id()) != owner) {
        violations.push(taken("user.email"));
    }
    Ok(())
}

/// Create an account.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Request for RegisterUser {
    type Response = AuthenticatedUser;
    const NAME: &'static str = "RegisterUser";
    const AUTH: Auth = Auth::Optional;
}

/// Well-formed, unused username and email; non-empty password.
pub struct RegisterUserRules {
    users: Arc<dyn UserRepository>,
}

impl RegisterUserRules {
    /// Check uniqueness against `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RuleSet<RegisterUser> for RegisterUserRules {
    async fn validate(
        &self,
        request: &RegisterUser,
        _ctx: &RequestContext,
    ) -> Result<Violations, Error> {
        let mut violations = Violations::default();
        let users = self.users.as_ref();
        if let Some(username) = violations.check("user.username", Username::new(&request.username))
        {
            check_username_free(users, &mut violations, &username, None).await?;
        }
        if let Some(email) = violations.check("user.email", Email::new(&request.email)) {
            check_email_free(users, &mut violations, &email, None).await?;
        }
        violations.check("user.password", Password::new(request.password.as_str()));
        Ok(violations)
    }
}

/// Hashes the password and stores the new account.
pub struct RegisterUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegisterUserHandler {
    /// Build a handler over the user store and password hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl Handler<RegisterUser> for RegisterUserHandler {
    async fn handle(
        &self,
        request: RegisterUser,
        ctx: &RequestContext,
    ) -> Result<AuthenticatedUser, Error> {
        let username = parse_field("user.username", Username::new(&request.username))?;
        let email = parse_field("user.email", Email::new(&request.email))?;
        let password = parse_field("user.password", Password::new(request.password))?;
        let hash = self.hasher.hash(&password).map_err(map_hasher_error)?;
        let user = User::new(UserId::random(), username, email, hash);

        ctx.ensure_active()?;
        self.users.insert(&user).await.map_err(map_user_error)?;
        debug!(user = %user.id(), "user registered");
        Ok(AuthenticatedUser::from(&user))
    }
}

/// Exchange an email and password for a session.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginUser")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Request for LoginUser {
    type Response = AuthenticatedUser;
    const NAME: &'static str = "LoginUser";
    const AUTH: Auth = Auth::Optional;
}

/// Email and password must both be present.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoginUserRules;

#[async_trait]
impl RuleSet<LoginUser> for LoginUserRules {
    async fn validate(
        &self,
        request: &LoginUser,
        _ctx: &RequestContext,
    ) -> Result<Violations, Error> {
        let mut violations = Violations::default();
        violations.check("user.email", non_blank(&request.email));
        violations.check("user.password", non_blank(&request.password));
        Ok(violations)
    }
}

/// Verifies credentials against the stored hash.
///
/// Unknown emails are checked against a decoy hash so a miss costs about as
/// much as a wrong password.
pub struct LoginUserHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    decoy: OnceLock<Option<PasswordHash>>,
}

impl LoginUserHandler {
    /// Build a handler over the user store and password hasher.
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            hasher,
            decoy: OnceLock::new(),
        }
    }

    /// Spend one verification on a hash no password matches.
    fn verify_decoy(&self, password: &Password) {
        let decoy = self.decoy.get_or_init(|| {
            Password::new("conduit-login-decoy")
                .ok()
                .and_then(|seed| self.hasher.hash(&seed).ok())
        });
        if let Some(hash) = decoy {
            if let Err(err) = self.hasher.verify(password, hash) {
                debug!(error = %err, "decoy verification failed");
            }
        }
    }
}

#[async_trait]
impl Handler<LoginUser> for LoginUserHandler {
    async fn handle(
        &self,
        request: LoginUser,
        _ctx: &RequestContext,
    ) -> Result<AuthenticatedUser, Error> {
        let rejected = || Error::unauthorized("invalid email or password");
        let email = Email::new(&request.email).map_err(|_| rejected())?;
        let password = Password::new(request.password).map_err(|_| rejected())?;
        let Some(user) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            self.verify_decoy(&password);
            warn!("login for unknown email");
            return Err(rejected());
        };
        let verified = self
            .hasher
            .verify(&password, user.password_hash())
            .map_err(map_hasher_error)?;
        if !verified {
            warn!(user = %user.id(), "login with wrong password");
            return Err(rejected());
        }
        debug!(user = %user.id(), "user logged in");
        Ok(AuthenticatedUser::from(&user))
    }
}

/// The caller's own account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GetCurrentUser;

impl Request for GetCurrentUser {
    type Response = UserView;
    const NAME: &'static str = "GetCurrentUser";
    const AUTH: Auth = Auth::Required;
}

/// Returns the caller's own account.
#[derive(Debug, Default, Clone, Copy)]
pub struct GetCurrentUserHandler;

#[async_trait]
impl Handler<GetCurrentUser> for GetCurrentUserHandler {
    async fn handle(&self, _request: GetCurrentUser, ctx: &RequestContext) -> Result<UserView, Error> {
        ctx.identity().require_user().map(UserView::from)
    }
}

/// Change the caller's own account. Absent fields stay as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

impl Request for UpdateUser {
    type Response = UserView;
    const NAME: &'static str = "UpdateUser";
    const AUTH: Auth = Auth::Required;
}

/// Present username and email must be well formed and not belong to any
/// other user. The caller's own row never counts as a clash.
pub struct UpdateUserRules {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserRules {
    /// Check uniqueness against `users`.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RuleSet<UpdateUser> for UpdateUserRules {
    async fn validate(
        &self,
        request: &UpdateUser,
        ctx: &RequestContext,
    ) -> Result<Violations, Error> {
        let mut violations = Violations::default();
        let owner = ctx.identity().user_id();
        let users = self.users.as_ref();
        let username = request
            .username
            .as_ref()
            .and_then(|raw| violations.check("user.username", Username::new(raw)));
        if let Some(username) = username {
            check_username_free(users, &mut violations, &username, owner).await?;
        }
        let email = request
            .email
            .as_ref()
            .and_then(|raw| violations.check("user.email", Email::new(raw)));
        if let Some(email) = email {
            check_email_free(users, &mut violations, &email, owner).await?;
        }
        Ok(violations)
    }
}

/// Merges present fields into the caller's stored account.
pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    /// Build a handler over the user store.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<UpdateUser> for UpdateUserHandler {
    async fn handle(&self, request: UpdateUser, ctx: &RequestContext) -> Result<UserView, Error> {
        let current = ctx.identity().require_user()?;
        let changes = UserChanges {
            username: request
                .username
                .map(|raw| parse_field("user.username", Username::new(raw)))
                .transpose()?,
            email: request
                .email
                .map(|raw| parse_field("user.email", Email::new(raw)))
                .transpose()?,
            bio: request.bio,
            image: request.image,
        };

        ctx.ensure_active()?;
        let updated = self
            .users
            .apply_changes(current.id(), changes)
            .await
            .map_err(map_user_error)?;
        debug!(user = %updated.id(), "user updated");
        Ok(UserView::from(&updated))
    }
}

#[cfg(test)]
mod tests;

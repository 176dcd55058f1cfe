//! Builders shared by the request handler unit tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    Email, IdentityContext, PasswordHash, RequestContext, User, UserId, Username,
};

/// A user whose e-mail is derived from `name`.
pub(crate) fn user(name: &str) -> User {
    let local_part = name.to_lowercase().replace(' ', ".");
    User::new(
        UserId::random(),
        Username::new(name).expect("valid username"),
        Email::new(format!("{local_part}@example.com")).expect("valid email"),
        PasswordHash::new("hash"),
    )
}

/// A live context for `user`.
pub(crate) fn authenticated(user: User) -> RequestContext {
    RequestContext::new(IdentityContext::authenticated(user), CancellationToken::new())
}

/// A context for `user` whose token has already fired.
pub(crate) fn cancelled(user: User) -> RequestContext {
    let token = CancellationToken::new();
    token.cancel();
    RequestContext::new(IdentityContext::authenticated(user), token)
}

pub(crate) struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> FixtureClock {
    FixtureClock {
        utc_now: Utc
            .with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
            .single()
            .expect("valid fixture timestamp"),
    }
}

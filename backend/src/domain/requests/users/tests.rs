//! Tests for account requests.

use super::*;
use crate::domain::ports::{MockPasswordHasher, MockUserRepository, UserPersistenceError};
use crate::domain::requests::test_support::{authenticated, cancelled, user};
use crate::domain::{ErrorCode, PasswordHash};
use crate::outbound::memory::InMemoryStore;
use rstest::{fixture, rstest};

#[fixture]
fn john() -> User {
    user("John Doe")
}

#[fixture]
fn jane() -> User {
    user("Jane Doe")
}

/// Repository answering lookups from a fixed set of users.
fn directory(known: Vec<User>) -> MockUserRepository {
    let by_name = known.clone();
    let by_email = known;
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().returning(move |name| {
        Ok(by_name.iter().find(|u| u.username() == name).cloned())
    });
    users
        .expect_find_by_email()
        .returning(move |email| Ok(by_email.iter().find(|u| u.email() == email).cloned()));
    users
}

fn fields(violations: &Violations) -> Vec<&str> {
    violations.iter().map(Violation::field).collect()
}

#[rstest]
#[tokio::test]
async fn register_rules_report_every_clash(john: User) {
    let rules = RegisterUserRules::new(Arc::new(directory(vec![john])));

    let violations = rules
        .validate(
            &RegisterUser {
                username: "John Doe".to_owned(),
                email: "JOHN.DOE@example.com".to_owned(),
                password: String::new(),
            },
            &RequestContext::guest(),
        )
        .await
        .expect("rules run");

    assert_eq!(
        fields(&violations),
        vec!["user.username", "user.email", "user.password"]
    );
}

#[rstest]
#[tokio::test]
async fn register_rules_skip_lookup_for_malformed_email() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_username().returning(|_| Ok(None));
    // No find_by_email expectation: a lookup would panic.
    let rules = RegisterUserRules::new(Arc::new(users));

    let violations = rules
        .validate(
            &RegisterUser {
                username: "New User".to_owned(),
                email: "not-an-email".to_owned(),
                password: "secret".to_owned(),
            },
            &RequestContext::guest(),
        )
        .await
        .expect("rules run");

    assert_eq!(fields(&violations), vec!["user.email"]);
}

#[rstest]
#[tokio::test]
async fn register_hashes_and_inserts(john: User) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user| user.password_hash().as_str() == "hashed:secret")
        .times(1)
        .returning(|_| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("hashed:secret")));
    let handler = RegisterUserHandler::new(Arc::new(users), Arc::new(hasher));

    let registered = handler
        .handle(
            RegisterUser {
                username: "Jane Doe".to_owned(),
                email: "jane.doe@example.com".to_owned(),
                password: "secret".to_owned(),
            },
            &authenticated(john),
        )
        .await
        .expect("registration succeeds");

    assert_eq!(registered.user.username, "Jane Doe");
    assert_eq!(registered.user.email, "jane.doe@example.com");
}

#[rstest]
#[tokio::test]
async fn register_maps_insert_conflict_to_field(john: User) {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .returning(|_| Err(UserPersistenceError::conflict("email")));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().returning(|_| Ok(PasswordHash::new("h")));
    let handler = RegisterUserHandler::new(Arc::new(users), Arc::new(hasher));

    let err = handler
        .handle(
            RegisterUser {
                username: "Jane Doe".to_owned(),
                email: "jane.doe@example.com".to_owned(),
                password: "secret".to_owned(),
            },
            &authenticated(john),
        )
        .await
        .expect_err("lost the uniqueness race");

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(err.violated_fields(), vec!["user.email"]);
}

#[rstest]
#[case::unknown_email("nobody@example.com")]
#[case::wrong_password("john.doe@example.com")]
#[case::malformed_email("john.doe")]
#[tokio::test]
async fn login_rejects_bad_credentials(john: User, #[case] email: &str) {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .returning(|_| Ok(PasswordHash::new("decoy")));
    hasher.expect_verify().returning(|_, _| Ok(false));
    let handler = LoginUserHandler::new(Arc::new(directory(vec![john])), Arc::new(hasher));

    let err = handler
        .handle(
            LoginUser {
                email: email.to_owned(),
                password: "wrong".to_owned(),
            },
            &RequestContext::guest(),
        )
        .await
        .expect_err("login fails");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn unknown_emails_still_pay_for_a_verification(john: User) {
    let mut hasher = MockPasswordHasher::new();
    // The decoy is hashed once and reused.
    hasher
        .expect_hash()
        .times(1)
        .returning(|_| Ok(PasswordHash::new("decoy")));
    hasher
        .expect_verify()
        .withf(|_, hash| hash.as_str() == "decoy")
        .times(2)
        .returning(|_, _| Ok(false));
    let handler = LoginUserHandler::new(Arc::new(directory(vec![john])), Arc::new(hasher));

    for _ in 0..2 {
        let err = handler
            .handle(
                LoginUser {
                    email: "nobody@example.com".to_owned(),
                    password: "secret".to_owned(),
                },
                &RequestContext::guest(),
            )
            .await
            .expect_err("unknown email");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}

#[rstest]
#[tokio::test]
async fn login_accepts_matching_password(john: User) {
    let expected_id = *john.id();
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().returning(|_, _| Ok(true));
    let handler = LoginUserHandler::new(Arc::new(directory(vec![john])), Arc::new(hasher));

    let session = handler
        .handle(
            LoginUser {
                email: " John.Doe@Example.com ".to_owned(),
                password: "secret".to_owned(),
            },
            &RequestContext::guest(),
        )
        .await
        .expect("login succeeds");

    assert_eq!(session.id, expected_id);
    assert_eq!(session.user.username, "John Doe");
}

#[rstest]
#[tokio::test]
async fn login_rules_require_both_fields() {
    let violations = LoginUserRules
        .validate(
            &LoginUser {
                email: " ".to_owned(),
                password: String::new(),
            },
            &RequestContext::guest(),
        )
        .await
        .expect("rules run");

    assert_eq!(fields(&violations), vec!["user.email", "user.password"]);
}

#[rstest]
#[tokio::test]
async fn update_rules_ignore_callers_own_row(john: User, jane: User) {
    let rules = UpdateUserRules::new(Arc::new(directory(vec![john.clone(), jane])));

    let violations = rules
        .validate(
            &UpdateUser {
                username: Some("John Doe".to_owned()),
                email: Some("john.doe@example.com".to_owned()),
                ..UpdateUser::default()
            },
            &authenticated(john),
        )
        .await
        .expect("rules run");

    assert!(violations.is_empty());
}

#[rstest]
#[tokio::test]
async fn update_rules_flag_another_users_email(john: User, jane: User) {
    let rules = UpdateUserRules::new(Arc::new(directory(vec![john.clone(), jane])));

    let violations = rules
        .validate(
            &UpdateUser {
                email: Some("jane.doe@example.com".to_owned()),
                ..UpdateUser::default()
            },
            &authenticated(john),
        )
        .await
        .expect("rules run");

    assert_eq!(fields(&violations), vec!["user.email"]);
}

#[rstest]
#[tokio::test]
async fn update_applies_only_present_fields(john: User) {
    let stored = john.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_apply_changes()
        .withf(move |id, _| id == stored.id())
        .times(1)
        .returning(move |_, changes| Ok(user("John Doe").apply(changes)));
    let handler = UpdateUserHandler::new(Arc::new(users));

    let view = handler
        .handle(
            UpdateUser {
                email: Some("jane.doe@example.com".to_owned()),
                bio: Some("My Bio".to_owned()),
                ..UpdateUser::default()
            },
            &authenticated(john),
        )
        .await
        .expect("update succeeds");

    assert_eq!(view.username, "John Doe");
    assert_eq!(view.email, "jane.doe@example.com");
    assert_eq!(view.bio.as_deref(), Some("My Bio"));
    assert_eq!(view.image, None);
}

#[rstest]
#[tokio::test]
async fn update_never_writes_after_cancellation(john: User) {
    // No update expectation: a write would panic.
    let handler = UpdateUserHandler::new(Arc::new(MockUserRepository::new()));

    let err = handler
        .handle(
            UpdateUser {
                bio: Some("My Bio".to_owned()),
                ..UpdateUser::default()
            },
            &cancelled(john),
        )
        .await
        .expect_err("cancelled");

    assert_eq!(err.code(), ErrorCode::Cancelled);
}

#[rstest]
#[tokio::test]
async fn partial_updates_from_one_snapshot_keep_each_others_fields(john: User) {
    let store = Arc::new(InMemoryStore::new());
    UserRepository::insert(store.as_ref(), &john)
        .await
        .expect("insert");
    let handler = UpdateUserHandler::new(store.clone());
    // Both requests were authenticated against the same pre-update row.
    let ctx = authenticated(john.clone());

    handler
        .handle(
            UpdateUser {
                bio: Some("My Bio".to_owned()),
                ..UpdateUser::default()
            },
            &ctx,
        )
        .await
        .expect("bio update succeeds");
    let view = handler
        .handle(
            UpdateUser {
                image: Some("https://i.pravatar.cc/300".to_owned()),
                ..UpdateUser::default()
            },
            &ctx,
        )
        .await
        .expect("image update succeeds");

    assert_eq!(view.bio.as_deref(), Some("My Bio"));
    let stored = UserRepository::find_by_id(store.as_ref(), john.id())
        .await
        .expect("lookup succeeds")
        .expect("user stored");
    assert_eq!(stored.bio(), Some("My Bio"));
    assert_eq!(stored.image(), Some("https://i.pravatar.cc/300"));
}

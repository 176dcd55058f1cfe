//! End-to-end behaviour of the dispatch pipeline over the in-memory store.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use conduit::domain::ports::{CommentRepository, SocialGraph};
use conduit::domain::{
    Caller, CommentId, CreateArticle, CreateComment, Credential, DeleteComment, Error, ErrorCode,
    FollowProfile, GetArticle, GetCurrentUser, GetProfile, ListComments, ListTags, Mediator,
    RegisterUser, UpdateUser, UserId,
};
use conduit::outbound::crypto::Argon2PasswordHasher;
use conduit::outbound::in_memory_ports;
use conduit::outbound::memory::InMemoryStore;
use mockable::Clock;
use rstest::{fixture, rstest};
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;

/// Clock that moves forward by `step` on every reading.
struct SteppingClock {
    now: Mutex<DateTime<Utc>>,
    step: Duration,
}

impl SteppingClock {
    fn new(step: Duration) -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 2, 24, 10, 30, 0)
            .single()
            .expect("valid fixture timestamp");
        Self {
            now: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut now = self.now.lock().expect("clock lock");
        let reading = *now;
        *now += self.step;
        reading
    }
}

struct World {
    store: Arc<InMemoryStore>,
    mediator: Mediator,
}

impl World {
    fn with_clock(clock: SteppingClock) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let hasher = Argon2PasswordHasher::new(8, 1, 1).expect("test argon2 params");
        let ports = in_memory_ports(store.clone(), Arc::new(hasher), Arc::new(clock));
        Self {
            store,
            mediator: Mediator::new(ports),
        }
    }

    /// Register `name` and return a caller signed in as them.
    async fn register(&self, name: &str) -> (UserId, Caller) {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let registered = self
            .mediator
            .send(
                RegisterUser {
                    username: name.to_owned(),
                    email,
                    password: "password".to_owned(),
                },
                Caller::guest(),
            )
            .await
            .expect("registration succeeds");
        let caller = Caller::with_credential(Credential::new(registered.id.to_string()));
        (registered.id, caller)
    }

    async fn publish(&self, author: &Caller, title: &str, tags: &[&str]) -> String {
        self.mediator
            .send(
                CreateArticle {
                    title: title.to_owned(),
                    description: "Description".to_owned(),
                    body: "Body".to_owned(),
                    tags: tags.iter().map(|tag| (*tag).to_owned()).collect(),
                },
                author.clone(),
            )
            .await
            .expect("article published")
            .slug
    }

    async fn comment(&self, author: &Caller, slug: &str, body: &str) -> u64 {
        self.mediator
            .send(
                CreateComment {
                    slug: slug.to_owned(),
                    body: body.to_owned(),
                },
                author.clone(),
            )
            .await
            .expect("comment created")
            .id
            .get()
    }
}

#[fixture]
fn world() -> World {
    World::with_clock(SteppingClock::new(Duration::seconds(1)))
}

fn cancelled(caller: Caller) -> Caller {
    let token = CancellationToken::new();
    token.cancel();
    caller.cancelled_by(token)
}

fn code(result: Result<impl std::fmt::Debug, Error>) -> ErrorCode {
    result.expect_err("request should fail").code()
}

#[rstest]
#[tokio::test]
async fn john_follows_then_unfollows_jane(world: World) {
    let (john_id, john) = world.register("John Doe").await;
    let (jane_id, _jane) = world.register("Jane Doe").await;

    let followed = world
        .mediator
        .send(
            FollowProfile {
                username: "Jane Doe".to_owned(),
                follow: true,
            },
            john.clone(),
        )
        .await
        .expect("follow succeeds");
    assert!(followed.following);
    assert_eq!(world.store.is_following(&john_id, &jane_id).await, Ok(true));
    assert_eq!(world.store.is_following(&jane_id, &john_id).await, Ok(false));

    let unfollowed = world
        .mediator
        .send(
            FollowProfile {
                username: "Jane Doe".to_owned(),
                follow: false,
            },
            john,
        )
        .await
        .expect("unfollow succeeds");
    assert!(!unfollowed.following);
    assert_eq!(world.store.is_following(&john_id, &jane_id).await, Ok(false));
}

#[rstest]
#[tokio::test]
async fn following_yourself_is_invalid(world: World) {
    let (_, john) = world.register("John Doe").await;

    for follow in [true, false] {
        let result = world
            .mediator
            .send(
                FollowProfile {
                    username: "John Doe".to_owned(),
                    follow,
                },
                john.clone(),
            )
            .await;
        assert_eq!(code(result), ErrorCode::InvalidOperation);
    }
}

#[rstest]
#[tokio::test]
async fn unfollowing_a_stranger_is_a_no_op(world: World) {
    let (_, john) = world.register("John Doe").await;
    world.register("Jane Doe").await;

    let profile = world
        .mediator
        .send(
            FollowProfile {
                username: "Jane Doe".to_owned(),
                follow: false,
            },
            john,
        )
        .await
        .expect("no-op unfollow succeeds");

    assert!(!profile.following);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_follows_leave_exactly_one_edge(world: World) {
    const ATTEMPTS: usize = 8;
    let (john_id, john) = world.register("John Doe").await;
    let (jane_id, _) = world.register("Jane Doe").await;
    let world = Arc::new(world);
    let start = Arc::new(Barrier::new(ATTEMPTS));

    let attempts = (0..ATTEMPTS).map(|_| {
        let world = Arc::clone(&world);
        let start = Arc::clone(&start);
        let john = john.clone();
        tokio::spawn(async move {
            start.wait().await;
            world
                .mediator
                .send(
                    FollowProfile {
                        username: "Jane Doe".to_owned(),
                        follow: true,
                    },
                    john,
                )
                .await
        })
    });
    for outcome in futures::future::join_all(attempts).await {
        let profile = outcome.expect("task joins").expect("follow succeeds");
        assert!(profile.following);
    }
    assert_eq!(world.store.is_following(&john_id, &jane_id).await, Ok(true));

    // A single unfollow clears the relation only if one edge was stored.
    world
        .mediator
        .send(
            FollowProfile {
                username: "Jane Doe".to_owned(),
                follow: false,
            },
            john,
        )
        .await
        .expect("unfollow succeeds");
    assert_eq!(world.store.is_following(&john_id, &jane_id).await, Ok(false));
}

#[rstest]
#[tokio::test]
async fn guests_never_see_following(world: World) {
    let (_, john) = world.register("John Doe").await;
    world.register("Jane Doe").await;
    world
        .mediator
        .send(
            FollowProfile {
                username: "Jane Doe".to_owned(),
                follow: true,
            },
            john.clone(),
        )
        .await
        .expect("follow succeeds");

    let as_guest = world
        .mediator
        .send(
            GetProfile {
                username: "Jane Doe".to_owned(),
            },
            Caller::guest(),
        )
        .await
        .expect("profile visible to guests");
    let as_john = world
        .mediator
        .send(
            GetProfile {
                username: "Jane Doe".to_owned(),
            },
            john,
        )
        .await
        .expect("profile visible to john");

    assert!(!as_guest.following);
    assert!(as_john.following);
}

#[rstest]
#[case::get_current_user(true)]
#[case::update_user(false)]
#[tokio::test]
async fn guests_are_rejected_before_validation(world: World, #[case] current: bool) {
    let result = if current {
        world
            .mediator
            .send(GetCurrentUser, Caller::guest())
            .await
            .map(|_| ())
    } else {
        world
            .mediator
            .send(
                UpdateUser {
                    email: Some("not-an-email".to_owned()),
                    ..UpdateUser::default()
                },
                Caller::guest(),
            )
            .await
            .map(|_| ())
    };

    assert_eq!(code(result), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn guests_cannot_comment_even_with_an_empty_body(world: World) {
    let (_, john) = world.register("John Doe").await;
    let slug = world.publish(&john, "Test Title", &[]).await;

    let result = world
        .mediator
        .send(
            CreateComment {
                slug,
                body: "   ".to_owned(),
            },
            Caller::guest(),
        )
        .await;

    assert_eq!(code(result), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn stale_credentials_resolve_to_guests(world: World) {
    let stranger = Caller::with_credential(Credential::new(UserId::random().to_string()));
    let malformed = Caller::with_credential(Credential::new("not-a-uuid"));

    for caller in [stranger, malformed] {
        let result = world.mediator.send(GetCurrentUser, caller).await;
        assert_eq!(code(result), ErrorCode::Unauthorized);
    }
}

#[rstest]
#[tokio::test]
async fn comments_list_newest_first(world: World) {
    let (_, john) = world.register("John Doe").await;
    let slug = world.publish(&john, "Test Title", &[]).await;

    let mut created = Vec::new();
    for body in ["C1", "C2", "C3", "C4", "C5"] {
        created.push(world.comment(&john, &slug, body).await);
    }

    let listed = world
        .mediator
        .send(ListComments { slug }, Caller::guest())
        .await
        .expect("comments listed");

    let bodies: Vec<_> = listed.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["C5", "C4", "C3", "C2", "C1"]);
    created.reverse();
    assert_eq!(
        listed.iter().map(|c| c.id.get()).collect::<Vec<_>>(),
        created
    );
}

#[tokio::test]
async fn comments_at_the_same_instant_fall_back_to_id_order() {
    let world = World::with_clock(SteppingClock::new(Duration::zero()));
    let (_, john) = world.register("John Doe").await;
    let slug = world.publish(&john, "Test Title", &[]).await;
    for body in ["first", "second", "third"] {
        world.comment(&john, &slug, body).await;
    }

    let listed = world
        .mediator
        .send(ListComments { slug }, Caller::guest())
        .await
        .expect("comments listed");

    let bodies: Vec<_> = listed.iter().map(|c| c.body.as_str()).collect();
    assert_eq!(bodies, vec!["third", "second", "first"]);
}

#[rstest]
#[tokio::test]
async fn comments_on_a_quiet_article_are_empty(world: World) {
    let (_, john) = world.register("John Doe").await;
    let slug = world.publish(&john, "Test Title", &[]).await;

    let listed = world
        .mediator
        .send(ListComments { slug }, Caller::guest())
        .await
        .expect("existing article lists comments");
    assert!(listed.is_empty());

    let missing = world
        .mediator
        .send(
            ListComments {
                slug: "no-such-article".to_owned(),
            },
            Caller::guest(),
        )
        .await;
    assert_eq!(code(missing), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn only_the_author_deletes_a_comment(world: World) {
    let (_, john) = world.register("John Doe").await;
    let (_, jane) = world.register("Jane Doe").await;
    let slug = world.publish(&john, "Test Title", &[]).await;
    let comment_id = world.comment(&john, &slug, "mine").await;

    let by_jane = world
        .mediator
        .send(
            DeleteComment {
                slug: slug.clone(),
                comment_id,
            },
            jane,
        )
        .await;
    assert_eq!(code(by_jane), ErrorCode::Forbidden);

    world
        .mediator
        .send(
            DeleteComment {
                slug: slug.clone(),
                comment_id,
            },
            john,
        )
        .await
        .expect("author deletes");

    let article = world
        .mediator
        .send(GetArticle { slug }, Caller::guest())
        .await
        .expect("article exists");
    assert_eq!(article.title, "Test Title");
    assert_eq!(
        CommentRepository::find_by_id(world.store.as_ref(), CommentId::new(comment_id)).await,
        Ok(None)
    );
}

#[rstest]
#[tokio::test]
async fn email_uniqueness_ignores_the_callers_own_row(world: World) {
    let (_, john) = world.register("John Doe").await;
    world.register("Jane Doe").await;

    let unchanged = world
        .mediator
        .send(
            UpdateUser {
                email: Some("john.doe@example.com".to_owned()),
                bio: Some("Still John".to_owned()),
                ..UpdateUser::default()
            },
            john.clone(),
        )
        .await
        .expect("own email passes");
    assert_eq!(unchanged.bio.as_deref(), Some("Still John"));

    let clash = world
        .mediator
        .send(
            UpdateUser {
                email: Some("jane.doe@example.com".to_owned()),
                ..UpdateUser::default()
            },
            john,
        )
        .await
        .expect_err("jane's email is taken");
    assert_eq!(clash.code(), ErrorCode::ValidationFailed);
    assert_eq!(clash.violated_fields(), vec!["user.email"]);
}

#[rstest]
#[tokio::test]
async fn duplicate_registrations_report_both_fields(world: World) {
    world.register("John Doe").await;

    let err = world
        .mediator
        .send(
            RegisterUser {
                username: "John Doe".to_owned(),
                email: "JOHN.DOE@example.com ".to_owned(),
                password: "password".to_owned(),
            },
            Caller::guest(),
        )
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(err.violated_fields(), vec!["user.username", "user.email"]);
}

#[rstest]
#[tokio::test]
async fn duplicate_titles_are_rejected(world: World) {
    let (_, john) = world.register("John Doe").await;
    world.publish(&john, "Test Title", &[]).await;

    let err = world
        .mediator
        .send(
            CreateArticle {
                title: "test title".to_owned(),
                description: "Description".to_owned(),
                body: "Body".to_owned(),
                tags: Vec::new(),
            },
            john,
        )
        .await
        .expect_err("slug already used");

    assert_eq!(err.code(), ErrorCode::ValidationFailed);
    assert_eq!(err.violated_fields(), vec!["article.title"]);
}

#[rstest]
#[tokio::test]
async fn tags_are_distinct_and_sorted(world: World) {
    let (_, john) = world.register("John Doe").await;
    world.publish(&john, "First", &["Tag3", "Tag1"]).await;
    world.publish(&john, "Second", &["Tag2", "Tag1"]).await;

    let tags = world
        .mediator
        .send(ListTags, Caller::guest())
        .await
        .expect("tags listed");

    assert_eq!(tags, vec!["Tag1", "Tag2", "Tag3"]);
}

#[rstest]
#[tokio::test]
async fn cancelled_callers_never_mutate(world: World) {
    let (john_id, john) = world.register("John Doe").await;
    let (jane_id, _) = world.register("Jane Doe").await;
    let slug = world.publish(&john, "Test Title", &[]).await;

    let follow = world
        .mediator
        .send(
            FollowProfile {
                username: "Jane Doe".to_owned(),
                follow: true,
            },
            cancelled(john.clone()),
        )
        .await;
    let comment = world
        .mediator
        .send(
            CreateComment {
                slug: slug.clone(),
                body: "never stored".to_owned(),
            },
            cancelled(john),
        )
        .await;

    assert_eq!(code(follow), ErrorCode::Cancelled);
    assert_eq!(code(comment), ErrorCode::Cancelled);
    assert_eq!(world.store.is_following(&john_id, &jane_id).await, Ok(false));
    let comments = world
        .mediator
        .send(ListComments { slug }, Caller::guest())
        .await
        .expect("comments listed");
    assert!(comments.is_empty());
}

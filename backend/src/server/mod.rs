//! Server construction and middleware wiring.

mod config;
mod session_key;

pub use config::{ServerConfig, ServerSettings};
pub use session_key::{BuildMode, load_session_key};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

use conduit::Trace;
use conduit::domain::Mediator;
use conduit::inbound::http::configure;
use conduit::inbound::http::state::HttpState;
use conduit::outbound::crypto::Argon2PasswordHasher;
use conduit::outbound::in_memory_ports;
use conduit::outbound::memory::InMemoryStore;

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api").wrap(session).configure(configure);

    App::new().app_data(http_state).wrap(Trace).service(api)
}

fn build_http_state() -> web::Data<HttpState> {
    let ports = in_memory_ports(
        Arc::new(InMemoryStore::new()),
        Arc::new(Argon2PasswordHasher::default()),
        Arc::new(DefaultClock),
    );
    web::Data::new(HttpState::new(Mediator::new(ports)))
}

/// Construct an Actix HTTP server over a fresh in-memory store.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = build_http_state();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    Ok(server)
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;

use crate::domain::ports::{
    MockBookingCommand, MockBookingQuery, MockCatalogCommand, MockCatalogQuery,
};
use crate::domain::{DEVELOPMENT_ADMIN_ID, DEVELOPMENT_GUEST_ID, ProfileService, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::test_support::accounts::{FixtureIdentityProvider, FixtureLoginService};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Use-case mocks for handler tests; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub catalog: MockCatalogCommand,
    pub catalog_query: MockCatalogQuery,
    pub bookings: MockBookingCommand,
    pub bookings_query: MockBookingQuery,
}

impl MockPorts {
    /// Assemble HTTP state with fixture login and identity.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            profiles: Arc::new(ProfileService::new(Arc::new(FixtureIdentityProvider))),
            catalog: Arc::new(self.catalog),
            catalog_query: Arc::new(self.catalog_query),
            bookings: Arc::new(self.bookings),
            bookings_query: Arc::new(self.bookings_query),
        })
    }
}

/// The development admin account id.
pub fn admin_id() -> UserId {
    UserId::new(DEVELOPMENT_ADMIN_ID).expect("development admin id")
}

/// The development guest account id.
pub fn guest_id() -> UserId {
    UserId::new(DEVELOPMENT_GUEST_ID).expect("development guest id")
}

/// Log in through `/api/v1/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({"email": email, "password": "password"}))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

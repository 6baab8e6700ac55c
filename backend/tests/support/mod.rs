//! Shared wiring for HTTP integration tests.
//!
//! Builds the production route table over in-memory repositories and the
//! real argon2/JWT adapters, with a clock pinned to a chosen instant.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use backend::domain::{AuthService, ContactsService};
use backend::inbound::http::health::HealthState;
use backend::inbound::http::routes::configure_routes;
use backend::inbound::http::state::HttpState;
use backend::outbound::security::{Argon2PasswordHasher, JwtConfig, JwtTokenCodec};
use backend::test_support::{FixedClock, InMemoryContactRepository, InMemoryUserRepository};
use backend::{RateLimit, RateLimitConfig, Trace};

pub const JWT_SECRET: &str = "integration-test-secret";

/// Everything an app instance needs, kept together so tests can share state
/// between several `init_service` calls.
#[derive(Clone)]
pub struct TestWorld {
    pub http_state: web::Data<HttpState>,
    pub health_state: web::Data<HealthState>,
    pub rate_limit: RateLimit,
}

pub fn instant(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn world_at(now: DateTime<Utc>, rate_limit: RateLimitConfig) -> TestWorld {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));
    let contacts = Arc::new(ContactsService::new(
        Arc::new(InMemoryContactRepository::new()),
        Arc::clone(&clock),
    ));
    let auth = Arc::new(AuthService::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(Argon2PasswordHasher),
        Arc::new(JwtTokenCodec::new(&JwtConfig {
            secret: JWT_SECRET.to_owned(),
            ttl_seconds: 3600,
        })),
        clock,
    ));
    TestWorld {
        http_state: web::Data::new(HttpState::new(contacts.clone(), contacts, auth)),
        health_state: web::Data::new(HealthState::new()),
        rate_limit: RateLimit::new(rate_limit),
    }
}

/// A world whose rate limit will not interfere with functional tests.
pub fn unlimited_world_at(now: DateTime<Utc>) -> TestWorld {
    world_at(
        now,
        RateLimitConfig::new(10_000, 60).expect("rate limit config"),
    )
}

pub fn test_app(
    world: &TestWorld,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let rate_limit = world.rate_limit.clone();
    App::new()
        .app_data(world.http_state.clone())
        .app_data(world.health_state.clone())
        .wrap(Trace)
        .configure(|cfg| configure_routes(cfg, rate_limit))
}

/// Register an account and return a bearer header value for it.
pub async fn signup_and_login(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
    email: &str,
) -> String {
    let password = "correct horse battery";
    let signup = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({"username": username, "email": email, "password": password}))
        .to_request();
    let res = test::call_service(app, signup).await;
    assert_eq!(res.status(), StatusCode::CREATED, "signup for {email}");

    let login = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({"email": email, "password": password}))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, login).await;
    let token = body["access_token"].as_str().expect("access token");
    format!("Bearer {token}")
}

/// Create a contact through the API and return its JSON.
pub async fn create_contact(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    bearer: &str,
    payload: Value,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/api/contacts")
        .insert_header((AUTHORIZATION, bearer.to_owned()))
        .set_json(payload)
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

pub fn contact_payload(first: &str, last: &str, birthday: Option<&str>) -> Value {
    json!({
        "first_name": first,
        "last_name": last,
        "email": format!("{}@example.com", first.to_lowercase()),
        "phone_number": "555-0100",
        "birthday": birthday,
    })
}

//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use crate::domain::ports::FixedCredentialVerifier;
use crate::domain::{AdminTokenService, AppointmentService, TokenSecret};
use crate::outbound::persistence::InMemoryAppointmentRepository;

use super::admin_session::TOKEN_COOKIE;
use super::configure_api;
use super::state::{HttpState, HttpStatePorts};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Clock frozen at a single instant.
pub struct FrozenClock(pub DateTime<Utc>);

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Instant every test app's clock is frozen at.
pub fn frozen_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

/// State backed by an empty in-memory store and a fixed admin credential.
pub fn test_state() -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(FrozenClock(frozen_now()));
    let service = Arc::new(AppointmentService::new(
        Arc::new(InMemoryAppointmentRepository::new()),
        Arc::clone(&clock),
    ));
    let gate = Arc::new(AdminTokenService::new(
        Arc::new(FixedCredentialVerifier::new(ADMIN_USERNAME, ADMIN_PASSWORD)),
        TokenSecret::generate(),
        clock,
    ));
    HttpState::from(HttpStatePorts {
        appointments: service.clone(),
        appointments_query: service,
        admin_gate: gate,
    })
}

/// App exposing the full `/api` surface over [`test_state`].
pub fn test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(test_state()))
        .service(web::scope("/api").configure(configure_api))
}

/// Valid booking payload scheduled at [`frozen_now`].
pub fn booking_payload() -> Value {
    json!({
        "patientName": "Ana Pop",
        "email": "ana@example.com",
        "phone": "0712345678",
        "scheduledAt": frozen_now().to_rfc3339(),
        "service": "Dental cleaning",
        "message": "First visit"
    })
}

/// Log in with the fixture credentials and return the token cookie.
pub async fn login_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = actix_test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .expect("token cookie")
        .into_owned()
}

/// Create an appointment through the public endpoint and return its body.
pub async fn create_booking<S>(app: &S, payload: Value) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = actix_test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(payload)
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    actix_test::read_body_json(res).await
}

//! End-to-end booking and administration flow over the in-memory store.
//!
//! Wires the real services, token gate, and HTTP adapter the way the server
//! does when no database is configured, then drives a full patient and
//! operator journey through the public routes.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use clinic_backend::Trace;
use clinic_backend::domain::ports::FixedCredentialVerifier;
use clinic_backend::domain::{AdminTokenService, AppointmentService, TokenSecret};
use clinic_backend::inbound::http::admin_session::TOKEN_COOKIE;
use clinic_backend::inbound::http::configure_api;
use clinic_backend::inbound::http::state::{CookiePolicy, HttpState, HttpStatePorts};
use clinic_backend::outbound::persistence::InMemoryAppointmentRepository;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const USERNAME: &str = "reception";
const PASSWORD: &str = "front-desk-password";

#[fixture]
fn state() -> HttpState {
    let service = Arc::new(AppointmentService::new(
        Arc::new(InMemoryAppointmentRepository::new()),
        Arc::new(DefaultClock),
    ));
    let gate = Arc::new(AdminTokenService::new(
        Arc::new(FixedCredentialVerifier::new(USERNAME, PASSWORD)),
        TokenSecret::generate(),
        Arc::new(DefaultClock),
    ));
    HttpState::new(
        HttpStatePorts {
            appointments: service.clone(),
            appointments_query: service,
            admin_gate: gate,
        },
        CookiePolicy::default(),
    )
}

async fn init(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api").configure(configure_api)),
    )
    .await
}

async fn book<S>(app: &S, name: &str, scheduled_at: &str) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = actix_test::TestRequest::post()
        .uri("/api/appointments")
        .set_json(json!({
            "patientName": name,
            "email": "patient@example.com",
            "phone": "+40 712 345 678",
            "scheduledAt": scheduled_at,
            "service": "General consultation",
            "message": "   "
        }))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    actix_test::read_body_json(res).await
}

async fn login<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = actix_test::TestRequest::post()
        .uri("/api/admin/login")
        .set_json(json!({ "username": USERNAME, "password": PASSWORD }))
        .to_request();
    let res = actix_test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .expect("token cookie")
        .into_owned()
}

#[rstest]
#[actix_web::test]
async fn patient_books_and_operator_manages(state: HttpState) {
    let app = init(state).await;

    let early = book(&app, "Ana Pop", "2024-05-01T08:00:00Z").await;
    let late = book(&app, "Ion Ionescu", "2024-05-02T20:00:00+03:00").await;
    assert_eq!(early["status"], "pending");
    assert!(early.get("message").is_none(), "blank message stored as absent");
    assert_eq!(late["scheduledAt"], "2024-05-02T17:00:00Z");

    let cookie = login(&app).await;

    let listed: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/appointments")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let names: Vec<&str> = listed
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|record| record["patientName"].as_str())
        .collect();
    assert_eq!(names, ["Ion Ionescu", "Ana Pop"]);

    let early_id = early["id"].as_str().expect("id");
    let confirmed: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/appointments/{early_id}/status"))
            .cookie(cookie.clone())
            .set_json(json!({ "status": "confirmed" }))
            .to_request(),
    )
    .await;
    assert_eq!(confirmed["status"], "confirmed");

    let exported: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/export?startDate=2024-04-30&endDate=2024-05-01")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let exported = exported.as_array().expect("array");
    assert_eq!(exported.len(), 1);
    assert_eq!(exported[0]["status"], "confirmed");

    let deleted = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/appointments/{early_id}"))
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let remaining: Value = actix_test::call_and_read_body_json(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/appointments")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(remaining.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn logout_then_verify_without_cookie_is_rejected(state: HttpState) {
    let app = init(state).await;
    let cookie = login(&app).await;

    let verified = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/admin/verify")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(verified.status(), StatusCode::OK);

    let logout = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/admin/logout")
            .to_request(),
    )
    .await;
    let cleared = logout
        .response()
        .cookies()
        .find(|cookie| cookie.name() == TOKEN_COOKIE)
        .expect("removal cookie")
        .into_owned();
    assert!(cleared.value().is_empty());

    let after = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/admin/verify")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
}

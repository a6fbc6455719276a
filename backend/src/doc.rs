//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP handler plus the domain and DTO
//! schemas they reference, and declares the admin token security scheme.
//! Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Appointment, AppointmentStatus, DashboardStats, Error, ErrorCode};
use crate::inbound::http::admin::{AckResponse, LoginRequest, LoginResponse, VerifyResponse};
use crate::inbound::http::appointments::{
    CreateAppointmentRequest, DeleteAppointmentResponse, UpdateStatusRequest,
};

/// Enrich the generated document with the admin token security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "AdminCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "token",
                "Admin token cookie issued by POST /api/admin/login.",
            ))),
        );
        components.add_security_scheme(
            "AdminBearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Clinic booking API",
        description = "Public appointment booking and token-authenticated clinic administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("AdminCookie" = []), ("AdminBearer" = [])),
    paths(
        crate::inbound::http::appointments::create_appointment,
        crate::inbound::http::appointments::list_appointments,
        crate::inbound::http::appointments::get_appointment,
        crate::inbound::http::appointments::update_appointment_status,
        crate::inbound::http::appointments::delete_appointment,
        crate::inbound::http::admin::login,
        crate::inbound::http::admin::logout,
        crate::inbound::http::admin::verify,
        crate::inbound::http::admin::stats,
        crate::inbound::http::export::export_appointments,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Appointment,
        AppointmentStatus,
        DashboardStats,
        Error,
        ErrorCode,
        CreateAppointmentRequest,
        UpdateStatusRequest,
        DeleteAppointmentResponse,
        LoginRequest,
        LoginResponse,
        AckResponse,
        VerifyResponse,
    )),
    tags(
        (name = "appointments", description = "Booking submission and management"),
        (name = "admin", description = "Operator session, dashboard, and export"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

//! Appointment API handlers.
//!
//! ```text
//! POST   /api/appointments              (public)
//! GET    /api/appointments              (admin)
//! GET    /api/appointments/{id}         (admin)
//! PATCH  /api/appointments/{id}/status  (admin)
//! DELETE /api/appointments/{id}         (admin)
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Appointment, AppointmentDraft, AppointmentStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_session::AdminSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_status_error, missing_field_error, parse_appointment_id,
};

const STATUS_FIELD: FieldName = FieldName::new("status");

/// Booking form submission for `POST /api/appointments`.
///
/// Missing fields deserialise as empty strings so validation can report
/// every problem at once.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAppointmentRequest {
    #[schema(example = "Ana Pop")]
    pub patient_name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[schema(example = "0712345678")]
    pub phone: String,
    /// RFC 3339 timestamp of the requested slot.
    #[schema(example = "2024-03-04T09:00:00Z")]
    pub scheduled_at: String,
    #[schema(example = "Dental cleaning")]
    pub service: String,
    pub message: Option<String>,
}

impl From<CreateAppointmentRequest> for AppointmentDraft {
    fn from(value: CreateAppointmentRequest) -> Self {
        Self {
            patient_name: value.patient_name,
            email: value.email,
            phone: value.phone,
            scheduled_at: value.scheduled_at,
            service: value.service,
            message: value.message,
        }
    }
}

/// Body of `PATCH /api/appointments/{id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// One of `pending`, `confirmed`, `rescheduled`, `completed`, `cancelled`.
    #[serde(default)]
    #[schema(example = "confirmed")]
    pub status: Option<String>,
}

/// Result of a delete.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeleteAppointmentResponse {
    pub success: bool,
    pub message: String,
}

fn not_found(id: &str) -> Error {
    Error::not_found(format!("appointment {id} not found"))
}

/// Submit a new appointment request.
#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Invalid request", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "createAppointment",
    security([])
)]
#[post("/appointments")]
pub async fn create_appointment(
    state: web::Data<HttpState>,
    payload: web::Json<CreateAppointmentRequest>,
) -> ApiResult<HttpResponse> {
    let created = state
        .appointments
        .create(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(created))
}

/// List every appointment, latest slot first.
#[utoipa::path(
    get,
    path = "/api/appointments",
    responses(
        (status = 200, description = "Appointments", body = [Appointment]),
        (status = 401, description = "Admin token required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    _admin: AdminSession,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Appointment>>> {
    let records = state.appointments_query.list().await?;
    Ok(web::Json(records))
}

/// Fetch one appointment.
#[utoipa::path(
    get,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 401, description = "Admin token required", body = Error),
        (status = 404, description = "Unknown appointment", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "getAppointment"
)]
#[get("/appointments/{id}")]
pub async fn get_appointment(
    _admin: AdminSession,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Appointment>> {
    let raw = path.into_inner();
    let id = parse_appointment_id(&raw)?;
    state
        .appointments_query
        .get(&id)
        .await?
        .map(web::Json)
        .ok_or_else(|| not_found(&raw))
}

/// Move an appointment to a new status.
///
/// The status is validated before the record is looked up, so an invalid
/// value yields `400` even for unknown ids.
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 400, description = "Invalid status", body = Error),
        (status = 401, description = "Admin token required", body = Error),
        (status = 404, description = "Unknown appointment", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "updateAppointmentStatus"
)]
#[patch("/appointments/{id}/status")]
pub async fn update_appointment_status(
    admin: AdminSession,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateStatusRequest>,
) -> ApiResult<web::Json<Appointment>> {
    let raw_status = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error(STATUS_FIELD))?;
    let status = raw_status
        .parse::<AppointmentStatus>()
        .map_err(|err| invalid_status_error(STATUS_FIELD, &err))?;

    let raw = path.into_inner();
    let id = parse_appointment_id(&raw)?;
    info!(admin = admin.username(), %id, %status, "status change requested");
    state
        .appointments
        .update_status(&id, status)
        .await?
        .map(web::Json)
        .ok_or_else(|| not_found(&raw))
}

/// Delete an appointment permanently.
#[utoipa::path(
    delete,
    path = "/api/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Deleted", body = DeleteAppointmentResponse),
        (status = 401, description = "Admin token required", body = Error),
        (status = 404, description = "Unknown appointment", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "deleteAppointment"
)]
#[delete("/appointments/{id}")]
pub async fn delete_appointment(
    admin: AdminSession,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteAppointmentResponse>> {
    let raw = path.into_inner();
    let id = parse_appointment_id(&raw)?;
    info!(admin = admin.username(), %id, "deletion requested");
    if state.appointments.delete(&id).await? {
        Ok(web::Json(DeleteAppointmentResponse {
            success: true,
            message: "appointment deleted".to_owned(),
        }))
    } else {
        Err(not_found(&raw))
    }
}

#[cfg(test)]
#[path = "appointments_tests.rs"]
mod tests;

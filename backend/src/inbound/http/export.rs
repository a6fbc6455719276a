//! Filtered appointment export.
//!
//! ```text
//! GET /api/export?startDate=2024-03-04&endDate=2024-03-10
//! ```
//!
//! Returns the JSON records a spreadsheet or PDF generator would consume.
//! Both bounds are whole calendar days in server-local time and inclusive:
//! the window runs from `00:00:00.000` of the start day to `23:59:59.999` of
//! the end day. Omitting both bounds exports everything.

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{Appointment, CalendarDay, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_session::AdminSession;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_calendar_day};

const START_FIELD: FieldName = FieldName::new("startDate");
const END_FIELD: FieldName = FieldName::new("endDate");

/// Query parameters of `GET /api/export`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExportQuery {
    /// First day, `YYYY-MM-DD` or RFC 3339.
    pub start_date: Option<String>,
    /// Last day, `YYYY-MM-DD` or RFC 3339.
    pub end_date: Option<String>,
}

/// Parse the query bounds; `None` means no filtering.
pub(crate) fn export_days(query: &ExportQuery) -> Result<Option<(CalendarDay, CalendarDay)>, Error> {
    let (start_raw, end_raw) = match (&query.start_date, &query.end_date) {
        (None, None) => return Ok(None),
        (Some(_), None) => return Err(missing_field_error(END_FIELD)),
        (None, Some(_)) => return Err(missing_field_error(START_FIELD)),
        (Some(start), Some(end)) => (start, end),
    };
    let start = parse_calendar_day(start_raw, START_FIELD)?;
    let end = parse_calendar_day(end_raw, END_FIELD)?;
    Ok(Some((start, end)))
}

/// Export appointments, optionally limited to a day range.
#[utoipa::path(
    get,
    path = "/api/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "Matching appointments, latest first", body = [Appointment]),
        (status = 400, description = "Invalid or incomplete date range", body = Error),
        (status = 401, description = "Admin token required", body = Error)
    ),
    tags = ["admin"],
    operation_id = "exportAppointments"
)]
#[get("/export")]
pub async fn export_appointments(
    _admin: AdminSession,
    state: web::Data<HttpState>,
    query: web::Query<ExportQuery>,
) -> ApiResult<web::Json<Vec<Appointment>>> {
    let records = match export_days(&query)? {
        Some((first, last)) => state.appointments_query.list_in_days(first, last).await?,
        None => state.appointments_query.list().await?,
    };
    Ok(web::Json(records))
}

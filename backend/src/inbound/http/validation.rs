//! Shared validation helpers for inbound HTTP adapters.

use actix_web::HttpRequest;
use actix_web::error::JsonPayloadError;
use serde_json::json;

use crate::domain::{AppointmentId, CalendarDay, Error, InvalidStatusError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidDate,
    InvalidStatus,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

fn field_error(field: FieldName, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

fn field_value_error(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        format!("missing required field: {name}"),
        ErrorCode::MissingField,
    )
}

pub(crate) fn invalid_status_error(field: FieldName, err: &InvalidStatusError) -> Error {
    field_value_error(field, err.to_string(), ErrorCode::InvalidStatus, err.value())
}

/// Parse a calendar day given either as `YYYY-MM-DD` or as an RFC 3339
/// timestamp.
pub(crate) fn parse_calendar_day(value: &str, field: FieldName) -> Result<CalendarDay, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        field_value_error(
            field,
            format!("{name} must be a YYYY-MM-DD date or an RFC 3339 timestamp"),
            ErrorCode::InvalidDate,
            value,
        )
    })
}

/// Parse a path identifier. Malformed identifiers cannot name a stored
/// record, so they are reported as missing.
pub(crate) fn parse_appointment_id(raw: &str) -> Result<AppointmentId, Error> {
    raw.parse()
        .map_err(|_| Error::not_found(format!("appointment {raw} not found")))
}

/// Turn JSON body extraction failures into `invalid_request` errors.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be JSON".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("malformed JSON body: {inner}"),
        other => format!("unreadable request body: {other}"),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}

//! Domain primitives, services, and ports.
//!
//! Purpose: define the appointment record, its status state machine, the
//! date windows used for dashboard counts and exports, and the admin session
//! gate, independently of HTTP and storage.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Appointment and friends: the stored booking record.
//! - DateWindow / DashboardStats: inclusive time windows and counts.
//! - LoginCredentials, AdminClaims, TokenSecret: admin authentication.
//! - AppointmentService, AdminTokenService: driving port implementations.

pub mod admin_session_service;
pub mod admin_token;
pub mod appointment;
pub mod appointment_service;
pub mod auth;
pub mod date_window;
pub mod error;
pub mod ports;
pub mod trace_id;

pub use self::admin_session_service::{ADMIN_TOKEN_TTL_SECS, AdminTokenService};
pub use self::admin_token::{
    AdminClaims, TOKEN_SECRET_MIN_LEN, TokenError, TokenSecret, TokenSecretTooShort,
    decode_token, encode_token,
};
pub use self::appointment::{
    Appointment, AppointmentDraft, AppointmentField, AppointmentId, AppointmentParts,
    AppointmentStatus, AppointmentValidationError, FieldViolation, InvalidStatusError,
    NewAppointment, StatusTransition, ViolationKind, sort_by_schedule_desc,
};
pub use self::appointment_service::AppointmentService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::date_window::{
    CalendarDay, DashboardStats, DashboardWindows, DateWindow, DateWindowError,
    InvalidCalendarDay, count_in_range, filter_in_range,
};
pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use clinic_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("appointment not found"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! Validation of appointment booking submissions.
//!
//! Every rule is checked on every submission so callers receive the complete
//! list of failing fields in one response.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, SubsecRound, Utc};
use regex::Regex;
use serde_json::{Value, json};

/// Minimum patient name length, in characters.
pub const PATIENT_NAME_MIN: usize = 2;
/// Maximum patient name length, in characters.
pub const PATIENT_NAME_MAX: usize = 100;
/// Maximum email length, in characters.
pub const EMAIL_MAX: usize = 150;
/// Minimum phone length, in characters. Digits are not counted separately.
pub const PHONE_MIN: usize = 10;
/// Maximum phone length, in characters.
pub const PHONE_MAX: usize = 20;
/// Maximum service label length, in characters.
pub const SERVICE_MAX: usize = 100;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
    })
}

/// Fields of a booking submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentField {
    /// `patientName`
    PatientName,
    /// `email`
    Email,
    /// `phone`
    Phone,
    /// `scheduledAt`
    ScheduledAt,
    /// `service`
    Service,
}

impl AppointmentField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PatientName => "patientName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::ScheduledAt => "scheduledAt",
            Self::Service => "service",
        }
    }
}

/// Why a single field failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Missing or blank.
    Required,
    /// Shorter than `min` characters.
    TooShort { min: usize },
    /// Longer than `max` characters.
    TooLong { max: usize },
    /// Not shaped like an email address.
    InvalidEmail,
    /// Not an RFC 3339 timestamp.
    InvalidTimestamp,
}

impl ViolationKind {
    fn code(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidTimestamp => "invalid_timestamp",
        }
    }
}

/// One failing field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// The field that failed.
    pub field: AppointmentField,
    /// The rule it broke.
    pub kind: ViolationKind,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field.as_str();
        match self.kind {
            ViolationKind::Required => write!(f, "{field} is required"),
            ViolationKind::TooShort { min } => {
                write!(f, "{field} must be at least {min} characters")
            }
            ViolationKind::TooLong { max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            ViolationKind::InvalidEmail => write!(f, "{field} must be a valid email address"),
            ViolationKind::InvalidTimestamp => {
                write!(f, "{field} must be an RFC 3339 timestamp")
            }
        }
    }
}

/// All violations found in a submission. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentValidationError {
    violations: Vec<FieldViolation>,
}

impl AppointmentValidationError {
    /// Failing fields in submission order.
    pub fn violations(&self) -> &[FieldViolation] {
        self.violations.as_slice()
    }

    /// Whether `field` is among the failures.
    pub fn has_field(&self, field: AppointmentField) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }

    /// Structured payload for error details.
    pub fn to_details(&self) -> Value {
        let fields: Vec<Value> = self
            .violations
            .iter()
            .map(|violation| {
                json!({
                    "field": violation.field.as_str(),
                    "code": violation.kind.code(),
                    "message": violation.to_string(),
                })
            })
            .collect();
        json!({ "fields": fields })
    }
}

impl fmt::Display for AppointmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "validation failed: {}", messages.join("; "))
    }
}

impl std::error::Error for AppointmentValidationError {}

/// Raw booking submission as received from a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentDraft {
    /// Patient's full name.
    pub patient_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Requested slot as an RFC 3339 timestamp.
    pub scheduled_at: String,
    /// Requested treatment.
    pub service: String,
    /// Optional note from the patient.
    pub message: Option<String>,
}

/// A submission that passed every rule, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub(crate) patient_name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) scheduled_at: DateTime<Utc>,
    pub(crate) service: String,
    pub(crate) message: Option<String>,
}

impl NewAppointment {
    /// Requested slot.
    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }
}

fn check_length(
    field: AppointmentField,
    value: &str,
    min: usize,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) {
    let length = value.chars().count();
    let kind = if value.is_empty() {
        Some(ViolationKind::Required)
    } else if length < min {
        Some(ViolationKind::TooShort { min })
    } else if length > max {
        Some(ViolationKind::TooLong { max })
    } else {
        None
    };
    if let Some(kind) = kind {
        violations.push(FieldViolation { field, kind });
    }
}

fn check_email(value: &str, violations: &mut Vec<FieldViolation>) {
    let kind = if value.is_empty() {
        Some(ViolationKind::Required)
    } else if value.chars().count() > EMAIL_MAX {
        Some(ViolationKind::TooLong { max: EMAIL_MAX })
    } else if !email_regex().is_match(value) {
        Some(ViolationKind::InvalidEmail)
    } else {
        None
    };
    if let Some(kind) = kind {
        violations.push(FieldViolation {
            field: AppointmentField::Email,
            kind,
        });
    }
}

fn parse_scheduled_at(
    value: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<DateTime<Utc>> {
    if value.is_empty() {
        violations.push(FieldViolation {
            field: AppointmentField::ScheduledAt,
            kind: ViolationKind::Required,
        });
        return None;
    }
    // Slots are kept at microsecond precision, the resolution of storage and
    // of the dashboard window bounds.
    match DateTime::parse_from_rfc3339(value) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc).trunc_subsecs(6)),
        Err(_) => {
            violations.push(FieldViolation {
                field: AppointmentField::ScheduledAt,
                kind: ViolationKind::InvalidTimestamp,
            });
            None
        }
    }
}

impl TryFrom<AppointmentDraft> for NewAppointment {
    type Error = AppointmentValidationError;

    /// Validate a draft, collecting every violation.
    ///
    /// # Examples
    /// ```
    /// use clinic_backend::domain::{AppointmentDraft, AppointmentField, NewAppointment};
    ///
    /// let draft = AppointmentDraft {
    ///     patient_name: "A".into(),
    ///     email: "nope".into(),
    ///     phone: "0712345678".into(),
    ///     scheduled_at: "2024-03-04T10:00:00Z".into(),
    ///     service: "Cleaning".into(),
    ///     message: None,
    /// };
    /// let err = NewAppointment::try_from(draft).unwrap_err();
    /// assert!(err.has_field(AppointmentField::PatientName));
    /// assert!(err.has_field(AppointmentField::Email));
    /// assert_eq!(err.violations().len(), 2);
    /// ```
    fn try_from(draft: AppointmentDraft) -> Result<Self, Self::Error> {
        let patient_name = draft.patient_name.trim();
        let email = draft.email.trim();
        let phone = draft.phone.trim();
        let scheduled_at = draft.scheduled_at.trim();
        let service = draft.service.trim();

        let mut violations = Vec::new();
        check_length(
            AppointmentField::PatientName,
            patient_name,
            PATIENT_NAME_MIN,
            PATIENT_NAME_MAX,
            &mut violations,
        );
        check_email(email, &mut violations);
        check_length(
            AppointmentField::Phone,
            phone,
            PHONE_MIN,
            PHONE_MAX,
            &mut violations,
        );
        let parsed_at = parse_scheduled_at(scheduled_at, &mut violations);
        check_length(
            AppointmentField::Service,
            service,
            1,
            SERVICE_MAX,
            &mut violations,
        );

        match parsed_at {
            Some(scheduled_at) if violations.is_empty() => Ok(Self {
                patient_name: patient_name.to_owned(),
                email: email.to_owned(),
                phone: phone.to_owned(),
                scheduled_at,
                service: service.to_owned(),
                message: draft
                    .message
                    .map(|message| message.trim().to_owned())
                    .filter(|message| !message.is_empty()),
            }),
            _ => Err(AppointmentValidationError { violations }),
        }
    }
}

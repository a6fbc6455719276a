//! Appointment request aggregate.
//!
//! An [`Appointment`] is created once from a validated [`NewAppointment`],
//! read many times, changes status through [`Appointment::with_status`], and
//! is eventually deleted outright.
//!
//! ## Invariants
//! - `id` and `created_at` never change after creation.
//! - `status` is always one of the five [`AppointmentStatus`] values.
//! - `scheduled_at` is unrelated to "now"; past slots are stored as given.

pub mod status;
pub mod validation;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub use self::status::{AppointmentStatus, InvalidStatusError, StatusTransition};
pub use self::validation::{
    AppointmentDraft, AppointmentField, AppointmentValidationError, FieldViolation,
    NewAppointment, ViolationKind,
};

/// Opaque appointment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct AppointmentId(Uuid);

impl AppointmentId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID, typically one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AppointmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AppointmentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A stored appointment request.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use clinic_backend::domain::{
///     Appointment, AppointmentDraft, AppointmentId, AppointmentStatus, NewAppointment,
/// };
///
/// let draft = AppointmentDraft {
///     patient_name: "Ana Pop".into(),
///     email: "ana@example.com".into(),
///     phone: "0712345678".into(),
///     scheduled_at: "2024-03-04T10:00:00Z".into(),
///     service: "Cleaning".into(),
///     message: None,
/// };
/// let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
/// let record = Appointment::create(
///     AppointmentId::random(),
///     NewAppointment::try_from(draft).unwrap(),
///     created_at,
/// );
/// assert_eq!(record.status(), AppointmentStatus::Pending);
/// assert_eq!(record.created_at(), created_at);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    id: AppointmentId,
    #[schema(example = "Ana Pop")]
    patient_name: String,
    #[schema(example = "ana@example.com")]
    email: String,
    #[schema(example = "0712345678")]
    phone: String,
    scheduled_at: DateTime<Utc>,
    #[schema(example = "Dental cleaning")]
    service: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    status: AppointmentStatus,
    created_at: DateTime<Utc>,
}

/// Field bundle used by persistence adapters to rebuild stored records.
#[derive(Debug, Clone)]
pub struct AppointmentParts {
    /// Stored identifier.
    pub id: AppointmentId,
    /// Stored patient name.
    pub patient_name: String,
    /// Stored email.
    pub email: String,
    /// Stored phone.
    pub phone: String,
    /// Stored slot.
    pub scheduled_at: DateTime<Utc>,
    /// Stored service label.
    pub service: String,
    /// Stored note.
    pub message: Option<String>,
    /// Stored status.
    pub status: AppointmentStatus,
    /// Stored creation time.
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Create a fresh `pending` record from a validated submission.
    pub fn create(id: AppointmentId, new: NewAppointment, created_at: DateTime<Utc>) -> Self {
        let NewAppointment {
            patient_name,
            email,
            phone,
            scheduled_at,
            service,
            message,
        } = new;
        Self {
            id,
            patient_name,
            email,
            phone,
            scheduled_at,
            service,
            message,
            status: AppointmentStatus::Pending,
            created_at,
        }
    }

    /// Rebuild a record read back from storage.
    pub fn from_parts(parts: AppointmentParts) -> Self {
        let AppointmentParts {
            id,
            patient_name,
            email,
            phone,
            scheduled_at,
            service,
            message,
            status,
            created_at,
        } = parts;
        Self {
            id,
            patient_name,
            email,
            phone,
            scheduled_at,
            service,
            message,
            status,
            created_at,
        }
    }

    /// Apply a status change. Any target is accepted.
    #[must_use]
    pub fn with_status(mut self, target: AppointmentStatus) -> Self {
        self.status = self.status.transition_to(target).to;
        self
    }

    /// Identifier.
    pub fn id(&self) -> AppointmentId {
        self.id
    }

    /// Patient's name.
    pub fn patient_name(&self) -> &str {
        self.patient_name.as_str()
    }

    /// Contact email.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Contact phone.
    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    /// Requested slot.
    pub fn scheduled_at(&self) -> DateTime<Utc> {
        self.scheduled_at
    }

    /// Requested treatment.
    pub fn service(&self) -> &str {
        self.service.as_str()
    }

    /// Optional patient note.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Current status.
    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Order records by `scheduled_at` descending, then by id descending so ties
/// are deterministic.
pub fn sort_by_schedule_desc(records: &mut [Appointment]) {
    records.sort_by(|a, b| {
        b.scheduled_at
            .cmp(&a.scheduled_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

//! Appointment status state machine.
//!
//! Transitions are deliberately unrestricted: any status may move to any
//! other status in one step. The only rule is membership in the five-value
//! set, which is enforced when parsing untrusted input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle label of an appointment request.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    /// Initial state of every new request.
    #[default]
    Pending,
    /// The clinic accepted the requested slot.
    Confirmed,
    /// The clinic agreed a different slot with the patient.
    Rescheduled,
    /// The visit took place.
    Completed,
    /// The request was withdrawn by either side.
    Cancelled,
}

/// Raised when a status string is not one of the five known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{value}'; expected one of pending, confirmed, rescheduled, completed, cancelled")]
pub struct InvalidStatusError {
    value: String,
}

impl InvalidStatusError {
    /// The rejected input.
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// A status change applied to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    /// Status before the change.
    pub from: AppointmentStatus,
    /// Status after the change.
    pub to: AppointmentStatus,
}

impl AppointmentStatus {
    /// Every status in display order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Rescheduled,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Stable lowercase wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rescheduled => "rescheduled",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Move to `target`. Every target is accepted.
    ///
    /// # Examples
    /// ```
    /// use clinic_backend::domain::AppointmentStatus;
    ///
    /// let change = AppointmentStatus::Completed.transition_to(AppointmentStatus::Pending);
    /// assert_eq!(change.to, AppointmentStatus::Pending);
    /// ```
    pub fn transition_to(self, target: Self) -> StatusTransition {
        StatusTransition {
            from: self,
            to: target,
        }
    }

    /// `completed` and `cancelled` are end states by convention only; nothing
    /// stops a later transition out of them.
    pub fn is_conventionally_final(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = InvalidStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| InvalidStatusError {
                value: value.to_owned(),
            })
    }
}

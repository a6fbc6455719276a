//! Driving port for appointment mutations.
//!
//! The public booking form and the admin surface both reach the store
//! through this port; neither imports persistence types.

use async_trait::async_trait;

use crate::domain::{Appointment, AppointmentDraft, AppointmentId, AppointmentStatus, Error};

/// Domain use-case port for creating and changing appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    /// Validate and store a new `pending` appointment.
    ///
    /// Every failing field is reported in one `invalid_request` error.
    async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, Error>;

    /// Move an appointment to `status`. `None` when the id is unknown.
    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, Error>;

    /// Delete an appointment. `false` when the id is unknown.
    async fn delete(&self, id: &AppointmentId) -> Result<bool, Error>;
}

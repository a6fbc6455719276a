//! Port abstraction for appointment persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Appointment, AppointmentId, AppointmentStatus, DateWindow};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by appointment repository adapters.
    pub enum AppointmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "appointment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "appointment repository query failed: {message}",
    }
}

/// Durable store of appointment records.
///
/// Listing operations return records ordered by scheduled slot, latest
/// first, with the identifier breaking ties.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Persist a newly created record.
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentPersistenceError>;

    /// Every stored record.
    async fn list(&self) -> Result<Vec<Appointment>, AppointmentPersistenceError>;

    /// Fetch one record by identifier.
    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError>;

    /// Overwrite the status of one record, returning the updated record.
    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError>;

    /// Remove one record. Returns `false` when nothing matched.
    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentPersistenceError>;

    /// Records whose slot falls inside `window`, bounds inclusive.
    async fn list_in_range(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError>;
}

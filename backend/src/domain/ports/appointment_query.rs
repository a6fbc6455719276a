//! Driving port for appointment reads and dashboard aggregates.

use async_trait::async_trait;

use crate::domain::{
    Appointment, AppointmentId, CalendarDay, DashboardStats, DateWindow, Error,
};

/// Domain use-case port for reading appointments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentQuery: Send + Sync {
    /// All appointments, latest slot first.
    async fn list(&self) -> Result<Vec<Appointment>, Error>;

    /// One appointment by id.
    async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, Error>;

    /// Appointments whose slot lies inside `window`, latest first.
    async fn list_in_range(&self, window: &DateWindow) -> Result<Vec<Appointment>, Error>;

    /// Appointments on the calendar days `first..=last` in the server's
    /// zone, latest first. A `last` before `first` is an invalid request.
    async fn list_in_days(
        &self,
        first: CalendarDay,
        last: CalendarDay,
    ) -> Result<Vec<Appointment>, Error>;

    /// Counts for today, this week, and this month in server-local time.
    async fn dashboard_stats(&self) -> Result<DashboardStats, Error>;
}

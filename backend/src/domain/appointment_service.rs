//! Appointment domain services.
//!
//! `AppointmentService` implements the command and query driving ports on
//! top of any [`AppointmentRepository`]. Creation timestamps come from the
//! injected clock; dashboard windows are computed in the configured time
//! zone, which is the server's local zone in production.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Local, SubsecRound, TimeZone};
use serde_json::json;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AppointmentCommand, AppointmentPersistenceError, AppointmentQuery, AppointmentRepository,
};
use crate::domain::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentStatus, CalendarDay, DashboardStats,
    DashboardWindows, DateWindow, DateWindowError, Error, NewAppointment,
};

/// Appointment service implementing the driving ports.
#[derive(Clone)]
pub struct AppointmentService<R, Tz = Local> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl<R> AppointmentService<R, Local> {
    /// Create a service that buckets dashboard counts in server-local time.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self::with_time_zone(repository, clock, Local)
    }
}

impl<R, Tz> AppointmentService<R, Tz> {
    /// Create a service that buckets dashboard counts in `tz`.
    pub fn with_time_zone(repository: Arc<R>, clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self {
            repository,
            clock,
            tz,
        }
    }
}

fn map_persistence_error(error: AppointmentPersistenceError) -> Error {
    match error {
        AppointmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("appointment repository unavailable: {message}"))
        }
        AppointmentPersistenceError::Query { message } => {
            Error::internal(format!("appointment repository error: {message}"))
        }
    }
}

fn map_export_window_error(error: DateWindowError) -> Error {
    match error {
        DateWindowError::InvertedDays { first, last } => {
            Error::invalid_request("endDate must not be before startDate").with_details(json!({
                "startDate": first.to_string(),
                "endDate": last.to_string(),
                "code": "invalid_range",
            }))
        }
        other => Error::invalid_request(other.to_string()),
    }
}

#[async_trait]
impl<R, Tz> AppointmentCommand for AppointmentService<R, Tz>
where
    R: AppointmentRepository,
    Tz: TimeZone + Send + Sync,
{
    async fn create(&self, draft: AppointmentDraft) -> Result<Appointment, Error> {
        let new = NewAppointment::try_from(draft).map_err(|err| {
            Error::invalid_request("appointment request is invalid").with_details(err.to_details())
        })?;
        let created_at = self.clock.utc().trunc_subsecs(6);
        let appointment = Appointment::create(AppointmentId::random(), new, created_at);
        self.repository
            .insert(&appointment)
            .await
            .map_err(map_persistence_error)?;
        info!(id = %appointment.id(), "appointment created");
        Ok(appointment)
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, Error> {
        let updated = self
            .repository
            .update_status(id, status)
            .await
            .map_err(map_persistence_error)?;
        if updated.is_some() {
            info!(
                %id,
                %status,
                closed = status.is_conventionally_final(),
                "appointment status changed"
            );
        }
        Ok(updated)
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, Error> {
        let removed = self
            .repository
            .delete(id)
            .await
            .map_err(map_persistence_error)?;
        if removed {
            info!(%id, "appointment deleted");
        }
        Ok(removed)
    }
}

#[async_trait]
impl<R, Tz> AppointmentQuery for AppointmentService<R, Tz>
where
    R: AppointmentRepository,
    Tz: TimeZone + Send + Sync,
{
    async fn list(&self) -> Result<Vec<Appointment>, Error> {
        self.repository.list().await.map_err(map_persistence_error)
    }

    async fn get(&self, id: &AppointmentId) -> Result<Option<Appointment>, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(map_persistence_error)
    }

    async fn list_in_range(&self, window: &DateWindow) -> Result<Vec<Appointment>, Error> {
        self.repository
            .list_in_range(window)
            .await
            .map_err(map_persistence_error)
    }

    async fn list_in_days(
        &self,
        first: CalendarDay,
        last: CalendarDay,
    ) -> Result<Vec<Appointment>, Error> {
        let window = DateWindow::calendar_days(
            first.date_in(&self.tz),
            last.date_in(&self.tz),
            &self.tz,
        )
        .map_err(map_export_window_error)?;
        self.list_in_range(&window).await
    }

    async fn dashboard_stats(&self) -> Result<DashboardStats, Error> {
        let today = self.clock.utc().with_timezone(&self.tz).date_naive();
        let windows = DashboardWindows::for_date(today, &self.tz)
            .map_err(|err| Error::internal(format!("dashboard window unavailable: {err}")))?;
        // The week may straddle a month boundary, so fetch the union once.
        let span = DateWindow::new(
            windows.week.start().min(windows.month.start()),
            windows.week.end().max(windows.month.end()),
        )
        .map_err(|err| Error::internal(format!("dashboard window unavailable: {err}")))?;
        let records = self.list_in_range(&span).await?;
        Ok(windows.count(&records))
    }
}

#[cfg(test)]
#[path = "appointment_service_tests.rs"]
mod tests;

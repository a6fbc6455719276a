//! Process-local `AppointmentRepository` used when no database is configured.
//!
//! Records live in a lock-guarded map and disappear with the process. Each
//! operation takes the lock once, so concurrent callers see every change
//! either fully applied or not at all.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{AppointmentPersistenceError, AppointmentRepository};
use crate::domain::{
    Appointment, AppointmentId, AppointmentStatus, DateWindow, filter_in_range,
    sort_by_schedule_desc,
};

/// In-memory implementation of the appointment repository port.
#[derive(Debug, Default)]
pub struct InMemoryAppointmentRepository {
    records: RwLock<HashMap<AppointmentId, Appointment>>,
}

impl InMemoryAppointmentRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `records`.
    pub fn with_records(records: impl IntoIterator<Item = Appointment>) -> Self {
        let map = records
            .into_iter()
            .map(|record| (record.id(), record))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }
}

fn poisoned<T>(_: PoisonError<T>) -> AppointmentPersistenceError {
    AppointmentPersistenceError::query("appointment store lock poisoned")
}

fn sorted(mut records: Vec<Appointment>) -> Vec<Appointment> {
    sort_by_schedule_desc(&mut records);
    records
}

#[async_trait]
impl AppointmentRepository for InMemoryAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentPersistenceError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        if guard.contains_key(&appointment.id()) {
            return Err(AppointmentPersistenceError::query(
                "appointment id already exists",
            ));
        }
        guard.insert(appointment.id(), appointment.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(sorted(guard.values().cloned().collect()))
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let guard = self.records.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        let Some(current) = guard.remove(id) else {
            return Ok(None);
        };
        let updated = current.with_status(status);
        guard.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentPersistenceError> {
        let mut guard = self.records.write().map_err(poisoned)?;
        Ok(guard.remove(id).is_some())
    }

    async fn list_in_range(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let guard = self.records.read().map_err(poisoned)?;
        let stored: Vec<Appointment> = guard.values().cloned().collect();
        Ok(sorted(filter_in_range(&stored, window)))
    }
}

//! PostgreSQL-backed `AppointmentRepository` implementation using Diesel ORM.
//!
//! Every port operation is a single SQL statement, so concurrent handlers
//! never observe a half-applied change. Status values are stored as their
//! lowercase names and guarded by a CHECK constraint.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{AppointmentPersistenceError, AppointmentRepository};
use crate::domain::{
    Appointment, AppointmentId, AppointmentParts, AppointmentStatus, DateWindow,
};

use super::models::{AppointmentRow, NewAppointmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::appointments;

/// Diesel-backed implementation of the appointment repository port.
#[derive(Clone)]
pub struct DieselAppointmentRepository {
    pool: DbPool,
}

impl DieselAppointmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AppointmentPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AppointmentPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> AppointmentPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => AppointmentPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            AppointmentPersistenceError::query("database query error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AppointmentPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            AppointmentPersistenceError::query("appointment id already exists")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            AppointmentPersistenceError::query("appointment violates a table constraint")
        }
        _ => AppointmentPersistenceError::query("database error"),
    }
}

/// Convert a database row into a domain record.
fn row_to_appointment(row: AppointmentRow) -> Result<Appointment, AppointmentPersistenceError> {
    let status = row.status.parse::<AppointmentStatus>().map_err(|err| {
        warn!(id = %row.id, value = err.value(), "unrecognised stored status");
        AppointmentPersistenceError::query(format!("stored row {}: {err}", row.id))
    })?;

    Ok(Appointment::from_parts(AppointmentParts {
        id: AppointmentId::from_uuid(row.id),
        patient_name: row.patient_name,
        email: row.email,
        phone: row.phone,
        scheduled_at: row.scheduled_at,
        service: row.service,
        message: row.message,
        status,
        created_at: row.created_at,
    }))
}

fn rows_to_appointments(
    rows: Vec<AppointmentRow>,
) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
    rows.into_iter().map(row_to_appointment).collect()
}

#[async_trait]
impl AppointmentRepository for DieselAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAppointmentRow {
            id: *appointment.id().as_uuid(),
            patient_name: appointment.patient_name(),
            email: appointment.email(),
            phone: appointment.phone(),
            scheduled_at: appointment.scheduled_at(),
            service: appointment.service(),
            message: appointment.message(),
            status: appointment.status().as_str(),
            created_at: appointment.created_at(),
        };

        diesel::insert_into(appointments::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AppointmentRow> = appointments::table
            .order((appointments::scheduled_at.desc(), appointments::id.desc()))
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_appointments(rows)
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = appointments::table
            .filter(appointments::id.eq(id.as_uuid()))
            .select(AppointmentRow::as_select())
            .first::<AppointmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_appointment).transpose()
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = diesel::update(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .set(appointments::status.eq(status.as_str()))
            .returning(AppointmentRow::as_returning())
            .get_result::<AppointmentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_appointment).transpose()
    }

    async fn delete(&self, id: &AppointmentId) -> Result<bool, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(appointments::table.filter(appointments::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn list_in_range(
        &self,
        window: &DateWindow,
    ) -> Result<Vec<Appointment>, AppointmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<AppointmentRow> = appointments::table
            .filter(appointments::scheduled_at.between(window.start(), window.end()))
            .order((appointments::scheduled_at.desc(), appointments::id.desc()))
            .select(AppointmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_appointments(rows)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and row conversion edge cases.

    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    use super::*;

    #[fixture]
    fn valid_row() -> AppointmentRow {
        let scheduled_at = Utc
            .with_ymd_and_hms(2024, 3, 4, 10, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        AppointmentRow {
            id: Uuid::new_v4(),
            patient_name: "Ana Pop".to_owned(),
            email: "ana@example.com".to_owned(),
            phone: "0712345678".to_owned(),
            scheduled_at,
            service: "Dental cleaning".to_owned(),
            message: None,
            status: "confirmed".to_owned(),
            created_at: scheduled_at,
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(
            repo_err,
            AppointmentPersistenceError::Connection { .. }
        ));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let repo_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(repo_err, AppointmentPersistenceError::Query { .. }));
    }

    #[rstest]
    fn row_conversion_restores_status(valid_row: AppointmentRow) {
        let id = valid_row.id;
        let record = row_to_appointment(valid_row).expect("valid row");

        assert_eq!(record.id().as_uuid(), &id);
        assert_eq!(record.status(), AppointmentStatus::Confirmed);
        assert_eq!(record.message(), None);
    }

    #[rstest]
    fn row_conversion_rejects_unknown_status(mut valid_row: AppointmentRow) {
        valid_row.status = "archived".to_owned();

        let err = row_to_appointment(valid_row).expect_err("unknown status");
        assert!(err.to_string().contains("archived"));
    }
}

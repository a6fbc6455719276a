//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::appointments;

/// Row struct for reading from the appointments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = appointments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AppointmentRow {
    pub id: Uuid,
    pub patient_name: String,
    pub email: String,
    pub phone: String,
    pub scheduled_at: DateTime<Utc>,
    pub service: String,
    pub message: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new appointment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = appointments)]
pub(crate) struct NewAppointmentRow<'a> {
    pub id: Uuid,
    pub patient_name: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub scheduled_at: DateTime<Utc>,
    pub service: &'a str,
    pub message: Option<&'a str>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

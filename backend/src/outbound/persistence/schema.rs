//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Appointment requests submitted through the booking form.
    appointments (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Patient name (2 to 100 characters).
        patient_name -> Varchar,
        /// Contact email (max 150 characters).
        email -> Varchar,
        /// Contact phone (10 to 20 characters).
        phone -> Varchar,
        /// Requested slot.
        scheduled_at -> Timestamptz,
        /// Requested service label.
        service -> Varchar,
        /// Optional free-text note.
        message -> Nullable<Text>,
        /// Lifecycle status; one of the five lowercase status names.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reserved for store-backed admin credentials; not read yet.
    admin_users (id) {
        id -> Uuid,
        username -> Varchar,
        password_hash -> Varchar,
        created_at -> Timestamptz,
    }
}

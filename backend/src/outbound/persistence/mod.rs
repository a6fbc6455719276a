//! Appointment store adapters.
//!
//! `DieselAppointmentRepository` persists records in PostgreSQL through
//! `diesel-async` and a `bb8` pool. `InMemoryAppointmentRepository` keeps
//! them in process memory for development runs without a database and for
//! tests.
//!
//! Diesel row structs (`models.rs`) and table definitions (`schema.rs`) are
//! internal to this module and never reach the domain.
//!
//! # Example
//!
//! ```ignore
//! use clinic_backend::outbound::persistence::{DbPool, DieselAppointmentRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clinic")).await?;
//! let repo = DieselAppointmentRepository::new(pool);
//! ```

mod diesel_appointment_repository;
mod in_memory_appointment_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_appointment_repository::DieselAppointmentRepository;
pub use in_memory_appointment_repository::InMemoryAppointmentRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

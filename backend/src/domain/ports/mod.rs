//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`AppointmentRepository`, `CredentialVerifier`) are
//! implemented by outbound adapters. Driving ports (`AppointmentCommand`,
//! `AppointmentQuery`, `AdminSessionGate`) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_session_gate;
mod appointment_command;
mod appointment_query;
mod appointment_repository;
mod credential_verifier;

#[cfg(test)]
pub use admin_session_gate::MockAdminSessionGate;
pub use admin_session_gate::{AdminSessionGate, AdminToken};
#[cfg(test)]
pub use appointment_command::MockAppointmentCommand;
pub use appointment_command::AppointmentCommand;
#[cfg(test)]
pub use appointment_query::MockAppointmentQuery;
pub use appointment_query::AppointmentQuery;
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{AppointmentPersistenceError, AppointmentRepository};
#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
pub use credential_verifier::{CredentialVerifier, FixedCredentialVerifier};

#[cfg(test)]
mod tests;

//! Builders wiring repository adapters and services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use clinic_backend::domain::ports::{AppointmentCommand, AppointmentQuery, AppointmentRepository};
use clinic_backend::domain::{AdminTokenService, AppointmentService};
use clinic_backend::inbound::http::state::{HttpState, HttpStatePorts};
use clinic_backend::outbound::persistence::{
    DieselAppointmentRepository, InMemoryAppointmentRepository,
};

use super::ServerConfig;

type AppointmentPorts = (Arc<dyn AppointmentCommand>, Arc<dyn AppointmentQuery>);

fn appointment_ports<R>(repo: R, clock: Arc<dyn Clock>) -> AppointmentPorts
where
    R: AppointmentRepository + 'static,
{
    let service = Arc::new(AppointmentService::new(Arc::new(repo), clock));
    (service.clone(), service)
}

/// Build HTTP state from the server configuration.
///
/// Appointments persist through Diesel when a pool is configured and live in
/// memory otherwise.
pub(super) fn build_http_state(config: ServerConfig) -> web::Data<HttpState> {
    let cookie_policy = config.cookie_policy();
    let ServerConfig {
        token,
        credentials,
        db_pool,
        ..
    } = config;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    let (appointments, appointments_query) = match db_pool {
        Some(pool) => {
            info!("storing appointments in PostgreSQL");
            appointment_ports(DieselAppointmentRepository::new(pool), Arc::clone(&clock))
        }
        None => {
            info!("no database configured; storing appointments in memory");
            appointment_ports(InMemoryAppointmentRepository::new(), Arc::clone(&clock))
        }
    };
    let admin_gate = Arc::new(AdminTokenService::new(credentials, token.secret, clock));

    web::Data::new(HttpState::new(
        HttpStatePorts {
            appointments,
            appointments_query,
            admin_gate,
        },
        cookie_policy,
    ))
}

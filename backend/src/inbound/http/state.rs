//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use actix_web::cookie::SameSite;

use crate::domain::ports::{AdminSessionGate, AppointmentCommand, AppointmentQuery};

/// Attributes applied to the admin `token` cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookiePolicy {
    /// Mark the cookie `Secure`.
    pub secure: bool,
    /// `SameSite` attribute.
    pub same_site: SameSite,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            secure: true,
            same_site: SameSite::Strict,
        }
    }
}

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub appointments: Arc<dyn AppointmentCommand>,
    pub appointments_query: Arc<dyn AppointmentQuery>,
    pub admin_gate: Arc<dyn AdminSessionGate>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub appointments: Arc<dyn AppointmentCommand>,
    pub appointments_query: Arc<dyn AppointmentQuery>,
    pub admin_gate: Arc<dyn AdminSessionGate>,
    pub cookie_policy: CookiePolicy,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports, CookiePolicy::default())
    }
}

impl HttpState {
    /// Construct state from a ports bundle and cookie attributes.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use clinic_backend::domain::ports::FixedCredentialVerifier;
    /// use clinic_backend::domain::{AdminTokenService, AppointmentService, TokenSecret};
    /// use clinic_backend::inbound::http::state::{CookiePolicy, HttpState, HttpStatePorts};
    /// use clinic_backend::outbound::persistence::InMemoryAppointmentRepository;
    /// use mockable::DefaultClock;
    ///
    /// let service = Arc::new(AppointmentService::new(
    ///     Arc::new(InMemoryAppointmentRepository::new()),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let gate = Arc::new(AdminTokenService::new(
    ///     Arc::new(FixedCredentialVerifier::new("admin", "change-me")),
    ///     TokenSecret::generate(),
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         appointments: service.clone(),
    ///         appointments_query: service,
    ///         admin_gate: gate,
    ///     },
    ///     CookiePolicy::default(),
    /// );
    /// let _query = state.appointments_query.clone();
    /// ```
    pub fn new(ports: HttpStatePorts, cookie_policy: CookiePolicy) -> Self {
        let HttpStatePorts {
            appointments,
            appointments_query,
            admin_gate,
        } = ports;
        Self {
            appointments,
            appointments_query,
            admin_gate,
            cookie_policy,
        }
    }
}

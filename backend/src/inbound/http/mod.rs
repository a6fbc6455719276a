//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod admin_session;
pub mod appointments;
pub mod error;
pub mod export;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` handler on `cfg`.
///
/// JSON bodies that fail to deserialise are reported through the domain
/// error envelope rather than Actix's plain-text default.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use clinic_backend::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .service(appointments::create_appointment)
        .service(appointments::list_appointments)
        .service(appointments::get_appointment)
        .service(appointments::update_appointment_status)
        .service(appointments::delete_appointment)
        .service(admin::login)
        .service(admin::logout)
        .service(admin::verify)
        .service(admin::stats)
        .service(export::export_appointments);
}

//! Admin session and dashboard handlers.
//!
//! ```text
//! POST /api/admin/login {"username":"admin","password":"..."}
//! POST /api/admin/logout
//! GET  /api/admin/verify
//! GET  /api/admin/stats
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::domain::{DashboardStats, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin_session::{AdminSession, clearing_cookie, token_cookie};
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/admin/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Outcome of a login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    /// Instant after which the issued token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Generic acknowledgement body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_owned(),
        }
    }
}

/// Body of `GET /api/admin/verify` for a valid token.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    /// Username the token was issued to.
    pub username: String,
    /// Instant after which the token is rejected.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Blank fields can never match the configured pair, so they fail like any
/// other wrong credentials.
fn map_login_validation_error(err: LoginValidationError) -> Error {
    debug!(error = %err, "admin login rejected before verification");
    Error::unauthorized("invalid credentials")
}

/// Exchange admin credentials for a token cookie.
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "HttpOnly admin token cookie"))),
        (status = 400, description = "Malformed body", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminLogin",
    security([])
)]
#[post("/admin/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let issued = state.admin_gate.authenticate(&credentials).await?;
    info!(expires_at = %issued.expires_at, "admin token issued");
    let cookie = token_cookie(issued.token, issued.expires_at, state.cookie_policy);
    Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
        success: true,
        message: "login successful".to_owned(),
        expires_at: issued.expires_at,
    }))
}

/// Discard the client's token cookie. Tokens are not revoked server-side.
#[utoipa::path(
    post,
    path = "/api/admin/logout",
    responses((status = 200, description = "Cookie cleared", body = AckResponse)),
    tags = ["admin"],
    operation_id = "adminLogout",
    security([])
)]
#[post("/admin/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .cookie(clearing_cookie(state.cookie_policy))
        .json(AckResponse::ok("logged out"))
}

/// Report whether the presented token is still valid.
#[utoipa::path(
    get,
    path = "/api/admin/verify",
    responses(
        (status = 200, description = "Token valid", body = VerifyResponse),
        (status = 401, description = "Token missing, invalid, or expired", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminVerify"
)]
#[get("/admin/verify")]
pub async fn verify(admin: AdminSession) -> web::Json<VerifyResponse> {
    web::Json(VerifyResponse {
        success: true,
        username: admin.username().to_owned(),
        expires_at: admin.expires_at(),
    })
}

/// Appointment counts for today, this week, and this month.
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Dashboard counts", body = DashboardStats),
        (status = 401, description = "Admin token required", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminStats"
)]
#[get("/admin/stats")]
pub async fn stats(
    _admin: AdminSession,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<DashboardStats>> {
    let stats = state.appointments_query.dashboard_stats().await?;
    Ok(web::Json(stats))
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;

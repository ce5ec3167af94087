//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{extract::State, Json};
use chrono::Local;
use tracing::info;

use super::dto::{
    AccountDump, AnalysisResult, ApiEnvelope, AuthResponse, BirthdayRequest, HealthResponse,
    LoginRequest, MessageResponse, RegisterRequest, SendCodeRequest, StatusResponse, TestAccount,
    ValidateCodeRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::services::accounts::AccountError;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Routes advertised on the status page.
pub const ENDPOINTS: &[&str] = &[
    "POST /analyze/birthday - birthday fortune series",
    "POST /auth/login - user login",
    "POST /register/send_code - send verification code",
    "POST /register/validate_code - check verification code",
    "POST /register/submit - user registration",
    "GET /debug/codes - dump codes and users",
];

/// Turn an account outcome into an envelope. Business failures become
/// `success: false`; store failures become an HTTP error.
fn envelope<T, P>(
    operation: &str,
    result: Result<T, AccountError>,
    on_success: impl FnOnce(T) -> (String, Option<P>),
) -> HandlerResult<ApiEnvelope<P>> {
    match result {
        Ok(value) => {
            let (message, payload) = on_success(value);
            Ok(Json(ApiEnvelope::success(message, payload)))
        }
        Err(AccountError::Store(e)) => Err(AppError::Repository(e)),
        Err(e) => {
            info!(operation, reason = %e, kind = ?e.kind(), "Request rejected");
            Ok(Json(ApiEnvelope::failure(e.to_string())))
        }
    }
}

// =============================================================================
// Fortune
// =============================================================================

/// POST /analyze/birthday
///
/// Return the 90-day health/career/love series for a birthday.
pub async fn analyze_birthday(
    State(state): State<AppState>,
    Json(request): Json<BirthdayRequest>,
) -> HandlerResult<AnalysisResult> {
    info!(birthday = %request.birthday, "Received birthday");
    let today = Local::now().date_naive();
    let result = state.analyzer.analyze(&request.birthday, today)?;
    Ok(Json(result))
}

// =============================================================================
// Accounts
// =============================================================================

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<AuthResponse> {
    let result = state
        .accounts
        .login(&request.username, &request.password)
        .await;
    envelope("login", result, |session| {
        ("Login successful".to_string(), Some(session))
    })
}

/// POST /register/send_code
///
/// The mock has no mail transport, so the code is echoed in the message.
pub async fn send_code(
    State(state): State<AppState>,
    Json(request): Json<SendCodeRequest>,
) -> HandlerResult<MessageResponse> {
    let result = state.accounts.send_code(&request.email).await;
    envelope("send_code", result, |code| {
        (
            format!(
                "Verification code sent to {} (test code: {})",
                request.email, code
            ),
            None,
        )
    })
}

/// POST /register/validate_code
pub async fn validate_code(
    State(state): State<AppState>,
    Json(request): Json<ValidateCodeRequest>,
) -> HandlerResult<MessageResponse> {
    let result = state
        .accounts
        .validate_code(&request.email, &request.verification_code)
        .await;
    envelope("validate_code", result, |()| {
        ("Verification code is valid".to_string(), None)
    })
}

/// POST /register/submit
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> HandlerResult<AuthResponse> {
    let result = state.accounts.register(request).await;
    envelope("register", result, |session| {
        ("Registration successful".to_string(), Some(session))
    })
}

// =============================================================================
// Diagnostics
// =============================================================================

/// GET /
///
/// Server status snapshot.
pub async fn root_status(State(state): State<AppState>) -> HandlerResult<StatusResponse> {
    let stats = state.accounts.stats().await?;
    let test_account = state.config.seed_account.as_ref().map(|seed| TestAccount {
        username: seed.email.clone(),
        password: seed.password.clone(),
    });

    Ok(Json(StatusResponse {
        message: "Timing mock server running".to_string(),
        port: state.config.port,
        test_account,
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        registered_users: stats.registered_users,
        verification_codes_sent: stats.verification_codes_sent,
    }))
}

/// GET /debug/codes
///
/// Every verification code and registered email. Unauthenticated.
pub async fn debug_codes(State(state): State<AppState>) -> HandlerResult<AccountDump> {
    Ok(Json(state.accounts.dump().await?))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.accounts.repository().health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

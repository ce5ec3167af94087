//! Data Transfer Objects for the HTTP API.
//!
//! Account endpoints all answer with one [`ApiEnvelope`]; the payload is
//! flattened so the wire shape stays `{success, message, token?, ...}`.

use serde::{Deserialize, Serialize};

pub use crate::models::{AnalysisResult, NewAccount, Session, TimeValuePair};
pub use crate::services::accounts::AccountDump;

/// Request body of `POST /analyze/birthday`. Only `birthday` is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BirthdayRequest {
    /// Day of birth, `YYYY-MM-DD`
    pub birthday: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Request body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account email
    pub username: String,
    pub password: String,
}

/// Request body of `POST /register/send_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

/// Request body of `POST /register/validate_code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateCodeRequest {
    pub email: String,
    pub verification_code: String,
}

/// Request body of `POST /register/submit`.
pub type RegisterRequest = NewAccount;

/// Empty payload for envelopes that only carry a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoPayload {}

/// Common response of the account endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEnvelope<T = NoPayload> {
    pub success: bool,
    pub message: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn success(message: impl Into<String>, payload: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
        }
    }
}

/// Response of login and registration.
pub type AuthResponse = ApiEnvelope<Session>;
/// Response of the code endpoints.
pub type MessageResponse = ApiEnvelope<NoPayload>;

/// Demo credentials advertised on the status page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestAccount {
    pub username: String,
    pub password: String,
}

/// Response of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_account: Option<TestAccount>,
    pub endpoints: Vec<String>,
    pub registered_users: usize,
    pub verification_codes_sent: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Crate version
    pub version: String,
    /// Account store status
    pub database: String,
}

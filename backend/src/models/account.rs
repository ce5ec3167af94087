use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of digits in a verification code.
pub const CODE_LEN: usize = 6;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub name: String,
    /// Hex encoded SHA-256 of the password.
    pub password_digest: String,
    pub registered_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: &str,
        registered_at: DateTime<Utc>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password_digest: password_digest(password),
            registered_at,
        }
    }

    pub fn password_matches(&self, password: &str) -> bool {
        self.password_digest == password_digest(password)
    }

    /// Part of the email before `@`, used as the public username.
    pub fn username(&self) -> &str {
        local_part(&self.email)
    }
}

/// A verification code issued for an email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationCode {
    pub code: String,
    #[serde(rename = "timestamp")]
    pub issued_at: DateTime<Utc>,
    pub used: bool,
}

impl VerificationCode {
    pub fn new(code: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            code: code.into(),
            issued_at,
            used: false,
        }
    }

    /// A code is expired once strictly more than `ttl` has elapsed since issue.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now - self.issued_at > ttl
    }
}

/// Credentials handed back after a successful login or registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub name: String,
}

impl Session {
    pub fn for_user(user: &UserRecord) -> Self {
        let username = user.username().to_string();
        Self {
            token: format!("token_{}", username),
            username,
            name: user.name.clone(),
        }
    }
}

/// Registration form as submitted by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub verification_code: String,
    pub password: String,
    pub confirm_password: String,
}

pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_password_is_not_stored_in_clear() {
        let user = UserRecord::new("a@b.com", "A", "secret", at(0));
        assert_ne!(user.password_digest, "secret");
        assert_eq!(user.password_digest.len(), 64);
        assert!(user.password_matches("secret"));
        assert!(!user.password_matches("Secret"));
    }

    #[test]
    fn test_session_uses_local_part() {
        let user = UserRecord::new("admin@example.com", "Administrator", "123456", at(0));
        let session = Session::for_user(&user);
        assert_eq!(session.username, "admin");
        assert_eq!(session.token, "token_admin");
        assert_eq!(session.name, "Administrator");
    }

    #[test]
    fn test_local_part_without_at_sign() {
        assert_eq!(local_part("plainname"), "plainname");
    }

    #[test]
    fn test_code_expiry_boundary() {
        let code = VerificationCode::new("123456", at(0));
        let ttl = Duration::seconds(600);
        assert!(!code.is_expired(at(600), ttl));
        assert!(code.is_expired(at(601), ttl));
    }

    #[test]
    fn test_code_serializes_timestamp_field() {
        let code = VerificationCode::new("000042", at(0));
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["code"], "000042");
        assert_eq!(json["used"], false);
        assert!(json.get("timestamp").is_some());
    }
}

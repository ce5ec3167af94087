//! Login and registration rules on top of an [`AccountRepository`].
//!
//! Business failures (wrong password, stale code, ...) come back as
//! [`AccountError`] variants the HTTP layer turns into `success: false`
//! envelopes. Store failures are carried in [`AccountError::Store`].

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::codes::generate_code;
use crate::clock::Clock;
use crate::db::repository::{AccountRepository, RepositoryError, CODE_ENTITY, USER_ENTITY};
use crate::models::{NewAccount, Session, UserRecord, VerificationCode};

/// Default lifetime of a verification code.
pub const DEFAULT_CODE_TTL_SECS: i64 = 600;

/// Broad category of an [`AccountError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountErrorKind {
    Validation,
    NotFound,
    Expired,
    Conflict,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Email already registered, please log in")]
    AlreadyRegistered,
    #[error("Please request a verification code first")]
    CodeNotRequested,
    #[error("Verification code is incorrect")]
    CodeMismatch,
    #[error("Verification code already used, please request a new one")]
    CodeAlreadyUsed,
    #[error("Verification code expired, please request a new one")]
    CodeExpired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Account store failure: {0}")]
    Store(#[from] RepositoryError),
}

impl AccountError {
    pub fn kind(&self) -> AccountErrorKind {
        match self {
            Self::InvalidCredentials | Self::CodeNotRequested => AccountErrorKind::NotFound,
            Self::CodeMismatch | Self::CodeAlreadyUsed | Self::PasswordMismatch => {
                AccountErrorKind::Validation
            }
            Self::CodeExpired => AccountErrorKind::Expired,
            Self::AlreadyRegistered => AccountErrorKind::Conflict,
            Self::Store(_) => AccountErrorKind::Internal,
        }
    }
}

/// Counters shown on the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub registered_users: usize,
    pub verification_codes_sent: usize,
}

/// Full dump of the account store for the debug endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDump {
    pub verification_codes: BTreeMap<String, VerificationCode>,
    pub registered_users: Vec<String>,
}

/// Account operations shared by all handlers.
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
    clock: Arc<dyn Clock>,
    code_ttl: Duration,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepository>,
        clock: Arc<dyn Clock>,
        code_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            clock,
            code_ttl,
        }
    }

    pub fn repository(&self) -> &Arc<dyn AccountRepository> {
        &self.repository
    }

    pub fn code_ttl(&self) -> Duration {
        self.code_ttl
    }

    /// Check an email/password pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AccountError> {
        debug!(%username, "Login attempt");
        match self.repository.find_user(username).await? {
            Some(user) if user.password_matches(password) => {
                info!(%username, "Login succeeded");
                Ok(Session::for_user(&user))
            }
            _ => Err(AccountError::InvalidCredentials),
        }
    }

    /// Issue a fresh code for an unregistered email and return it.
    ///
    /// Any earlier code for the same email is replaced.
    pub async fn send_code(&self, email: &str) -> Result<String, AccountError> {
        if self.repository.find_user(email).await?.is_some() {
            return Err(AccountError::AlreadyRegistered);
        }

        let code = generate_code();
        self.repository
            .put_code(email, VerificationCode::new(code.clone(), self.clock.now()))
            .await?;
        info!(%email, "Issued verification code");
        Ok(code)
    }

    /// Check a code without consuming it.
    pub async fn validate_code(&self, email: &str, code: &str) -> Result<(), AccountError> {
        debug!(%email, "Validating verification code");
        self.check_code(email, code).await.map(|_| ())
    }

    /// Register a new account and consume its verification code.
    pub async fn register(&self, form: NewAccount) -> Result<Session, AccountError> {
        debug!(email = %form.email, name = %form.name, "Registration attempt");
        self.check_code(&form.email, &form.verification_code).await?;

        if form.password != form.confirm_password {
            return Err(AccountError::PasswordMismatch);
        }

        let user = UserRecord::new(
            form.email.clone(),
            form.name.clone(),
            &form.password,
            self.clock.now(),
        );
        let session = Session::for_user(&user);
        self.repository
            .complete_registration(user, &form.verification_code)
            .await
            .map_err(registration_error)?;

        info!(email = %form.email, "Registration succeeded");
        Ok(session)
    }

    pub async fn stats(&self) -> Result<AccountStats, AccountError> {
        Ok(AccountStats {
            registered_users: self.repository.user_count().await?,
            verification_codes_sent: self.repository.code_count().await?,
        })
    }

    pub async fn dump(&self) -> Result<AccountDump, AccountError> {
        Ok(AccountDump {
            verification_codes: self.repository.list_codes().await?,
            registered_users: self.repository.list_user_emails().await?,
        })
    }

    /// Drop every code older than the TTL. Returns how many were removed.
    pub async fn purge_expired_codes(&self) -> Result<usize, AccountError> {
        let cutoff = self.clock.now() - self.code_ttl;
        let removed = self.repository.purge_codes_issued_before(cutoff).await?;
        if removed > 0 {
            info!(removed, "Purged expired verification codes");
        }
        Ok(removed)
    }

    /// Existence, exact match, unused, not expired; in that order.
    async fn check_code(&self, email: &str, code: &str) -> Result<VerificationCode, AccountError> {
        let stored = self
            .repository
            .get_code(email)
            .await?
            .ok_or(AccountError::CodeNotRequested)?;

        if stored.code != code {
            return Err(AccountError::CodeMismatch);
        }
        if stored.used {
            return Err(AccountError::CodeAlreadyUsed);
        }
        if stored.is_expired(self.clock.now(), self.code_ttl) {
            return Err(AccountError::CodeExpired);
        }
        Ok(stored)
    }
}

/// Map a failed `complete_registration` back to the business failure it
/// stands for. The code may have been purged, replaced or consumed between
/// `check_code` and the store update.
fn registration_error(err: RepositoryError) -> AccountError {
    let on_code = err.entity() == Some(CODE_ENTITY);
    let on_user = err.entity() == Some(USER_ENTITY);
    match err {
        RepositoryError::NotFound { .. } if on_code => AccountError::CodeNotRequested,
        RepositoryError::Conflict { .. } if on_code => AccountError::CodeAlreadyUsed,
        RepositoryError::Conflict { .. } if on_user => AccountError::AlreadyRegistered,
        other => AccountError::Store(other),
    }
}

/// Run [`AccountService::purge_expired_codes`] every `every` until the task is aborted.
pub fn spawn_code_sweeper(
    service: AccountService,
    every: std::time::Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // First tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = service.purge_expired_codes().await {
                warn!(error = %e, "Expired code purge failed");
            }
        }
    })
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod accounts_tests;

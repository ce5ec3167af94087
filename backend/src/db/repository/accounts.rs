//! Account repository trait: the user directory and the verification code
//! directory used by the registration flow.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::error::RepositoryResult;
use crate::models::{UserRecord, VerificationCode};

/// Storage for registered users and pending verification codes.
///
/// Keys are email addresses, compared verbatim.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared across handlers.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Look up a registered user by email.
    async fn find_user(&self, email: &str) -> RepositoryResult<Option<UserRecord>>;

    /// Number of registered users.
    async fn user_count(&self) -> RepositoryResult<usize>;

    /// Registered emails in ascending order.
    async fn list_user_emails(&self) -> RepositoryResult<Vec<String>>;

    /// Current verification code for an email, if one was issued.
    async fn get_code(&self, email: &str) -> RepositoryResult<Option<VerificationCode>>;

    /// Store a code for an email, replacing any previous one.
    async fn put_code(&self, email: &str, code: VerificationCode) -> RepositoryResult<()>;

    /// Store `user` and consume the code `code` issued for its email, as one
    /// step: either both happen or neither does.
    ///
    /// # Errors
    /// - `RepositoryError::NotFound` (entity `verification_code`) when no
    ///   unused code equal to `code` is pending for the email.
    /// - `RepositoryError::Conflict` (entity `verification_code`) when that
    ///   code was already consumed.
    /// - `RepositoryError::Conflict` (entity `user`) when the email is
    ///   already registered.
    async fn complete_registration(&self, user: UserRecord, code: &str) -> RepositoryResult<()>;

    /// Number of stored codes (used or not).
    async fn code_count(&self) -> RepositoryResult<usize>;

    /// Every stored code keyed by email.
    async fn list_codes(&self) -> RepositoryResult<BTreeMap<String, VerificationCode>>;

    /// Remove every code issued before `cutoff`. Returns the number removed.
    async fn purge_codes_issued_before(&self, cutoff: DateTime<Utc>) -> RepositoryResult<usize>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;
}

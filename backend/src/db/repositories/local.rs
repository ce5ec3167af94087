//! In-memory account repository.
//!
//! Users and verification codes live in two maps guarded by
//! `parking_lot::RwLock`. Nothing is persisted; a restart starts empty.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::db::repository::{
    AccountRepository, ErrorContext, RepositoryError, RepositoryResult, CODE_ENTITY, USER_ENTITY,
};
use crate::models::{UserRecord, VerificationCode};

/// In-memory implementation of [`AccountRepository`].
#[derive(Clone, Default)]
pub struct LocalRepository {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
    codes: Arc<RwLock<HashMap<String, VerificationCode>>>,
}

impl LocalRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with the given users.
    pub fn with_users(users: impl IntoIterator<Item = UserRecord>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.users.write();
            for user in users {
                map.insert(user.email.clone(), user);
            }
        }
        repo
    }
}

#[async_trait]
impl AccountRepository for LocalRepository {
    async fn find_user(&self, email: &str) -> RepositoryResult<Option<UserRecord>> {
        Ok(self.users.read().get(email).cloned())
    }

    async fn user_count(&self) -> RepositoryResult<usize> {
        Ok(self.users.read().len())
    }

    async fn list_user_emails(&self) -> RepositoryResult<Vec<String>> {
        let mut emails: Vec<String> = self.users.read().keys().cloned().collect();
        emails.sort();
        Ok(emails)
    }

    async fn get_code(&self, email: &str) -> RepositoryResult<Option<VerificationCode>> {
        Ok(self.codes.read().get(email).cloned())
    }

    async fn put_code(&self, email: &str, code: VerificationCode) -> RepositoryResult<()> {
        self.codes.write().insert(email.to_string(), code);
        Ok(())
    }

    async fn complete_registration(&self, user: UserRecord, code: &str) -> RepositoryResult<()> {
        // Lock order: users, then codes.
        let mut users = self.users.write();
        let mut codes = self.codes.write();
        let context = || ErrorContext::new("complete_registration").with_entity_id(&user.email);

        let pending = match codes.get_mut(&user.email) {
            Some(pending) if pending.code == code => pending,
            _ => {
                return Err(RepositoryError::not_found_with_context(
                    "no matching verification code",
                    context().with_entity(CODE_ENTITY),
                ))
            }
        };
        if pending.used {
            return Err(RepositoryError::conflict_with_context(
                "verification code already consumed",
                context().with_entity(CODE_ENTITY),
            ));
        }
        if users.contains_key(&user.email) {
            return Err(RepositoryError::conflict_with_context(
                "email already registered",
                context().with_entity(USER_ENTITY),
            ));
        }

        pending.used = true;
        users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn code_count(&self) -> RepositoryResult<usize> {
        Ok(self.codes.read().len())
    }

    async fn list_codes(&self) -> RepositoryResult<BTreeMap<String, VerificationCode>> {
        Ok(self
            .codes
            .read()
            .iter()
            .map(|(email, code)| (email.clone(), code.clone()))
            .collect())
    }

    async fn purge_codes_issued_before(&self, cutoff: DateTime<Utc>) -> RepositoryResult<usize> {
        let mut codes = self.codes.write();
        let before = codes.len();
        codes.retain(|_, code| code.issued_at >= cutoff);
        Ok(before - codes.len())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}

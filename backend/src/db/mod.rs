//! Account storage.
//!
//! The user directory and the verification code directory sit behind the
//! [`AccountRepository`] trait so the in-memory store can be replaced by a
//! real database and so tests can inject their own instance.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  AccountService (services/accounts.rs)                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  AccountRepository trait (repository/accounts.rs)        │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  LocalRepository (in-memory, parking_lot::RwLock)        │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod repositories;
pub mod repository;

pub use repositories::LocalRepository;
pub use repository::{AccountRepository, ErrorContext, RepositoryError, RepositoryResult};

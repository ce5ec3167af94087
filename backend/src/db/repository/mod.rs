//! Repository traits and their error types.

pub mod accounts;
pub mod error;

pub use accounts::AccountRepository;
pub use error::{ErrorContext, RepositoryError, RepositoryResult, CODE_ENTITY, USER_ENTITY};

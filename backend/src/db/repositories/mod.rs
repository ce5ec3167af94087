//! Repository implementations.
//!
//! - `local`: in-memory implementation used by the server and the tests
pub mod local;

pub use local::LocalRepository;

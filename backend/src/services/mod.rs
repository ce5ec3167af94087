//! Service layer for business logic.
//!
//! Series generation and windowing are pure functions over a shared
//! [`series::SeriesBank`]; account rules sit on top of the repository trait.

pub mod accounts;
pub mod analysis;
pub mod codes;
pub mod series;
pub mod time_points;

pub use accounts::{AccountError, AccountErrorKind, AccountService};
pub use analysis::{AnalysisError, FortuneAnalyzer, WindowPolicy};
pub use series::{generate_long_series, SeriesBank};
pub use time_points::generate_time_points;

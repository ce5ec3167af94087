//! # Timing mock backend
//!
//! Two small mock services behind one axum server:
//!
//! - **Fortune series**: three bounded random walks (health, career, love)
//!   generated once at startup; each request slices a birthday-dependent
//!   90-day window out of them and pairs it with a 2-hour timestamp grid.
//! - **Account simulator**: login, email verification codes and
//!   registration over an in-memory store.
//!
//! ## Architecture
//!
//! - [`models`]: domain types (series, time points, users, codes)
//! - [`services`]: series generation, windowing, account rules
//! - [`db`]: account repository trait and the in-memory implementation
//! - [`config`]: environment and TOML configuration
//! - [`clock`]: injectable time source
//! - [`http`]: axum router, handlers and DTOs

pub mod clock;
pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;

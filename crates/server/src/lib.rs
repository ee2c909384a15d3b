//! HTTP front end for the fixpoint toolkit.
//!
//! - [`api`] — request and response bodies, and the two operations
//!   [`generate_candidates`](api::generate_candidates) and
//!   [`solve`](api::solve)
//! - [`routes`] — warp filters for `/suggest_g`, `/solve` and `/health`
//! - [`config`] — service configuration from defaults, a TOML file, the
//!   environment and the command line

pub mod api;
pub mod config;
pub mod routes;

/// Crate version reported by `/health` and at startup.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

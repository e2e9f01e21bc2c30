//! # Clan Dashboard
//!
//! Reads a clan's data from the Clash of Clans API and reshapes it for a
//! dashboard front end.
//!
//! ## Architecture
//!
//! - **models**: Upstream documents (current war, clan profile, war log, raids)
//! - **fetch**: Authenticated upstream client and its error taxonomy
//! - **calculate**: War pairings, best attacks, totals and portal views
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod fetch;
pub mod models;

pub use models::*;

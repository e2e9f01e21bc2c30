//! Reshaping of upstream documents into dashboard views.
//!
//! Everything in here is pure: documents in, views out.
//! - War pairing, best-attack selection and totals
//! - Mirror and roster views of the current war
//! - Clan portal summary and capital raid summary
//! - Timestamp normalization

pub mod mirror;
pub mod raids;
pub mod roster;
pub mod summary;
pub mod time;
pub mod war;

pub use mirror::{build_mirror, MirrorReport};
pub use raids::{summarize_raids, RaidSummary};
pub use roster::{build_roster_view, RosterView};
pub use summary::{build_summary, PortalSummary};
pub use time::{normalize_opt, normalize_timestamp};
pub use war::{build_pairings, compute_totals, select_best, PairingResult};

/// Round a destruction percentage to two decimals.
pub fn round_percentage(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

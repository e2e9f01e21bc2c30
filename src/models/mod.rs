//! Upstream document models and shared identifiers.

mod clan;
mod raid;
mod tag;
mod war;

pub use clan::*;
pub use raid::*;
pub use tag::*;
pub use war::*;

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` as the type's default.
///
/// Struct-level `#[serde(default)]` only covers absent keys.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

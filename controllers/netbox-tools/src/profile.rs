//! Reservation profiles
//!
//! Named presets for how many leading usable hosts of a prefix are never
//! handed out. The engine only sees the resulting count.

use clap::ValueEnum;
use serde::Serialize;

/// Skip-count preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationProfile {
    /// Nothing reserved
    None,
    /// First usable host is the gateway
    Gateway,
    /// Gateway plus the five hosts Azure keeps for itself
    Azure,
    /// Addresses handed to virtual machines start at the sixth host
    Vm,
}

impl ReservationProfile {
    /// Leading usable hosts skipped under this profile
    #[must_use]
    pub fn skip_count(self) -> usize {
        match self {
            ReservationProfile::None => 0,
            ReservationProfile::Gateway => 1,
            ReservationProfile::Azure => 6,
            ReservationProfile::Vm => 5,
        }
    }

    /// Explicit `--skip` wins over the profile
    #[must_use]
    pub fn resolve(self, explicit: Option<usize>) -> usize {
        explicit.unwrap_or_else(|| self.skip_count())
    }
}

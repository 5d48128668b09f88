//! Collection frequency.
//!
//! The event store keeps frequency as a raw day count where `0` means "no
//! fixed recurrence". [`Frequency`] lifts that sentinel into the type so the
//! scheduler never performs date arithmetic on an ad hoc obligation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// How often an analyzed item must be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Collect again every `n` days.
    Recurring(NonZeroU32),
    /// Event-driven sampling with no periodic schedule.
    AdHoc,
}

impl Frequency {
    /// Convert a stored day count. Zero and negative values are ad hoc;
    /// values beyond `u32::MAX` saturate.
    #[must_use]
    pub fn from_days(days: i64) -> Self {
        if days <= 0 {
            return Self::AdHoc;
        }
        let days = u32::try_from(days).unwrap_or(u32::MAX);
        NonZeroU32::new(days).map_or(Self::AdHoc, Self::Recurring)
    }

    /// The recurrence interval in days, if any.
    #[must_use]
    pub const fn days(self) -> Option<u32> {
        match self {
            Self::Recurring(days) => Some(days.get()),
            Self::AdHoc => None,
        }
    }

    #[must_use]
    pub const fn is_ad_hoc(self) -> bool {
        matches!(self, Self::AdHoc)
    }
}

/// Renders the way inspectors read it on the agenda: `30 dias` or
/// `Eventual`.
impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recurring(days) => write!(f, "{days} dias"),
            Self::AdHoc => f.write_str("Eventual"),
        }
    }
}

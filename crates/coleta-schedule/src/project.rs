//! Schedule projector: due dates, urgency, and ordering.
//!
//! Takes the reducer's seeds and produces the final agenda. Recurring
//! obligations get `last_collection_date + frequency` as their next due date
//! and an [`Urgency`] relative to the evaluation date. Ad hoc obligations are
//! kept with neither.
//!
//! Ordering is ascending by due date, entries without a due date last. The
//! sort is stable, so ties keep the reducer's first-seen order.

use std::cmp::Ordering;

use chrono::{Days, NaiveDate};
use coleta_core::config::ScheduleConfig;
use coleta_core::model::{EstablishmentItemKey, Frequency};
use serde::Serialize;

use crate::reduce::ScheduleSeed;
use crate::urgency::Urgency;

/// One row of the computed agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    #[serde(flatten)]
    pub key: EstablishmentItemKey,
    pub establishment_name: String,
    pub last_collection_date: NaiveDate,
    pub frequency: Frequency,
    pub next_due_date: Option<NaiveDate>,
    pub urgency: Option<Urgency>,
}

impl ScheduleEntry {
    #[must_use]
    pub const fn is_ad_hoc(&self) -> bool {
        self.frequency.is_ad_hoc()
    }
}

/// Next due date for a recurring obligation.
///
/// `None` for ad hoc obligations, and for the (theoretical) case where the
/// addition leaves chrono's representable range.
#[must_use]
pub fn next_due_date(last_collection_date: NaiveDate, frequency: Frequency) -> Option<NaiveDate> {
    let days = frequency.days()?;
    last_collection_date.checked_add_days(Days::new(u64::from(days)))
}

/// Project seeds with the default schedule configuration.
#[must_use]
pub fn project(seeds: Vec<ScheduleSeed>, today: NaiveDate) -> Vec<ScheduleEntry> {
    project_with(seeds, today, &ScheduleConfig::default())
}

/// Project seeds into ordered schedule entries.
#[must_use]
pub fn project_with(
    seeds: Vec<ScheduleSeed>,
    today: NaiveDate,
    config: &ScheduleConfig,
) -> Vec<ScheduleEntry> {
    let mut entries: Vec<ScheduleEntry> = seeds
        .into_iter()
        .map(|seed| {
            let due = next_due_date(seed.last_collection_date, seed.frequency);
            ScheduleEntry {
                key: seed.key,
                establishment_name: seed.establishment_name,
                last_collection_date: seed.last_collection_date,
                frequency: seed.frequency,
                next_due_date: due,
                urgency: due.map(|d| Urgency::classify(d, today, config.due_soon_days)),
            }
        })
        .collect();

    entries.sort_by(|a, b| compare_due(a.next_due_date, b.next_due_date));
    entries
}

/// Ascending by date, with absent dates after every present one.
#[must_use]
pub fn compare_due(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Per-urgency counts over a projected schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleSummary {
    pub overdue: usize,
    pub due_soon: usize,
    pub ok: usize,
    pub ad_hoc: usize,
}

impl ScheduleSummary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.overdue + self.due_soon + self.ok + self.ad_hoc
    }
}

#[must_use]
pub fn summarize(entries: &[ScheduleEntry]) -> ScheduleSummary {
    let mut summary = ScheduleSummary::default();
    for entry in entries {
        match entry.urgency {
            Some(Urgency::Overdue) => summary.overdue += 1,
            Some(Urgency::DueSoon) => summary.due_soon += 1,
            Some(Urgency::Ok) => summary.ok += 1,
            None => summary.ad_hoc += 1,
        }
    }
    summary
}

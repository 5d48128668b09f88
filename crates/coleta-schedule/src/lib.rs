#![forbid(unsafe_code)]
//! coleta-schedule library.
//!
//! Turns a collection event history into an ordered agenda of upcoming
//! sample collections.
//!
//! # Pipeline
//!
//! 1. [`EventSource`] yields events newest submission first.
//! 2. [`reduce`] keeps the latest event per establishment and analyzed item.
//! 3. [`project_with`] adds due dates and urgency, then sorts.
//!
//! Both stages are pure functions of their inputs; `today` is always passed
//! in explicitly.

pub mod display;
pub mod project;
pub mod reduce;
pub mod urgency;

use chrono::NaiveDate;
use coleta_core::config::ScheduleConfig;
use coleta_core::source::{EventSource, SourceError};
use tracing::{info, instrument};

pub use project::{
    ScheduleEntry, ScheduleSummary, compare_due, next_due_date, project, project_with, summarize,
};
pub use reduce::{ReduceStats, ScheduleSeed, reduce, reduce_with_stats};
pub use urgency::Urgency;

/// Read the event history from `source` and compute the agenda for `today`.
///
/// # Errors
///
/// Returns the source's error if the history cannot be read.
#[instrument(skip(source, config))]
pub fn build_schedule<S: EventSource + ?Sized>(
    source: &S,
    today: NaiveDate,
    config: &ScheduleConfig,
) -> Result<Vec<ScheduleEntry>, SourceError> {
    let events = source.collection_events()?;
    let (seeds, stats) = reduce_with_stats(&events);
    let entries = project_with(seeds, today, config);
    info!(
        events = events.len(),
        kept = stats.kept,
        superseded = stats.superseded,
        skipped = stats.skipped,
        "schedule built"
    );
    Ok(entries)
}

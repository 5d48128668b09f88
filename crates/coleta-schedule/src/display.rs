//! Presentation helpers shared by the CLI renderers.

use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use coleta_core::config::DEFAULT_DATE_FORMAT;
use coleta_core::model::Frequency;
use tracing::warn;

use crate::project::ScheduleEntry;
use crate::urgency::Urgency;

/// Placeholder shown where an entry has no due date.
pub const NO_DATE: &str = "N/A";

/// Whether `pattern` is a strftime pattern chrono can render.
#[must_use]
pub fn is_valid_date_format(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Format a date with `pattern`, falling back to `dd/mm/yyyy` on a bad
/// pattern.
#[must_use]
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    if is_valid_date_format(pattern) {
        date.format(pattern).to_string()
    } else {
        warn!(pattern, "invalid date format, using default");
        date.format(DEFAULT_DATE_FORMAT).to_string()
    }
}

/// Due date as shown in the agenda, or [`NO_DATE`].
#[must_use]
pub fn due_date_display(entry: &ScheduleEntry, pattern: &str) -> String {
    entry
        .next_due_date
        .map_or_else(|| NO_DATE.to_string(), |d| format_date(d, pattern))
}

#[must_use]
pub fn frequency_display(frequency: Frequency) -> String {
    frequency.to_string()
}

/// Row tag for an entry; empty for entries that need no highlight.
#[must_use]
pub fn status_tag(entry: &ScheduleEntry) -> &'static str {
    entry.urgency.and_then(Urgency::status_tag).unwrap_or("")
}

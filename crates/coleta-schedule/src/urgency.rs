use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// How close a projected due date is, relative to the evaluation date.
///
/// Obligations without a due date have no urgency at all (`Option::None`),
/// which is deliberately not the same as [`Urgency::Ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    /// The due date has passed.
    Overdue,
    /// Due today or within the due-soon window.
    DueSoon,
    /// Due beyond the window.
    Ok,
}

impl Urgency {
    /// Classify a due date against `today` with a window of `due_soon_days`.
    ///
    /// - `due < today` → [`Urgency::Overdue`]
    /// - `today <= due <= today + due_soon_days` → [`Urgency::DueSoon`]
    /// - otherwise → [`Urgency::Ok`]
    #[must_use]
    pub fn classify(due: NaiveDate, today: NaiveDate, due_soon_days: u32) -> Self {
        let diff_days = due.signed_duration_since(today).num_days();
        if diff_days < 0 {
            Self::Overdue
        } else if diff_days <= i64::from(due_soon_days) {
            Self::DueSoon
        } else {
            Self::Ok
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::DueSoon => "due_soon",
            Self::Ok => "ok",
        }
    }

    /// CSS-like row tag consumed by the agenda table.
    #[must_use]
    pub const fn status_tag(self) -> Option<&'static str> {
        match self {
            Self::Overdue => Some("status-vencido"),
            Self::DueSoon => Some("status-atencao"),
            Self::Ok => None,
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! `coleta agenda`: upcoming sample collections, most urgent first.
//!
//! Reads the event history from the store (or a JSON snapshot), reduces it
//! to one obligation per establishment and analyzed item, and renders the
//! projected due dates.

use crate::cmd::{load_project_config, open_project_store, report};
use crate::output::{OutputMode, pretty_rule, pretty_section, render_mode};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use coleta_core::config::ProjectConfig;
use coleta_core::error::ColetaError;
use coleta_core::source::{SnapshotEventSource, SqliteEventSource};
use coleta_schedule::display::{due_date_display, format_date, frequency_display, status_tag};
use coleta_schedule::{ScheduleEntry, ScheduleSummary, Urgency, build_schedule, summarize};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct AgendaArgs {
    /// Evaluate urgency as of this date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_name = "DATE")]
    pub today: Option<String>,

    /// Read events from a JSON snapshot instead of the project store.
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Only show entries with this status.
    #[arg(long, value_enum)]
    pub status: Option<StatusFilter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    Overdue,
    DueSoon,
    Ok,
    AdHoc,
}

impl StatusFilter {
    fn matches(self, entry: &ScheduleEntry) -> bool {
        match self {
            Self::Overdue => entry.urgency == Some(Urgency::Overdue),
            Self::DueSoon => entry.urgency == Some(Urgency::DueSoon),
            Self::Ok => entry.urgency == Some(Urgency::Ok),
            Self::AdHoc => entry.urgency.is_none(),
        }
    }
}

/// Agenda as emitted in JSON output.
#[derive(Debug, Serialize)]
struct AgendaReport {
    today: NaiveDate,
    due_soon_days: u32,
    /// Counts over the whole agenda, before `--status` filtering.
    summary: ScheduleSummary,
    entries: Vec<ScheduleEntry>,
    #[serde(skip)]
    date_format: String,
}

/// Parse `--today`, defaulting to the local calendar date.
fn resolve_today(raw: Option<&str>) -> Result<NaiveDate, ColetaError> {
    raw.map_or_else(
        || Ok(Local::now().date_naive()),
        |value| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| ColetaError::InvalidDate(value.to_string()))
        },
    )
}

/// Execute `coleta agenda`.
///
/// # Errors
///
/// Returns an error if the date is invalid, the project is not initialized,
/// the event source cannot be read, or output rendering fails.
pub fn run_agenda(args: &AgendaArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let cfg = load_project_config(project_root, output)?;

    let today = match resolve_today(args.today.as_deref()) {
        Ok(date) => date,
        Err(e) => return report(output, e),
    };

    let built = match args.snapshot {
        Some(ref path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                project_root.join(path)
            };
            build_schedule(&SnapshotEventSource::new(path), today, &cfg.schedule)
        }
        None => {
            let conn = open_project_store(project_root, &cfg, output)?;
            build_schedule(&SqliteEventSource::new(&conn), today, &cfg.schedule)
        }
    };
    let entries = match built {
        Ok(entries) => entries,
        Err(e) => return report(output, ColetaError::from(e)),
    };

    let agenda = assemble(entries, today, &cfg, args.status);

    render_mode(
        output,
        &agenda,
        |a, w| render_agenda_text(a, w),
        |a, w| render_agenda_human(a, w),
    )
}

fn assemble(
    entries: Vec<ScheduleEntry>,
    today: NaiveDate,
    cfg: &ProjectConfig,
    status: Option<StatusFilter>,
) -> AgendaReport {
    let summary = summarize(&entries);
    let entries = match status {
        Some(filter) => entries.into_iter().filter(|e| filter.matches(e)).collect(),
        None => entries,
    };
    AgendaReport {
        today,
        due_soon_days: cfg.schedule.due_soon_days,
        summary,
        entries,
        date_format: cfg.display.date_format.clone(),
    }
}

fn status_label(urgency: Option<Urgency>) -> &'static str {
    match urgency {
        Some(Urgency::Overdue) => "VENCIDO",
        Some(Urgency::DueSoon) => "ATENÇÃO",
        Some(Urgency::Ok) => "EM DIA",
        None => "EVENTUAL",
    }
}

fn render_agenda_human(agenda: &AgendaReport, w: &mut dyn Write) -> io::Result<()> {
    let fmt = agenda.date_format.as_str();
    pretty_section(
        w,
        &format!("Agenda de coletas em {}", format_date(agenda.today, fmt)),
    )?;

    if agenda.entries.is_empty() {
        writeln!(w, "Nenhuma coleta agendada.")?;
    } else {
        writeln!(
            w,
            "{:<10} {:<12} {:<12} {:<10} {}",
            "STATUS", "VENCIMENTO", "ÚLTIMA", "FREQ.", "ESTABELECIMENTO / ITEM"
        )?;
        for entry in &agenda.entries {
            writeln!(
                w,
                "{:<10} {:<12} {:<12} {:<10} {} / {}",
                status_label(entry.urgency),
                due_date_display(entry, fmt),
                format_date(entry.last_collection_date, fmt),
                frequency_display(entry.frequency),
                entry.establishment_name,
                entry.key.item,
            )?;
        }
    }

    let s = &agenda.summary;
    pretty_rule(w)?;
    writeln!(
        w,
        "{} vencidas · {} a vencer em {} dias · {} em dia · {} eventuais",
        s.overdue, s.due_soon, agenda.due_soon_days, s.ok, s.ad_hoc
    )
}

fn render_agenda_text(agenda: &AgendaReport, w: &mut dyn Write) -> io::Result<()> {
    if agenda.entries.is_empty() {
        return Ok(());
    }
    let fmt = agenda.date_format.as_str();
    writeln!(
        w,
        "NEXT_DUE  STATUS  TAG  ESTABLISHMENT_ID  ESTABLISHMENT  ITEM  LAST  FREQUENCY"
    )?;
    for entry in &agenda.entries {
        let tag = match status_tag(entry) {
            "" => "-",
            tag => tag,
        };
        writeln!(
            w,
            "{}  {}  {}  {}  {}  {}  {}  {}",
            due_date_display(entry, fmt),
            entry.urgency.map_or("ad_hoc", Urgency::as_str),
            tag,
            entry.key.establishment_id,
            entry.establishment_name,
            entry.key.item,
            format_date(entry.last_collection_date, fmt),
            frequency_display(entry.frequency),
        )?;
    }
    Ok(())
}

//! `coleta history`: requisitions as submitted, newest first.

use crate::cmd::{load_project_config, open_project_store};
use crate::output::{OutputMode, Renderable, render_list};
use clap::Args;
use coleta_core::db::query;
use coleta_core::model::requisition::RequisitionSummary;
use coleta_schedule::display::{NO_DATE, format_date};
use std::io::{self, Write};
use std::path::Path;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Maximum requisitions to show.
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,
}

struct HistoryRow<'a> {
    summary: &'a RequisitionSummary,
    date_format: &'a str,
}

impl HistoryRow<'_> {
    fn submitted(&self) -> String {
        self.summary.submitted_at.format("%Y-%m-%d %H:%M").to_string()
    }

    fn collected(&self) -> String {
        self.summary
            .collection_date
            .map_or_else(|| NO_DATE.to_string(), |d| format_date(d, self.date_format))
    }

    fn establishment(&self) -> &str {
        self.summary.establishment_name.as_deref().unwrap_or("-")
    }
}

impl Renderable for HistoryRow<'_> {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "#{:<6} {}  {:<8} coleta {:<10}  {}",
            self.summary.id,
            self.submitted(),
            self.summary.category,
            self.collected(),
            self.establishment()
        )
    }

    fn render_json(&self, w: &mut dyn Write) -> io::Result<()> {
        serde_json::to_writer(&mut *w, self.summary).map_err(io::Error::other)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}  {}  {}  {}  {}",
            self.summary.id,
            self.submitted(),
            self.summary.category,
            self.collected(),
            self.establishment()
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["ID", "SUBMITTED", "CATEGORY", "COLLECTED", "ESTABLISHMENT"]
    }
}

/// Execute `coleta history`.
///
/// # Errors
///
/// Returns an error if the project is not initialized, the store query
/// fails, or output rendering fails.
pub fn run_history(
    args: &HistoryArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let cfg = load_project_config(project_root, output)?;
    let conn = open_project_store(project_root, &cfg, output)?;
    let requisitions = query::list_requisitions(&conn, args.limit)?;

    if requisitions.is_empty() && output == OutputMode::Pretty {
        println!("Nenhuma requisição registrada.");
        return Ok(());
    }

    let rows: Vec<HistoryRow<'_>> = requisitions
        .iter()
        .map(|summary| HistoryRow {
            summary,
            date_format: &cfg.display.date_format,
        })
        .collect();
    render_list(&rows, output)?;
    Ok(())
}

//! `coleta show`: full record of one requisition.

use crate::cmd::{load_project_config, open_project_store, report};
use crate::output::{OutputMode, pretty_kv, pretty_rule, pretty_section, render_mode};
use chrono::NaiveDate;
use clap::Args;
use coleta_core::db::query;
use coleta_core::error::ColetaError;
use coleta_core::model::requisition::{AnalysisKind, RequisitionDetail};
use coleta_core::model::{Category, Frequency};
use coleta_schedule::display::{format_date, frequency_display};
use std::io::{self, Write};
use std::path::Path;

const KINDS: [AnalysisKind; 2] = [AnalysisKind::Microbiological, AnalysisKind::PhysicoChemical];

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Requisition id, as listed by `coleta history`.
    pub id: i64,
}

/// Execute `coleta show <id>`.
///
/// # Errors
///
/// Returns an error if the project is not initialized, the requisition does
/// not exist, the query fails, or output rendering fails.
pub fn run_show(args: &ShowArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let cfg = load_project_config(project_root, output)?;
    let conn = open_project_store(project_root, &cfg, output)?;

    let Some(detail) = query::get_requisition(&conn, args.id)? else {
        return report(output, ColetaError::RequisitionNotFound(args.id));
    };

    let date_format = cfg.display.date_format.as_str();
    render_mode(
        output,
        &detail,
        |d, w| render_show_text(d, w),
        |d, w| render_show_human(d, w, date_format),
    )
}

fn optional_date(date: Option<NaiveDate>, fmt: &str) -> Option<String> {
    date.map(|d| format_date(d, fmt))
}

/// Key/value lines shared by pretty and text output; absent values are
/// omitted.
fn detail_fields(detail: &RequisitionDetail, fmt: &str) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("categoria", detail.category.to_string()),
        (
            "enviada em",
            detail.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
        ),
    ];
    let mut push = |key: &'static str, value: Option<String>| {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            fields.push((key, value));
        }
    };

    push("data da coleta", optional_date(detail.collection_date, fmt));
    push("hora da coleta", detail.collection_time.clone());
    push("lacre", detail.seal_number.clone());
    push("mês referência", detail.reference_month.clone());
    match detail.category {
        Category::Water => push("ponto de coleta", detail.collection_point.clone()),
        Category::Product => {
            push("produto", detail.product_name.clone());
            push("lote", detail.batch.clone());
            push("fabricação", optional_date(detail.production_date, fmt));
            push("validade", optional_date(detail.expiry_date, fmt));
        }
    }
    push(
        "frequência",
        detail
            .frequency_days
            .map(|days| frequency_display(Frequency::from_days(days))),
    );
    push("observações", detail.notes.clone());
    fields
}

fn render_show_human(detail: &RequisitionDetail, w: &mut dyn Write, fmt: &str) -> io::Result<()> {
    pretty_section(w, &format!("Requisição #{}", detail.id))?;
    for (key, value) in detail_fields(detail, fmt) {
        pretty_kv(w, key, value)?;
    }

    writeln!(w)?;
    pretty_section(w, "Estabelecimento")?;
    match detail.establishment {
        Some(ref est) => {
            pretty_kv(w, "nome", &est.name)?;
            if let Some(ref tax_id) = est.tax_id {
                pretty_kv(w, "cnpj", tax_id)?;
            }
            if let Some(ref address) = est.address {
                pretty_kv(w, "endereço", address)?;
            }
            if let Some(ref inspection_id) = est.inspection_id {
                pretty_kv(w, "registro", inspection_id)?;
            }
        }
        None => writeln!(w, "(não vinculado)")?,
    }

    for kind in KINDS {
        let names: Vec<&str> = detail.analyses_of(kind).map(|a| a.name.as_str()).collect();
        if names.is_empty() {
            continue;
        }
        writeln!(w)?;
        pretty_section(w, &format!("Análises {}", kind.heading()))?;
        for name in names {
            writeln!(w, "  • {name}")?;
        }
    }
    pretty_rule(w)
}

/// Text mode uses ISO dates so the output stays stable for scripts.
fn render_show_text(detail: &RequisitionDetail, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "id  {}", detail.id)?;
    for (key, value) in detail_fields(detail, "%Y-%m-%d") {
        writeln!(w, "{key}  {value}")?;
    }
    if let Some(ref est) = detail.establishment {
        writeln!(w, "estabelecimento  {}", est.name)?;
    }
    for analysis in &detail.analyses {
        writeln!(w, "análise  {}  {}", analysis.kind, analysis.name)?;
    }
    Ok(())
}

//! `SQLite` query helpers for the requisition history and detail views.
//!
//! All functions take a shared `&Connection` and return typed structs,
//! never raw rows. The store is read-only from here.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::model::item::{Category, EstablishmentId};
use crate::model::requisition::{
    AnalysisKind, EstablishmentProfile, RequestedAnalysis, RequisitionDetail, RequisitionSummary,
};

/// Storage format of calendar dates in the store.
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Read the schema version recorded in `store_meta`.
///
/// # Errors
///
/// Returns an error if the metadata row is missing or unreadable.
pub fn store_schema_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT schema_version FROM store_meta WHERE id = 1",
        [],
        |row| row.get(0),
    )
    .context("read store_meta")
}

/// Parse a stored `YYYY-MM-DD` date.
///
/// Blank values are absent; unparseable values are logged and treated as
/// absent so one bad row cannot block a whole read.
pub(crate) fn parse_store_date(
    requisition_id: i64,
    field: &'static str,
    raw: Option<String>,
) -> Option<NaiveDate> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, STORE_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(error) => {
            tracing::warn!(
                requisition_id,
                field,
                value = trimmed,
                %error,
                "ignoring unparseable date"
            );
            None
        }
    }
}

pub(crate) fn submitted_at_from_us(us: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp_micros(us).unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// List requisitions newest submission first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_requisitions(conn: &Connection, limit: Option<u32>) -> Result<Vec<RequisitionSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT r.requisition_id, r.submitted_at_us, r.category, e.name, r.collection_date \
             FROM requisitions r \
             LEFT JOIN establishments e ON e.establishment_id = r.establishment_id \
             ORDER BY r.submitted_at_us DESC, r.requisition_id DESC \
             LIMIT ?1",
        )
        .context("prepare list_requisitions")?;

    let limit = limit.map_or(-1, i64::from);
    let rows = stmt
        .query_map([limit], |row| {
            let id: i64 = row.get(0)?;
            let category: String = row.get(2)?;
            Ok(RequisitionSummary {
                id,
                submitted_at: submitted_at_from_us(row.get(1)?),
                category: Category::from_store(&category),
                establishment_name: row.get(3)?,
                collection_date: parse_store_date(id, "collection_date", row.get(4)?),
            })
        })
        .context("execute list_requisitions")?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("read requisition rows")
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// Fetch one requisition with its establishment and requested analyses.
///
/// Returns `None` if the requisition does not exist.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_requisition(conn: &Connection, requisition_id: i64) -> Result<Option<RequisitionDetail>> {
    let detail = conn
        .query_row(
            "SELECT r.requisition_id, r.submitted_at_us, r.category, r.collection_date, \
                    r.collection_time, r.seal_number, r.reference_month, r.notes, \
                    r.collection_point, r.product_name, r.batch, r.production_date, \
                    r.expiry_date, r.frequency_days, \
                    e.establishment_id, e.name, e.tax_id, e.address, e.inspection_id \
             FROM requisitions r \
             LEFT JOIN establishments e ON e.establishment_id = r.establishment_id \
             WHERE r.requisition_id = ?1",
            [requisition_id],
            detail_from_row,
        )
        .optional()
        .with_context(|| format!("query requisition {requisition_id}"))?;

    let Some(mut detail) = detail else {
        return Ok(None);
    };
    detail.analyses = requested_analyses(conn, requisition_id)?;
    Ok(Some(detail))
}

fn detail_from_row(row: &Row<'_>) -> rusqlite::Result<RequisitionDetail> {
    let id: i64 = row.get(0)?;
    let category: String = row.get(2)?;
    let establishment = match row.get::<_, Option<i64>>(14)? {
        Some(est_id) => Some(EstablishmentProfile {
            id: EstablishmentId(est_id),
            name: row.get(15)?,
            tax_id: non_blank(row.get(16)?),
            address: non_blank(row.get(17)?),
            inspection_id: non_blank(row.get(18)?),
        }),
        None => None,
    };

    Ok(RequisitionDetail {
        id,
        submitted_at: submitted_at_from_us(row.get(1)?),
        category: Category::from_store(&category),
        establishment,
        collection_date: parse_store_date(id, "collection_date", row.get(3)?),
        collection_time: non_blank(row.get(4)?),
        seal_number: non_blank(row.get(5)?),
        reference_month: non_blank(row.get(6)?),
        notes: non_blank(row.get(7)?),
        collection_point: non_blank(row.get(8)?),
        product_name: non_blank(row.get(9)?),
        batch: non_blank(row.get(10)?),
        production_date: parse_store_date(id, "production_date", row.get(11)?),
        expiry_date: parse_store_date(id, "expiry_date", row.get(12)?),
        frequency_days: row.get(13)?,
        analyses: Vec::new(),
    })
}

/// Lab parameters requested by a requisition, in catalog order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn requested_analyses(conn: &Connection, requisition_id: i64) -> Result<Vec<RequestedAnalysis>> {
    let mut stmt = conn
        .prepare(
            "SELECT p.name, p.kind \
             FROM requisition_analyses ra \
             JOIN analysis_parameters p ON p.parameter_id = ra.parameter_id \
             WHERE ra.requisition_id = ?1 \
             ORDER BY p.parameter_id ASC",
        )
        .context("prepare requested_analyses")?;

    let rows = stmt
        .query_map(params![requisition_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .context("execute requested_analyses")?;

    let mut analyses = Vec::new();
    for row in rows {
        let (name, raw_kind) = row.context("read analysis row")?;
        match raw_kind.parse::<AnalysisKind>() {
            Ok(kind) => analyses.push(RequestedAnalysis { name, kind }),
            Err(error) => {
                tracing::warn!(requisition_id, %error, "skipping analysis with unknown kind");
            }
        }
    }
    Ok(analyses)
}

//! Read-side views of stored requisitions for the history and detail
//! screens.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::{fmt, str::FromStr};

use super::item::{Category, EstablishmentId, ParseEnumError};

/// Laboratory discipline of a requested analysis parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Microbiological,
    PhysicoChemical,
}

impl AnalysisKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Microbiological => "microbiological",
            Self::PhysicoChemical => "physico_chemical",
        }
    }

    /// Section heading used when listing requested analyses.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::Microbiological => "MICROBIOLÓGICAS",
            Self::PhysicoChemical => "FÍSICO-QUÍMICAS",
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "MICROBIOLOGICA" | "MICROBIOLOGICAL" => Ok(Self::Microbiological),
            "FISICO-QUIMICA" | "PHYSICO-CHEMICAL" => Ok(Self::PhysicoChemical),
            _ => Err(ParseEnumError {
                expected: "analysis kind",
                got: s.to_string(),
            }),
        }
    }
}

/// A lab parameter requested for a requisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestedAnalysis {
    pub name: String,
    pub kind: AnalysisKind,
}

/// One row of the requisition history, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequisitionSummary {
    pub id: i64,
    pub submitted_at: DateTime<Utc>,
    pub category: Category,
    pub establishment_name: Option<String>,
    pub collection_date: Option<NaiveDate>,
}

/// Registration data of the establishment that owns a requisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstablishmentProfile {
    pub id: EstablishmentId,
    pub name: String,
    pub tax_id: Option<String>,
    pub address: Option<String>,
    pub inspection_id: Option<String>,
}

/// Full record of a single requisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequisitionDetail {
    pub id: i64,
    pub submitted_at: DateTime<Utc>,
    pub category: Category,
    pub establishment: Option<EstablishmentProfile>,
    pub collection_date: Option<NaiveDate>,
    pub collection_time: Option<String>,
    pub seal_number: Option<String>,
    pub reference_month: Option<String>,
    pub notes: Option<String>,
    /// Water samples only.
    pub collection_point: Option<String>,
    /// Product samples only.
    pub product_name: Option<String>,
    pub batch: Option<String>,
    pub production_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub frequency_days: Option<i64>,
    pub analyses: Vec<RequestedAnalysis>,
}

impl RequisitionDetail {
    /// Requested analyses of one kind, in stored order.
    pub fn analyses_of(&self, kind: AnalysisKind) -> impl Iterator<Item = &RequestedAnalysis> {
        self.analyses.iter().filter(move |a| a.kind == kind)
    }
}

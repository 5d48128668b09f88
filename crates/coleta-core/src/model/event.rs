use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::frequency::Frequency;
use super::item::{AnalyzedItem, Category, EstablishmentId, EstablishmentItemKey};

/// The establishment a requisition belongs to, as joined by the read query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstablishmentRef {
    pub id: EstablishmentId,
    pub name: String,
}

/// One historical sample submission, as read from the event store.
///
/// Every field the scheduler depends on is optional here: the store allows
/// incomplete requisitions and the reducer decides what to do with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEvent {
    /// Store identifier of the requisition, used for diagnostics only.
    #[serde(default)]
    pub requisition_id: i64,
    #[serde(default)]
    pub establishment: Option<EstablishmentRef>,
    pub category: Category,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub collection_date: Option<NaiveDate>,
    #[serde(default)]
    pub frequency_days: Option<i64>,
}

/// A field whose absence excludes an event from scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MissingField {
    CollectionDate,
    Frequency,
    Establishment,
}

impl MissingField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CollectionDate => "collection_date",
            Self::Frequency => "frequency_days",
            Self::Establishment => "establishment",
        }
    }
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The parts of an event that survive validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulableEvent<'a> {
    pub key: EstablishmentItemKey,
    pub establishment_name: &'a str,
    pub collection_date: NaiveDate,
    pub frequency: Frequency,
}

impl CollectionEvent {
    #[must_use]
    pub fn analyzed_item(&self) -> AnalyzedItem {
        AnalyzedItem::from_sample(self.category, self.product_name.as_deref())
    }

    /// Validate the event for scheduling.
    ///
    /// # Errors
    ///
    /// Returns the first missing field, checked in the order collection
    /// date, frequency, establishment.
    pub fn schedulable(&self) -> Result<SchedulableEvent<'_>, MissingField> {
        let collection_date = self.collection_date.ok_or(MissingField::CollectionDate)?;
        let frequency_days = self.frequency_days.ok_or(MissingField::Frequency)?;
        let establishment = self
            .establishment
            .as_ref()
            .ok_or(MissingField::Establishment)?;

        Ok(SchedulableEvent {
            key: EstablishmentItemKey::new(establishment.id, self.analyzed_item()),
            establishment_name: &establishment.name,
            collection_date,
            frequency: Frequency::from_days(frequency_days),
        })
    }
}

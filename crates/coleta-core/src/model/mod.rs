//! Domain model for collection events and stored requisitions.

pub mod event;
pub mod frequency;
pub mod item;
pub mod requisition;

pub use event::{CollectionEvent, EstablishmentRef, MissingField, SchedulableEvent};
pub use frequency::Frequency;
pub use item::{AnalyzedItem, Category, EstablishmentId, EstablishmentItemKey};

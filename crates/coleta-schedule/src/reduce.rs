//! History reducer: latest known state per obligation.
//!
//! Collapses the event history into one [`ScheduleSeed`] per
//! (establishment, analyzed item) key.
//!
//! # Algorithm
//!
//! The input must already be ordered newest submission first; the reducer
//! never sorts. Events are visited once, in order:
//!
//! 1. Events missing a collection date, a frequency, or an establishment are
//!    skipped and never claim a key.
//! 2. The first surviving event for a key wins; every later event sharing
//!    that key is superseded.
//!
//! # Performance
//!
//! O(N) over N events with one hash-set insert each.

use std::collections::HashSet;

use chrono::NaiveDate;
use coleta_core::model::{CollectionEvent, EstablishmentItemKey, Frequency};
use serde::Serialize;
use tracing::debug;

/// Latest known state of one obligation, before due-date projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleSeed {
    pub key: EstablishmentItemKey,
    pub establishment_name: String,
    pub last_collection_date: NaiveDate,
    pub frequency: Frequency,
    /// Requisition the seed was taken from.
    pub requisition_id: i64,
}

/// Counters from a reducer pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReduceStats {
    /// Seeds produced, one per distinct key.
    pub kept: usize,
    /// Valid events discarded because a newer event held their key.
    pub superseded: usize,
    /// Events excluded for a missing date, frequency, or establishment.
    pub skipped: usize,
}

/// Reduce an event history (newest first) to one seed per key.
///
/// Seeds come out in the order their key was first seen.
#[must_use]
pub fn reduce(events: &[CollectionEvent]) -> Vec<ScheduleSeed> {
    reduce_with_stats(events).0
}

/// Like [`reduce`], also reporting how many events were kept, superseded,
/// or skipped.
#[must_use]
pub fn reduce_with_stats(events: &[CollectionEvent]) -> (Vec<ScheduleSeed>, ReduceStats) {
    let mut seen: HashSet<EstablishmentItemKey> = HashSet::with_capacity(events.len());
    let mut seeds = Vec::new();
    let mut stats = ReduceStats::default();

    for event in events {
        let valid = match event.schedulable() {
            Ok(valid) => valid,
            Err(missing) => {
                debug!(
                    requisition_id = event.requisition_id,
                    missing = %missing,
                    "skipping collection event"
                );
                stats.skipped += 1;
                continue;
            }
        };

        if !seen.insert(valid.key.clone()) {
            stats.superseded += 1;
            continue;
        }

        seeds.push(ScheduleSeed {
            key: valid.key,
            establishment_name: valid.establishment_name.to_string(),
            last_collection_date: valid.collection_date,
            frequency: valid.frequency,
            requisition_id: event.requisition_id,
        });
        stats.kept += 1;
    }

    (seeds, stats)
}

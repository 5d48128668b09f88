use rusqlite::Connection;

use super::{EventSource, SourceError};
use crate::db::query::parse_store_date;
use crate::model::item::{Category, EstablishmentId};
use crate::model::{CollectionEvent, EstablishmentRef};

const COLLECTION_EVENTS_SQL: &str = "\
    SELECT r.requisition_id, e.establishment_id, e.name, r.category, \
           r.product_name, r.collection_date, r.frequency_days \
    FROM requisitions r \
    LEFT JOIN establishments e ON e.establishment_id = r.establishment_id \
    ORDER BY r.submitted_at_us DESC, r.requisition_id DESC";

/// Reads collection events from the SQLite store.
///
/// The establishment reference is taken from the join, so a requisition
/// pointing at a deleted or unknown establishment comes back unlinked.
pub struct SqliteEventSource<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventSource<'conn> {
    pub const fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl EventSource for SqliteEventSource<'_> {
    fn collection_events(&self) -> Result<Vec<CollectionEvent>, SourceError> {
        let mut stmt = self.conn.prepare(COLLECTION_EVENTS_SQL)?;
        let rows = stmt.query_map([], |row| {
            let requisition_id: i64 = row.get(0)?;
            let establishment = match row.get::<_, Option<i64>>(1)? {
                Some(id) => Some(EstablishmentRef {
                    id: EstablishmentId(id),
                    name: row.get(2)?,
                }),
                None => None,
            };
            let category: String = row.get(3)?;
            Ok(CollectionEvent {
                requisition_id,
                establishment,
                category: Category::from_store(&category),
                product_name: row.get(4)?,
                collection_date: parse_store_date(requisition_id, "collection_date", row.get(5)?),
                frequency_days: row.get(6)?,
            })
        })?;

        let events = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        tracing::debug!(count = events.len(), "read collection events from store");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations;
    use crate::model::AnalyzedItem;
    use chrono::NaiveDate;

    fn test_db() -> Connection {
        let mut conn = Connection::open_in_memory().expect("open in-memory db");
        migrations::migrate(&mut conn).expect("migrate schema");
        conn
    }

    #[test]
    fn empty_store_yields_no_events() {
        let conn = test_db();
        let events = SqliteEventSource::new(&conn).collection_events().unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn events_come_back_newest_submission_first() {
        let conn = test_db();
        conn.execute_batch(
            "INSERT INTO establishments (establishment_id, name) VALUES (1, 'Frigorífico Norte');
             INSERT INTO requisitions (requisition_id, submitted_at_us, establishment_id, category,
                                       collection_date, frequency_days)
                 VALUES (10, 100, 1, 'AGUA', '2024-04-01', 30),
                        (11, 300, 1, 'AGUA', '2024-05-01', 30),
                        (12, 300, 1, 'PRODUTO', '2024-05-02', 0),
                        (13, 200, NULL, 'PRODUTO', NULL, NULL);",
        )
        .unwrap();

        let events = SqliteEventSource::new(&conn).collection_events().unwrap();
        let ids: Vec<i64> = events.iter().map(|e| e.requisition_id).collect();
        assert_eq!(ids, vec![12, 11, 13, 10]);

        let newest = &events[0];
        assert_eq!(newest.analyzed_item(), AnalyzedItem::unknown_product());
        assert_eq!(newest.frequency_days, Some(0));

        let water = &events[1];
        assert_eq!(water.category, Category::Water);
        assert_eq!(water.collection_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(
            water.establishment.as_ref().map(|e| e.name.as_str()),
            Some("Frigorífico Norte")
        );

        let orphan = &events[2];
        assert!(orphan.establishment.is_none());
        assert!(orphan.collection_date.is_none());
    }

    #[test]
    fn missing_table_is_a_query_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteEventSource::new(&conn)
            .collection_events()
            .expect_err("no schema");
        assert!(matches!(err, SourceError::Query(_)));
    }
}

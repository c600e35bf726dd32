//! Booking and property persistence.

use std::path::Path;

use async_trait::async_trait;
use rusqlite::{OptionalExtension, Row, params};
use tokio_rusqlite::Connection;

use crate::booking::{Booking, NewBooking};
use crate::error::Result;
use crate::property::Property;

/// Result of trying to write a booking.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Booking),
    /// A booking with the same `(property_id, external_id)` is already stored.
    AlreadyExists,
}

/// The booking operations the reconciler needs.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_booking(&self, property_id: &str, external_id: &str) -> Result<Option<Booking>>;

    /// Insert unless `(property_id, external_id)` is taken.
    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertOutcome>;

    async fn list_bookings(&self, property_id: &str) -> Result<Vec<Booking>>;
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS property (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    airbnb_ical_url TEXT,
    vrbo_ical_url TEXT,
    other_ical_url TEXT
);

CREATE TABLE IF NOT EXISTS booking (
    id TEXT PRIMARY KEY,
    property_id TEXT NOT NULL,
    source TEXT NOT NULL,
    check_in TEXT NOT NULL,
    check_out TEXT NOT NULL,
    external_id TEXT,
    notes TEXT,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS booking_property_external_id
    ON booking (property_id, external_id);

CREATE INDEX IF NOT EXISTS booking_property_check_in
    ON booking (property_id, check_in);
";

const BOOKING_COLUMNS: &str =
    "id, property_id, source, check_in, check_out, external_id, notes, status, created_at";

/// SQLite-backed store.
#[derive(Clone)]
pub struct SqliteStore {
    db: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and migrate it.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Connection::open(path).await?;
        Self::migrate(db).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().await?;
        Self::migrate(db).await
    }

    async fn migrate(db: Connection) -> Result<Self> {
        db.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        Ok(SqliteStore { db })
    }

    pub async fn upsert_property(&self, property: Property) -> Result<()> {
        self.db
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO property (id, name, airbnb_ical_url, vrbo_ical_url, other_ical_url)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT (id) DO UPDATE SET
                        name = excluded.name,
                        airbnb_ical_url = excluded.airbnb_ical_url,
                        vrbo_ical_url = excluded.vrbo_ical_url,
                        other_ical_url = excluded.other_ical_url",
                    params![
                        property.id,
                        property.name,
                        property.airbnb_ical_url,
                        property.vrbo_ical_url,
                        property.other_ical_url,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        let id = id.to_string();
        let property = self
            .db
            .call(move |conn| {
                let property = conn
                    .query_row(
                        "SELECT id, name, airbnb_ical_url, vrbo_ical_url, other_ical_url
                         FROM property WHERE id = ?1",
                        [&id],
                        property_from_row,
                    )
                    .optional()?;
                Ok(property)
            })
            .await?;
        Ok(property)
    }

    pub async fn list_properties(&self) -> Result<Vec<Property>> {
        let properties = self
            .db
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, airbnb_ical_url, vrbo_ical_url, other_ical_url
                     FROM property ORDER BY id",
                )?;
                let rows = stmt
                    .query_map([], property_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;
        Ok(properties)
    }

    /// Remove a property and its bookings. Returns false if it did not exist.
    pub async fn delete_property(&self, id: &str) -> Result<bool> {
        let id = id.to_string();
        let deleted = self
            .db
            .call(move |conn| {
                let tx = conn.transaction()?;
                tx.execute("DELETE FROM booking WHERE property_id = ?1", [&id])?;
                let deleted = tx.execute("DELETE FROM property WHERE id = ?1", [&id])?;
                tx.commit()?;
                Ok(deleted > 0)
            })
            .await?;
        Ok(deleted)
    }
}

#[async_trait]
impl BookingStore for SqliteStore {
    async fn find_booking(&self, property_id: &str, external_id: &str) -> Result<Option<Booking>> {
        let (property_id, external_id) = (property_id.to_string(), external_id.to_string());
        let booking = self
            .db
            .call(move |conn| {
                let booking = conn
                    .query_row(
                        &format!(
                            "SELECT {BOOKING_COLUMNS} FROM booking
                             WHERE property_id = ?1 AND external_id = ?2"
                        ),
                        [&property_id, &external_id],
                        booking_from_row,
                    )
                    .optional()?;
                Ok(booking)
            })
            .await?;
        Ok(booking)
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<InsertOutcome> {
        let booking = booking.into_booking();
        let outcome = self
            .db
            .call(move |conn| {
                let inserted = conn.execute(
                    &format!(
                        "INSERT INTO booking ({BOOKING_COLUMNS})
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                         ON CONFLICT (property_id, external_id) DO NOTHING"
                    ),
                    params![
                        booking.id,
                        booking.property_id,
                        booking.source.as_str(),
                        booking.check_in,
                        booking.check_out,
                        booking.external_id,
                        booking.notes,
                        booking.status.as_str(),
                        booking.created_at,
                    ],
                )?;
                Ok(if inserted == 0 {
                    InsertOutcome::AlreadyExists
                } else {
                    InsertOutcome::Inserted(booking)
                })
            })
            .await?;
        Ok(outcome)
    }

    async fn list_bookings(&self, property_id: &str) -> Result<Vec<Booking>> {
        let property_id = property_id.to_string();
        let bookings = self
            .db
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM booking
                     WHERE property_id = ?1 ORDER BY check_in, check_out"
                ))?;
                let rows = stmt
                    .query_map([&property_id], booking_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(rows)
            })
            .await?;
        Ok(bookings)
    }
}

fn property_from_row(row: &Row<'_>) -> rusqlite::Result<Property> {
    Ok(Property {
        id: row.get(0)?,
        name: row.get(1)?,
        airbnb_ical_url: row.get(2)?,
        vrbo_ical_url: row.get(3)?,
        other_ical_url: row.get(4)?,
    })
}

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        id: row.get(0)?,
        property_id: row.get(1)?,
        source: parse_text_column(row, 2)?,
        check_in: row.get(3)?,
        check_out: row.get(4)?,
        external_id: row.get(5)?,
        notes: row.get(6)?,
        status: parse_text_column(row, 7)?,
        created_at: row.get(8)?,
    })
}

fn parse_text_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let value: String = row.get(idx)?;
    value.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingSource, BookingStatus};
    use chrono::NaiveDate;

    fn new_booking(property_id: &str, external_id: &str) -> NewBooking {
        NewBooking {
            property_id: property_id.into(),
            source: BookingSource::Airbnb,
            check_in: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            external_id: Some(external_id.into()),
            notes: Some("Jane".into()),
            status: BookingStatus::Confirmed,
        }
    }

    async fn insert(store: &SqliteStore, property_id: &str, external_id: &str) -> InsertOutcome {
        store
            .insert_booking(new_booking(property_id, external_id))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn insert_then_find() {
        let store = SqliteStore::open_in_memory().await.unwrap();

        let outcome = insert(&store, "p1", "evt-1").await;
        let InsertOutcome::Inserted(inserted) = outcome else {
            panic!("Expected insert");
        };

        let found = store.find_booking("p1", "evt-1").await.unwrap();
        assert_eq!(found, Some(inserted));
        assert_eq!(store.find_booking("p2", "evt-1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_external_id_is_rejected_per_property() {
        let store = SqliteStore::open_in_memory().await.unwrap();

        insert(&store, "p1", "evt-1").await;
        let again = insert(&store, "p1", "evt-1").await;
        let other_property = insert(&store, "p2", "evt-1").await;

        assert_eq!(again, InsertOutcome::AlreadyExists);
        assert!(matches!(other_property, InsertOutcome::Inserted(_)));
        assert_eq!(store.list_bookings("p1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn dates_are_stored_as_iso_days() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        insert(&store, "p1", "evt-1").await;

        let raw: (String, String) = store
            .db
            .call(|conn| {
                Ok(conn.query_row("SELECT check_in, check_out FROM booking", [], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                })?)
            })
            .await
            .unwrap();

        assert_eq!(raw, ("2024-06-01".to_string(), "2024-06-05".to_string()));
    }

    #[tokio::test]
    async fn bookings_are_listed_by_check_in() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let mut later = new_booking("p1", "later");
        later.check_in = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        later.check_out = NaiveDate::from_ymd_opt(2024, 9, 3).unwrap();

        store.insert_booking(later).await.unwrap();
        insert(&store, "p1", "earlier").await;

        let ids: Vec<_> = store
            .list_bookings("p1")
            .await
            .unwrap()
            .into_iter()
            .filter_map(|b| b.external_id)
            .collect();
        assert_eq!(ids, vec!["earlier", "later"]);
    }

    #[tokio::test]
    async fn property_upsert_get_list_delete() {
        let store = SqliteStore::open_in_memory().await.unwrap();

        let mut property = Property::new("p1", "Beach House");
        property.airbnb_ical_url = Some("https://airbnb.example/1.ics".into());
        store.upsert_property(property.clone()).await.unwrap();

        property.name = "Beach House (renamed)".into();
        store.upsert_property(property.clone()).await.unwrap();
        insert(&store, "p1", "evt-1").await;

        assert_eq!(
            store.get_property("p1").await.unwrap(),
            Some(property.clone())
        );
        assert_eq!(store.list_properties().await.unwrap(), vec![property]);

        assert!(store.delete_property("p1").await.unwrap());
        assert!(!store.delete_property("p1").await.unwrap());
        assert_eq!(store.get_property("p1").await.unwrap(), None);
        assert!(store.list_bookings("p1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("rentcal.db");

        let store = SqliteStore::open(&path).await.unwrap();
        store
            .upsert_property(Property::new("p1", "Cabin"))
            .await
            .unwrap();
        drop(store);

        let reopened = SqliteStore::open(&path).await.unwrap();
        assert!(reopened.get_property("p1").await.unwrap().is_some());
    }
}

//! Weight-entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over `weight_entries` plus per-pet date-sorted listing.
//!
//! # Invariants
//! - An entry can only be created for an existing pet.
//! - Updates never move an entry to another pet.
//! - Listing order is `entry_date` then insertion order (`rowid`); descending
//!   is the exact reverse.

use crate::model::pet::PetId;
use crate::model::weight_entry::{WeightEntry, WeightEntryDraft, WeightEntryId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{
    date_to_db, ensure_connection_ready, parse_date, parse_unit, parse_uuid,
    WEIGHT_ENTRIES_COLUMNS,
};
use rusqlite::{params, Connection, Row};

const ENTRY_SELECT_SQL: &str = "SELECT
    id,
    pet_id,
    entry_date,
    weight,
    unit,
    notes
FROM weight_entries";

/// Sort direction for per-pet entry listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    /// Oldest first; chart order.
    #[default]
    Ascending,
    /// Newest first; history list order.
    Descending,
}

/// Repository interface for weight-entry CRUD operations.
pub trait WeightEntryRepository {
    fn create_entry(&self, entry: &WeightEntry) -> RepoResult<WeightEntryId>;
    fn update_entry(&self, entry: &WeightEntry) -> RepoResult<()>;
    fn get_entry(&self, id: WeightEntryId) -> RepoResult<Option<WeightEntry>>;
    fn list_entries(&self, pet_id: PetId, order: EntryOrder) -> RepoResult<Vec<WeightEntry>>;
    fn delete_entry(&self, id: WeightEntryId) -> RepoResult<()>;
}

/// SQLite-backed weight-entry repository.
pub struct SqliteWeightEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWeightEntryRepository<'conn> {
    /// Wraps a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not run.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for a foreign schema.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "weight_entries", &WEIGHT_ENTRIES_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl WeightEntryRepository for SqliteWeightEntryRepository<'_> {
    fn create_entry(&self, entry: &WeightEntry) -> RepoResult<WeightEntryId> {
        entry.validate()?;
        if !pet_exists(self.conn, entry.pet_id)? {
            return Err(RepoError::PetNotFound(entry.pet_id));
        }
        insert_entry(self.conn, entry)?;
        Ok(entry.id)
    }

    fn update_entry(&self, entry: &WeightEntry) -> RepoResult<()> {
        entry.validate()?;

        let changed = self.conn.execute(
            "UPDATE weight_entries
             SET
                entry_date = ?1,
                weight = ?2,
                unit = ?3,
                notes = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5 AND pet_id = ?6;",
            params![
                date_to_db(entry.date),
                entry.weight,
                entry.unit.symbol(),
                entry.notes.as_str(),
                entry.id.to_string(),
                entry.pet_id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::EntryNotFound(entry.id));
        }
        Ok(())
    }

    fn get_entry(&self, id: WeightEntryId) -> RepoResult<Option<WeightEntry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }
        Ok(None)
    }

    fn list_entries(&self, pet_id: PetId, order: EntryOrder) -> RepoResult<Vec<WeightEntry>> {
        load_entries(self.conn, pet_id, order)
    }

    fn delete_entry(&self, id: WeightEntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM weight_entries WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::EntryNotFound(id));
        }
        Ok(())
    }
}

pub(crate) fn insert_entry(conn: &Connection, entry: &WeightEntry) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO weight_entries (
            id,
            pet_id,
            entry_date,
            weight,
            unit,
            notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
        params![
            entry.id.to_string(),
            entry.pet_id.to_string(),
            date_to_db(entry.date),
            entry.weight,
            entry.unit.symbol(),
            entry.notes.as_str(),
        ],
    )?;
    Ok(())
}

pub(crate) fn load_entries(
    conn: &Connection,
    pet_id: PetId,
    order: EntryOrder,
) -> RepoResult<Vec<WeightEntry>> {
    let order_sql = match order {
        EntryOrder::Ascending => "entry_date ASC, rowid ASC",
        EntryOrder::Descending => "entry_date DESC, rowid DESC",
    };
    let mut stmt = conn.prepare(&format!(
        "{ENTRY_SELECT_SQL} WHERE pet_id = ?1 ORDER BY {order_sql};"
    ))?;
    let mut rows = stmt.query([pet_id.to_string()])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        entries.push(parse_entry_row(row)?);
    }
    Ok(entries)
}

pub(crate) fn pet_exists(conn: &Connection, pet_id: PetId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pets WHERE id = ?1);",
        [pet_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<WeightEntry> {
    let id = parse_uuid(&row.get::<_, String>("id")?, "weight_entries.id")?;
    let pet_id = parse_uuid(&row.get::<_, String>("pet_id")?, "weight_entries.pet_id")?;
    let date = parse_date(
        &row.get::<_, String>("entry_date")?,
        "weight_entries.entry_date",
    )?;
    let unit = parse_unit(&row.get::<_, String>("unit")?, "weight_entries.unit")?;
    let draft = WeightEntryDraft {
        date,
        weight: row.get("weight")?,
        unit,
        notes: row.get("notes")?,
    };
    Ok(WeightEntry::with_id(id, pet_id, draft)?)
}

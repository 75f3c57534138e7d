//! Connection readiness checks and column codecs shared by repositories.

use crate::db::migrations::latest_version;
use crate::model::unit::WeightUnit;
use crate::repo::error::{RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::Connection;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) const PETS_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "birthday",
    "species",
    "preferred_unit",
    "created_at",
    "updated_at",
];

pub(crate) const WEIGHT_ENTRIES_COLUMNS: [&str; 8] = [
    "id",
    "pet_id",
    "entry_date",
    "weight",
    "unit",
    "notes",
    "created_at",
    "updated_at",
];

/// Verifies schema version and that `table` has every column in `columns`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }
    let present = table_columns(conn, table)?;
    for &column in columns {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}

pub(crate) fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(value: &str, column: &'static str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_unit(value: &str, column: &'static str) -> RepoResult<WeightUnit> {
    WeightUnit::ALL
        .into_iter()
        .find(|unit| unit.symbol() == value)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid unit `{value}` in {column}")))
}

//! Pet repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist pets together with the entries they own.
//! - Implement cascade delete explicitly instead of relying on the schema.
//!
//! # Invariants
//! - `create_pet` writes the pet row and all held entries atomically.
//! - `delete_pet` removes entries first, then the pet, in one transaction.
//! - Pet listing is sorted by name (case-insensitive), then id.

use crate::model::pet::{Pet, PetId};
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::schema::{
    date_to_db, ensure_connection_ready, parse_date, parse_unit, parse_uuid, PETS_COLUMNS,
    WEIGHT_ENTRIES_COLUMNS,
};
use crate::repo::weight_entry_repo::{insert_entry, load_entries, EntryOrder};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const PET_SELECT_SQL: &str = "SELECT
    id,
    name,
    birthday,
    species,
    preferred_unit
FROM pets";

/// Query options for listing pets.
#[derive(Debug, Clone, Default)]
pub struct PetListQuery {
    /// Case-insensitive exact species match.
    pub species: Option<String>,
    pub limit: Option<u32>,
    pub offset: u32,
}

/// Repository interface for pet CRUD operations.
pub trait PetRepository {
    /// Inserts the pet and every entry it currently holds.
    fn create_pet(&self, pet: &Pet) -> RepoResult<PetId>;
    /// Updates pet fields only; entries are managed by the entry repository.
    fn update_pet(&self, pet: &Pet) -> RepoResult<()>;
    /// Loads a pet with its entries in ascending date order.
    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>>;
    fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<Pet>>;
    /// Deletes the pet and all its entries; returns the removed entry count.
    fn delete_pet(&self, id: PetId) -> RepoResult<usize>;
}

/// SQLite-backed pet repository.
pub struct SqlitePetRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePetRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "pets", &PETS_COLUMNS)?;
        ensure_connection_ready(conn, "weight_entries", &WEIGHT_ENTRIES_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PetRepository for SqlitePetRepository<'_> {
    fn create_pet(&self, pet: &Pet) -> RepoResult<PetId> {
        pet.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO pets (
                id,
                name,
                birthday,
                species,
                preferred_unit
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                pet.id.to_string(),
                pet.name.as_str(),
                date_to_db(pet.birthday),
                pet.species.as_str(),
                pet.preferred_unit.symbol(),
            ],
        )?;
        for entry in &pet.entries {
            insert_entry(&tx, entry)?;
        }
        tx.commit()?;

        Ok(pet.id)
    }

    fn update_pet(&self, pet: &Pet) -> RepoResult<()> {
        pet.validate()?;

        let changed = self.conn.execute(
            "UPDATE pets
             SET
                name = ?1,
                birthday = ?2,
                species = ?3,
                preferred_unit = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                pet.name.as_str(),
                date_to_db(pet.birthday),
                pet.species.as_str(),
                pet.preferred_unit.symbol(),
                pet.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::PetNotFound(pet.id));
        }
        Ok(())
    }

    fn get_pet(&self, id: PetId) -> RepoResult<Option<Pet>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PET_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => {
                let pet = parse_pet_row(row)?;
                Ok(Some(self.with_entries(pet)?))
            }
            None => Ok(None),
        }
    }

    fn list_pets(&self, query: &PetListQuery) -> RepoResult<Vec<Pet>> {
        let mut sql = format!("{PET_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(species) = query.species.as_deref() {
            sql.push_str(" AND species = ? COLLATE NOCASE");
            bind_values.push(Value::Text(species.trim().to_string()));
        }

        sql.push_str(" ORDER BY name COLLATE NOCASE ASC, id ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut pets = Vec::new();
        {
            let mut stmt = self.conn.prepare(&sql)?;
            let mut rows = stmt.query(params_from_iter(bind_values))?;
            while let Some(row) = rows.next()? {
                pets.push(parse_pet_row(row)?);
            }
        }

        pets.into_iter().map(|pet| self.with_entries(pet)).collect()
    }

    fn delete_pet(&self, id: PetId) -> RepoResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let removed_entries =
            tx.execute("DELETE FROM weight_entries WHERE pet_id = ?1;", [id.to_string()])?;
        let removed_pets = tx.execute("DELETE FROM pets WHERE id = ?1;", [id.to_string()])?;
        if removed_pets == 0 {
            // Dropping `tx` rolls back the entry delete.
            return Err(RepoError::PetNotFound(id));
        }
        tx.commit()?;

        Ok(removed_entries)
    }
}

impl SqlitePetRepository<'_> {
    fn with_entries(&self, mut pet: Pet) -> RepoResult<Pet> {
        for entry in load_entries(self.conn, pet.id, EntryOrder::Ascending)? {
            pet.attach_entry(entry)?;
        }
        Ok(pet)
    }
}

fn parse_pet_row(row: &Row<'_>) -> RepoResult<Pet> {
    let id = parse_uuid(&row.get::<_, String>("id")?, "pets.id")?;
    let birthday = parse_date(&row.get::<_, String>("birthday")?, "pets.birthday")?;
    let preferred_unit = parse_unit(
        &row.get::<_, String>("preferred_unit")?,
        "pets.preferred_unit",
    )?;
    let name: String = row.get("name")?;
    let species: String = row.get("species")?;
    Ok(Pet::with_id(id, &name, birthday, &species, preferred_unit)?)
}

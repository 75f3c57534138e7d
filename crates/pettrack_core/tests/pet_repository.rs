use chrono::NaiveDate;
use pettrack_core::db::migrations::latest_version;
use pettrack_core::db::open_db_in_memory;
use pettrack_core::{
    EntryOrder, NewPet, Pet, PetListQuery, PetRepository, RepoError, SqlitePetRepository,
    SqliteWeightEntryRepository, ValidationError, WeightEntry, WeightEntryDraft,
    WeightEntryRepository, WeightUnit,
};
use rusqlite::Connection;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn pet(name: &str, species: &str) -> Pet {
    Pet::new(
        NewPet {
            name: name.to_string(),
            birthday: date(2022, 4, 2),
            species: species.to_string(),
            initial_weight: 10.0,
            unit: WeightUnit::Kilograms,
        },
        date(2024, 1, 1),
    )
    .unwrap()
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

#[test]
fn create_and_get_roundtrip_includes_seed_entry() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let created = pet("Max", "Dog");
    let id = repo.create_pet(&created).unwrap();

    let loaded = repo.get_pet(id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.entries.len(), 1);
    assert_eq!(loaded.entries[0].notes, "Initial weight");
}

#[test]
fn get_missing_pet_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    assert!(repo.get_pet(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn update_pet_persists_preferred_unit() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let mut max = pet("Max", "Dog");
    repo.create_pet(&max).unwrap();
    max.set_preferred_unit(WeightUnit::Pounds);
    repo.update_pet(&max).unwrap();

    let loaded = repo.get_pet(max.id).unwrap().unwrap();
    assert_eq!(loaded.preferred_unit, WeightUnit::Pounds);
}

#[test]
fn update_missing_pet_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let ghost = pet("Ghost", "Cat");
    let err = repo.update_pet(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::PetNotFound(id) if id == ghost.id));
}

#[test]
fn list_is_sorted_by_name_case_insensitively() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    for (name, species) in [("bella", "Cat"), ("Max", "Dog"), ("Archie", "dog")] {
        repo.create_pet(&pet(name, species)).unwrap();
    }

    let names: Vec<_> = repo
        .list_pets(&PetListQuery::default())
        .unwrap()
        .into_iter()
        .map(|pet| pet.name)
        .collect();
    assert_eq!(names, vec!["Archie", "bella", "Max"]);

    let dogs = repo
        .list_pets(&PetListQuery {
            species: Some("DOG".to_string()),
            ..PetListQuery::default()
        })
        .unwrap();
    assert_eq!(dogs.len(), 2);

    let page = repo
        .list_pets(&PetListQuery {
            limit: Some(1),
            offset: 1,
            ..PetListQuery::default()
        })
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "bella");
}

#[test]
fn delete_pet_cascades_to_every_entry() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let entries = SqliteWeightEntryRepository::try_new(&conn).unwrap();

    let max = pet("Max", "Dog");
    let bella = pet("Bella", "Cat");
    pets.create_pet(&max).unwrap();
    pets.create_pet(&bella).unwrap();
    for day in 2..=4 {
        let entry = WeightEntry::new(
            max.id,
            WeightEntryDraft::new(date(2024, 1, day), 10.0 + f64::from(day), WeightUnit::Kilograms),
        )
        .unwrap();
        entries.create_entry(&entry).unwrap();
    }

    let removed = pets.delete_pet(max.id).unwrap();
    assert_eq!(removed, 4);
    assert!(pets.get_pet(max.id).unwrap().is_none());
    assert!(entries
        .list_entries(max.id, EntryOrder::Ascending)
        .unwrap()
        .is_empty());
    assert_eq!(
        count(&conn, "SELECT COUNT(*) FROM weight_entries WHERE pet_id NOT IN (SELECT id FROM pets);"),
        0
    );
    assert_eq!(entries.list_entries(bella.id, EntryOrder::Ascending).unwrap().len(), 1);
}

#[test]
fn delete_missing_pet_rolls_back_and_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePetRepository::try_new(&conn).unwrap();

    let missing = Uuid::new_v4();
    let err = repo.delete_pet(missing).unwrap_err();
    assert!(matches!(err, RepoError::PetNotFound(id) if id == missing));
}

#[test]
fn entry_crud_and_ordering() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let entries = SqliteWeightEntryRepository::try_new(&conn).unwrap();

    let max = pet("Max", "Dog");
    pets.create_pet(&max).unwrap();
    let seed_id = max.entries[0].id;

    let late = WeightEntry::new(
        max.id,
        WeightEntryDraft::new(date(2024, 3, 1), 12.0, WeightUnit::Kilograms),
    )
    .unwrap();
    let early = WeightEntry::new(
        max.id,
        WeightEntryDraft::new(date(2023, 12, 1), 9.0, WeightUnit::Kilograms).with_notes("vet"),
    )
    .unwrap();
    entries.create_entry(&late).unwrap();
    entries.create_entry(&early).unwrap();

    let ascending: Vec<_> = entries
        .list_entries(max.id, EntryOrder::Ascending)
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(ascending, vec![early.id, seed_id, late.id]);

    let descending: Vec<_> = entries
        .list_entries(max.id, EntryOrder::Descending)
        .unwrap()
        .into_iter()
        .map(|entry| entry.id)
        .collect();
    assert_eq!(descending, vec![late.id, seed_id, early.id]);

    let mut edited = entries.get_entry(early.id).unwrap().unwrap();
    edited
        .apply(WeightEntryDraft::new(date(2023, 12, 2), 20.0, WeightUnit::Pounds))
        .unwrap();
    entries.update_entry(&edited).unwrap();
    let reloaded = entries.get_entry(early.id).unwrap().unwrap();
    assert_eq!(reloaded.unit, WeightUnit::Pounds);
    assert_eq!(reloaded.notes, "");
    assert_eq!(reloaded.date, date(2023, 12, 2));

    entries.delete_entry(early.id).unwrap();
    assert!(entries.get_entry(early.id).unwrap().is_none());
    let err = entries.delete_entry(early.id).unwrap_err();
    assert!(matches!(err, RepoError::EntryNotFound(id) if id == early.id));
}

#[test]
fn equal_dates_keep_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let entries = SqliteWeightEntryRepository::try_new(&conn).unwrap();

    let max = pet("Max", "Dog");
    pets.create_pet(&max).unwrap();
    let same_day = WeightEntry::new(
        max.id,
        WeightEntryDraft::new(date(2024, 1, 1), 11.0, WeightUnit::Kilograms),
    )
    .unwrap();
    entries.create_entry(&same_day).unwrap();

    let loaded = pets.get_pet(max.id).unwrap().unwrap();
    assert_eq!(loaded.latest_entry().unwrap().id, same_day.id);
}

#[test]
fn create_entry_for_unknown_pet_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let entries = SqliteWeightEntryRepository::try_new(&conn).unwrap();

    let orphan = WeightEntry::new(
        Uuid::new_v4(),
        WeightEntryDraft::new(date(2024, 1, 1), 1.0, WeightUnit::Kilograms),
    )
    .unwrap();
    let err = entries.create_entry(&orphan).unwrap_err();
    assert!(matches!(err, RepoError::PetNotFound(_)));
}

#[test]
fn invalid_models_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();
    let entries = SqliteWeightEntryRepository::try_new(&conn).unwrap();

    let mut blank = pet("Max", "Dog");
    blank.name = "   ".to_string();
    let err = pets.create_pet(&blank).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ValidationError::EmptyName)));

    let max = pet("Max", "Dog");
    pets.create_pet(&max).unwrap();
    let mut entry = max.entries[0].clone();
    entry.weight = -3.0;
    let err = entries.update_entry(&entry).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::NonPositiveWeight(_))
    ));
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM pets;"), 1);
}

#[test]
fn corrupted_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let pets = SqlitePetRepository::try_new(&conn).unwrap();

    let max = pet("Max", "Dog");
    pets.create_pet(&max).unwrap();
    conn.execute("UPDATE pets SET birthday = 'not-a-date';", [])
        .unwrap();

    let err = pets.get_pet(max.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(message) if message.contains("pets.birthday")));
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqlitePetRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE weight_entries (
            id TEXT PRIMARY KEY NOT NULL,
            pet_id TEXT NOT NULL,
            weight REAL NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteWeightEntryRepository::try_new(&conn),
        Err(RepoError::MissingRequiredColumn {
            table: "weight_entries",
            column: "entry_date"
        })
    ));
    assert!(matches!(
        SqlitePetRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("pets"))
    ));
}

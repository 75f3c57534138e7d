use chrono::{Days, Months, NaiveDate};
use pettrack_core::db::open_db_in_memory;
use pettrack_core::{
    ChangeDirection, ChangeEvent, ChartShape, FixedClock, NewPet, PetForm, PetService,
    ServiceError, SqlitePetRepository, SqliteWeightEntryRepository, ValidationError, Weight,
    WeightEntryDraft, WeightEntryForm, WeightUnit, PET_FORM_ERROR_MESSAGE,
    WEIGHT_FORM_ERROR_MESSAGE,
};
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

type Service<'conn> =
    PetService<SqlitePetRepository<'conn>, SqliteWeightEntryRepository<'conn>>;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
}

fn service(conn: &Connection) -> Service<'_> {
    PetService::with_clock(
        SqlitePetRepository::try_new(conn).unwrap(),
        SqliteWeightEntryRepository::try_new(conn).unwrap(),
        FixedClock(today()),
    )
}

fn max_draft() -> NewPet {
    NewPet {
        name: "Max".to_string(),
        birthday: today().checked_sub_months(Months::new(12)).unwrap(),
        species: "Dog".to_string(),
        initial_weight: 45.0,
        unit: WeightUnit::Pounds,
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn max_scenario_tracks_gain_between_entries() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let max = service.create_pet(max_draft()).unwrap();
    assert_eq!(max.entries.len(), 1);
    assert_eq!(max.entries[0].notes, "Initial weight");
    assert_eq!(max.entries[0].display_weight(), "45.0 lbs");
    assert_eq!(max.entries[0].date, today());

    let week_later = today().checked_add_days(Days::new(7)).unwrap();
    let preview = service
        .compare_with_latest(max.id, week_later, Weight::new(47.0, WeightUnit::Pounds))
        .unwrap()
        .expect("later date should compare against latest entry");
    assert!((preview.difference_kg - 0.907).abs() < 1e-3);
    assert!((preview.percent_change - 4.44).abs() < 1e-2);
    assert_eq!(preview.direction(), ChangeDirection::Increase);

    let added = service
        .add_weight_entry(
            max.id,
            WeightEntryDraft::new(week_later, 47.0, WeightUnit::Pounds),
        )
        .unwrap();

    let detail = service.pet_detail(max.id).unwrap();
    assert_eq!(detail.latest.as_ref().map(|entry| entry.id), Some(added.id));
    assert_eq!(detail.age, "1 year old");
    assert_eq!(detail.species_icon, "dog");
    assert_eq!(detail.history[0].id, added.id);
    assert_eq!(detail.history.len(), 2);
    assert_eq!(detail.chart.shape(), ChartShape::Trend);
    assert_eq!(detail.chart.unit, WeightUnit::Pounds);
}

#[test]
fn compare_with_latest_requires_a_later_date() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let max = service.create_pet(max_draft()).unwrap();

    let same_day = service
        .compare_with_latest(max.id, today(), Weight::new(50.0, WeightUnit::Pounds))
        .unwrap();
    assert!(same_day.is_none());

    let earlier = today().checked_sub_days(Days::new(1)).unwrap();
    assert!(service
        .compare_with_latest(max.id, earlier, Weight::new(50.0, WeightUnit::Pounds))
        .unwrap()
        .is_none());

    let next_day = today().checked_add_days(Days::new(1)).unwrap();
    let comparison = service
        .compare_with_latest(max.id, next_day, Weight::new(45.0, WeightUnit::Pounds))
        .unwrap()
        .expect("next day compares against the seed entry");
    assert_eq!(comparison.direction(), ChangeDirection::NoChange);
}

#[test]
fn edit_form_is_prefilled_with_one_decimal() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let max = service.create_pet(max_draft()).unwrap();
    let entry = service
        .add_weight_entry(
            max.id,
            WeightEntryDraft::new(today(), 47.26, WeightUnit::Kilograms).with_notes("vet"),
        )
        .unwrap();

    let form = service.weight_entry_edit_form(entry.id).unwrap();
    assert_eq!(form.date, today());
    assert_eq!(form.weight, "47.3");
    assert_eq!(form.unit, WeightUnit::Kilograms);
    assert_eq!(form.notes, "vet");

    let missing = Uuid::new_v4();
    let err = service.weight_entry_edit_form(missing).unwrap_err();
    assert!(matches!(err, ServiceError::EntryNotFound(id) if id == missing));
}

#[test]
fn rejected_weight_input_leaves_model_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let max = service.create_pet(max_draft()).unwrap();

    for raw in ["-5", "abc", "", "0"] {
        let form = WeightEntryForm {
            date: today(),
            weight: raw.to_string(),
            unit: WeightUnit::Pounds,
            notes: String::new(),
        };
        let err = service.add_weight_entry_from_form(max.id, &form).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{raw}: {err}");
        assert_eq!(err.user_message(), Some(WEIGHT_FORM_ERROR_MESSAGE));
    }

    let err = service
        .add_weight_entry(max.id, WeightEntryDraft::new(today(), f64::NAN, WeightUnit::Kilograms))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidWeight(_))
    ));

    assert_eq!(count(&conn, "weight_entries"), 1);
    assert_eq!(service.get_pet(max.id).unwrap().unwrap(), max);
}

#[test]
fn rejected_pet_form_creates_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let form = PetForm {
        name: "  ".to_string(),
        birthday: today(),
        species: "Cat".to_string(),
        initial_weight: "4".to_string(),
        unit: WeightUnit::Kilograms,
    };
    let err = service.create_pet_from_form(&form).unwrap_err();
    assert_eq!(err.user_message(), Some(PET_FORM_ERROR_MESSAGE));

    let err = service
        .create_pet_from_form(&PetForm {
            name: "Luna".to_string(),
            initial_weight: "abc".to_string(),
            ..form.clone()
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::InvalidWeight(_))
    ));

    assert_eq!(count(&conn, "pets"), 0);
    assert_eq!(count(&conn, "weight_entries"), 0);
}

#[test]
fn edit_weight_entry_mutates_in_place() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let max = service.create_pet(max_draft()).unwrap();
    let seed_id = max.entries[0].id;

    let edited = service
        .edit_weight_entry(
            seed_id,
            WeightEntryDraft::new(today(), 20.5, WeightUnit::Kilograms).with_notes(" weighed at vet "),
        )
        .unwrap();
    assert_eq!(edited.id, seed_id);
    assert_eq!(edited.display_weight(), "20.5 kg");
    assert_eq!(edited.notes, "weighed at vet");

    let err = service
        .edit_weight_entry(seed_id, WeightEntryDraft::new(today(), -1.0, WeightUnit::Kilograms))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
    let stored = service.get_weight_entry(seed_id).unwrap().unwrap();
    assert_eq!(stored, edited);

    let missing = Uuid::new_v4();
    let err = service
        .edit_weight_entry(missing, WeightEntryDraft::new(today(), 1.0, WeightUnit::Kilograms))
        .unwrap_err();
    assert!(matches!(err, ServiceError::EntryNotFound(id) if id == missing));
}

#[test]
fn delete_pet_removes_all_entries_and_notifies() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    service.subscribe(move |event| sink.borrow_mut().push(*event));

    let max = service.create_pet(max_draft()).unwrap();
    for day in 1..=3 {
        service
            .add_weight_entry(
                max.id,
                WeightEntryDraft::new(
                    today().checked_add_days(Days::new(day)).unwrap(),
                    45.0 + day as f64,
                    WeightUnit::Pounds,
                ),
            )
            .unwrap();
    }

    let removed = service.delete_pet(max.id).unwrap();
    assert_eq!(removed, 4);
    assert_eq!(count(&conn, "weight_entries"), 0);
    assert!(service.get_pet(max.id).unwrap().is_none());

    let events = events.borrow();
    assert_eq!(events.len(), 5);
    assert_eq!(events[0], ChangeEvent::PetCreated { pet_id: max.id });
    assert_eq!(
        events[4],
        ChangeEvent::PetDeleted {
            pet_id: max.id,
            removed_entries: 4
        }
    );
}

#[test]
fn failed_mutations_publish_nothing() {
    let conn = open_db_in_memory().unwrap();
    let mut service = service(&conn);
    let fired = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&fired);
    let subscription = service.subscribe(move |_| *counter.borrow_mut() += 1);

    assert!(service.delete_pet(Uuid::new_v4()).is_err());
    assert!(service
        .add_weight_entry(
            Uuid::new_v4(),
            WeightEntryDraft::new(today(), 1.0, WeightUnit::Kilograms)
        )
        .is_err());
    assert_eq!(*fired.borrow(), 0);

    assert!(service.unsubscribe(subscription));
    service.create_pet(max_draft()).unwrap();
    assert_eq!(*fired.borrow(), 0);
}

#[test]
fn preferred_unit_changes_chart_unit_only() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let max = service.create_pet(max_draft()).unwrap();

    let updated = service
        .set_preferred_unit(max.id, WeightUnit::Kilograms)
        .unwrap();
    assert_eq!(updated.preferred_unit, WeightUnit::Kilograms);

    let detail = service.pet_detail(max.id).unwrap();
    assert_eq!(detail.chart.unit, WeightUnit::Kilograms);
    assert_eq!(detail.chart.shape(), ChartShape::Single);
    assert!((detail.chart.points[0].weight - 20.41165665).abs() < 1e-6);
    assert_eq!(detail.pet.entries[0].unit, WeightUnit::Pounds);
    assert_eq!(detail.pet.entries[0].weight, 45.0);
}

#[test]
fn delete_weight_entry_leaves_pet_with_empty_history() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let max = service.create_pet(max_draft()).unwrap();

    service.delete_weight_entry(max.entries[0].id).unwrap();

    let detail = service.pet_detail(max.id).unwrap();
    assert!(detail.latest.is_none());
    assert!(detail.history.is_empty());
    assert_eq!(detail.chart.shape(), ChartShape::Empty);
    assert!(service
        .compare_with_latest(max.id, today(), Weight::new(1.0, WeightUnit::Kilograms))
        .unwrap()
        .is_none());
}

#[test]
fn list_pets_is_sorted_by_name() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    for name in ["Rex", "bella", "Coco"] {
        service
            .create_pet(NewPet {
                name: name.to_string(),
                ..max_draft()
            })
            .unwrap();
    }

    let names: Vec<_> = service
        .list_pets()
        .unwrap()
        .into_iter()
        .map(|pet| pet.name)
        .collect();
    assert_eq!(names, vec!["bella", "Coco", "Rex"]);
}

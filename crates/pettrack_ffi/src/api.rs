//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose pet and weight-entry use-cases to Dart via FRB.
//! - Translate raw form text into core forms and core results into
//!   display-ready envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Dates cross the boundary as `YYYY-MM-DD`, units as `lbs|kg`, ids as
//!   hyphenated UUID strings.
//! - Validation failures carry the dialog text; other failures carry a
//!   `<op> failed: <reason>` diagnostic.

use chrono::NaiveDate;
use log::warn;
use pettrack_core::db::open_db;
use pettrack_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, parse_weight_input, ping as ping_inner, species_icon, ChangeDirection, ChartSeries, ChartShape, Pet, PetDetail,
    PetForm, PetService, ServiceError, ServiceResult, SqlitePetRepository,
    SqliteWeightEntryRepository, Weight, WeightComparison, WeightEntry, WeightEntryForm,
    WeightUnit, COMMON_SPECIES, PET_FORM_ERROR_MESSAGE, SPECIES_PLACEHOLDER,
};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const DB_FILE_NAME: &str = "pettrack.sqlite3";
const DATE_FORMAT: &str = "%Y-%m-%d";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Reconfiguration attempts with different level or directory return error.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Level the UI should pass to `init_logging` when it has no override.
///
/// `debug` for debug builds, `info` for release builds.
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().as_str().to_string()
}

/// Choices for the add-pet species picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesOptions {
    /// Initial picker row; submitting it is rejected.
    pub placeholder: String,
    pub options: Vec<String>,
}

/// Returns the species picker catalogue.
#[flutter_rust_bridge::frb(sync)]
pub fn species_options() -> SpeciesOptions {
    SpeciesOptions {
        placeholder: SPECIES_PLACEHOLDER.to_string(),
        options: COMMON_SPECIES.iter().map(|species| species.to_string()).collect(),
    }
}

/// One unit picker row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightUnitOption {
    /// Value passed back to the API, `lbs|kg`.
    pub symbol: String,
    pub display_name: String,
}

/// Returns the unit picker rows in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_unit_options() -> Vec<WeightUnitOption> {
    WeightUnit::ALL
        .iter()
        .map(|unit| WeightUnitOption {
            symbol: unit.symbol().to_string(),
            display_name: unit.display_name().to_string(),
        })
        .collect()
}

/// One weight measurement, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntryItem {
    pub entry_id: String,
    pub pet_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Weight as entered, in `unit`.
    pub weight: f64,
    /// `lbs|kg`.
    pub unit: String,
    /// One decimal plus symbol, e.g. `45.0 lbs`.
    pub display_weight: String,
    pub notes: String,
}

/// Pet list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetSummaryItem {
    pub pet_id: String,
    pub name: String,
    pub species: String,
    pub species_icon: String,
    pub age: String,
    /// Display weight of the latest entry, if any.
    pub latest_weight: Option<String>,
    /// `YYYY-MM-DD` of the latest entry, if any.
    pub latest_date: Option<String>,
}

/// Pet list response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetListResponse {
    pub ok: bool,
    /// Pets sorted by name.
    pub items: Vec<PetSummaryItem>,
    pub message: String,
}

/// One chart sample in the pet's preferred unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPointItem {
    pub date: String,
    pub weight: f64,
}

/// Chart payload for the detail screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartItem {
    pub unit: String,
    /// `empty|single|trend`.
    pub shape: String,
    pub points: Vec<ChartPointItem>,
    pub y_min: f64,
    pub y_max: f64,
}

/// Pet detail read model.
#[derive(Debug, Clone, PartialEq)]
pub struct PetDetailItem {
    pub pet_id: String,
    pub name: String,
    pub birthday: String,
    pub species: String,
    pub species_icon: String,
    pub age: String,
    pub preferred_unit: String,
    pub latest: Option<WeightEntryItem>,
    /// Newest first.
    pub history: Vec<WeightEntryItem>,
    pub chart: ChartItem,
}

/// Pet detail response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct PetDetailResponse {
    pub ok: bool,
    pub pet: Option<PetDetailItem>,
    pub message: String,
}

/// Generic action response envelope for pet and entry mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Created or affected pet/entry ID.
    pub id: Option<String>,
    /// Dialog text on validation failure, diagnostics otherwise.
    pub message: String,
}

impl PetActionResponse {
    fn success(message: impl Into<String>, id: String) -> Self {
        Self {
            ok: true,
            id: Some(id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Edit-entry form field values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightEntryFormItem {
    pub entry_id: String,
    pub date: String,
    /// Form text, one decimal place.
    pub weight: String,
    pub unit: String,
    pub notes: String,
}

/// Edit-entry prefill response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightEntryPrefillResponse {
    pub ok: bool,
    pub form: Option<WeightEntryFormItem>,
    pub message: String,
}

/// Live comparison shown while adding an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightComparisonResponse {
    pub ok: bool,
    /// `false` when there is nothing to compare against.
    pub available: bool,
    /// `increase|decrease|no_change`.
    pub direction: Option<String>,
    /// e.g. `+2.0 lbs`.
    pub change_label: Option<String>,
    /// e.g. `4.4% increase`.
    pub percent_label: Option<String>,
    pub message: String,
}

impl WeightComparisonResponse {
    fn unavailable(ok: bool, message: impl Into<String>) -> Self {
        Self {
            ok,
            available: false,
            direction: None,
            change_label: None,
            percent_label: None,
            message: message.into(),
        }
    }
}

/// Creates a pet together with its seed weight entry dated today.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - `initial_weight` is raw form text; rejected text creates nothing.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn pet_create(
    name: String,
    birthday: String,
    species: String,
    initial_weight: String,
    unit: String,
) -> PetActionResponse {
    let result = parse_date(&birthday)
        .and_then(|birthday| Ok((birthday, parse_unit(&unit)?)))
        .and_then(|(birthday, unit)| {
            let form = PetForm {
                name,
                birthday,
                species,
                initial_weight,
                unit,
            };
            with_pet_service(|service| service.create_pet_from_form(&form))
        });
    match result {
        Ok(pet) => PetActionResponse::success("Pet created.", pet.id.to_string()),
        Err(err) => PetActionResponse::failure(err.message("pet_create")),
    }
}

/// Lists all pets sorted by name.
#[flutter_rust_bridge::frb(sync)]
pub fn pet_list() -> PetListResponse {
    let result = with_pet_service(|service| {
        let today = service.today();
        Ok(service
            .list_pets()?
            .iter()
            .map(|pet| to_pet_summary_item(pet, today))
            .collect::<Vec<_>>())
    });
    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No pets yet.".to_string()
            } else {
                format!("Found {} pet(s).", items.len())
            };
            PetListResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(err) => PetListResponse {
            ok: false,
            items: Vec::new(),
            message: err.message("pet_list"),
        },
    }
}

/// Loads the detail read model for one pet.
#[flutter_rust_bridge::frb(sync)]
pub fn pet_detail(pet_id: String) -> PetDetailResponse {
    let result =
        parse_id(&pet_id).and_then(|id| with_pet_service(|service| service.pet_detail(id)));
    match result {
        Ok(detail) => PetDetailResponse {
            ok: true,
            pet: Some(to_pet_detail_item(detail)),
            message: "Pet loaded.".to_string(),
        },
        Err(err) => PetDetailResponse {
            ok: false,
            pet: None,
            message: err.message("pet_detail"),
        },
    }
}

/// Deletes a pet and every weight entry it owns.
#[flutter_rust_bridge::frb(sync)]
pub fn pet_delete(pet_id: String) -> PetActionResponse {
    let result =
        parse_id(&pet_id).and_then(|id| with_pet_service(|service| service.delete_pet(id)));
    match result {
        Ok(removed) => PetActionResponse::success(
            format!("Pet deleted; removed {removed} weight entry record(s)."),
            pet_id.trim().to_string(),
        ),
        Err(err) => PetActionResponse::failure(err.message("pet_delete")),
    }
}

/// Changes the unit the pet's chart is drawn in.
#[flutter_rust_bridge::frb(sync)]
pub fn pet_set_preferred_unit(pet_id: String, unit: String) -> PetActionResponse {
    let result = parse_id(&pet_id).and_then(|id| {
        let unit = parse_unit(&unit)?;
        with_pet_service(|service| service.set_preferred_unit(id, unit))
    });
    match result {
        Ok(pet) => PetActionResponse::success("Preferred unit updated.", pet.id.to_string()),
        Err(err) => PetActionResponse::failure(err.message("pet_set_preferred_unit")),
    }
}

/// Adds a weight entry for a pet.
///
/// # FFI contract
/// - `weight` is raw form text; rejected text adds nothing.
/// - Dates need not be unique or in order.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_entry_add(
    pet_id: String,
    date: String,
    weight: String,
    unit: String,
    notes: String,
) -> PetActionResponse {
    let result = parse_id(&pet_id).and_then(|id| {
        let form = parse_entry_form(&date, weight, &unit, notes)?;
        with_pet_service(|service| service.add_weight_entry_from_form(id, &form))
    });
    match result {
        Ok(entry) => PetActionResponse::success("Weight entry added.", entry.id.to_string()),
        Err(err) => PetActionResponse::failure(err.message("weight_entry_add")),
    }
}

/// Replaces date, weight, unit and notes of an existing entry.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_entry_edit(
    entry_id: String,
    date: String,
    weight: String,
    unit: String,
    notes: String,
) -> PetActionResponse {
    let result = parse_id(&entry_id).and_then(|id| {
        let form = parse_entry_form(&date, weight, &unit, notes)?;
        with_pet_service(|service| service.edit_weight_entry_from_form(id, &form))
    });
    match result {
        Ok(entry) => PetActionResponse::success("Weight entry updated.", entry.id.to_string()),
        Err(err) => PetActionResponse::failure(err.message("weight_entry_edit")),
    }
}

/// Loads the edit form for an existing entry.
///
/// # FFI contract
/// - Read-only; nothing is written.
/// - The weight text is rounded to one decimal, as the entry is displayed.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_entry_edit_prefill(entry_id: String) -> WeightEntryPrefillResponse {
    let result = parse_id(&entry_id)
        .and_then(|id| with_pet_service(|service| service.weight_entry_edit_form(id)));
    match result {
        Ok(form) => WeightEntryPrefillResponse {
            ok: true,
            form: Some(WeightEntryFormItem {
                entry_id: entry_id.trim().to_string(),
                date: format_date(form.date),
                weight: form.weight,
                unit: form.unit.symbol().to_string(),
                notes: form.notes,
            }),
            message: "Weight entry loaded.".to_string(),
        },
        Err(err) => WeightEntryPrefillResponse {
            ok: false,
            form: None,
            message: err.message("weight_entry_edit_prefill"),
        },
    }
}

/// Deletes one weight entry.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_entry_delete(entry_id: String) -> PetActionResponse {
    let result = parse_id(&entry_id)
        .and_then(|id| with_pet_service(|service| service.delete_weight_entry(id)));
    match result {
        Ok(()) => {
            PetActionResponse::success("Weight entry deleted.", entry_id.trim().to_string())
        }
        Err(err) => PetActionResponse::failure(err.message("weight_entry_delete")),
    }
}

/// Compares a candidate measurement with the pet's latest entry.
///
/// # FFI contract
/// - Read-only; nothing is written.
/// - `available=false` while the weight text is not a valid weight, the pet
///   has no entries, or `date` is not after the latest entry's date.
#[flutter_rust_bridge::frb(sync)]
pub fn weight_compare_preview(
    pet_id: String,
    date: String,
    weight: String,
    unit: String,
) -> WeightComparisonResponse {
    let Ok(value) = parse_weight_input(&weight) else {
        return WeightComparisonResponse::unavailable(true, "Enter a weight to compare.");
    };
    let result = parse_id(&pet_id).and_then(|id| {
        let date = parse_date(&date)?;
        let unit = parse_unit(&unit)?;
        let comparison = with_pet_service(|service| {
            service.compare_with_latest(id, date, Weight::new(value, unit))
        })?;
        Ok((comparison, unit))
    });
    match result {
        Ok((Some(comparison), unit)) => WeightComparisonResponse {
            ok: true,
            available: true,
            direction: Some(direction_label(&comparison).to_string()),
            change_label: Some(comparison.change_label(unit)),
            percent_label: comparison.percent_label(),
            message: "Compared with latest entry.".to_string(),
        },
        Ok((None, _)) => {
            WeightComparisonResponse::unavailable(true, "No earlier entry to compare with.")
        }
        Err(err) => WeightComparisonResponse::unavailable(
            false,
            err.message("weight_compare_preview"),
        ),
    }
}

/// FFI call failure before or during the use-case.
#[derive(Debug)]
enum CallError {
    /// Malformed date, unit or id text.
    Input(String),
    /// DB open or repository bootstrap failure.
    Setup(String),
    Service(ServiceError),
}

impl CallError {
    /// Envelope message: input and validation failures carry dialog text,
    /// everything else a diagnostic.
    fn message(&self, op: &str) -> String {
        let dialog_text = match self {
            Self::Input(message) => Some(message.clone()),
            Self::Service(err) => err.user_message().map(str::to_string),
            Self::Setup(_) => None,
        };
        dialog_text.unwrap_or_else(|| {
            warn!("event=ffi_call module=ffi status=error op={op}");
            format!("{op} failed: {self}")
        })
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(message) | Self::Setup(message) => write!(f, "{message}"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl From<ServiceError> for CallError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("PETTRACK_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_pet_service<T>(
    f: impl FnOnce(
        &PetService<SqlitePetRepository<'_>, SqliteWeightEntryRepository<'_>>,
    ) -> ServiceResult<T>,
) -> Result<T, CallError> {
    let db_path = resolve_db_path();
    let conn =
        open_db(&db_path).map_err(|err| CallError::Setup(format!("DB open failed: {err}")))?;
    let pets = SqlitePetRepository::try_new(&conn)
        .map_err(|err| CallError::Setup(format!("pet repo init failed: {err}")))?;
    let entries = SqliteWeightEntryRepository::try_new(&conn)
        .map_err(|err| CallError::Setup(format!("entry repo init failed: {err}")))?;
    let service = PetService::new(pets, entries);
    Ok(f(&service)?)
}

fn parse_id(raw: &str) -> Result<Uuid, CallError> {
    let trimmed = raw.trim();
    Uuid::parse_str(trimmed).map_err(|_| CallError::Input(format!("invalid id `{trimmed}`")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, CallError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| CallError::Input(PET_FORM_ERROR_MESSAGE.to_string()))
}

fn parse_unit(raw: &str) -> Result<WeightUnit, CallError> {
    WeightUnit::parse(raw).ok_or_else(|| CallError::Input(PET_FORM_ERROR_MESSAGE.to_string()))
}

fn parse_entry_form(
    date: &str,
    weight: String,
    unit: &str,
    notes: String,
) -> Result<WeightEntryForm, CallError> {
    Ok(WeightEntryForm {
        date: parse_date(date)?,
        weight,
        unit: parse_unit(unit)?,
        notes,
    })
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn to_weight_entry_item(entry: &WeightEntry) -> WeightEntryItem {
    WeightEntryItem {
        entry_id: entry.id.to_string(),
        pet_id: entry.pet_id.to_string(),
        date: format_date(entry.date),
        weight: entry.weight,
        unit: entry.unit.symbol().to_string(),
        display_weight: entry.display_weight(),
        notes: entry.notes.clone(),
    }
}

fn to_pet_summary_item(pet: &Pet, today: NaiveDate) -> PetSummaryItem {
    PetSummaryItem {
        pet_id: pet.id.to_string(),
        name: pet.name.clone(),
        species: pet.species.clone(),
        species_icon: species_icon(&pet.species).to_string(),
        age: pet.age_string(today),
        latest_weight: pet.latest_entry().map(WeightEntry::display_weight),
        latest_date: pet.latest_entry().map(|entry| format_date(entry.date)),
    }
}

fn to_chart_item(chart: &ChartSeries) -> ChartItem {
    let (y_min, y_max) = chart.y_range();
    ChartItem {
        unit: chart.unit.symbol().to_string(),
        shape: chart_shape_label(chart.shape()).to_string(),
        points: chart
            .points
            .iter()
            .map(|point| ChartPointItem {
                date: format_date(point.date),
                weight: point.weight,
            })
            .collect(),
        y_min,
        y_max,
    }
}

fn to_pet_detail_item(detail: PetDetail) -> PetDetailItem {
    PetDetailItem {
        pet_id: detail.pet.id.to_string(),
        name: detail.pet.name.clone(),
        birthday: format_date(detail.pet.birthday),
        species: detail.pet.species.clone(),
        species_icon: detail.species_icon.to_string(),
        age: detail.age,
        preferred_unit: detail.pet.preferred_unit.symbol().to_string(),
        latest: detail.latest.as_ref().map(to_weight_entry_item),
        history: detail.history.iter().map(to_weight_entry_item).collect(),
        chart: to_chart_item(&detail.chart),
    }
}

fn chart_shape_label(shape: ChartShape) -> &'static str {
    match shape {
        ChartShape::Empty => "empty",
        ChartShape::Single => "single",
        ChartShape::Trend => "trend",
    }
}

fn direction_label(comparison: &WeightComparison) -> &'static str {
    match comparison.direction() {
        ChangeDirection::Increase => "increase",
        ChangeDirection::Decrease => "decrease",
        ChangeDirection::NoChange => "no_change",
    }
}

//! FFI form API for the Flutter roster screen.
//!
//! # Responsibility
//! - Expose form-level actions (submit, edit, update, cancel, delete) to Dart.
//! - Return a full screen snapshot after every call so the UI can redraw.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Calls are serialized through one process-wide controller.
//! - Delete is only attempted after the UI's confirmation dialog answered.

use log::{error, info};
use roster_core::db::open_db;
use roster_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    FormField, RecordInput, RecordRepository, RosterConfig, RosterController, RowKey, RowView,
    SqliteKvStore,
};
use std::sync::{Mutex, MutexGuard, OnceLock};

type Controller = RosterController<SqliteKvStore>;

static CONTROLLER: OnceLock<Mutex<Option<Controller>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// A blank `level` falls back to `ROSTER_LOG_LEVEL` or the build default.
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        RosterConfig::from_env().log_level
    } else {
        level
    };
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRow {
    /// Stable row identity for edit/delete triggers.
    pub row_key: u64,
    pub position: u32,
    pub name: String,
    pub id: String,
    pub email: String,
    pub contact: String,
}

/// Everything the roster screen draws.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RosterSnapshot {
    pub rows: Vec<RosterRow>,
    pub name: String,
    pub id: String,
    pub email: String,
    pub contact: String,
    /// Error slot text; `None` hides the slot.
    pub error: Option<String>,
    pub show_submit: bool,
    pub show_update: bool,
    pub show_cancel: bool,
}

/// Result envelope for every roster call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterResponse {
    pub ok: bool,
    /// Human-readable outcome for diagnostics.
    pub message: String,
    pub snapshot: RosterSnapshot,
}

/// Current screen state without side effects.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_snapshot() -> RosterResponse {
    with_controller("roster_snapshot", |_| Ok("Loaded.".to_string()))
}

/// Mirrors one typed form field (`name|id|email|contact`).
#[flutter_rust_bridge::frb(sync)]
pub fn roster_set_field(field: String, value: String) -> RosterResponse {
    with_controller("roster_set_field", |controller| {
        let field = parse_field(&field)?;
        controller.set_field(field, value);
        Ok(String::new())
    })
}

/// Submit action: appends a new record from the given form values.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_submit(name: String, id: String, email: String, contact: String) -> RosterResponse {
    with_controller("roster_submit", |controller| {
        controller
            .submit_create(RecordInput::new(name, id, email, contact))
            .map(|_| "Record added.".to_string())
            .map_err(|err| err.to_string())
    })
}

/// Row edit trigger: loads the row into the form and switches to edit mode.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_begin_edit(row_key: u64) -> RosterResponse {
    with_controller("roster_begin_edit", |controller| {
        controller
            .begin_edit_row(RowKey::from_value(row_key))
            .map(|()| "Editing record.".to_string())
            .map_err(|err| err.to_string())
    })
}

/// Update action: saves the form values over the edited record.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_update(name: String, id: String, email: String, contact: String) -> RosterResponse {
    with_controller("roster_update", |controller| {
        controller
            .commit_edit(RecordInput::new(name, id, email, contact))
            .map(|()| "Record updated.".to_string())
            .map_err(|err| err.to_string())
    })
}

/// Cancel action: leaves edit mode and clears the form.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_cancel_edit() -> RosterResponse {
    with_controller("roster_cancel_edit", |controller| {
        controller.cancel_edit();
        Ok("Edit cancelled.".to_string())
    })
}

/// Row delete trigger. `confirmed` is the answer of the UI's
/// confirmation dialog; `false` leaves the row in place.
#[flutter_rust_bridge::frb(sync)]
pub fn roster_delete(row_key: u64, confirmed: bool) -> RosterResponse {
    with_controller("roster_delete", |controller| {
        let mut answer = |_: &str| confirmed;
        match controller.delete_row(RowKey::from_value(row_key), &mut answer) {
            Ok(true) => Ok("Record deleted.".to_string()),
            Ok(false) => Ok("Delete cancelled.".to_string()),
            Err(err) => Err(err.to_string()),
        }
    })
}

fn parse_field(field: &str) -> Result<FormField, String> {
    match field.trim().to_ascii_lowercase().as_str() {
        "name" => Ok(FormField::Name),
        "id" => Ok(FormField::Id),
        "email" => Ok(FormField::Email),
        "contact" => Ok(FormField::Contact),
        other => Err(format!(
            "unknown form field `{other}`; expected name|id|email|contact"
        )),
    }
}

fn with_controller(
    op: &'static str,
    f: impl FnOnce(&mut Controller) -> Result<String, String>,
) -> RosterResponse {
    let mut guard = lock_controller();
    if guard.is_none() {
        match open_controller() {
            Ok(controller) => *guard = Some(controller),
            Err(err) => {
                error!("event={op} module=ffi status=error error_code=open_failed");
                return RosterResponse {
                    ok: false,
                    message: format!("{op} failed: {err}"),
                    snapshot: RosterSnapshot::default(),
                };
            }
        }
    }

    let Some(controller) = guard.as_mut() else {
        return RosterResponse {
            ok: false,
            message: format!("{op} failed: roster unavailable"),
            snapshot: RosterSnapshot::default(),
        };
    };

    let (ok, message) = match f(controller) {
        Ok(message) => (true, message),
        Err(err) => (false, format!("{op} failed: {err}")),
    };
    RosterResponse {
        ok,
        message,
        snapshot: snapshot_of(controller),
    }
}

fn lock_controller() -> MutexGuard<'static, Option<Controller>> {
    CONTROLLER
        .get_or_init(|| Mutex::new(None))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn open_controller() -> Result<Controller, String> {
    let config = RosterConfig::from_env();
    let conn = open_db(&config.db_path).map_err(|err| format!("roster DB open failed: {err}"))?;
    let kv = SqliteKvStore::try_new(conn).map_err(|err| format!("roster DB init failed: {err}"))?;
    let repo = RecordRepository::with_key(kv, config.storage_key);
    let (controller, outcome) =
        RosterController::open(repo).map_err(|err| format!("roster load failed: {err}"))?;
    info!("event=ffi_open module=ffi status=ok outcome={outcome:?}");
    Ok(controller)
}

fn snapshot_of(controller: &Controller) -> RosterSnapshot {
    let form = controller.form();
    let mode = controller.form_mode();
    RosterSnapshot {
        rows: controller.rows().iter().map(to_roster_row).collect(),
        name: form.fields.name.clone(),
        id: form.fields.id.clone(),
        email: form.fields.email.clone(),
        contact: form.fields.contact.clone(),
        error: form.error.clone(),
        show_submit: mode.shows_submit(),
        show_update: mode.shows_update(),
        show_cancel: mode.shows_cancel(),
    }
}

fn to_roster_row(row: &RowView) -> RosterRow {
    RosterRow {
        row_key: row.key.value(),
        position: u32::try_from(row.position).unwrap_or(u32::MAX),
        name: row.name.clone(),
        id: row.id.clone(),
        email: row.email.clone(),
        contact: row.contact.clone(),
    }
}

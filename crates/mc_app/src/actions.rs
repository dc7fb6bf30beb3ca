use std::path::{Path, PathBuf};

use mc_core::export::EXPORT_FILE_NAME;
use mc_core::grid::Grid;
use tracing::{info, warn};

use crate::catalogs::{discover_catalogs, empty_catalog};
use crate::prefs::save_editor_prefs;
use crate::state::AppState;

pub enum AppAction {
    LoadCsv(PathBuf),
    LoadCsvText(String),
    ScanCatalogs,
    SetCatalogRoot(String),
    OpenCatalog(String),
    EditCell { row: usize, col: usize, text: String },
    SelectLocale(Option<String>),
    SetCredential(String),
    Translate,
    SetQuery(String),
    SaveAsPath(PathBuf),
    SaveCatalog,
    DismissNotice,
}

pub fn dispatch(state: &mut AppState, action: AppAction) -> Result<(), String> {
    match action {
        AppAction::LoadCsv(path) => {
            ensure_idle(state)?;
            let text = std::fs::read_to_string(&path)
                .map_err(|err| format!("read {}: {err}", path.display()))?;
            install_csv(state, &text)?;
            state.current_catalog = None;
            state.file_status = format!(
                "Loaded {} ({} rows)",
                path.display(),
                data_rows(state)
            );
            state.loaded_path = Some(path);
        }
        AppAction::LoadCsvText(text) => {
            ensure_idle(state)?;
            install_csv(state, &text)?;
            state.current_catalog = None;
            state.loaded_path = None;
            state.file_status = format!("Loaded pasted catalog ({} rows)", data_rows(state));
        }
        AppAction::ScanCatalogs => {
            let root = PathBuf::from(&state.prefs.catalog_root);
            state.catalogs = discover_catalogs(&root)?;
            state.file_status = format!(
                "Found {} modules under {}",
                state.catalogs.len(),
                root.display()
            );
        }
        AppAction::SetCatalogRoot(value) => {
            state.prefs.catalog_root = value;
            persist_prefs(state);
        }
        AppAction::OpenCatalog(name) => {
            ensure_idle(state)?;
            let path = state
                .catalogs
                .get(&name)
                .cloned()
                .ok_or_else(|| format!("unknown module: {name}"))?;
            if path.exists() {
                let text = std::fs::read_to_string(&path)
                    .map_err(|err| format!("read {}: {err}", path.display()))?;
                install_csv(state, &text)?;
                state.file_status = format!("Opened {name} ({} rows)", data_rows(state));
            } else {
                let grid =
                    empty_catalog(&state.prefs.supported_locales).map_err(|err| err.to_string())?;
                state.session.install(grid);
                state.file_status = format!("{name} has no catalog yet; starting empty");
            }
            state.current_catalog = Some(name);
            state.loaded_path = Some(path);
        }
        AppAction::EditCell { row, col, text } => {
            state
                .session
                .edit_cell(row, col, &text)
                .map_err(|err| err.to_string())?;
        }
        AppAction::SelectLocale(code) => match code {
            Some(code) => {
                state
                    .session
                    .select_target(&code)
                    .map_err(|err| err.to_string())?;
            }
            None => state.session.clear_target(),
        },
        AppAction::SetCredential(value) => {
            state.credential = value;
        }
        AppAction::Translate => {
            ensure_idle(state)?;
            match state.session.start_fill(&state.credential) {
                Ok(workflow) => state.begin_fill(workflow),
                Err(err) => {
                    let message = err.to_string();
                    state.notice = Some(message.clone());
                    return Err(message);
                }
            }
        }
        AppAction::SetQuery(query) => {
            state.session.set_filter(&query);
        }
        AppAction::SaveAsPath(path) => {
            save_to(state, &path)?;
            state.loaded_path = Some(path);
        }
        AppAction::SaveCatalog => {
            let path = state
                .loaded_path
                .clone()
                .ok_or_else(|| format!("nothing to overwrite; save as {EXPORT_FILE_NAME}"))?;
            save_to(state, &path)?;
        }
        AppAction::DismissNotice => {
            state.notice = None;
        }
    }

    Ok(())
}

fn ensure_idle(state: &AppState) -> Result<(), String> {
    if state.is_translating() {
        return Err("auto-translate is still running".to_string());
    }
    Ok(())
}

fn install_csv(state: &mut AppState, text: &str) -> Result<(), String> {
    let mut grid = Grid::load(text).map_err(|err| {
        warn!(error = %err, "catalog rejected");
        err.to_string()
    })?;
    grid.ensure_locales(&state.prefs.supported_locales);
    state.session.install(grid);
    Ok(())
}

fn save_to(state: &mut AppState, path: &Path) -> Result<(), String> {
    let bytes = state.session.export().map_err(|err| err.to_string())?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|err| format!("create {}: {err}", parent.display()))?;
    }
    std::fs::write(path, &bytes).map_err(|err| format!("write {}: {err}", path.display()))?;
    let changed = state.session.changed_rows();
    state.session.mark_saved();
    info!(path = %path.display(), bytes = bytes.len(), changed, "catalog saved");
    state.file_status = save_summary(data_rows(state), changed);
    Ok(())
}

/// Status line shown after a save.
pub fn save_summary(rows: usize, changed: usize) -> String {
    format!("Saved {rows} rows – {changed} updated.")
}

fn persist_prefs(state: &mut AppState) {
    match save_editor_prefs(&state.prefs) {
        Ok(()) => state.prefs_error.clear(),
        Err(err) => {
            warn!(error = %err, "editor prefs not saved");
            state.prefs_error = err;
        }
    }
}

fn data_rows(state: &AppState) -> usize {
    state
        .session
        .grid()
        .map(Grid::data_row_count)
        .unwrap_or(0)
}

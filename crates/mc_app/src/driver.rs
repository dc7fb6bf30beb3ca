use std::sync::Arc;

use mc_core::fill::FillReport;
use mc_core::translate::Translator;

use crate::actions::{dispatch, AppAction};
use crate::prefs::EditorPrefs;
use crate::state::AppState;

/// Headless front end: dispatches actions and runs any fill they start to
/// completion before returning.
pub struct AppDriver {
    state: AppState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppSnapshot {
    pub data_rows: usize,
    pub header: Vec<String>,
    pub locales: Vec<String>,
    pub target_locale: Option<String>,
    pub visible_rows: usize,
    pub target_filled: Option<usize>,
    pub changed_rows: usize,
    pub file_status: String,
    pub notice: Option<String>,
    pub last_fill: Option<FillReport>,
}

impl Default for AppDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl AppDriver {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
        }
    }

    pub fn with_translator(prefs: EditorPrefs, translator: Arc<dyn Translator>) -> Self {
        Self {
            state: AppState::with_parts(prefs, translator),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn dispatch(&mut self, action: AppAction) -> Result<(), String> {
        let result = dispatch(&mut self.state, action);
        self.state.poll_fill(true);
        result
    }

    pub fn export_text(&self) -> Result<String, String> {
        let bytes = self.state.session.export().map_err(|err| err.to_string())?;
        String::from_utf8(bytes).map_err(|err| err.to_string())
    }

    pub fn snapshot(&self) -> AppSnapshot {
        let session = &self.state.session;
        AppSnapshot {
            data_rows: session.grid().map(|grid| grid.data_row_count()).unwrap_or(0),
            header: session
                .grid()
                .map(|grid| grid.header().to_vec())
                .unwrap_or_default(),
            locales: session.locales(),
            target_locale: self.state.target_code().map(str::to_string),
            visible_rows: session.view().visible_count(),
            target_filled: self.state.target_counts().map(|(filled, _)| filled),
            changed_rows: session.changed_rows(),
            file_status: self.state.file_status.clone(),
            notice: self.state.notice.clone(),
            last_fill: self.state.last_fill_report,
        }
    }
}

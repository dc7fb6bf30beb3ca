use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use mc_core::fill::{summary_message, FillReport, FillRequest, FillWorkflow};
use mc_core::session::Session;
use mc_core::translate::{DeepLTranslator, TranslateError, Translator};
use mc_deepl::DeepLClient;
use tracing::{error, info, warn};

use crate::prefs::{load_editor_prefs, EditorPrefs};

/// Stands in for the DeepL client when it could not be built, so every
/// request fails with the construction error instead of the app aborting.
struct UnavailableTranslator {
    reason: String,
}

impl Translator for UnavailableTranslator {
    fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, TranslateError> {
        Err(TranslateError::Service(self.reason.clone()))
    }
}

struct InFlight {
    request: FillRequest,
    rx: Receiver<Result<String, TranslateError>>,
}

struct PendingFill {
    workflow: FillWorkflow,
    in_flight: Option<InFlight>,
}

pub struct AppState {
    pub session: Session,
    pub prefs: EditorPrefs,
    pub prefs_error: String,
    pub credential: String,

    pub catalogs: BTreeMap<String, PathBuf>,
    pub current_catalog: Option<String>,
    pub loaded_path: Option<PathBuf>,

    pub file_status: String,
    /// Blocking message the UI shows until dismissed.
    pub notice: Option<String>,
    pub last_fill_report: Option<FillReport>,

    translator: Arc<dyn Translator>,
    fill: Option<PendingFill>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let (prefs, prefs_error) = match load_editor_prefs() {
            Ok(prefs) => (prefs, String::new()),
            Err(err) => {
                warn!(error = %err, "editor prefs unreadable, using defaults");
                (EditorPrefs::default(), err)
            }
        };
        let translator: Arc<dyn Translator> = match DeepLClient::new(prefs.deepl_config()) {
            Ok(client) => Arc::new(DeepLTranslator::new(client)),
            Err(err) => {
                error!(error = %err, "cannot build translation client");
                Arc::new(UnavailableTranslator {
                    reason: err.to_string(),
                })
            }
        };
        let mut state = Self::with_parts(prefs, translator);
        state.prefs_error = prefs_error;
        state
    }

    pub fn with_parts(prefs: EditorPrefs, translator: Arc<dyn Translator>) -> Self {
        let credential = prefs.resolve_credential();
        Self {
            session: Session::new(),
            prefs,
            prefs_error: String::new(),
            credential,
            catalogs: BTreeMap::new(),
            current_catalog: None,
            loaded_path: None,
            file_status: String::new(),
            notice: None,
            last_fill_report: None,
            translator,
            fill: None,
        }
    }

    pub fn is_translating(&self) -> bool {
        self.fill.is_some()
    }

    /// Fill progress as (requests answered, requests issued).
    pub fn fill_progress(&self) -> Option<(usize, usize)> {
        self.fill.as_ref().map(|pending| {
            let report = pending.workflow.report();
            let done = report.filled + report.failed + report.discarded;
            (done, report.requested)
        })
    }

    pub(crate) fn begin_fill(&mut self, workflow: FillWorkflow) {
        info!(locale = %workflow.target().code, "auto-translate started");
        self.last_fill_report = None;
        self.fill = Some(PendingFill {
            workflow,
            in_flight: None,
        });
    }

    /// Advances the running fill. With `block` set, runs it to completion;
    /// otherwise consumes at most the ready result and issues the next
    /// request. Returns whether a fill is still running.
    pub fn poll_fill(&mut self, block: bool) -> bool {
        let Some(mut pending) = self.fill.take() else {
            return false;
        };
        loop {
            if let Some(in_flight) = pending.in_flight.take() {
                let outcome = if block {
                    in_flight
                        .rx
                        .recv()
                        .unwrap_or_else(|_| Err(worker_stopped()))
                } else {
                    match in_flight.rx.try_recv() {
                        Ok(outcome) => outcome,
                        Err(TryRecvError::Empty) => {
                            pending.in_flight = Some(in_flight);
                            self.fill = Some(pending);
                            return true;
                        }
                        Err(TryRecvError::Disconnected) => Err(worker_stopped()),
                    }
                };
                self.session
                    .complete_fill_request(&mut pending.workflow, &in_flight.request, outcome);
            }

            match self.session.next_fill_request(&mut pending.workflow) {
                Some(request) => {
                    pending.in_flight =
                        Some(self.spawn_request(request, pending.workflow.credential()));
                    if !block {
                        self.fill = Some(pending);
                        return true;
                    }
                }
                None => {
                    let report = self.session.finish_fill(pending.workflow);
                    self.notice = Some(summary_message(&report));
                    self.last_fill_report = Some(report);
                    return false;
                }
            }
        }
    }

    fn spawn_request(&self, request: FillRequest, credential: &str) -> InFlight {
        let (tx, rx) = mpsc::channel();
        let translator = Arc::clone(&self.translator);
        let source = request.source.clone();
        let locale = request.locale.clone();
        let credential = credential.to_string();
        thread::spawn(move || {
            let _ = tx.send(translator.translate(&source, &locale, &credential));
        });
        InFlight { request, rx }
    }

    pub fn target_code(&self) -> Option<&str> {
        self.session.target().map(|target| target.code.as_str())
    }

    /// Filled cells in the target column, for the status bar.
    pub fn target_counts(&self) -> Option<(usize, usize)> {
        let target = self.session.target()?;
        let grid = self.session.grid()?;
        let filled = grid
            .data_rows()
            .iter()
            .filter(|row| row.get(target.column).is_some_and(|cell| !cell.is_empty()))
            .count();
        Some((filled, grid.data_row_count()))
    }
}

fn worker_stopped() -> TranslateError {
    TranslateError::Service("translation worker stopped".to_string())
}

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use mc_app::actions::{dispatch, AppAction};
use mc_app::prefs::EditorPrefs;
use mc_app::state::AppState;
use mc_core::translate::{TranslateError, Translator};

/// Reports when a request starts and answers only once released.
struct GatedTranslator {
    started: Mutex<Sender<String>>,
    release: Mutex<Receiver<()>>,
    answer: &'static str,
}

impl Translator for GatedTranslator {
    fn translate(&self, source: &str, _: &str, _: &str) -> Result<String, TranslateError> {
        if let Ok(started) = self.started.lock() {
            let _ = started.send(source.to_string());
        }
        let release = self
            .release
            .lock()
            .map_err(|_| TranslateError::Service("gate poisoned".to_string()))?;
        release
            .recv()
            .map_err(|_| TranslateError::Service("gate closed".to_string()))?;
        Ok(self.answer.to_string())
    }
}

struct CrashingTranslator;

impl Translator for CrashingTranslator {
    fn translate(&self, _: &str, _: &str, _: &str) -> Result<String, TranslateError> {
        panic!("translation backend crashed");
    }
}

fn ready_state(translator: Arc<dyn Translator>) -> AppState {
    let mut state = AppState::with_parts(EditorPrefs::default(), translator);
    dispatch(
        &mut state,
        AppAction::LoadCsvText("key,en,fr\ngreeting,Hello,\n".to_string()),
    )
    .expect("load");
    dispatch(&mut state, AppAction::SelectLocale(Some("fr".to_string()))).expect("select");
    dispatch(&mut state, AppAction::SetCredential("k".to_string())).expect("credential");
    state
}

fn poll_until_done(state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while state.poll_fill(false) {
        assert!(Instant::now() < deadline, "fill did not finish");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn e2e_bg_001_edit_during_request_wins_over_late_result() {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let translator = Arc::new(GatedTranslator {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
        answer: "Bonjour",
    });
    let mut state = ready_state(translator);

    dispatch(&mut state, AppAction::Translate).expect("translate");
    assert!(state.is_translating());
    assert!(state.poll_fill(false));
    assert_eq!(
        started_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("request started"),
        "Hello"
    );
    assert!(state.poll_fill(false), "result not ready yet");

    let busy = Err("auto-translate is still running".to_string());
    assert_eq!(dispatch(&mut state, AppAction::Translate), busy);
    assert_eq!(
        dispatch(
            &mut state,
            AppAction::LoadCsvText("key,en\nother,Other\n".to_string())
        ),
        busy
    );
    assert_eq!(
        dispatch(&mut state, AppAction::OpenCatalog("shop".to_string())),
        busy
    );
    assert_eq!(state.session.locales(), vec!["en", "fr"]);
    assert_eq!(state.notice, None);

    dispatch(
        &mut state,
        AppAction::EditCell {
            row: 1,
            col: 2,
            text: "Salut".to_string(),
        },
    )
    .expect("edit while translating");
    release_tx.send(()).expect("release");
    poll_until_done(&mut state);

    assert!(!state.is_translating());
    let grid = state.session.grid().expect("grid");
    assert_eq!(grid.cell(1, 2), Some("Salut"));
    let report = state.last_fill_report.expect("report");
    assert_eq!(report.requested, 1);
    assert_eq!(report.discarded, 1);
    assert_eq!(report.filled, 0);
    assert_eq!(
        state.session.view().row(1).map(|row| row.cells[2].text.as_str()),
        Some("Salut")
    );
}

#[test]
fn e2e_bg_002_result_lands_when_cell_left_alone() {
    let (started_tx, started_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let translator = Arc::new(GatedTranslator {
        started: Mutex::new(started_tx),
        release: Mutex::new(release_rx),
        answer: "Bonjour",
    });
    let mut state = ready_state(translator);

    dispatch(&mut state, AppAction::Translate).expect("translate");
    assert!(state.poll_fill(false));
    started_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("request started");
    assert_eq!(state.fill_progress(), Some((0, 1)));

    release_tx.send(()).expect("release");
    poll_until_done(&mut state);

    assert_eq!(state.session.grid().and_then(|g| g.cell(1, 2)), Some("Bonjour"));
    assert_eq!(state.notice.as_deref(), Some("Inserted 1 translation."));
    dispatch(
        &mut state,
        AppAction::LoadCsvText("key,en\nother,Other\n".to_string()),
    )
    .expect("load after fill");
}

#[test]
fn e2e_bg_003_crashed_worker_counts_as_failure() {
    let mut state = ready_state(Arc::new(CrashingTranslator));

    dispatch(&mut state, AppAction::Translate).expect("translate");
    poll_until_done(&mut state);

    let report = state.last_fill_report.expect("report");
    assert_eq!(report.requested, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(state.session.grid().and_then(|g| g.cell(1, 2)), Some(""));
}

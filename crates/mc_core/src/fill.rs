//! Sequential, best-effort completion of a locale column.
//!
//! Rows are visited in ascending order with at most one translation request
//! outstanding. The caller either drives [`FillWorkflow`] itself (so a UI can
//! run each request off its main thread) or uses [`fill_missing`], which
//! blocks on every request.

use tracing::{info, trace, warn};

use crate::grid::Grid;
use crate::locale::TargetLocale;
use crate::translate::{TranslateError, Translator};

/// Column holding the default caption every translation starts from.
pub const SOURCE_COLUMN: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FillError {
    #[error("{0}")]
    Precondition(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillRequest {
    pub row: usize,
    pub column: usize,
    pub source: String,
    pub locale: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillReport {
    pub requested: usize,
    pub filled: usize,
    pub failed: usize,
    pub discarded: usize,
    pub skipped_existing: usize,
    pub skipped_empty_source: usize,
}

#[derive(Debug, Clone)]
pub struct FillWorkflow {
    target: TargetLocale,
    credential: String,
    next_row: usize,
    report: FillReport,
}

impl FillWorkflow {
    pub fn new(
        grid: &Grid,
        target: Option<&TargetLocale>,
        credential: &str,
    ) -> Result<Self, FillError> {
        let Some(target) = target else {
            return Err(FillError::Precondition("Choose a locale"));
        };
        if grid.header().get(target.column) != Some(&target.code) {
            return Err(FillError::Precondition(
                "Selected locale is not a column of the loaded catalog",
            ));
        }
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(FillError::Precondition("Enter a translation API key"));
        }
        Ok(Self {
            target: target.clone(),
            credential: credential.to_string(),
            next_row: 1,
            report: FillReport::default(),
        })
    }

    pub fn target(&self) -> &TargetLocale {
        &self.target
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn report(&self) -> &FillReport {
        &self.report
    }

    /// Advances past rows that need no request and returns the next one that does.
    pub fn next_request(&mut self, grid: &Grid) -> Option<FillRequest> {
        let column = self.target.column;
        while self.next_row < grid.row_count() {
            let row = self.next_row;
            self.next_row += 1;

            let source = grid.cell(row, SOURCE_COLUMN).unwrap_or_default();
            if source.is_empty() {
                trace!(row, "no source caption, skipped");
                self.report.skipped_empty_source += 1;
                continue;
            }
            if !grid.cell(row, column).unwrap_or_default().is_empty() {
                self.report.skipped_existing += 1;
                continue;
            }

            trace!(row, source, "requesting translation");
            self.report.requested += 1;
            return Some(FillRequest {
                row,
                column,
                source: source.to_string(),
                locale: self.target.code.clone(),
            });
        }
        None
    }

    /// Records the outcome of `request`. Failures and empty answers leave the
    /// cell empty; a cell filled while the request was in flight is kept.
    pub fn complete(
        &mut self,
        grid: &mut Grid,
        request: &FillRequest,
        outcome: Result<String, TranslateError>,
    ) {
        let text = match outcome {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!(row = request.row, "translation service returned no text");
                self.report.failed += 1;
                return;
            }
            Err(err) => {
                warn!(row = request.row, error = %err, "translation failed");
                self.report.failed += 1;
                return;
            }
        };

        if grid.cell(request.row, request.column) != Some("") {
            trace!(row = request.row, "cell changed while translating, result dropped");
            self.report.discarded += 1;
            return;
        }
        match grid.set_cell(request.row, request.column, &text) {
            Ok(()) => {
                trace!(row = request.row, translation = %text, "translation stored");
                self.report.filled += 1;
            }
            Err(err) => {
                warn!(row = request.row, error = %err, "translation target vanished");
                self.report.failed += 1;
            }
        }
    }

    pub fn finish(self) -> FillReport {
        info!(
            locale = %self.target.code,
            filled = self.report.filled,
            requested = self.report.requested,
            failed = self.report.failed,
            "auto-translate finished"
        );
        self.report
    }
}

pub fn fill_missing(
    grid: &mut Grid,
    target: Option<&TargetLocale>,
    credential: &str,
    translator: &dyn Translator,
) -> Result<FillReport, FillError> {
    let mut workflow = FillWorkflow::new(grid, target, credential)?;
    while let Some(request) = workflow.next_request(grid) {
        let outcome = translator.translate(&request.source, &request.locale, workflow.credential());
        workflow.complete(grid, &request, outcome);
    }
    Ok(workflow.finish())
}

/// The notice the editor shows once a run completes.
pub fn summary_message(report: &FillReport) -> String {
    match report.filled {
        0 => "All cells were already filled.".to_string(),
        1 => "Inserted 1 translation.".to_string(),
        n => format!("Inserted {n} translations."),
    }
}

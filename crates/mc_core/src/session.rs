use tracing::info;

use crate::export::{changed_rows, export_csv};
use crate::fill::{FillError, FillReport, FillRequest, FillWorkflow};
use crate::filter::apply_filter;
use crate::grid::{Grid, GridError};
use crate::locale::{list_locales, select_target, LocaleError, TargetLocale};
use crate::translate::{TranslateError, Translator};
use crate::view::TableView;

/// Everything one editor window owns: the grid, its rendered view, the
/// target locale and the search needle.
#[derive(Debug, Clone, Default)]
pub struct Session {
    grid: Option<Grid>,
    view: TableView,
    target: Option<TargetLocale>,
    needle: String,
    baseline: Vec<Vec<String>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and installs a new grid. On error the current grid stays.
    pub fn load_csv(&mut self, csv_text: &str) -> Result<(), GridError> {
        let grid = Grid::load(csv_text)?;
        self.install(grid);
        Ok(())
    }

    pub fn install(&mut self, grid: Grid) {
        self.baseline = grid.data_rows().to_vec();
        self.grid = Some(grid);
        self.target = None;
        self.rerender();
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn edit_cell(&mut self, row: usize, col: usize, text: &str) -> Result<(), GridError> {
        let grid = self.grid.as_mut().ok_or(GridError::NoGrid)?;
        self.view.edit(grid, row, col, text)
    }

    pub fn locales(&self) -> Vec<String> {
        self.grid.as_ref().map(list_locales).unwrap_or_default()
    }

    pub fn select_target(&mut self, code: &str) -> Result<&TargetLocale, LocaleError> {
        let grid = self
            .grid
            .as_ref()
            .ok_or_else(|| LocaleError::InvalidSelection(code.to_string()))?;
        let target = select_target(grid, code)?;
        Ok(self.target.insert(target))
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<&TargetLocale> {
        self.target.as_ref()
    }

    pub fn filter(&self) -> &str {
        &self.needle
    }

    pub fn set_filter(&mut self, needle: &str) -> usize {
        self.needle.clear();
        self.needle.push_str(needle);
        apply_filter(&mut self.view, &self.needle)
    }

    pub fn start_fill(&self, credential: &str) -> Result<FillWorkflow, FillError> {
        let grid = self
            .grid
            .as_ref()
            .ok_or(FillError::Precondition("Load a catalog first"))?;
        FillWorkflow::new(grid, self.target.as_ref(), credential)
    }

    pub fn next_fill_request(&self, workflow: &mut FillWorkflow) -> Option<FillRequest> {
        workflow.next_request(self.grid.as_ref()?)
    }

    pub fn complete_fill_request(
        &mut self,
        workflow: &mut FillWorkflow,
        request: &FillRequest,
        outcome: Result<String, TranslateError>,
    ) {
        if let Some(grid) = self.grid.as_mut() {
            workflow.complete(grid, request, outcome);
        }
    }

    pub fn finish_fill(&mut self, workflow: FillWorkflow) -> FillReport {
        let report = workflow.finish();
        self.rerender();
        report
    }

    /// Runs the whole fill workflow, blocking on each request.
    pub fn run_fill(
        &mut self,
        credential: &str,
        translator: &dyn Translator,
    ) -> Result<FillReport, FillError> {
        let mut workflow = self.start_fill(credential)?;
        while let Some(request) = self.next_fill_request(&mut workflow) {
            let outcome =
                translator.translate(&request.source, &request.locale, workflow.credential());
            self.complete_fill_request(&mut workflow, &request, outcome);
        }
        Ok(self.finish_fill(workflow))
    }

    pub fn rerender(&mut self) {
        self.view = match &self.grid {
            Some(grid) => TableView::render(grid),
            None => TableView::default(),
        };
        apply_filter(&mut self.view, &self.needle);
    }

    pub fn export(&self) -> Result<Vec<u8>, GridError> {
        export_csv(self.grid.as_ref().ok_or(GridError::NoGrid)?)
    }

    pub fn changed_rows(&self) -> usize {
        self.grid
            .as_ref()
            .map(|grid| changed_rows(grid, &self.baseline))
            .unwrap_or(0)
    }

    pub fn mark_saved(&mut self) {
        if let Some(grid) = &self.grid {
            self.baseline = grid.data_rows().to_vec();
            info!(rows = self.baseline.len(), "save baseline reset");
        }
    }
}

use tracing::debug;

use crate::grid::Grid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocaleError {
    #[error("locale `{0}` is not a column of the loaded catalog")]
    InvalidSelection(String),
}

/// The column the fill workflow writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLocale {
    pub code: String,
    pub column: usize,
}

/// Header columns 1..N in header order.
pub fn list_locales(grid: &Grid) -> Vec<String> {
    grid.header().iter().skip(1).cloned().collect()
}

pub fn select_target(grid: &Grid, code: &str) -> Result<TargetLocale, LocaleError> {
    let column = grid
        .header()
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, locale)| locale.as_str() == code)
        .map(|(idx, _)| idx)
        .ok_or_else(|| LocaleError::InvalidSelection(code.to_string()))?;
    debug!(code, column, "target locale selected");
    Ok(TargetLocale {
        code: code.to_string(),
        column,
    })
}

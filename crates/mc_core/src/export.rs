use crate::grid::{Grid, GridError};

pub const EXPORT_FILE_NAME: &str = "messages.csv";

pub fn export_csv(grid: &Grid) -> Result<Vec<u8>, GridError> {
    Ok(grid.serialize()?.into_bytes())
}

/// Data rows that differ from `baseline`, compared by position.
pub fn changed_rows(grid: &Grid, baseline: &[Vec<String>]) -> usize {
    grid.data_rows()
        .iter()
        .enumerate()
        .filter(|(idx, row)| baseline.get(*idx) != Some(*row))
        .count()
}

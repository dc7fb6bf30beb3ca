//! Editable table projection of a [`Grid`].

use crate::grid::{Grid, GridError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCell {
    pub text: String,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub cells: Vec<DisplayCell>,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    header: Option<DisplayRow>,
    rows: Vec<DisplayRow>,
}

impl TableView {
    pub fn render(grid: &Grid) -> Self {
        let header = DisplayRow {
            cells: grid
                .header()
                .iter()
                .map(|text| DisplayCell {
                    text: text.clone(),
                    editable: false,
                })
                .collect(),
            visible: true,
        };
        let rows = grid
            .data_rows()
            .iter()
            .map(|row| DisplayRow {
                cells: row
                    .iter()
                    .enumerate()
                    .map(|(col, text)| DisplayCell {
                        text: text.clone(),
                        editable: col > 0,
                    })
                    .collect(),
                visible: true,
            })
            .collect();
        Self {
            header: Some(header),
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none()
    }

    pub fn header(&self) -> Option<&DisplayRow> {
        self.header.as_ref()
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    /// `row` is a grid row index, so data rows start at 1.
    pub fn row(&self, row: usize) -> Option<&DisplayRow> {
        row.checked_sub(1).and_then(|idx| self.rows.get(idx))
    }

    /// Visible data rows paired with their grid row index.
    pub fn visible_rows(&self) -> impl Iterator<Item = (usize, &DisplayRow)> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.visible)
            .map(|(idx, row)| (idx + 1, row))
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|row| row.visible).count()
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [DisplayRow] {
        &mut self.rows
    }

    /// Writes through to the grid first; the rendered text only changes once
    /// the grid accepted the value.
    pub fn edit(
        &mut self,
        grid: &mut Grid,
        row: usize,
        col: usize,
        text: &str,
    ) -> Result<(), GridError> {
        let editable = self
            .row(row)
            .and_then(|display| display.cells.get(col))
            .map(|cell| cell.editable)
            .unwrap_or(false);
        if !editable {
            return Err(GridError::Index { row, col });
        }
        grid.set_cell(row, col, text)?;
        if let Some(cell) = self.rows[row - 1].cells.get_mut(col) {
            cell.text.clear();
            cell.text.push_str(text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        Grid::load("key,en,fr\ngreeting,Hello,\nfarewell,Goodbye,Au revoir\n").expect("load")
    }

    #[test]
    fn t_view_001_header_read_only_key_column_read_only() {
        let view = TableView::render(&grid());
        let header = view.header().expect("header");
        assert!(header.cells.iter().all(|cell| !cell.editable));
        assert_eq!(view.rows().len(), 2);
        for row in view.rows() {
            assert!(!row.cells[0].editable);
            assert!(row.cells[1..].iter().all(|cell| cell.editable));
            assert!(row.visible);
        }
    }

    #[test]
    fn t_view_002_edit_writes_through_to_grid() {
        let mut grid = grid();
        let mut view = TableView::render(&grid);
        view.edit(&mut grid, 1, 2, "Salut").expect("edit");
        assert_eq!(grid.cell(1, 2), Some("Salut"));
        assert_eq!(view.row(1).map(|r| r.cells[2].text.as_str()), Some("Salut"));
        assert_eq!(TableView::render(&grid), view);
    }

    #[test]
    fn t_view_003_rejects_key_header_and_out_of_range_edits() {
        let mut grid = grid();
        let mut view = TableView::render(&grid);
        let before = grid.clone();
        assert!(view.edit(&mut grid, 1, 0, "renamed").is_err());
        assert!(view.edit(&mut grid, 0, 1, "en_GB").is_err());
        assert!(view.edit(&mut grid, 9, 1, "x").is_err());
        assert!(view.edit(&mut grid, 1, 7, "x").is_err());
        assert_eq!(grid, before);
        assert_eq!(view, TableView::render(&grid));
    }

    #[test]
    fn t_view_004_rerender_is_idempotent() {
        let grid = grid();
        assert_eq!(TableView::render(&grid), TableView::render(&grid));
    }
}

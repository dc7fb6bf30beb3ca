use crate::view::{DisplayRow, TableView};

/// Shows a data row iff the needle is blank or any rendered cell contains it,
/// ignoring case. Returns the number of visible data rows.
pub fn apply_filter(view: &mut TableView, needle: &str) -> usize {
    let needle = needle.trim().to_lowercase();
    let mut visible = 0usize;
    for row in view.rows_mut() {
        row.visible = needle.is_empty() || row_matches(row, &needle);
        if row.visible {
            visible += 1;
        }
    }
    visible
}

fn row_matches(row: &DisplayRow, needle_lower: &str) -> bool {
    row.cells
        .iter()
        .any(|cell| cell.text.to_lowercase().contains(needle_lower))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    fn view() -> (Grid, TableView) {
        let grid = Grid::load("key,en,fr\ngreeting,Hello,Bonjour\nfarewell,Goodbye,Au revoir\n")
            .expect("load");
        let view = TableView::render(&grid);
        (grid, view)
    }

    #[test]
    fn t_filter_001_blank_needle_shows_all() {
        let (_, mut view) = view();
        assert_eq!(apply_filter(&mut view, "zzz"), 0);
        assert_eq!(apply_filter(&mut view, ""), 2);
        assert_eq!(apply_filter(&mut view, "   "), 2);
    }

    #[test]
    fn t_filter_002_case_insensitive_substring_over_any_cell() {
        let (_, mut view) = view();
        assert_eq!(apply_filter(&mut view, "bonj"), 1);
        let shown: Vec<usize> = view.visible_rows().map(|(idx, _)| idx).collect();
        assert_eq!(shown, vec![1]);
        assert_eq!(apply_filter(&mut view, "FAREWELL"), 1);
        assert_eq!(apply_filter(&mut view, "o"), 2);
    }

    #[test]
    fn t_filter_003_header_and_grid_untouched() {
        let (grid, mut view) = view();
        apply_filter(&mut view, "zzz");
        assert!(view.header().expect("header").visible);
        assert_eq!(view.visible_count(), 0);
        assert_eq!(grid.cell(1, 2), Some("Bonjour"));
    }

    #[test]
    fn t_filter_004_reads_live_edits() {
        let (mut grid, mut view) = view();
        assert_eq!(apply_filter(&mut view, "salut"), 0);
        view.edit(&mut grid, 1, 2, "Salut").expect("edit");
        assert_eq!(apply_filter(&mut view, "salut"), 1);
    }
}

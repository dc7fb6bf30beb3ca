use tracing::{debug, info};

use crate::codec::{read_rows, write_rows};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("csv parse error: {0}")]
    Parse(String),
    #[error("cell ({row}, {col}) is outside the editable grid")]
    Index { row: usize, col: usize },
    #[error("csv write error: {0}")]
    Write(String),
    #[error("no catalog loaded")]
    NoGrid,
}

/// Rows of text cells; row 0 is the header (`key`, locale codes...).
///
/// Every row has the header's width once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn load(csv_text: &str) -> Result<Self, GridError> {
        let rows = read_rows(csv_text).map_err(|err| GridError::Parse(err.to_string()))?;
        let grid = Self::from_rows(rows)?;
        info!(
            rows = grid.data_row_count(),
            columns = grid.column_count(),
            "catalog parsed"
        );
        Ok(grid)
    }

    /// Short data rows are padded with empty cells; rows wider than the
    /// header are rejected.
    pub fn from_rows(mut rows: Vec<Vec<String>>) -> Result<Self, GridError> {
        let Some(header) = rows.first() else {
            return Err(GridError::Parse("missing header row".to_string()));
        };
        let width = header.len();
        for (idx, row) in rows.iter_mut().enumerate().skip(1) {
            if row.len() > width {
                return Err(GridError::Parse(format!(
                    "record {} has {} fields but the header has {width}",
                    idx + 1,
                    row.len()
                )));
            }
            if row.len() < width {
                debug!(record = idx + 1, fields = row.len(), width, "padding short row");
                row.resize(width, String::new());
            }
        }
        Ok(Self { rows })
    }

    pub fn header(&self) -> &[String] {
        &self.rows[0]
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }

    pub fn row(&self, row: usize) -> Option<&[String]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn column_count(&self) -> usize {
        self.header().len()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// The header row is immutable through this call.
    pub fn set_cell(&mut self, row: usize, col: usize, value: &str) -> Result<(), GridError> {
        if row == 0 {
            return Err(GridError::Index { row, col });
        }
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(col))
            .ok_or(GridError::Index { row, col })?;
        cell.clear();
        cell.push_str(value);
        Ok(())
    }

    /// Appends locale columns the header does not list yet.
    pub fn ensure_locales<S: AsRef<str>>(&mut self, locales: &[S]) -> usize {
        let mut added = 0usize;
        for locale in locales {
            let locale = locale.as_ref().trim();
            if locale.is_empty() || self.header().iter().any(|h| h == locale) {
                continue;
            }
            self.rows[0].push(locale.to_string());
            for row in self.rows.iter_mut().skip(1) {
                row.push(String::new());
            }
            added += 1;
        }
        if added > 0 {
            debug!(added, header = ?self.header(), "merged supported locales");
        }
        added
    }

    pub fn serialize(&self) -> Result<String, GridError> {
        write_rows(&self.rows).map_err(|err| GridError::Write(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Grid {
        Grid::load("key,en,fr,de\ngreeting,Hello,,\nfarewell,Goodbye,Au revoir,\n").expect("load")
    }

    #[test]
    fn t_grid_001_header_and_data_rows() {
        let grid = sample();
        assert_eq!(grid.header(), ["key", "en", "fr", "de"]);
        assert_eq!(grid.data_row_count(), 2);
        assert_eq!(grid.cell(2, 2), Some("Au revoir"));
        assert_eq!(grid.cell(1, 3), Some(""));
    }

    #[test]
    fn t_grid_002_set_then_get() {
        let mut grid = sample();
        grid.set_cell(1, 2, "Bonjour").expect("set");
        assert_eq!(grid.cell(1, 2), Some("Bonjour"));
        grid.set_cell(1, 2, "").expect("clear");
        assert_eq!(grid.cell(1, 2), Some(""));
    }

    #[test]
    fn t_grid_003_out_of_range_and_header_edits_rejected() {
        let mut grid = sample();
        let before = grid.clone();
        assert_eq!(
            grid.set_cell(0, 1, "xx"),
            Err(GridError::Index { row: 0, col: 1 })
        );
        assert_eq!(
            grid.set_cell(3, 1, "xx"),
            Err(GridError::Index { row: 3, col: 1 })
        );
        assert_eq!(
            grid.set_cell(1, 4, "xx"),
            Err(GridError::Index { row: 1, col: 4 })
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn t_grid_004_short_rows_padded_long_rows_rejected() {
        let grid = Grid::load("key,en,fr\nk1,Hello\n").expect("load");
        assert_eq!(grid.row(1), Some(&["k1".to_string(), "Hello".to_string(), String::new()][..]));

        let err = Grid::load("key,en\nk1,Hello,extra\n").expect_err("too wide");
        assert!(matches!(err, GridError::Parse(msg) if msg.contains("record 2")));
    }

    #[test]
    fn t_grid_005_empty_input_is_parse_error() {
        assert!(matches!(Grid::load(""), Err(GridError::Parse(_))));
        assert!(matches!(Grid::load("\n\n"), Err(GridError::Parse(_))));
    }

    #[test]
    fn t_grid_006_ensure_locales_appends_missing_columns() {
        let mut grid = Grid::load("key,en_US\nk1,Hello\n").expect("load");
        let added = grid.ensure_locales(&["en_US", "de_DE", " ", "it_IT"]);
        assert_eq!(added, 2);
        assert_eq!(grid.header(), ["key", "en_US", "de_DE", "it_IT"]);
        assert_eq!(grid.row(1).map(<[String]>::len), Some(4));
        assert_eq!(grid.ensure_locales(&["de_DE"]), 0);
    }

    #[test]
    fn t_grid_009_single_column_empty_key_survives_reload() {
        let rows = vec![
            vec!["key".to_string()],
            vec![String::new()],
            vec!["k".to_string()],
        ];
        let grid = Grid::from_rows(rows.clone()).expect("grid");
        let text = grid.serialize().expect("serialize");
        assert_eq!(text, "key\n\"\"\nk\n");
        assert_eq!(Grid::load(&text).expect("reload").rows(), &rows[..]);
    }

    #[test]
    fn t_grid_007_serialize_round_trips_scenario_catalog() {
        let text = "key,en,fr\ngreeting,Hello,\nquote,\"He said \"\"hi\"\", then left\",\"Ligne 1\nLigne 2\"\n";
        let grid = Grid::load(text).expect("load");
        assert_eq!(grid.serialize().expect("serialize"), text);
    }

    fn cell_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "[a-zA-Z0-9 ]{1,8}",
            "[a-z,\"\n]{1,6}",
            "\\PC{0,6}",
        ]
    }

    proptest! {
        #[test]
        fn t_grid_008_load_serialize_is_canonical(
            width in 1usize..5,
            rows in prop::collection::vec(prop::collection::vec(cell_strategy(), 4), 1..6),
        ) {
            let mut all = vec![(0..width).map(|i| format!("c{i}")).collect::<Vec<_>>()];
            for row in rows {
                all.push(row.into_iter().take(width).collect::<Vec<_>>());
            }
            let grid = Grid::from_rows(all.clone()).expect("grid");
            let text = grid.serialize().expect("serialize");
            let reloaded = Grid::load(&text).expect("reload");
            prop_assert_eq!(reloaded.rows(), &all[..]);
            prop_assert_eq!(reloaded.serialize().expect("serialize again"), text);
        }
    }
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mc_core::grid::{Grid, GridError};
use tracing::debug;

/// Where a module keeps its catalog, relative to the module directory.
pub const CATALOG_RELATIVE_PATH: &str = "resources/translation/messages.csv";

/// Lists the modules directly under `root` that have a translation
/// directory, keyed by directory name. A module is listed even when its
/// catalog file does not exist yet.
pub fn discover_catalogs(root: &Path) -> Result<BTreeMap<String, PathBuf>, String> {
    let entries =
        std::fs::read_dir(root).map_err(|err| format!("read {}: {err}", root.display()))?;
    let mut out = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|err| format!("read {}: {err}", root.display()))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        let catalog = path.join(CATALOG_RELATIVE_PATH);
        if name.starts_with('.') || !catalog.parent().is_some_and(Path::is_dir) {
            continue;
        }
        out.insert(name.to_string(), catalog);
    }
    debug!(root = %root.display(), modules = out.len(), "catalog scan");
    Ok(out)
}

/// Header-only grid for a module that has no catalog yet.
pub fn empty_catalog(locales: &[String]) -> Result<Grid, GridError> {
    let mut header = vec!["key".to_string()];
    header.extend(
        locales
            .iter()
            .map(|code| code.trim())
            .filter(|code| !code.is_empty())
            .map(str::to_string),
    );
    Grid::from_rows(vec![header])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_catalogs_001_lists_module_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("shop/resources/translation")).expect("mkdir");
        std::fs::write(
            dir.path().join("shop").join(CATALOG_RELATIVE_PATH),
            "key,en\n",
        )
        .expect("write");
        std::fs::create_dir_all(dir.path().join("arena/resources/translation")).expect("mkdir");
        std::fs::create_dir(dir.path().join("plain")).expect("mkdir");
        std::fs::create_dir_all(dir.path().join(".git/resources/translation")).expect("mkdir");
        std::fs::write(dir.path().join("README.md"), "x").expect("write");

        let found = discover_catalogs(dir.path()).expect("scan");
        assert_eq!(found.keys().collect::<Vec<_>>(), vec!["arena", "shop"]);
        assert!(found["shop"].exists());
        assert!(!found["arena"].exists());
    }

    #[test]
    fn t_catalogs_002_missing_root_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(discover_catalogs(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn t_catalogs_003_empty_catalog_has_header_only() {
        let grid = empty_catalog(&["en_US".to_string(), " ".to_string(), "de_DE".to_string()])
            .expect("grid");
        assert_eq!(grid.header(), ["key", "en_US", "de_DE"]);
        assert_eq!(grid.data_row_count(), 0);
    }
}

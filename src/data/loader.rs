//! RON data loader
//!
//! Loads the level table and gift catalog from external RON files, falling
//! back to the compiled-in defaults when a file is absent. A file that is
//! present but unreadable or malformed is an error, not a fallback: the
//! calculator cannot run against half-loaded tables.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::gifts::{default_gift_catalog, GiftCatalog, GiftDef};
use super::levels::{default_level_table, LevelEntry, LevelTable};
use super::DataError;

/// File name of the level table override
pub const LEVELS_FILE: &str = "levels.ron";

/// File name of the gift catalog override
pub const GIFTS_FILE: &str = "gifts.ron";

/// Both static tables, loaded together at startup
#[derive(Debug, Clone)]
pub struct DataSet {
    /// Bond level table
    pub levels: LevelTable,
    /// Gift catalog
    pub gifts: GiftCatalog,
}

impl DataSet {
    /// The compiled-in tables, untouched by any override files
    pub fn builtin() -> Self {
        Self {
            levels: default_level_table(),
            gifts: default_gift_catalog(),
        }
    }

    /// Load tables from `dir`, using the built-in data for absent files
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        let levels = match read_rows::<Vec<LevelEntry>>(&dir.join(LEVELS_FILE))? {
            Some(rows) => {
                let table = LevelTable::new(rows)?;
                log::info!("Loaded {} level rows from {:?}", table.len(), dir);
                table
            }
            None => default_level_table(),
        };

        let gifts = match read_rows::<Vec<GiftDef>>(&dir.join(GIFTS_FILE))? {
            Some(rows) => {
                let catalog = GiftCatalog::new(rows)?;
                log::info!("Loaded {} gifts from {:?}", catalog.len(), dir);
                catalog
            }
            None => default_gift_catalog(),
        };

        Ok(Self { levels, gifts })
    }
}

impl Default for DataSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Read and parse a RON file, `None` if it does not exist
fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, DataError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let rows = ron::from_str(&text).map_err(|e| DataError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(rows))
}

/// Serialize rows to a pretty RON file
fn write_rows<T: Serialize>(path: &Path, rows: &T) -> Result<(), DataError> {
    let text = ron::ser::to_string_pretty(rows, ron::ser::PrettyConfig::default()).map_err(|e| {
        DataError::Serialize {
            path: path.to_path_buf(),
            source: e,
        }
    })?;
    fs::write(path, text).map_err(|e| DataError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Export the built-in tables to `dir` for hand editing
pub fn export_default_data(dir: &Path) -> Result<(), DataError> {
    fs::create_dir_all(dir).map_err(|e| DataError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    write_rows(&dir.join(LEVELS_FILE), &default_level_table().entries().to_vec())?;

    let gifts: Vec<GiftDef> = default_gift_catalog().iter().cloned().collect();
    write_rows(&dir.join(GIFTS_FILE), &gifts)?;

    log::info!("Exported built-in data tables to {:?}", dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_data_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shigure-data-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_files_fall_back_to_builtin() {
        let dir = temp_data_dir("missing");
        let data = DataSet::load(&dir).unwrap();
        assert_eq!(data.levels.len(), default_level_table().len());
        assert_eq!(data.gifts.len(), default_gift_catalog().len());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_override_file_replaces_builtin() {
        let dir = temp_data_dir("override");
        fs::write(
            dir.join(LEVELS_FILE),
            "[(level: 1, cumulative_exp: 0), (level: 2, cumulative_exp: 100)]",
        )
        .unwrap();
        let data = DataSet::load(&dir).unwrap();
        assert_eq!(data.levels.len(), 2);
        assert_eq!(data.levels.cumulative_exp_for(2), 100);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = temp_data_dir("malformed");
        fs::write(dir.join(GIFTS_FILE), "not ron at all {{{").unwrap();
        let result = DataSet::load(&dir);
        assert!(matches!(result, Err(DataError::Parse { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_export_then_load_round_trips() {
        let dir = temp_data_dir("export");
        export_default_data(&dir).unwrap();
        assert!(dir.join(LEVELS_FILE).exists());
        assert!(dir.join(GIFTS_FILE).exists());

        let data = DataSet::load(&dir).unwrap();
        assert_eq!(data.levels.entries(), default_level_table().entries());
        assert_eq!(data.gifts.len(), default_gift_catalog().len());
        let _ = fs::remove_dir_all(&dir);
    }
}

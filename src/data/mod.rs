//! Static game data
//!
//! The level table and gift catalog: loaded once at startup, immutable for
//! the rest of the session.

pub mod gifts;
pub mod levels;
pub mod loader;

pub use gifts::{
    default_gift_catalog, GiftCatalog, GiftDef, GiftId, GOLD_BASE_EXP, PURPLE_BASE_EXP,
};
pub use levels::{default_level_table, LevelEntry, LevelTable, MAX_LEVEL};
pub use loader::{export_default_data, DataSet, GIFTS_FILE, LEVELS_FILE};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating static data
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("failed to serialize {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: ron::Error,
    },
    #[error("duplicate level {0} in level table")]
    DuplicateLevel(u32),
    #[error("cumulative experience decreases at level {0}")]
    NonMonotonicLevel(u32),
    #[error("duplicate gift id {0} in gift catalog")]
    DuplicateGift(GiftId),
}

use haystack_core::{FilterError, GridError, ValueError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unknown record @{0}")]
    UnknownRecord(String),
    #[error("record @{0} already exists")]
    DuplicateRecord(String),
    #[error("record has no id ref")]
    MissingId,
    #[error("commit conflict on @{0}: record modified since it was read")]
    Conflict(String),
    #[error("unknown watch {0:?}")]
    UnknownWatch(String),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("grid error: {0}")]
    Grid(#[from] GridError),
    #[error("value error: {0}")]
    Value(#[from] ValueError),
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),
}

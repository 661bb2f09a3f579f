use crate::StoreError;
use haystack_core::{Dict, Ref};
use std::time::Duration;

/// Change subscriptions consumed by the API layer.
///
/// A watch stays open while it is used at least once per lease; stale
/// watches are closed by the store.
pub trait WatchStore {
    /// Opens a watch and returns its id.
    fn watch_open(&self, dis: &str, lease: Duration) -> Result<String, StoreError>;

    /// Adds `ids` to the watch, returning the current state of each record.
    fn watch_sub(&self, watch_id: &str, ids: &[Ref]) -> Result<Vec<Option<Dict>>, StoreError>;

    fn watch_unsub(&self, watch_id: &str, ids: &[Ref]) -> Result<(), StoreError>;

    /// Records changed since the previous poll, or every watched record
    /// when `refresh` is set.
    fn watch_poll(&self, watch_id: &str, refresh: bool) -> Result<Vec<Dict>, StoreError>;

    fn watch_close(&self, watch_id: &str) -> Result<(), StoreError>;
}

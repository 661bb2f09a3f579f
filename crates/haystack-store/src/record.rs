use crate::StoreError;
use haystack_core::{Dict, Filter, Ref};

/// What a [`Diff`] does to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffOp {
    Add,
    Update,
    Remove,
}

/// A requested change to one record.
///
/// For updates and removes `original` is the record as the caller last read
/// it; its `mod` tag is checked against the stored record unless `force` is
/// set. `Remove`-valued tags in `changes` delete tags on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub op: DiffOp,
    pub original: Option<Dict>,
    pub changes: Dict,
    pub force: bool,
    /// Record state after a successful commit; `None` for removes and for
    /// diffs not yet committed.
    pub committed: Option<Dict>,
}

impl Diff {
    /// A new record. `changes` must carry the `id` ref.
    pub fn add(changes: Dict) -> Self {
        Self {
            op: DiffOp::Add,
            original: None,
            changes,
            force: false,
            committed: None,
        }
    }

    pub fn update(original: Dict, changes: Dict) -> Self {
        Self {
            op: DiffOp::Update,
            original: Some(original),
            changes,
            force: false,
            committed: None,
        }
    }

    pub fn remove(original: Dict) -> Self {
        Self {
            op: DiffOp::Remove,
            original: Some(original),
            changes: Dict::new(),
            force: false,
            committed: None,
        }
    }

    /// Skips the `mod` conflict check.
    pub fn forced(mut self) -> Self {
        self.force = true;
        self
    }

    /// Target record id: from `original`, else from `changes`.
    pub fn id(&self) -> Option<&Ref> {
        self.original
            .as_ref()
            .and_then(Dict::id)
            .or_else(|| self.changes.id())
    }
}

/// Record persistence consumed by the API layer.
pub trait RecordStore {
    /// One slot per requested id, `None` when the record does not exist.
    fn read_by_ids(&self, ids: &[Ref]) -> Result<Vec<Option<Dict>>, StoreError>;

    /// Records matching `filter`, at most `limit` of them. Ref paths in the
    /// filter resolve against the store itself.
    fn read(&self, filter: &Filter, limit: Option<usize>) -> Result<Vec<Dict>, StoreError>;

    /// Applies every diff or none of them.
    fn commit(&self, diffs: Vec<Diff>) -> Result<Vec<Diff>, StoreError>;
}

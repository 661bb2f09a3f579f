use crate::{Diff, DiffOp, HisItem, HisRange, HisStore, RecordStore, StoreError, WatchStore};
use chrono::Utc;
use haystack_core::{DateTime, Dict, Filter, Grid, Ref, Value};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Watch {
    dis: String,
    lease: Duration,
    touched: Instant,
    ids: BTreeSet<String>,
    changed: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct Watches {
    next_id: u64,
    open: BTreeMap<String, Watch>,
}

impl Watches {
    /// Drops watches whose lease ran out.
    fn sweep(&mut self) {
        let now = Instant::now();
        self.open.retain(|id, w| {
            let alive = now.duration_since(w.touched) <= w.lease;
            if !alive {
                warn!("watch {id} ({}) lease expired", w.dis);
            }
            alive
        });
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Watch, StoreError> {
        self.sweep();
        let w = self
            .open
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownWatch(id.to_owned()))?;
        w.touched = Instant::now();
        Ok(w)
    }
}

/// Store keeping records, history and watches in process memory.
///
/// Every map sits behind its own [`RwLock`] so the store can be shared by
/// reference across threads.
#[derive(Debug, Default)]
pub struct MemoryStore {
    recs: RwLock<BTreeMap<String, Dict>>,
    his: RwLock<BTreeMap<String, BTreeMap<chrono::DateTime<Utc>, HisItem>>>,
    watches: RwLock<Watches>,
}

fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read().map_err(|_| StoreError::Poisoned)
}

fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write().map_err(|_| StoreError::Poisoned)
}

fn record_id(dict: &Dict) -> Result<String, StoreError> {
    dict.id()
        .map(|r| r.id().to_owned())
        .ok_or(StoreError::MissingId)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every row of `grid` as a record keyed by its `id` ref.
    pub fn from_grid(grid: &Grid) -> Result<Self, StoreError> {
        let store = Self::new();
        for row in grid.rows() {
            store.insert(row.clone())?;
        }
        Ok(store)
    }

    /// Inserts or replaces a record as is, without a `mod` stamp or watch
    /// notification.
    pub fn insert(&self, rec: Dict) -> Result<(), StoreError> {
        let id = record_id(&rec)?;
        write_lock(&self.recs)?.insert(id, rec);
        Ok(())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(read_lock(&self.recs)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(read_lock(&self.recs)?.is_empty())
    }

    /// Rejects a stale `original` unless the diff is forced.
    fn check_conflict(diff: &Diff, id: &str, stored: &Dict) -> Result<(), StoreError> {
        if diff.force {
            return Ok(());
        }
        let original = diff.original.as_ref().and_then(|o| o.get("mod"));
        match original {
            Some(m) if stored.get("mod") != Some(m) => Err(StoreError::Conflict(id.to_owned())),
            _ => Ok(()),
        }
    }

    fn notify(&self, ids: &BTreeSet<String>) -> Result<(), StoreError> {
        let mut watches = write_lock(&self.watches)?;
        for w in watches.open.values_mut() {
            w.changed.extend(w.ids.intersection(ids).cloned());
        }
        Ok(())
    }
}

impl RecordStore for MemoryStore {
    fn read_by_ids(&self, ids: &[Ref]) -> Result<Vec<Option<Dict>>, StoreError> {
        let recs = read_lock(&self.recs)?;
        Ok(ids.iter().map(|id| recs.get(id.id()).cloned()).collect())
    }

    fn read(&self, filter: &Filter, limit: Option<usize>) -> Result<Vec<Dict>, StoreError> {
        let recs = read_lock(&self.recs)?;
        let pather = |id: &str| recs.get(id).cloned();
        Ok(filter
            .select(recs.values(), &pather, limit)
            .into_iter()
            .cloned()
            .collect())
    }

    fn commit(&self, diffs: Vec<Diff>) -> Result<Vec<Diff>, StoreError> {
        let mut recs = write_lock(&self.recs)?;

        let mut ids = Vec::with_capacity(diffs.len());
        for diff in &diffs {
            let id = diff
                .id()
                .map(|r| r.id().to_owned())
                .ok_or(StoreError::MissingId)?;
            match (diff.op, recs.get(&id)) {
                (DiffOp::Add, Some(_)) => return Err(StoreError::DuplicateRecord(id)),
                (DiffOp::Add, None) => {}
                (_, None) => return Err(StoreError::UnknownRecord(id)),
                (_, Some(stored)) => Self::check_conflict(diff, &id, stored)?,
            }
            ids.push(id);
        }

        let stamp = Value::from(DateTime::utc(Utc::now()));
        let mut out = Vec::with_capacity(diffs.len());
        for (mut diff, id) in diffs.into_iter().zip(ids.iter()) {
            match diff.op {
                DiffOp::Add => {
                    let mut rec = Dict::new();
                    rec.merge(&diff.changes);
                    rec.insert("mod", stamp.clone());
                    recs.insert(id.clone(), rec.clone());
                    diff.committed = Some(rec);
                }
                DiffOp::Update => {
                    let rec = recs
                        .get_mut(id)
                        .ok_or_else(|| StoreError::UnknownRecord(id.clone()))?;
                    rec.merge(&diff.changes);
                    rec.insert("mod", stamp.clone());
                    diff.committed = Some(rec.clone());
                }
                DiffOp::Remove => {
                    recs.remove(id);
                    diff.committed = None;
                }
            }
            out.push(diff);
        }
        drop(recs);

        debug!("committed {} diffs", out.len());
        self.notify(&ids.into_iter().collect())?;
        Ok(out)
    }
}

impl HisStore for MemoryStore {
    fn his_read(&self, id: &Ref, range: &HisRange) -> Result<Vec<HisItem>, StoreError> {
        if !read_lock(&self.recs)?.contains_key(id.id()) {
            return Err(StoreError::UnknownRecord(id.id().to_owned()));
        }
        let his = read_lock(&self.his)?;
        Ok(his
            .get(id.id())
            .map(|items| {
                items
                    .values()
                    .filter(|item| range.contains(&item.ts))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn his_write(&self, id: &Ref, items: Vec<HisItem>) -> Result<(), StoreError> {
        if !read_lock(&self.recs)?.contains_key(id.id()) {
            return Err(StoreError::UnknownRecord(id.id().to_owned()));
        }
        let mut his = write_lock(&self.his)?;
        let series = his.entry(id.id().to_owned()).or_default();
        let count = items.len();
        for item in items {
            series.insert(item.instant(), item);
        }
        debug!("his write @{}: {count} items, {} stored", id.id(), series.len());
        Ok(())
    }
}

impl WatchStore for MemoryStore {
    fn watch_open(&self, dis: &str, lease: Duration) -> Result<String, StoreError> {
        let mut watches = write_lock(&self.watches)?;
        watches.sweep();
        watches.next_id += 1;
        let id = format!("w-{}", watches.next_id);
        watches.open.insert(
            id.clone(),
            Watch {
                dis: dis.to_owned(),
                lease,
                touched: Instant::now(),
                ids: BTreeSet::new(),
                changed: BTreeSet::new(),
            },
        );
        debug!("opened watch {id} ({dis}), lease {lease:?}");
        Ok(id)
    }

    fn watch_sub(&self, watch_id: &str, ids: &[Ref]) -> Result<Vec<Option<Dict>>, StoreError> {
        {
            let mut watches = write_lock(&self.watches)?;
            let w = watches.get_mut(watch_id)?;
            w.ids.extend(ids.iter().map(|r| r.id().to_owned()));
        }
        self.read_by_ids(ids)
    }

    fn watch_unsub(&self, watch_id: &str, ids: &[Ref]) -> Result<(), StoreError> {
        let mut watches = write_lock(&self.watches)?;
        let w = watches.get_mut(watch_id)?;
        for id in ids {
            w.ids.remove(id.id());
            w.changed.remove(id.id());
        }
        Ok(())
    }

    fn watch_poll(&self, watch_id: &str, refresh: bool) -> Result<Vec<Dict>, StoreError> {
        let wanted: Vec<String> = {
            let mut watches = write_lock(&self.watches)?;
            let w = watches.get_mut(watch_id)?;
            let changed = std::mem::take(&mut w.changed);
            if refresh {
                w.ids.iter().cloned().collect()
            } else {
                changed.into_iter().collect()
            }
        };
        let recs = read_lock(&self.recs)?;
        Ok(wanted.iter().filter_map(|id| recs.get(id).cloned()).collect())
    }

    fn watch_close(&self, watch_id: &str) -> Result<(), StoreError> {
        let mut watches = write_lock(&self.watches)?;
        watches.sweep();
        match watches.open.remove(watch_id) {
            Some(w) => {
                debug!("closed watch {watch_id} ({})", w.dis);
                Ok(())
            }
            None => Err(StoreError::UnknownWatch(watch_id.to_owned())),
        }
    }
}

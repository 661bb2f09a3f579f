use crate::StoreError;
use chrono::{FixedOffset, Utc};
use haystack_core::{DateTime, Dict, Grid, GridBuilder, Ref, Value};

/// One timestamped history sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HisItem {
    pub ts: DateTime,
    pub val: Value,
}

impl HisItem {
    pub fn new(ts: DateTime, val: impl Into<Value>) -> Self {
        Self {
            ts,
            val: val.into(),
        }
    }

    /// Sort and de-duplication key.
    pub fn instant(&self) -> chrono::DateTime<Utc> {
        self.ts.val().with_timezone(&Utc)
    }

    pub fn to_dict(&self) -> Dict {
        let mut dict = Dict::new();
        dict.insert("ts", self.ts.clone());
        dict.insert("val", self.val.clone());
        dict
    }

    /// A `ts,val` grid with `id` in the grid meta.
    pub fn to_grid(id: &Ref, items: &[HisItem]) -> Result<Grid, StoreError> {
        let mut b = GridBuilder::new();
        b.set_meta("id", id.clone())?;
        b.add_col("ts")?.add_col("val")?;
        for item in items {
            b.add_row(vec![Value::from(item.ts.clone()), item.val.clone()])?;
        }
        Ok(b.build()?)
    }
}

/// Half-open span `[start, end)` of instants; an open bound is unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HisRange {
    pub start: Option<chrono::DateTime<FixedOffset>>,
    pub end: Option<chrono::DateTime<FixedOffset>>,
}

impl HisRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(
        start: chrono::DateTime<FixedOffset>,
        end: chrono::DateTime<FixedOffset>,
    ) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, ts: &DateTime) -> bool {
        let ts = ts.val();
        self.start.map_or(true, |s| *ts >= s) && self.end.map_or(true, |e| *ts < e)
    }
}

/// Time-series persistence consumed by the API layer.
pub trait HisStore {
    /// Samples of `id` inside `range`, sorted by timestamp.
    fn his_read(&self, id: &Ref, range: &HisRange) -> Result<Vec<HisItem>, StoreError>;

    /// Merges `items` into the history of `id`. A sample whose timestamp is
    /// already stored replaces the old one.
    fn his_write(&self, id: &Ref, items: Vec<HisItem>) -> Result<(), StoreError>;
}

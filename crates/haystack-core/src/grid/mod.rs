//! Tabular container of Haystack data.
//!
//! A [`Grid`] holds grid-level metadata, an ordered set of uniquely named
//! columns (each with its own metadata) and rows keyed by column name. Grids
//! are immutable; build them with [`GridBuilder`] or read them from Zinc or
//! JSON.

pub mod builder;

pub use builder::GridBuilder;

use crate::error::GridError;
use crate::types::{Dict, Value};

/// Only supported grid format version.
pub const VERSION: &str = "3.0";

/// A grid column: its name and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Col {
    name: String,
    meta: Dict,
}

impl Col {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meta(&self) -> &Dict {
        &self.meta
    }

    /// Column display text: the `dis` meta tag, or the name.
    pub fn dis(&self) -> &str {
        self.meta.get_str("dis").unwrap_or(&self.name)
    }
}

/// Metadata, columns and rows. Null cells are absent from row dicts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    meta: Dict,
    cols: Vec<Col>,
    rows: Vec<Dict>,
}

impl Grid {
    /// A grid with a single column named `empty` and no rows.
    pub fn empty() -> Self {
        let mut meta = Dict::new();
        meta.insert("ver", VERSION);
        Self {
            meta,
            cols: vec![Col {
                name: "empty".to_owned(),
                meta: Dict::new(),
            }],
            rows: Vec::new(),
        }
    }

    /// Builds a grid whose columns are the union of the dicts' tag names, in
    /// order of first appearance.
    pub fn from_dicts<'a>(dicts: impl IntoIterator<Item = &'a Dict>) -> Result<Self, GridError> {
        let dicts: Vec<&Dict> = dicts.into_iter().collect();
        let mut b = GridBuilder::new();
        for dict in &dicts {
            for name in dict.keys() {
                if !b.has_col(name) {
                    b.add_col(name)?;
                }
            }
        }
        if b.num_cols() == 0 {
            return Ok(Self::empty());
        }
        for dict in dicts {
            b.add_dict_row(dict)?;
        }
        b.build()
    }

    pub fn meta(&self) -> &Dict {
        &self.meta
    }

    pub fn cols(&self) -> &[Col] {
        &self.cols
    }

    pub fn col(&self, name: &str) -> Option<&Col> {
        self.cols.iter().find(|c| c.name == name)
    }

    pub fn has_col(&self, name: &str) -> bool {
        self.col(name).is_some()
    }

    pub fn rows(&self) -> &[Dict] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Dict> {
        self.rows.get(index)
    }

    /// Cell value at `row` in column `col`; `None` for a null cell.
    pub fn cell(&self, row: usize, col: &str) -> Option<&Value> {
        self.rows.get(row)?.get(col)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Dict> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, GridBuilder};
    use crate::types::{Dict, Value};

    fn sample() -> Grid {
        let mut b = GridBuilder::new();
        b.add_col("id").unwrap();
        b.add_col("dis").unwrap();
        b.add_row(vec![Value::from(1.0), Value::from("one")]).unwrap();
        b.add_row(vec![Value::from(2.0), Value::Null]).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn accessors() {
        let g = sample();
        assert_eq!(g.len(), 2);
        assert!(!g.is_empty());
        assert_eq!(g.cols()[1].name(), "dis");
        assert_eq!(g.cell(0, "dis"), Some(&Value::from("one")));
        assert_eq!(g.cell(1, "dis"), None);
        assert_eq!(g.meta().get_str("ver"), Some("3.0"));
        assert!(g.has_col("id"));
        assert!(!g.has_col("curVal"));
    }

    #[test]
    fn empty_grid_has_one_column() {
        let g = Grid::empty();
        assert_eq!(g.cols().len(), 1);
        assert_eq!(g.cols()[0].name(), "empty");
        assert!(g.is_empty());
    }

    #[test]
    fn equality_depends_on_row_order() {
        let a = sample();
        let mut rows = a.rows().to_vec();
        rows.reverse();
        let b = Grid::from_dicts(&rows).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, sample());
    }

    #[test]
    fn from_dicts_unions_columns() {
        let a: Dict = [("a", Value::Marker), ("b", Value::from(1.0))]
            .into_iter()
            .collect();
        let c: Dict = [("c", Value::from("x"))].into_iter().collect();
        let g = Grid::from_dicts([&a, &c]).unwrap();
        let names: Vec<&str> = g.cols().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(g.rows(), &[a, c]);
        assert_eq!(Grid::from_dicts([]).unwrap(), Grid::empty());
    }
}

use crate::error::GridError;
use crate::grid::{Col, Grid, VERSION};
use crate::types::{is_tag_name, Dict, Value};

/// Staged construction of a [`Grid`].
///
/// Columns must all be declared before the first row is added. Setting a
/// metadata tag to [`Value::Remove`] deletes the tag.
#[derive(Debug, Clone, Default)]
pub struct GridBuilder {
    meta: Dict,
    cols: Vec<Col>,
    rows: Vec<Dict>,
}

impl GridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_cols(&self) -> usize {
        self.cols.len()
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn has_col(&self, name: &str) -> bool {
        self.col_index(name).is_some()
    }

    fn col_index(&self, name: &str) -> Option<usize> {
        self.cols.iter().position(|c| c.name == name)
    }

    pub fn set_meta(&mut self, name: &str, val: impl Into<Value>) -> Result<&mut Self, GridError> {
        if !is_tag_name(name) {
            return Err(GridError::InvalidName(name.to_owned()));
        }
        set_or_remove(&mut self.meta, name, val.into());
        Ok(self)
    }

    /// Merges every tag of `meta` into the grid metadata.
    pub fn add_meta(&mut self, meta: &Dict) -> Result<&mut Self, GridError> {
        for (name, val) in meta {
            self.set_meta(name, val.clone())?;
        }
        Ok(self)
    }

    pub fn add_col(&mut self, name: &str) -> Result<&mut Self, GridError> {
        self.add_col_with_meta(name, Dict::new())
    }

    pub fn add_col_with_meta(&mut self, name: &str, meta: Dict) -> Result<&mut Self, GridError> {
        if !self.rows.is_empty() {
            return Err(GridError::ColumnAfterRows(name.to_owned()));
        }
        if !is_tag_name(name) {
            return Err(GridError::InvalidName(name.to_owned()));
        }
        if self.has_col(name) {
            return Err(GridError::DuplicateColumn(name.to_owned()));
        }
        let mut col = Col {
            name: name.to_owned(),
            meta: Dict::new(),
        };
        for (key, val) in meta {
            set_or_remove(&mut col.meta, &key, val);
        }
        self.cols.push(col);
        Ok(self)
    }

    pub fn set_col_meta(
        &mut self,
        col: &str,
        name: &str,
        val: impl Into<Value>,
    ) -> Result<&mut Self, GridError> {
        if !is_tag_name(name) {
            return Err(GridError::InvalidName(name.to_owned()));
        }
        let idx = self
            .col_index(col)
            .ok_or_else(|| GridError::UnknownColumn(col.to_owned()))?;
        set_or_remove(&mut self.cols[idx].meta, name, val.into());
        Ok(self)
    }

    /// Adds a row with one cell per column, in column order. Null cells are
    /// not stored.
    pub fn add_row(&mut self, cells: Vec<Value>) -> Result<&mut Self, GridError> {
        if cells.len() != self.cols.len() {
            return Err(GridError::RowWidth {
                expected: self.cols.len(),
                found: cells.len(),
            });
        }
        let row = self
            .cols
            .iter()
            .zip(cells)
            .filter(|(_, val)| !val.is_null())
            .map(|(col, val)| (col.name.clone(), val))
            .collect();
        self.rows.push(row);
        Ok(self)
    }

    /// Adds a row from a dict keyed by column name. Every tag must name an
    /// existing column; columns absent from the dict are null.
    pub fn add_dict_row(&mut self, dict: &Dict) -> Result<&mut Self, GridError> {
        if let Some(unknown) = dict.keys().find(|k| !self.has_col(k)) {
            return Err(GridError::UnknownColumn(unknown.to_owned()));
        }
        let cells = self
            .cols
            .iter()
            .map(|c| dict.get(&c.name).cloned().unwrap_or(Value::Null))
            .collect();
        self.add_row(cells)
    }

    pub fn build(self) -> Result<Grid, GridError> {
        if self.cols.is_empty() {
            return Err(GridError::NoColumns);
        }
        let mut meta = self.meta;
        meta.insert("ver", VERSION);
        Ok(Grid {
            meta,
            cols: self.cols,
            rows: self.rows,
        })
    }
}

fn set_or_remove(dict: &mut Dict, name: &str, val: Value) {
    if matches!(val, Value::Remove) {
        dict.remove(name);
    } else {
        dict.insert(name, val);
    }
}

#[cfg(test)]
mod tests {
    use super::GridBuilder;
    use crate::error::GridError;
    use crate::types::{Dict, Value};

    #[test]
    fn column_after_row_fails() {
        let mut b = GridBuilder::new();
        b.add_col("a").unwrap();
        b.add_row(vec![Value::Marker]).unwrap();
        assert_eq!(
            b.add_col("b").unwrap_err(),
            GridError::ColumnAfterRows("b".into())
        );
    }

    #[test]
    fn duplicate_column_fails() {
        let mut b = GridBuilder::new();
        b.add_col("a").unwrap();
        assert_eq!(
            b.add_col("a").unwrap_err(),
            GridError::DuplicateColumn("a".into())
        );
    }

    #[test]
    fn row_width_must_match() {
        let mut b = GridBuilder::new();
        b.add_col("a").unwrap().add_col("b").unwrap();
        assert_eq!(
            b.add_row(vec![Value::Marker]).unwrap_err(),
            GridError::RowWidth {
                expected: 2,
                found: 1
            }
        );
        assert!(b
            .add_row(vec![Value::Marker, Value::Null, Value::Null])
            .is_err());
        assert_eq!(b.num_rows(), 0);
    }

    #[test]
    fn remove_deletes_meta() {
        let mut b = GridBuilder::new();
        b.set_meta("dis", "Title").unwrap();
        b.set_meta("hisStart", Value::Marker).unwrap();
        b.set_meta("dis", Value::Remove).unwrap();
        b.add_col("a").unwrap();
        b.set_col_meta("a", "unit", "kW").unwrap();
        b.set_col_meta("a", "unit", Value::Remove).unwrap();
        let g = b.build().unwrap();
        assert!(g.meta().missing("dis"));
        assert!(g.meta().has("hisStart"));
        assert!(g.cols()[0].meta().is_empty());
    }

    #[test]
    fn unknown_column_meta_fails() {
        let mut b = GridBuilder::new();
        b.add_col("a").unwrap();
        assert_eq!(
            b.set_col_meta("b", "dis", "B").unwrap_err(),
            GridError::UnknownColumn("b".into())
        );
    }

    #[test]
    fn dict_rows_follow_column_order() {
        let mut b = GridBuilder::new();
        b.add_col("a").unwrap().add_col("b").unwrap();
        let row: Dict = [("b", Value::from(2.0))].into_iter().collect();
        b.add_dict_row(&row).unwrap();
        let stray: Dict = [("z", Value::Marker)].into_iter().collect();
        assert_eq!(
            b.add_dict_row(&stray).unwrap_err(),
            GridError::UnknownColumn("z".into())
        );
        let g = b.build().unwrap();
        assert_eq!(g.rows(), &[row]);
    }

    #[test]
    fn rejects_bad_names_and_empty_grids() {
        let mut b = GridBuilder::new();
        assert_eq!(
            b.add_col("Bad").unwrap_err(),
            GridError::InvalidName("Bad".into())
        );
        assert_eq!(GridBuilder::new().build().unwrap_err(), GridError::NoColumns);
    }
}

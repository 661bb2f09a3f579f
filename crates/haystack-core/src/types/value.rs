use crate::grid::Grid;
use crate::types::{Coord, DateTime, Dict, Kind, Number, Ref, Symbol, XStr};
use crate::zinc::writer::ZincWriter;
use chrono::{NaiveDate, NaiveTime};
use core::cmp::Ordering;
use core::fmt;

/// Every value that can appear in a Haystack tag, list, dict or grid cell.
///
/// Equality is kind aware: a `Str` never equals a `Uri` even when both hold
/// the same text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Null,
    Marker,
    Remove,
    Na,
    Bool(bool),
    Number(Number),
    Str(String),
    Uri(String),
    Ref(Ref),
    Symbol(Symbol),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime),
    Coord(Coord),
    XStr(XStr),
    List(Vec<Value>),
    Dict(Dict),
    Grid(Box<Grid>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Marker => Kind::Marker,
            Self::Remove => Kind::Remove,
            Self::Na => Kind::Na,
            Self::Bool(_) => Kind::Bool,
            Self::Number(_) => Kind::Number,
            Self::Str(_) => Kind::Str,
            Self::Uri(_) => Kind::Uri,
            Self::Ref(_) => Kind::Ref,
            Self::Symbol(_) => Kind::Symbol,
            Self::Date(_) => Kind::Date,
            Self::Time(_) => Kind::Time,
            Self::DateTime(_) => Kind::DateTime,
            Self::Coord(_) => Kind::Coord,
            Self::XStr(_) => Kind::XStr,
            Self::List(_) => Kind::List,
            Self::Dict(_) => Kind::Dict,
            Self::Grid(_) => Kind::Grid,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Ref> {
        match self {
            Self::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Self::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            Self::Grid(g) => Some(g),
            _ => None,
        }
    }

    /// Canonical Zinc rendering.
    pub fn to_zinc(&self) -> String {
        let mut w = ZincWriter::new();
        w.write_val(self);
        w.finish()
    }

    /// Ordering used by the filter engine's relational operators.
    ///
    /// Only values of the same kind are comparable; they order by the lexical
    /// order of their Zinc renderings. This is not numeric ordering:
    /// `10` sorts before `9` and `-5` sorts after `-3`.
    pub fn zinc_cmp(&self, other: &Value) -> Option<Ordering> {
        if self.kind() != other.kind() {
            return None;
        }
        Some(self.to_zinc().cmp(&other.to_zinc()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_zinc())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(Number::new(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(Number::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(Number::from(v))
    }
}

impl From<Number> for Value {
    fn from(v: Number) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Ref> for Value {
    fn from(v: Ref) -> Self {
        Self::Ref(v)
    }
}

impl From<Symbol> for Value {
    fn from(v: Symbol) -> Self {
        Self::Symbol(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<DateTime> for Value {
    fn from(v: DateTime) -> Self {
        Self::DateTime(v)
    }
}

impl From<Coord> for Value {
    fn from(v: Coord) -> Self {
        Self::Coord(v)
    }
}

impl From<XStr> for Value {
    fn from(v: XStr) -> Self {
        Self::XStr(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::List(v)
    }
}

impl From<Dict> for Value {
    fn from(v: Dict) -> Self {
        Self::Dict(v)
    }
}

impl From<Grid> for Value {
    fn from(v: Grid) -> Self {
        Self::Grid(Box::new(v))
    }
}

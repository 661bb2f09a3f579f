//! Haystack filter queries.
//!
//! A [`Filter`] is a boolean predicate over tag paths. Paths with more than
//! one segment (`equipRef->siteRef->dis`) descend through nested dicts or
//! through refs resolved by a [`Pather`].
//!
//! ```
//! use haystack_core::{Dict, Filter, Ref, Value};
//!
//! let site: Dict = [("dis", Value::from("HQ"))].into_iter().collect();
//! let point: Dict = [("siteRef", Value::from(Ref::new("hq").unwrap()))]
//!     .into_iter()
//!     .collect();
//!
//! let filter: Filter = "siteRef->dis == \"HQ\"".parse().unwrap();
//! let pather = |id: &str| (id == "hq").then(|| site.clone());
//! assert!(filter.include(&point, &pather));
//! assert!(!filter.include_local(&point));
//! ```

mod parser;

use crate::error::FilterError;
use crate::types::{Dict, Value};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::str::FromStr;
use log::debug;
use std::borrow::Cow;

/// Resolves ref ids to records while a path is being followed.
pub trait Pather {
    fn find(&self, id: &str) -> Option<Dict>;
}

impl<F> Pather for F
where
    F: Fn(&str) -> Option<Dict>,
{
    fn find(&self, id: &str) -> Option<Dict> {
        self(id)
    }
}

/// A pather that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPather;

impl Pather for NoPather {
    fn find(&self, _id: &str) -> Option<Dict> {
        None
    }
}

/// Non-empty sequence of tag names joined by `->`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(Vec<String>);

impl Path {
    /// Parses and validates `a->b->c`.
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        parser::parse_path(text)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> &str {
        self.0.first().map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Follows the path from `dict`. Anything unresolvable yields null.
    pub fn resolve<'a>(&self, dict: &'a Dict, pather: &dyn Pather) -> Cow<'a, Value> {
        let Some((first, rest)) = self.0.split_first() else {
            return null();
        };
        let mut cur: Cow<'a, Value> = match dict.get(first) {
            Some(val) => Cow::Borrowed(val),
            None => return null(),
        };
        for seg in rest {
            cur = match cur {
                Cow::Borrowed(Value::Dict(d)) => d.get(seg).map_or_else(null, Cow::Borrowed),
                Cow::Owned(Value::Dict(mut d)) => d.remove(seg).map_or_else(null, Cow::Owned),
                Cow::Borrowed(Value::Ref(r)) => self.follow(r.id(), seg, pather),
                Cow::Owned(Value::Ref(r)) => self.follow(r.id(), seg, pather),
                _ => return null(),
            };
        }
        cur
    }

    fn follow<'a>(&self, id: &str, seg: &str, pather: &dyn Pather) -> Cow<'a, Value> {
        match pather.find(id) {
            Some(mut rec) => rec.remove(seg).map_or_else(null, Cow::Owned),
            None => {
                debug!("filter path {self}: unresolved ref @{id}");
                null()
            }
        }
    }
}

fn null<'a>() -> Cow<'a, Value> {
    Cow::Owned(Value::Null)
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("->"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// `actual` is the resolved path value, `expected` the literal.
    ///
    /// `!=` never matches a null value. The relational operators only match
    /// values of the literal's kind and compare their Zinc text lexically.
    pub fn matches(self, actual: &Value, expected: &Value) -> bool {
        match self {
            Self::Eq => actual == expected,
            Self::Ne => !actual.is_null() && actual != expected,
            Self::Lt => actual.zinc_cmp(expected) == Some(Ordering::Less),
            Self::Le => matches!(
                actual.zinc_cmp(expected),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Self::Gt => actual.zinc_cmp(expected) == Some(Ordering::Greater),
            Self::Ge => matches!(
                actual.zinc_cmp(expected),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A parsed filter expression.
///
/// Two filters are equal when their canonical text is equal, so
/// `a and b` never equals `b and a`.
#[derive(Debug, Clone)]
pub enum Filter {
    Has(Path),
    Missing(Path),
    Cmp { path: Path, op: CmpOp, val: Value },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
}

impl Filter {
    pub fn parse(text: &str) -> Result<Self, FilterError> {
        parser::parse(text)
    }

    /// `path` is checked the way filter text is, so `a->b` is accepted and
    /// `""` or `a->->b` are not.
    pub fn has(path: &str) -> Result<Self, FilterError> {
        Ok(Self::Has(Path::parse(path)?))
    }

    pub fn missing(path: &str) -> Result<Self, FilterError> {
        Ok(Self::Missing(Path::parse(path)?))
    }

    /// Only values that filter text can express are accepted as literals:
    /// finite or `-INF` numbers, strings, uris, refs, symbols, dates, times,
    /// date times and booleans. A ref loses its display name.
    fn cmp(path: &str, op: CmpOp, val: impl Into<Value>) -> Result<Self, FilterError> {
        let path = Path::parse(path)?;
        let val = val.into();
        let text = literal_text(&val);
        match parser::parse_literal(&text) {
            Ok(read) if read == val => Ok(Self::Cmp { path, op, val: read }),
            _ => Err(FilterError::InvalidLiteral { text }),
        }
    }

    pub fn eq(path: &str, val: impl Into<Value>) -> Result<Self, FilterError> {
        Self::cmp(path, CmpOp::Eq, val)
    }

    pub fn ne(path: &str, val: impl Into<Value>) -> Result<Self, FilterError> {
        Self::cmp(path, CmpOp::Ne, val)
    }

    pub fn lt(path: &str, val: impl Into<Value>) -> Result<Self, FilterError> {
        Self::cmp(path, CmpOp::Lt, val)
    }

    pub fn le(path: &str, val: impl Into<Value>) -> Result<Self, FilterError> {
        Self::cmp(path, CmpOp::Le, val)
    }

    pub fn gt(path: &str, val: impl Into<Value>) -> Result<Self, FilterError> {
        Self::cmp(path, CmpOp::Gt, val)
    }

    pub fn ge(path: &str, val: impl Into<Value>) -> Result<Self, FilterError> {
        Self::cmp(path, CmpOp::Ge, val)
    }

    pub fn and(lhs: Filter, rhs: Filter) -> Self {
        Self::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Filter, rhs: Filter) -> Self {
        Self::Or(Box::new(lhs), Box::new(rhs))
    }

    /// Evaluates the filter against `dict`, resolving refs through `pather`.
    pub fn include(&self, dict: &Dict, pather: &dyn Pather) -> bool {
        match self {
            Self::Has(path) => !path.resolve(dict, pather).is_null(),
            Self::Missing(path) => path.resolve(dict, pather).is_null(),
            Self::Cmp { path, op, val } => op.matches(&path.resolve(dict, pather), val),
            Self::And(lhs, rhs) => lhs.include(dict, pather) && rhs.include(dict, pather),
            Self::Or(lhs, rhs) => lhs.include(dict, pather) || rhs.include(dict, pather),
        }
    }

    /// Evaluates without ref resolution; multi-segment paths only descend
    /// into nested dicts.
    pub fn include_local(&self, dict: &Dict) -> bool {
        self.include(dict, &NoPather)
    }

    /// Matching dicts in order, at most `limit` of them.
    pub fn select<'a>(
        &self,
        dicts: impl IntoIterator<Item = &'a Dict>,
        pather: &dyn Pather,
        limit: Option<usize>,
    ) -> Vec<&'a Dict> {
        dicts
            .into_iter()
            .filter(|d| self.include(d, pather))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    fn is_compound(&self) -> bool {
        matches!(self, Self::And(..) | Self::Or(..))
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_compound() {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Literal text as the filter grammar reads it back.
fn literal_text(val: &Value) -> String {
    match val {
        Value::Bool(b) => b.to_string(),
        Value::Ref(r) => format!("@{}", r.id()),
        val => val.to_zinc(),
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Has(path) => write!(f, "{path}"),
            Self::Missing(path) => write!(f, "not {path}"),
            Self::Cmp { path, op, val } => write!(f, "{path} {op} {}", literal_text(val)),
            Self::And(lhs, rhs) => {
                lhs.fmt_operand(f)?;
                f.write_str(" and ")?;
                rhs.fmt_operand(f)
            }
            Self::Or(lhs, rhs) => {
                lhs.fmt_operand(f)?;
                f.write_str(" or ")?;
                rhs.fmt_operand(f)
            }
        }
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Filter {}

impl Hash for Filter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::{Filter, NoPather, Path, Pather};
    use crate::error::FilterError;
    use crate::types::{Coord, DateTime, Dict, Number, Ref, Symbol, Value, XStr};
    use std::cell::Cell;
    use std::collections::HashSet;

    fn dict<const N: usize>(tags: [(&str, Value); N]) -> Dict {
        tags.into_iter().collect()
    }

    fn r(id: &str) -> Value {
        Value::from(Ref::new(id).unwrap())
    }

    #[test]
    fn identity_is_canonical_text() {
        let a = Filter::parse("a  and\tb").unwrap();
        assert_eq!(a, Filter::parse("a and b").unwrap());
        assert_ne!(a, Filter::parse("b and a").unwrap());
        let set: HashSet<Filter> = ["x or y", "x  or y", "y or x"]
            .into_iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn canonical_text_round_trips() {
        for text in [
            "site",
            "not equip",
            "dis == \"Main \\\"HQ\\\"\"",
            "siteRef->geoCity != \"Paris\"",
            "curVal <= 72.5°F",
            "ts >= 2016-01-13T09:51:33-05:00 New_York",
            "enabled == false",
            "id == @p:a",
            "(a or b) and (c and d)",
            "a or b or c",
        ] {
            let f = Filter::parse(text).unwrap();
            assert_eq!(Filter::parse(&f.to_string()).unwrap(), f, "{text}");
        }
        assert_eq!(
            Filter::eq("id", Ref::with_dis("a", "Alpha").unwrap()).unwrap().to_string(),
            "id == @a"
        );
    }

    #[test]
    fn built_filters_read_back_from_their_text() {
        let when = DateTime::new(
            chrono::DateTime::parse_from_rfc3339("2016-01-13T09:51:33-05:00").unwrap(),
            "New_York",
        );
        let built = [
            Filter::has("equipRef->siteRef").unwrap(),
            Filter::missing("not").unwrap(),
            Filter::eq("dis", "say \"hi\"\n").unwrap(),
            Filter::ne("siteRef", Ref::with_dis("s-1", "Site").unwrap()).unwrap(),
            Filter::lt("curVal", Number::with_unit(72.5, "°F")).unwrap(),
            Filter::le("floor", Number::NEG_INF).unwrap(),
            Filter::gt("ts", when).unwrap(),
            Filter::ge("uri", Value::Uri("http://a/b#c".into())).unwrap(),
            Filter::eq("kind", Symbol::new("elec-meter").unwrap()).unwrap(),
            Filter::eq("on", false).unwrap(),
            Filter::and(
                Filter::or(Filter::has("a").unwrap(), Filter::has("b").unwrap()),
                Filter::eq("n", 3).unwrap(),
            ),
        ];
        for f in built {
            assert_eq!(Filter::parse(&f.to_string()).unwrap(), f, "{f}");
        }
    }

    #[test]
    fn constructors_reject_what_filter_text_cannot_express() {
        for val in [
            Value::from(Number::INF),
            Value::from(Number::NAN),
            Value::from(Number::with_unit(5.0, "k W")),
            Value::Marker,
            Value::Null,
            Value::Na,
            Value::Remove,
            Value::List(vec![Value::from(1)]),
            Value::Dict(Dict::new()),
            Value::from(Coord::new(1.0, 2.0).unwrap()),
            Value::from(XStr::new("Bin", "x").unwrap()),
        ] {
            assert!(
                matches!(
                    Filter::eq("curVal", val.clone()),
                    Err(FilterError::InvalidLiteral { .. })
                ),
                "{val:?}"
            );
        }
        for path in ["", "a->->b", "Site", "a b", "a->"] {
            assert!(Filter::has(path).is_err(), "{path:?}");
        }
    }

    #[test]
    fn has_missing_and_equality() {
        let d = dict([
            ("site", Value::Marker),
            ("dis", Value::from("HQ")),
            ("area", Value::from(Number::with_unit(5000.0, "ft²"))),
        ]);
        assert!(Filter::has("site").unwrap().include_local(&d));
        assert!(!Filter::has("equip").unwrap().include_local(&d));
        assert!(Filter::missing("equip").unwrap().include_local(&d));
        assert!(Filter::eq("dis", "HQ").unwrap().include_local(&d));
        assert!(!Filter::eq("dis", Value::Uri("HQ".into())).unwrap().include_local(&d));
        assert!(!Filter::eq("area", 5000.0).unwrap().include_local(&d));
        assert!(Filter::parse("area == 5000ft²").unwrap().include_local(&d));
    }

    #[test]
    fn not_equal_requires_a_value() {
        let d = dict([("dis", Value::from("HQ"))]);
        assert!(Filter::ne("dis", "Lab").unwrap().include_local(&d));
        assert!(!Filter::ne("dis", "HQ").unwrap().include_local(&d));
        assert!(!Filter::ne("geoCity", "Paris").unwrap().include_local(&d));
    }

    #[test]
    fn relational_operators_are_lexical() {
        let d = dict([("curVal", Value::from(10.0)), ("temp", Value::from(-5.0))]);
        assert!(!Filter::parse("curVal > 9").unwrap().include_local(&d));
        assert!(Filter::parse("curVal < 9").unwrap().include_local(&d));
        assert!(Filter::parse("curVal >= 10").unwrap().include_local(&d));
        assert!(Filter::parse("temp > -3").unwrap().include_local(&d));
        assert!(!Filter::parse("curVal < \"9\"").unwrap().include_local(&d));
        assert!(!Filter::parse("missing < 9").unwrap().include_local(&d));
    }

    #[test]
    fn paths_follow_refs_and_dicts() {
        let b = dict([("dis", Value::from("x"))]);
        let a = dict([
            ("ref", r("b")),
            ("nested", Value::Dict(dict([("inner", Value::Marker)]))),
        ]);
        let pather = |id: &str| (id == "b").then(|| b.clone());
        assert!(Filter::parse("ref->dis == \"x\"")
            .unwrap()
            .include(&a, &pather));
        assert!(Filter::has("nested->inner").unwrap().include_local(&a));
        assert!(!Filter::has("ref->dis").unwrap().include_local(&a));
        assert!(Filter::missing("ref->dis").unwrap().include(&a, &NoPather));
        assert!(!Filter::has("nested->inner->deeper").unwrap().include(&a, &pather));
    }

    #[test]
    fn multi_hop_resolution_calls_pather_per_hop() {
        let site = dict([("dis", Value::from("HQ"))]);
        let equip = dict([("siteRef", r("site"))]);
        let point = dict([("equipRef", r("equip"))]);
        let calls = Cell::new(0);
        let pather = |id: &str| {
            calls.set(calls.get() + 1);
            match id {
                "site" => Some(site.clone()),
                "equip" => Some(equip.clone()),
                _ => None,
            }
        };
        let f = Filter::eq("equipRef->siteRef->dis", "HQ").unwrap();
        assert!(f.include(&point, &pather));
        assert_eq!(calls.get(), 2);
        assert_eq!(
            Path::parse("equipRef->siteRef->dis").unwrap().resolve(&point, &pather).into_owned(),
            Value::from("HQ")
        );
    }

    #[test]
    fn select_respects_order_and_limit() {
        let recs: Vec<Dict> = (0..5)
            .map(|i| dict([("n", Value::from(i)), ("point", Value::Marker)]))
            .collect();
        let f = Filter::has("point").unwrap();
        assert_eq!(f.select(&recs, &NoPather, None).len(), 5);
        let first_two = f.select(&recs, &NoPather, Some(2));
        assert_eq!(first_two, vec![&recs[0], &recs[1]]);
    }

    #[test]
    fn closures_are_pathers() {
        let pather = |_: &str| -> Option<Dict> { None };
        assert!(Pather::find(&pather, "x").is_none());
    }
}

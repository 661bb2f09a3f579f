//! The `_kind`-tagged JSON encoding.
//!
//! Booleans, strings, unit-less finite numbers, lists, dicts and null map to
//! plain JSON. Every other kind is an object carrying a `_kind`
//! discriminator:
//!
//! ```
//! use haystack_core::json::JsonCodec;
//! use haystack_core::{Number, Value};
//! use serde_json::json;
//!
//! let temp = Value::from(Number::with_unit(72.5, "°F"));
//! assert_eq!(temp.to_json(), json!({"_kind": "number", "val": 72.5, "unit": "°F"}));
//! assert_eq!(Value::from_json(&temp.to_json()).unwrap(), temp);
//! ```

use crate::error::{JsonError, ValueError};
use crate::grid::{Grid, GridBuilder};
use crate::types::date_time::{format_date, format_time, DATE_FORMAT, TIME_FORMAT, UTC_TZ};
use crate::types::{
    is_tag_name, is_tz_name, is_unit, Coord, DateTime, Dict, Kind, Number, Ref, Symbol, Value,
    XStr,
};
use chrono::{NaiveDate, NaiveTime};
use serde_json::{Map, Value as Json};

/// Largest magnitude written as a JSON integer.
const INTEGRAL_LIMIT: f64 = 1e15;

/// Conversion to and from the JSON encoding.
///
/// Typed decoders reject objects whose `_kind` names a different kind.
pub trait JsonCodec: Sized {
    fn to_json(&self) -> Json;
    fn from_json(json: &Json) -> Result<Self, JsonError>;
}

/// Compact JSON text of a value.
pub fn to_json_string(val: &Value) -> String {
    val.to_json().to_string()
}

pub fn to_json_string_pretty(val: &Value) -> Result<String, JsonError> {
    Ok(serde_json::to_string_pretty(&val.to_json())?)
}

/// Parses JSON text and decodes it as a value.
pub fn from_json_str(text: &str) -> Result<Value, JsonError> {
    let json: Json = serde_json::from_str(text)?;
    Value::from_json(&json)
}

fn kind_of(json: &Json) -> String {
    let kind = match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "str",
        Json::Array(_) => "list",
        Json::Object(obj) => match obj.get("_kind") {
            Some(Json::String(k)) => return k.clone(),
            _ => "dict",
        },
    };
    kind.to_owned()
}

fn unexpected(kind: Kind, json: &Json) -> JsonError {
    JsonError::UnexpectedKind {
        expected: kind.name(),
        found: kind_of(json),
    }
}

fn tagged(kind: Kind) -> Map<String, Json> {
    let mut obj = Map::new();
    obj.insert("_kind".to_owned(), Json::from(kind.name()));
    obj
}

fn tagged_val(kind: Kind, val: impl Into<Json>) -> Json {
    let mut obj = tagged(kind);
    obj.insert("val".to_owned(), val.into());
    Json::Object(obj)
}

/// The object body when `json` is tagged with `kind`.
fn object(json: &Json, kind: Kind) -> Result<&Map<String, Json>, JsonError> {
    match json {
        Json::Object(obj) if obj.get("_kind").and_then(Json::as_str) == Some(kind.name()) => {
            Ok(obj)
        }
        _ => Err(unexpected(kind, json)),
    }
}

fn opt_str<'a>(
    obj: &'a Map<String, Json>,
    kind: Kind,
    field: &'static str,
) -> Result<Option<&'a str>, JsonError> {
    match obj.get(field) {
        None => Ok(None),
        Some(Json::String(s)) => Ok(Some(s)),
        Some(_) => Err(JsonError::InvalidField {
            kind: kind.name(),
            field,
        }),
    }
}

fn req_str<'a>(
    obj: &'a Map<String, Json>,
    kind: Kind,
    field: &'static str,
) -> Result<&'a str, JsonError> {
    opt_str(obj, kind, field)?.ok_or(JsonError::MissingField {
        kind: kind.name(),
        field,
    })
}

fn req_f64(obj: &Map<String, Json>, kind: Kind, field: &'static str) -> Result<f64, JsonError> {
    match obj.get(field) {
        None => Err(JsonError::MissingField {
            kind: kind.name(),
            field,
        }),
        Some(v) => v.as_f64().ok_or(JsonError::InvalidField {
            kind: kind.name(),
            field,
        }),
    }
}

fn num_json(val: f64) -> Json {
    if val.fract() == 0.0 && val.abs() < INTEGRAL_LIMIT {
        Json::from(val as i64)
    } else {
        serde_json::Number::from_f64(val).map_or(Json::Null, Json::Number)
    }
}

fn invalid(kind: Kind, field: &'static str) -> JsonError {
    JsonError::InvalidField {
        kind: kind.name(),
        field,
    }
}

impl JsonCodec for Number {
    fn to_json(&self) -> Json {
        if self.is_finite() && self.unit.is_none() {
            return num_json(self.val);
        }
        let val = if self.val.is_nan() {
            Json::from("NaN")
        } else if self.val == f64::INFINITY {
            Json::from("INF")
        } else if self.val == f64::NEG_INFINITY {
            Json::from("-INF")
        } else {
            num_json(self.val)
        };
        let mut obj = tagged(Kind::Number);
        obj.insert("val".to_owned(), val);
        if let Some(unit) = &self.unit {
            obj.insert("unit".to_owned(), Json::from(unit.as_str()));
        }
        Json::Object(obj)
    }

    fn from_json(json: &Json) -> Result<Self, JsonError> {
        if let Json::Number(n) = json {
            return n
                .as_f64()
                .map(Number::new)
                .ok_or(invalid(Kind::Number, "val"));
        }
        let obj = object(json, Kind::Number)?;
        let val = match obj.get("val") {
            None => {
                return Err(JsonError::MissingField {
                    kind: Kind::Number.name(),
                    field: "val",
                })
            }
            Some(Json::String(s)) => match s.as_str() {
                "NaN" => f64::NAN,
                "INF" => f64::INFINITY,
                "-INF" => f64::NEG_INFINITY,
                _ => return Err(invalid(Kind::Number, "val")),
            },
            Some(v) => v.as_f64().ok_or(invalid(Kind::Number, "val"))?,
        };
        Ok(match opt_str(obj, Kind::Number, "unit")? {
            Some(unit) if is_unit(unit) => Number::with_unit(val, unit),
            Some(_) => return Err(invalid(Kind::Number, "unit")),
            None => Number::new(val),
        })
    }
}

impl JsonCodec for Ref {
    fn to_json(&self) -> Json {
        let mut obj = tagged(Kind::Ref);
        obj.insert("val".to_owned(), Json::from(self.id()));
        if let Some(dis) = self.dis() {
            obj.insert("dis".to_owned(), Json::from(dis));
        }
        Json::Object(obj)
    }

    fn from_json(json: &Json) -> Result<Self, JsonError> {
        let obj = object(json, Kind::Ref)?;
        let id = req_str(obj, Kind::Ref, "val")?;
        let r = match opt_str(obj, Kind::Ref, "dis")? {
            Some(dis) => Ref::with_dis(id, dis)?,
            None => Ref::new(id)?,
        };
        Ok(r)
    }
}

impl JsonCodec for Coord {
    fn to_json(&self) -> Json {
        let mut obj = tagged(Kind::Coord);
        obj.insert("lat".to_owned(), num_json(self.lat()));
        obj.insert("lng".to_owned(), num_json(self.lng()));
        Json::Object(obj)
    }

    fn from_json(json: &Json) -> Result<Self, JsonError> {
        let obj = object(json, Kind::Coord)?;
        let lat = req_f64(obj, Kind::Coord, "lat")?;
        let lng = req_f64(obj, Kind::Coord, "lng")?;
        Ok(Coord::new(lat, lng)?)
    }
}

impl JsonCodec for XStr {
    fn to_json(&self) -> Json {
        let mut obj = tagged(Kind::XStr);
        obj.insert("type".to_owned(), Json::from(self.type_name()));
        obj.insert("val".to_owned(), Json::from(self.val()));
        Json::Object(obj)
    }

    fn from_json(json: &Json) -> Result<Self, JsonError> {
        let obj = object(json, Kind::XStr)?;
        let type_name = req_str(obj, Kind::XStr, "type")?;
        let val = req_str(obj, Kind::XStr, "val")?;
        Ok(XStr::new(type_name, val)?)
    }
}

impl JsonCodec for DateTime {
    fn to_json(&self) -> Json {
        let mut obj = tagged(Kind::DateTime);
        obj.insert("val".to_owned(), Json::from(self.iso()));
        obj.insert("tz".to_owned(), Json::from(self.tz()));
        Json::Object(obj)
    }

    /// A missing `tz` defaults to `UTC`.
    fn from_json(json: &Json) -> Result<Self, JsonError> {
        let obj = object(json, Kind::DateTime)?;
        let val = req_str(obj, Kind::DateTime, "val")?;
        let val = chrono::DateTime::parse_from_rfc3339(val)
            .map_err(|_| invalid(Kind::DateTime, "val"))?;
        let tz = opt_str(obj, Kind::DateTime, "tz")?.unwrap_or(UTC_TZ);
        if !is_tz_name(tz) {
            return Err(invalid(Kind::DateTime, "tz"));
        }
        Ok(DateTime::new(val, tz))
    }
}

impl JsonCodec for Dict {
    fn to_json(&self) -> Json {
        let obj = self
            .iter()
            .map(|(name, val)| (name.clone(), val.to_json()))
            .collect();
        Json::Object(obj)
    }

    /// Accepts a plain object, or one tagged `"_kind": "dict"`.
    fn from_json(json: &Json) -> Result<Self, JsonError> {
        let Json::Object(obj) = json else {
            return Err(unexpected(Kind::Dict, json));
        };
        match obj.get("_kind") {
            None => {}
            Some(Json::String(k)) if k == Kind::Dict.name() => {}
            Some(_) => return Err(unexpected(Kind::Dict, json)),
        }
        let mut dict = Dict::new();
        for (name, val) in obj.iter().filter(|(name, _)| name.as_str() != "_kind") {
            if !is_tag_name(name) {
                return Err(ValueError::InvalidTagName(name.clone()).into());
            }
            dict.insert(name.as_str(), Value::from_json(val)?);
        }
        Ok(dict)
    }
}

impl JsonCodec for Grid {
    fn to_json(&self) -> Json {
        let cols = self
            .cols()
            .iter()
            .map(|col| {
                let mut obj = Map::new();
                obj.insert("name".to_owned(), Json::from(col.name()));
                if !col.meta().is_empty() {
                    obj.insert("meta".to_owned(), col.meta().to_json());
                }
                Json::Object(obj)
            })
            .collect();
        let rows = self.rows().iter().map(Dict::to_json).collect();
        let mut obj = tagged(Kind::Grid);
        obj.insert("meta".to_owned(), self.meta().to_json());
        obj.insert("cols".to_owned(), Json::Array(cols));
        obj.insert("rows".to_owned(), Json::Array(rows));
        Json::Object(obj)
    }

    /// The `ver` meta tag is always normalized to `3.0`.
    fn from_json(json: &Json) -> Result<Self, JsonError> {
        let obj = object(json, Kind::Grid)?;
        let mut b = GridBuilder::new();
        if let Some(meta) = obj.get("meta") {
            b.add_meta(&Dict::from_json(meta)?)?;
        }

        let Some(Json::Array(cols)) = obj.get("cols") else {
            return Err(match obj.get("cols") {
                None => JsonError::MissingField {
                    kind: Kind::Grid.name(),
                    field: "cols",
                },
                Some(_) => invalid(Kind::Grid, "cols"),
            });
        };
        for col in cols {
            let Json::Object(col) = col else {
                return Err(invalid(Kind::Grid, "cols"));
            };
            let Some(Json::String(name)) = col.get("name") else {
                return Err(invalid(Kind::Grid, "cols"));
            };
            let meta = match col.get("meta") {
                Some(meta) => Dict::from_json(meta)?,
                None => Dict::new(),
            };
            b.add_col_with_meta(name, meta)?;
        }

        match obj.get("rows") {
            None => {}
            Some(Json::Array(rows)) => {
                for row in rows {
                    b.add_dict_row(&Dict::from_json(row)?)?;
                }
            }
            Some(_) => return Err(invalid(Kind::Grid, "rows")),
        }
        Ok(b.build()?)
    }
}

impl JsonCodec for Value {
    fn to_json(&self) -> Json {
        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Str(s) => Json::from(s.as_str()),
            Value::Number(n) => n.to_json(),
            Value::Marker | Value::Remove | Value::Na => Json::Object(tagged(self.kind())),
            Value::Uri(u) => tagged_val(Kind::Uri, u.as_str()),
            Value::Symbol(s) => tagged_val(Kind::Symbol, s.name()),
            Value::Date(d) => tagged_val(Kind::Date, format_date(d)),
            Value::Time(t) => tagged_val(Kind::Time, format_time(t)),
            Value::DateTime(dt) => dt.to_json(),
            Value::Ref(r) => r.to_json(),
            Value::Coord(c) => c.to_json(),
            Value::XStr(x) => x.to_json(),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Dict(d) => d.to_json(),
            Value::Grid(g) => g.to_json(),
        }
    }

    fn from_json(json: &Json) -> Result<Self, JsonError> {
        let obj = match json {
            Json::Null => return Ok(Value::Null),
            Json::Bool(b) => return Ok(Value::Bool(*b)),
            Json::String(s) => return Ok(Value::Str(s.clone())),
            Json::Number(_) => return Number::from_json(json).map(Value::Number),
            Json::Array(items) => {
                return items
                    .iter()
                    .map(Value::from_json)
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            Json::Object(obj) => obj,
        };
        let kind = match obj.get("_kind") {
            None => return Dict::from_json(json).map(Value::Dict),
            Some(Json::String(k)) => Kind::from_name(k).ok_or(JsonError::UnknownKind(k.clone()))?,
            Some(_) => return Err(invalid(Kind::Dict, "_kind")),
        };
        let val = match kind {
            Kind::Dict => Value::Dict(Dict::from_json(json)?),
            Kind::Marker => Value::Marker,
            Kind::Remove => Value::Remove,
            Kind::Na => Value::Na,
            Kind::Null => Value::Null,
            Kind::Number => Value::Number(Number::from_json(json)?),
            Kind::Ref => Value::Ref(Ref::from_json(json)?),
            Kind::Coord => Value::Coord(Coord::from_json(json)?),
            Kind::XStr => Value::XStr(XStr::from_json(json)?),
            Kind::DateTime => Value::DateTime(DateTime::from_json(json)?),
            Kind::Grid => Value::from(Grid::from_json(json)?),
            Kind::Uri => Value::Uri(req_str(obj, kind, "val")?.to_owned()),
            Kind::Symbol => Value::Symbol(Symbol::new(req_str(obj, kind, "val")?)?),
            Kind::Date => {
                let val = req_str(obj, kind, "val")?;
                let date = NaiveDate::parse_from_str(val, DATE_FORMAT)
                    .map_err(|_| invalid(kind, "val"))?;
                Value::Date(date)
            }
            Kind::Time => {
                let val = req_str(obj, kind, "val")?;
                let time = NaiveTime::parse_from_str(val, TIME_FORMAT)
                    .map_err(|_| invalid(kind, "val"))?;
                Value::Time(time)
            }
            // Encoded as raw JSON, never tagged.
            Kind::Bool | Kind::Str | Kind::List => {
                return Err(JsonError::UnexpectedKind {
                    expected: "tagged kind",
                    found: kind.name().to_owned(),
                })
            }
        };
        Ok(val)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::JsonCodec;
    use crate::grid::Grid;
    use crate::types::{Dict, Value};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    macro_rules! via_json {
        ($($ty:ty),*) => {$(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    self.to_json().serialize(serializer)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let json = serde_json::Value::deserialize(deserializer)?;
                    <$ty>::from_json(&json).map_err(D::Error::custom)
                }
            }
        )*};
    }

    via_json!(Value, Dict, Grid);
}

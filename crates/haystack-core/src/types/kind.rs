/// Discriminator for every Haystack value kind.
///
/// The names returned by [`Kind::name`] are the `_kind` strings of the JSON
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Number,
    Str,
    Date,
    Time,
    DateTime,
    Coord,
    Ref,
    Symbol,
    Uri,
    Marker,
    Remove,
    Na,
    Null,
    XStr,
    List,
    Dict,
    Grid,
}

impl Kind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Number => "number",
            Self::Str => "str",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "dateTime",
            Self::Coord => "coord",
            Self::Ref => "ref",
            Self::Symbol => "symbol",
            Self::Uri => "uri",
            Self::Marker => "marker",
            Self::Remove => "remove",
            Self::Na => "na",
            Self::Null => "null",
            Self::XStr => "xstr",
            Self::List => "list",
            Self::Dict => "dict",
            Self::Grid => "grid",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "bool" => Self::Bool,
            "number" => Self::Number,
            "str" => Self::Str,
            "date" => Self::Date,
            "time" => Self::Time,
            "dateTime" => Self::DateTime,
            "coord" => Self::Coord,
            "ref" => Self::Ref,
            "symbol" => Self::Symbol,
            "uri" => Self::Uri,
            "marker" => Self::Marker,
            "remove" => Self::Remove,
            "na" => Self::Na,
            "null" => Self::Null,
            "xstr" => Self::XStr,
            "list" => Self::List,
            "dict" => Self::Dict,
            "grid" => Self::Grid,
            _ => return None,
        };
        Some(kind)
    }
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

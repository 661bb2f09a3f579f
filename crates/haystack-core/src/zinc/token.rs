use crate::types::{DateTime, Number, Ref, Symbol, Value};
use chrono::{NaiveDate, NaiveTime};
use core::fmt;

/// A lexical token of Zinc or filter text.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Id(String),
    Num(Number),
    Str(String),
    Ref(String),
    Uri(String),
    Symbol(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(DateTime),
    Comma,
    Colon,
    Semicolon,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Lt,
    Lt2,
    LtEq,
    Gt,
    Gt2,
    GtEq,
    Assign,
    Eq,
    NotEq,
    Arrow,
    Question,
    Nl,
    Eof,
}

impl Token {
    /// `true` for tokens that carry a scalar literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Self::Num(_)
                | Self::Str(_)
                | Self::Ref(_)
                | Self::Uri(_)
                | Self::Symbol(_)
                | Self::Date(_)
                | Self::Time(_)
                | Self::DateTime(_)
        )
    }

    /// The literal carried by this token, if any. Ref and symbol payloads
    /// were validated by the tokenizer.
    pub fn literal(&self) -> Option<Value> {
        let val = match self {
            Self::Num(n) => Value::Number(n.clone()),
            Self::Str(s) => Value::Str(s.clone()),
            Self::Ref(id) => Value::Ref(Ref::new(id.as_str()).ok()?),
            Self::Uri(u) => Value::Uri(u.clone()),
            Self::Symbol(s) => Value::Symbol(Symbol::new(s.as_str()).ok()?),
            Self::Date(d) => Value::Date(*d),
            Self::Time(t) => Value::Time(*t),
            Self::DateTime(dt) => Value::DateTime(dt.clone()),
            _ => return None,
        };
        Some(val)
    }

    pub fn is_id(&self, name: &str) -> bool {
        matches!(self, Self::Id(id) if id == name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "identifier {id:?}"),
            Self::Num(n) => write!(f, "number {n}"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Ref(id) => write!(f, "ref @{id}"),
            Self::Uri(u) => write!(f, "uri `{u}`"),
            Self::Symbol(s) => write!(f, "symbol ^{s}"),
            Self::Date(d) => write!(f, "date {d}"),
            Self::Time(t) => write!(f, "time {t}"),
            Self::DateTime(dt) => write!(f, "date time {dt}"),
            Self::Comma => f.write_str("','"),
            Self::Colon => f.write_str("':'"),
            Self::Semicolon => f.write_str("';'"),
            Self::LBracket => f.write_str("'['"),
            Self::RBracket => f.write_str("']'"),
            Self::LBrace => f.write_str("'{'"),
            Self::RBrace => f.write_str("'}'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::Lt => f.write_str("'<'"),
            Self::Lt2 => f.write_str("'<<'"),
            Self::LtEq => f.write_str("'<='"),
            Self::Gt => f.write_str("'>'"),
            Self::Gt2 => f.write_str("'>>'"),
            Self::GtEq => f.write_str("'>='"),
            Self::Assign => f.write_str("'='"),
            Self::Eq => f.write_str("'=='"),
            Self::NotEq => f.write_str("'!='"),
            Self::Arrow => f.write_str("'->'"),
            Self::Question => f.write_str("'?'"),
            Self::Nl => f.write_str("newline"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

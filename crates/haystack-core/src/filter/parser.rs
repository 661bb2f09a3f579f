use crate::error::FilterError;
use crate::filter::{CmpOp, Filter, Path};
use crate::types::{is_tag_name, Value};
use crate::zinc::reader::Lookahead;
use crate::zinc::token::Token;

/// Deepest nesting of `and`, `or` and parentheses the parser accepts. Each
/// chained `and` or `or` counts as one level.
pub const MAX_DEPTH: usize = 256;

/// Recursive-descent parser over the shared Zinc tokenizer. Newlines are
/// insignificant in filter text.
struct Parser {
    la: Lookahead,
    depth: usize,
}

pub(crate) fn parse(text: &str) -> Result<Filter, FilterError> {
    let mut p = Parser::new(text)?;
    let filter = p.or()?;
    p.expect_end("end of filter")?;
    Ok(filter)
}

pub(crate) fn parse_path(text: &str) -> Result<Path, FilterError> {
    let mut p = Parser::new(text)?;
    let path = p.path()?;
    p.expect_end("end of path")?;
    Ok(path)
}

/// A single literal as it appears on the right of a comparison.
pub(crate) fn parse_literal(text: &str) -> Result<Value, FilterError> {
    let mut p = Parser::new(text)?;
    let val = p.literal()?;
    p.expect_end("end of literal")?;
    Ok(val)
}

impl Parser {
    fn new(text: &str) -> Result<Self, FilterError> {
        Ok(Self {
            la: Lookahead::new(text, true)?,
            depth: 0,
        })
    }

    fn expect_end(&self, expected: &'static str) -> Result<(), FilterError> {
        if self.la.cur != Token::Eof {
            return Err(self.unexpected(expected));
        }
        Ok(())
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<Filter, FilterError>,
    ) -> Result<Filter, FilterError> {
        if self.depth >= MAX_DEPTH {
            return Err(FilterError::TooDeep {
                max: MAX_DEPTH,
                line: self.la.cur_line,
            });
        }
        self.depth += 1;
        let res = parse(self);
        self.depth -= 1;
        res
    }

    fn consume(&mut self) -> Result<(), FilterError> {
        Ok(self.la.advance()?)
    }

    fn unexpected(&self, expected: &'static str) -> FilterError {
        FilterError::UnexpectedToken {
            expected,
            found: self.la.cur.to_string(),
            line: self.la.cur_line,
        }
    }

    fn or(&mut self) -> Result<Filter, FilterError> {
        let lhs = self.and()?;
        if !self.la.cur.is_id("or") {
            return Ok(lhs);
        }
        self.consume()?;
        let rhs = self.nested(Self::or)?;
        Ok(Filter::or(lhs, rhs))
    }

    fn and(&mut self) -> Result<Filter, FilterError> {
        let lhs = self.term()?;
        if !self.la.cur.is_id("and") {
            return Ok(lhs);
        }
        self.consume()?;
        let rhs = self.nested(Self::and)?;
        Ok(Filter::and(lhs, rhs))
    }

    fn term(&mut self) -> Result<Filter, FilterError> {
        if self.la.cur == Token::LParen {
            self.consume()?;
            let filter = self.nested(Self::or)?;
            if self.la.cur != Token::RParen {
                return Err(self.unexpected("')'"));
            }
            self.consume()?;
            return Ok(filter);
        }

        if self.la.cur.is_id("not") && matches!(self.la.peek, Token::Id(_)) {
            self.consume()?;
            return Ok(Filter::Missing(self.path()?));
        }

        let path = self.path()?;
        let op = match self.la.cur {
            Token::Eq => CmpOp::Eq,
            Token::NotEq => CmpOp::Ne,
            Token::Lt => CmpOp::Lt,
            Token::LtEq => CmpOp::Le,
            Token::Gt => CmpOp::Gt,
            Token::GtEq => CmpOp::Ge,
            _ => return Ok(Filter::Has(path)),
        };
        self.consume()?;
        let val = self.literal()?;
        Ok(Filter::Cmp { path, op, val })
    }

    fn path(&mut self) -> Result<Path, FilterError> {
        let mut segments = vec![self.name()?];
        while self.la.cur == Token::Arrow {
            self.consume()?;
            segments.push(self.name()?);
        }
        Ok(Path(segments))
    }

    fn name(&mut self) -> Result<String, FilterError> {
        let Token::Id(name) = &self.la.cur else {
            return Err(self.unexpected("tag name"));
        };
        if !is_tag_name(name) {
            return Err(FilterError::InvalidPath {
                segment: name.clone(),
                line: self.la.cur_line,
            });
        }
        let name = name.clone();
        self.consume()?;
        Ok(name)
    }

    /// Tokenizer literals plus `true` and `false`.
    fn literal(&mut self) -> Result<Value, FilterError> {
        let val = if self.la.cur.is_id("true") {
            Value::Bool(true)
        } else if self.la.cur.is_id("false") {
            Value::Bool(false)
        } else {
            self.la
                .cur
                .literal()
                .ok_or_else(|| self.unexpected("literal"))?
        };
        self.consume()?;
        Ok(val)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_path, MAX_DEPTH};
    use crate::error::{FilterError, ZincError};
    use crate::filter::{CmpOp, Filter, Path};
    use crate::types::{Number, Ref, Value};
    use chrono::NaiveDate;

    #[test]
    fn precedence_and_associativity() {
        let f = parse("a or b and c or d").unwrap();
        assert_eq!(f.to_string(), "a or ((b and c) or d)");
        let f = parse("(a or b) and not c").unwrap();
        assert_eq!(f.to_string(), "(a or b) and not c");
    }

    #[test]
    fn comparisons_and_literals() {
        let f = parse("siteRef->area >= 1_000ft²").unwrap();
        assert_eq!(
            f,
            Filter::Cmp {
                path: Path(vec!["siteRef".into(), "area".into()]),
                op: CmpOp::Ge,
                val: Value::Number(Number::with_unit(1000.0, "ft²")),
            }
        );
        assert_eq!(
            parse("enabled == true").unwrap().to_string(),
            "enabled == true"
        );
        assert_eq!(
            parse("equipRef==@p:e-1").unwrap(),
            Filter::eq("equipRef", Ref::new("p:e-1").unwrap()).unwrap()
        );
        assert_eq!(
            parse("date < 2016-06-06").unwrap(),
            Filter::lt("date", NaiveDate::from_ymd_opt(2016, 6, 6).unwrap()).unwrap()
        );
    }

    #[test]
    fn not_needs_an_identifier() {
        assert_eq!(parse("not point").unwrap(), Filter::missing("point").unwrap());
        assert_eq!(parse("not").unwrap(), Filter::has("not").unwrap());
        assert_eq!(
            parse("not == \"x\"").unwrap(),
            Filter::eq("not", "x").unwrap()
        );
    }

    #[test]
    fn newlines_are_ignored() {
        assert_eq!(
            parse("site\nand\n  dis == \"x\"").unwrap(),
            parse("site and dis == \"x\"").unwrap()
        );
    }

    #[test]
    fn rejects_text_format_keywords() {
        assert!(matches!(
            parse("curStatus == T"),
            Err(FilterError::UnexpectedToken { expected: "literal", .. })
        ));
        assert!(matches!(
            parse("site and"),
            Err(FilterError::UnexpectedToken { expected: "tag name", .. })
        ));
        assert!(matches!(
            parse("(site"),
            Err(FilterError::UnexpectedToken { expected: "')'", .. })
        ));
        assert!(matches!(
            parse("site->Equip"),
            Err(FilterError::InvalidPath { ref segment, line: 1 }) if segment == "Equip"
        ));
        assert!(matches!(
            parse("dis == \"open"),
            Err(FilterError::Lex(ZincError::UnterminatedString { .. }))
        ));
        assert!(matches!(
            parse("a b"),
            Err(FilterError::UnexpectedToken { expected: "end of filter", .. })
        ));
    }

    #[test]
    fn nesting_is_bounded() {
        let chain = vec!["a"; MAX_DEPTH].join(" or ");
        assert!(parse(&chain).is_ok());
        for deep in [
            vec!["a"; 200_000].join(" and "),
            format!("{}a{}", "(".repeat(200_000), ")".repeat(200_000)),
        ] {
            assert!(matches!(
                parse(&deep),
                Err(FilterError::TooDeep { max: MAX_DEPTH, .. })
            ));
        }
    }

    #[test]
    fn parses_paths() {
        let path = parse_path("equipRef->siteRef->dis").unwrap();
        assert_eq!(path.segments(), ["equipRef", "siteRef", "dis"]);
        assert!(parse_path("a->").is_err());
    }
}

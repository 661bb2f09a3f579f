use crate::error::{GridError, ValueError, ZincError};
use crate::grid::{Grid, GridBuilder, VERSION};
use crate::types::{is_tag_name, Coord, Dict, Number, Ref, Value, XStr};
use crate::zinc::token::Token;
use crate::zinc::tokenizer::Tokenizer;
use log::trace;

/// Token stream with one token of lookahead, tracking the line each token
/// was scanned on.
#[derive(Debug)]
pub(crate) struct Lookahead {
    tokenizer: Tokenizer,
    skip_nl: bool,
    pub(crate) cur: Token,
    pub(crate) peek: Token,
    pub(crate) cur_line: usize,
    peek_line: usize,
}

impl Lookahead {
    /// When `skip_nl` is set newline tokens never reach the parser.
    pub(crate) fn new(input: &str, skip_nl: bool) -> Result<Self, ZincError> {
        let mut la = Self {
            tokenizer: Tokenizer::new(input),
            skip_nl,
            cur: Token::Eof,
            peek: Token::Eof,
            cur_line: 1,
            peek_line: 1,
        };
        la.advance()?;
        la.advance()?;
        Ok(la)
    }

    pub(crate) fn advance(&mut self) -> Result<(), ZincError> {
        let mut tok = self.tokenizer.next_token()?;
        while self.skip_nl && tok == Token::Nl {
            tok = self.tokenizer.next_token()?;
        }
        let line = match tok {
            Token::Nl => self.tokenizer.line().saturating_sub(1),
            _ => self.tokenizer.line(),
        };
        self.cur = std::mem::replace(&mut self.peek, tok);
        self.cur_line = std::mem::replace(&mut self.peek_line, line);
        Ok(())
    }

    pub(crate) fn unexpected(&self, expected: &'static str) -> ZincError {
        ZincError::UnexpectedToken {
            expected,
            found: self.cur.to_string(),
            line: self.cur_line,
        }
    }
}

/// Deepest nesting of lists, dicts and grids the reader accepts.
pub const MAX_DEPTH: usize = 100;

/// Recursive-descent reader for Zinc text.
#[derive(Debug)]
pub struct ZincReader {
    la: Lookahead,
    depth: usize,
}

impl ZincReader {
    pub fn new(input: &str) -> Result<Self, ZincError> {
        Ok(Self {
            la: Lookahead::new(input, false)?,
            depth: 0,
        })
    }

    /// Reads a single value, or a grid when the input starts with `ver:`.
    /// The whole input must be consumed.
    pub fn read_val(&mut self) -> Result<Value, ZincError> {
        self.skip_nl()?;
        let val = if self.la.cur.is_id("ver") && self.la.peek == Token::Colon {
            Value::from(self.parse_grid(false)?)
        } else {
            self.parse_val()?
        };
        self.expect_end()?;
        Ok(val)
    }

    pub fn read_grid(&mut self) -> Result<Grid, ZincError> {
        self.skip_nl()?;
        let grid = self.parse_grid(false)?;
        self.expect_end()?;
        Ok(grid)
    }

    /// Reads grids separated by blank lines until the end of input.
    pub fn read_grids(&mut self) -> Result<Vec<Grid>, ZincError> {
        let mut grids = Vec::new();
        loop {
            self.skip_nl()?;
            if self.la.cur == Token::Eof {
                return Ok(grids);
            }
            grids.push(self.parse_grid(false)?);
        }
    }

    fn consume(&mut self) -> Result<(), ZincError> {
        self.la.advance()
    }

    fn skip_nl(&mut self) -> Result<(), ZincError> {
        while self.la.cur == Token::Nl {
            self.consume()?;
        }
        Ok(())
    }

    fn expect(&mut self, tok: Token, expected: &'static str) -> Result<(), ZincError> {
        if self.la.cur != tok {
            return Err(self.la.unexpected(expected));
        }
        self.consume()
    }

    fn expect_end(&mut self) -> Result<(), ZincError> {
        self.skip_nl()?;
        if self.la.cur != Token::Eof {
            return Err(self.la.unexpected("end of input"));
        }
        Ok(())
    }

    /// Runs `parse` one nesting level down.
    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, ZincError>,
    ) -> Result<T, ZincError> {
        if self.depth >= MAX_DEPTH {
            return Err(ZincError::TooDeep {
                max: MAX_DEPTH,
                line: self.la.cur_line,
            });
        }
        self.depth += 1;
        let res = parse(self);
        self.depth -= 1;
        res
    }

    fn value_err(&self, source: ValueError) -> ZincError {
        ZincError::Value {
            source,
            line: self.la.cur_line,
        }
    }

    fn grid_err(&self, source: GridError) -> ZincError {
        ZincError::Grid {
            source,
            line: self.la.cur_line,
        }
    }

    fn parse_name(&mut self) -> Result<String, ZincError> {
        let Token::Id(name) = &self.la.cur else {
            return Err(self.la.unexpected("tag name"));
        };
        if !is_tag_name(name) {
            return Err(ZincError::InvalidName {
                name: name.clone(),
                line: self.la.cur_line,
            });
        }
        let name = name.clone();
        self.consume()?;
        Ok(name)
    }

    fn parse_number(&mut self) -> Result<f64, ZincError> {
        let Token::Num(Number { val, .. }) = self.la.cur else {
            return Err(self.la.unexpected("number"));
        };
        self.consume()?;
        Ok(val)
    }

    fn parse_val(&mut self) -> Result<Value, ZincError> {
        match &self.la.cur {
            Token::Ref(id) => {
                let id = id.clone();
                self.consume()?;
                let reference = match &self.la.cur {
                    Token::Str(dis) => {
                        let r = Ref::with_dis(id, dis.as_str());
                        self.consume()?;
                        r
                    }
                    _ => Ref::new(id),
                };
                reference
                    .map(Value::Ref)
                    .map_err(|e| self.value_err(e))
            }
            Token::Id(id) => {
                let id = id.clone();
                self.parse_id_val(id)
            }
            Token::LBracket => self.nested(Self::parse_list),
            Token::LBrace => self.nested(Self::parse_dict).map(Value::Dict),
            Token::Lt2 => self.nested(|r| {
                r.consume()?;
                r.skip_nl()?;
                let grid = r.parse_grid(true)?;
                r.skip_nl()?;
                r.expect(Token::Gt2, "'>>'")?;
                Ok(Value::from(grid))
            }),
            tok => match tok.literal() {
                Some(val) => {
                    self.consume()?;
                    Ok(val)
                }
                None => Err(self.la.unexpected("value")),
            },
        }
    }

    fn parse_id_val(&mut self, id: String) -> Result<Value, ZincError> {
        let line = self.la.cur_line;
        let found = self.la.cur.to_string();
        self.consume()?;
        if self.la.cur == Token::LParen {
            return if id == "C" {
                self.parse_coord()
            } else {
                self.parse_xstr(id)
            };
        }
        let val = match id.as_str() {
            "T" => Value::Bool(true),
            "F" => Value::Bool(false),
            "N" => Value::Null,
            "M" => Value::Marker,
            "R" => Value::Remove,
            "NA" => Value::Na,
            "NaN" => Value::Number(Number::NAN),
            "INF" => Value::Number(Number::INF),
            _ => {
                return Err(ZincError::UnexpectedToken {
                    expected: "value",
                    found,
                    line,
                })
            }
        };
        Ok(val)
    }

    fn parse_coord(&mut self) -> Result<Value, ZincError> {
        self.expect(Token::LParen, "'('")?;
        let lat = self.parse_number()?;
        self.expect(Token::Comma, "','")?;
        let lng = self.parse_number()?;
        let coord = Coord::new(lat, lng).map_err(|e| self.value_err(e))?;
        self.expect(Token::RParen, "')'")?;
        Ok(Value::Coord(coord))
    }

    fn parse_xstr(&mut self, type_name: String) -> Result<Value, ZincError> {
        self.expect(Token::LParen, "'('")?;
        let Token::Str(val) = &self.la.cur else {
            return Err(self.la.unexpected("string"));
        };
        let xstr = XStr::new(type_name, val.as_str()).map_err(|e| self.value_err(e))?;
        self.consume()?;
        self.expect(Token::RParen, "')'")?;
        Ok(Value::XStr(xstr))
    }

    fn parse_list(&mut self) -> Result<Value, ZincError> {
        self.consume()?;
        let mut items = Vec::new();
        loop {
            self.skip_nl()?;
            if self.la.cur == Token::RBracket {
                self.consume()?;
                return Ok(Value::List(items));
            }
            items.push(self.parse_val()?);
            self.skip_nl()?;
            match self.la.cur {
                Token::Comma => self.consume()?,
                Token::RBracket => {}
                _ => return Err(self.la.unexpected("',' or ']'")),
            }
        }
    }

    fn parse_dict(&mut self) -> Result<Dict, ZincError> {
        self.consume()?;
        let mut dict = Dict::new();
        loop {
            self.skip_nl()?;
            match self.la.cur {
                Token::RBrace => {
                    self.consume()?;
                    return Ok(dict);
                }
                Token::Comma => {
                    self.consume()?;
                    continue;
                }
                _ => {}
            }
            let name = self.parse_name()?;
            let val = if self.la.cur == Token::Colon {
                self.consume()?;
                self.parse_val()?
            } else {
                Value::Marker
            };
            dict.insert(name, val);
        }
    }

    /// Tags up to the end of a grid header or column spec.
    fn parse_meta(&mut self) -> Result<Dict, ZincError> {
        let mut meta = Dict::new();
        while let Token::Id(_) = self.la.cur {
            let name = self.parse_name()?;
            let val = if self.la.cur == Token::Colon {
                self.consume()?;
                self.parse_val()?
            } else {
                Value::Marker
            };
            meta.insert(name, val);
        }
        Ok(meta)
    }

    fn parse_grid(&mut self, nested: bool) -> Result<Grid, ZincError> {
        let line = self.la.cur_line;
        if !self.la.cur.is_id("ver") {
            return Err(self.la.unexpected("'ver'"));
        }
        self.consume()?;
        self.expect(Token::Colon, "':'")?;
        let Token::Str(version) = &self.la.cur else {
            return Err(self.la.unexpected("version string"));
        };
        if version != VERSION {
            return Err(ZincError::UnsupportedVersion {
                version: version.clone(),
                line,
            });
        }
        self.consume()?;

        let mut b = GridBuilder::new();
        let meta = self.parse_meta()?;
        b.add_meta(&meta).map_err(|e| self.grid_err(e))?;
        self.expect(Token::Nl, "newline")?;

        if !matches!(self.la.cur, Token::Id(_)) {
            return Err(ZincError::NoColumns {
                line: self.la.cur_line,
            });
        }
        loop {
            let name = self.parse_name()?;
            let col_meta = self.parse_meta()?;
            b.add_col_with_meta(&name, col_meta)
                .map_err(|e| self.grid_err(e))?;
            if self.la.cur != Token::Comma {
                break;
            }
            self.consume()?;
        }
        trace!(
            "zinc grid header on line {line}: {} meta tags, {} columns",
            meta.len(),
            b.num_cols()
        );
        match self.la.cur {
            Token::Nl => self.consume()?,
            Token::Eof => return b.build().map_err(|e| self.grid_err(e)),
            Token::Gt2 if nested => return b.build().map_err(|e| self.grid_err(e)),
            _ => return Err(self.la.unexpected("newline")),
        }

        loop {
            match self.la.cur {
                Token::Nl | Token::Eof => break,
                Token::Gt2 if nested => break,
                _ => {}
            }
            let cells = self.parse_row(b.num_cols())?;
            b.add_row(cells).map_err(|e| self.grid_err(e))?;
            match self.la.cur {
                Token::Nl => self.consume()?,
                Token::Eof => break,
                Token::Gt2 if nested => break,
                _ => return Err(self.la.unexpected("newline")),
            }
        }
        b.build().map_err(|e| self.grid_err(e))
    }

    /// One row of cells. Empty cells are null; a short row is padded with
    /// nulls.
    fn parse_row(&mut self, width: usize) -> Result<Vec<Value>, ZincError> {
        let mut cells = Vec::with_capacity(width);
        loop {
            let cell = match self.la.cur {
                Token::Comma | Token::Nl | Token::Eof | Token::Gt2 => Value::Null,
                _ => self.parse_val()?,
            };
            cells.push(cell);
            if self.la.cur != Token::Comma {
                break;
            }
            self.consume()?;
        }
        if cells.len() < width {
            cells.resize(width, Value::Null);
        }
        Ok(cells)
    }
}

/// Reads a single Zinc value (or a top-level grid).
pub fn read_value(input: &str) -> Result<Value, ZincError> {
    ZincReader::new(input)?.read_val()
}

/// Reads exactly one Zinc grid.
pub fn read_grid(input: &str) -> Result<Grid, ZincError> {
    ZincReader::new(input)?.read_grid()
}

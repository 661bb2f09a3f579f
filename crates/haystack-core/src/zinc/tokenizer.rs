use crate::error::ZincError;
use crate::types::date_time::{DATE_FORMAT, TIME_FORMAT, UTC_TZ};
use crate::types::name::{is_ref_char, is_tag_char, is_unit_char};
use crate::types::{DateTime, Number};
use crate::zinc::token::Token;
use chrono::{NaiveDate, NaiveTime};

/// URI characters whose backslash escape is kept verbatim.
const URI_RESERVED: &[char] = &[':', '/', '?', '#', '[', ']', '@', '&', '=', ';'];

/// Single-pass lexer shared by the Zinc reader and the filter parser.
///
/// Newlines are significant and come out as [`Token::Nl`]; `\r\n` counts as
/// one newline. Whitespace and comments are skipped.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    src: Vec<char>,
    pos: usize,
    line: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    /// Current line, 1-based.
    pub const fn line(&self) -> usize {
        self.line
    }

    fn cur(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(1)
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.src.get(self.pos + n).copied()
    }

    fn starts_with(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    fn consume(&mut self) {
        match self.cur() {
            None => return,
            Some('\n') => self.line += 1,
            Some('\r') if self.peek() != Some('\n') => self.line += 1,
            Some(_) => {}
        }
        self.pos += 1;
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut s = String::new();
        while let Some(c) = self.cur().filter(|c| pred(*c)) {
            s.push(c);
            self.consume();
        }
        s
    }

    /// Scans the next token, returning [`Token::Eof`] at end of input.
    pub fn next_token(&mut self) -> Result<Token, ZincError> {
        self.skip_trivia()?;
        let Some(c) = self.cur() else {
            return Ok(Token::Eof);
        };
        match c {
            '\n' => {
                self.consume();
                Ok(Token::Nl)
            }
            '\r' => {
                self.consume();
                if self.cur() == Some('\n') {
                    self.consume();
                }
                Ok(Token::Nl)
            }
            c if c.is_ascii_alphabetic() => Ok(Token::Id(self.take_while(is_tag_char))),
            c if c.is_ascii_digit() => self.num(),
            '-' if self.peek().is_some_and(|p| p.is_ascii_digit()) => self.num(),
            '-' if self.starts_with("-INF") && !self.peek_at(4).is_some_and(is_tag_char) => {
                for _ in 0..4 {
                    self.consume();
                }
                Ok(Token::Num(Number::NEG_INF))
            }
            '"' => self.str(),
            '`' => self.uri(),
            '@' => self.prefixed(c).map(Token::Ref),
            '^' => self.prefixed(c).map(Token::Symbol),
            _ => self.operator(c),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ZincError> {
        loop {
            match (self.cur(), self.peek()) {
                (Some(' ' | '\t' | '\u{a0}'), _) => self.consume(),
                (Some('/'), Some('/')) => {
                    while self.cur().is_some_and(|c| c != '\n' && c != '\r') {
                        self.consume();
                    }
                }
                (Some('/'), Some('*')) => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ZincError> {
        let line = self.line;
        self.consume();
        self.consume();
        let mut depth = 1usize;
        loop {
            match (self.cur(), self.peek()) {
                (None, _) => return Err(ZincError::UnterminatedComment { line }),
                (Some('*'), Some('/')) => {
                    self.consume();
                    self.consume();
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                (Some('/'), Some('*')) => {
                    self.consume();
                    self.consume();
                    depth += 1;
                }
                _ => self.consume(),
            }
        }
    }

    fn num(&mut self) -> Result<Token, ZincError> {
        if self.cur() == Some('0') && self.peek() == Some('x') {
            return self.hex();
        }

        let mut s = String::new();
        if self.cur() == Some('-') {
            s.push('-');
            self.consume();
        }

        let mut colons = 0usize;
        let mut dashes = 0usize;
        let mut unit_index: Option<usize> = None;
        let mut exp = false;
        while let Some(c) = self.cur() {
            if !c.is_ascii_digit() {
                let peek = self.peek();
                let peek_digit = peek.is_some_and(|p| p.is_ascii_digit());
                if exp && (c == '+' || c == '-') {
                    // exponent sign
                } else if c == '-' {
                    dashes += 1;
                } else if c == ':' && peek_digit {
                    colons += 1;
                } else if (exp || colons > 0) && c == '+' {
                    // offset sign
                } else if c == '.' {
                    if !peek_digit {
                        break;
                    }
                } else if (c == 'e' || c == 'E')
                    && unit_index.is_none()
                    && (peek_digit || peek == Some('-') || peek == Some('+'))
                {
                    exp = true;
                } else if c == '/' && matches!(peek, Some('/' | '*')) {
                    // trailing comment
                    break;
                } else if is_unit_char(c) {
                    unit_index.get_or_insert(s.len());
                } else if c == '_' {
                    if unit_index.is_none() && peek_digit {
                        // thousands separator
                        self.consume();
                        continue;
                    }
                    unit_index.get_or_insert(s.len());
                } else {
                    break;
                }
            }
            s.push(c);
            self.consume();
        }

        if dashes == 2 && colons == 0 {
            return self.date(s);
        }
        if dashes == 0 && colons > 0 {
            return self.time(s, colons == 1);
        }
        if dashes >= 2 {
            return self.date_time(s);
        }
        self.number(s, unit_index)
    }

    fn number(&self, s: String, unit_index: Option<usize>) -> Result<Token, ZincError> {
        let (digits, unit) = match unit_index {
            Some(i) => (&s[..i], Some(&s[i..])),
            None => (s.as_str(), None),
        };
        let Ok(val) = digits.parse::<f64>() else {
            return Err(ZincError::InvalidNumber {
                text: s,
                line: self.line,
            });
        };
        let num = match unit {
            Some(unit) => Number::with_unit(val, unit),
            None => Number::new(val),
        };
        Ok(Token::Num(num))
    }

    fn hex(&mut self) -> Result<Token, ZincError> {
        self.consume();
        self.consume();
        let mut digits = String::new();
        while let Some(c) = self.cur() {
            if c.is_ascii_hexdigit() {
                digits.push(c);
            } else if c != '_' {
                break;
            }
            self.consume();
        }
        let invalid = || ZincError::InvalidHex {
            text: format!("0x{digits}"),
            line: self.line,
        };
        if self.cur().is_some_and(is_unit_char) {
            return Err(invalid());
        }
        let val = u64::from_str_radix(&digits, 16).map_err(|_| invalid())?;
        Ok(Token::Num(Number::new(val as f64)))
    }

    fn date(&self, s: String) -> Result<Token, ZincError> {
        match NaiveDate::parse_from_str(&s, DATE_FORMAT) {
            Ok(d) => Ok(Token::Date(d)),
            Err(_) => Err(ZincError::InvalidDate {
                text: s,
                line: self.line,
            }),
        }
    }

    fn time(&self, mut s: String, missing_seconds: bool) -> Result<Token, ZincError> {
        if s.as_bytes().get(1) == Some(&b':') {
            s.insert(0, '0');
        }
        if missing_seconds {
            s.push_str(":00");
        }
        match NaiveTime::parse_from_str(&s, TIME_FORMAT) {
            Ok(t) => Ok(Token::Time(t)),
            Err(_) => Err(ZincError::InvalidTime {
                text: s,
                line: self.line,
            }),
        }
    }

    fn date_time(&mut self, text: String) -> Result<Token, ZincError> {
        let line = self.line;
        let tz = if self.cur() == Some(' ') && self.peek().is_some_and(|c| c.is_ascii_uppercase())
        {
            self.consume();
            self.tz_name()
        } else if text.ends_with('Z') {
            UTC_TZ.to_owned()
        } else {
            return Err(ZincError::InvalidTimezone { text, line });
        };
        match chrono::DateTime::parse_from_rfc3339(&text) {
            Ok(val) => Ok(Token::DateTime(DateTime::new(val, tz))),
            Err(_) => Err(ZincError::InvalidDateTime { text, line }),
        }
    }

    /// Timezone name such as `New_York`, `Port-au-Prince` or `GMT-5`.
    fn tz_name(&mut self) -> String {
        let mut tz = String::new();
        while let Some(c) = self.cur() {
            let peek = self.peek();
            let accept = is_tag_char(c)
                || (c == '-' && peek.is_some_and(|p| p.is_ascii_alphabetic()))
                || ((c == '+' || c == '-')
                    && tz == "GMT"
                    && peek.is_some_and(|p| p.is_ascii_digit()));
            if !accept {
                break;
            }
            tz.push(c);
            self.consume();
        }
        tz
    }

    fn str(&mut self) -> Result<Token, ZincError> {
        let line = self.line;
        self.consume();
        let mut s = String::new();
        loop {
            match self.cur() {
                None => return Err(ZincError::UnterminatedString { line }),
                Some('"') => {
                    self.consume();
                    return Ok(Token::Str(s));
                }
                Some('\\') => s.push(self.escape()?),
                Some(c) => {
                    s.push(c);
                    self.consume();
                }
            }
        }
    }

    fn uri(&mut self) -> Result<Token, ZincError> {
        let line = self.line;
        self.consume();
        let mut s = String::new();
        loop {
            match self.cur() {
                None => return Err(ZincError::UnterminatedUri { line }),
                Some('`') => {
                    self.consume();
                    return Ok(Token::Uri(s));
                }
                Some('\\') => match self.peek() {
                    Some(p) if URI_RESERVED.contains(&p) => {
                        s.push('\\');
                        s.push(p);
                        self.consume();
                        self.consume();
                    }
                    _ => s.push(self.escape()?),
                },
                Some(c) => {
                    s.push(c);
                    self.consume();
                }
            }
        }
    }

    fn escape(&mut self) -> Result<char, ZincError> {
        let line = self.line;
        self.consume();
        let Some(c) = self.cur() else {
            return Err(ZincError::InvalidEscape { line });
        };
        self.consume();
        let ch = match c {
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '"' | '\\' | '$' | '\'' | '`' => c,
            'u' => return self.unicode_escape(line),
            _ => return Err(ZincError::InvalidEscape { line }),
        };
        Ok(ch)
    }

    fn unicode_escape(&mut self, line: usize) -> Result<char, ZincError> {
        let hi = self.hex4(line)?;
        let code = if (0xD800..0xDC00).contains(&hi) {
            if !self.starts_with("\\u") {
                return Err(ZincError::InvalidEscape { line });
            }
            self.consume();
            self.consume();
            let lo = self.hex4(line)?;
            if !(0xDC00..0xE000).contains(&lo) {
                return Err(ZincError::InvalidEscape { line });
            }
            0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00)
        } else {
            hi
        };
        char::from_u32(code).ok_or(ZincError::InvalidEscape { line })
    }

    fn hex4(&mut self, line: usize) -> Result<u32, ZincError> {
        let mut val = 0u32;
        for _ in 0..4 {
            let digit = self
                .cur()
                .and_then(|c| c.to_digit(16))
                .ok_or(ZincError::InvalidEscape { line })?;
            val = val * 16 + digit;
            self.consume();
        }
        Ok(val)
    }

    /// Ref (`@`) or symbol (`^`) name.
    fn prefixed(&mut self, prefix: char) -> Result<String, ZincError> {
        let line = self.line;
        self.consume();
        let name = self.take_while(is_ref_char);
        if name.is_empty() {
            return Err(ZincError::UnexpectedChar { ch: prefix, line });
        }
        Ok(name)
    }

    fn operator(&mut self, c: char) -> Result<Token, ZincError> {
        let line = self.line;
        self.consume();
        let next = self.cur();
        let (tok, two_chars) = match (c, next) {
            (',', _) => (Token::Comma, false),
            (':', _) => (Token::Colon, false),
            (';', _) => (Token::Semicolon, false),
            ('[', _) => (Token::LBracket, false),
            (']', _) => (Token::RBracket, false),
            ('{', _) => (Token::LBrace, false),
            ('}', _) => (Token::RBrace, false),
            ('(', _) => (Token::LParen, false),
            (')', _) => (Token::RParen, false),
            ('<', Some('<')) => (Token::Lt2, true),
            ('<', Some('=')) => (Token::LtEq, true),
            ('<', _) => (Token::Lt, false),
            ('>', Some('>')) => (Token::Gt2, true),
            ('>', Some('=')) => (Token::GtEq, true),
            ('>', _) => (Token::Gt, false),
            ('=', Some('=')) => (Token::Eq, true),
            ('=', _) => (Token::Assign, false),
            ('!', Some('=')) => (Token::NotEq, true),
            ('-', Some('>')) => (Token::Arrow, true),
            ('?', _) => (Token::Question, false),
            _ => return Err(ZincError::UnexpectedChar { ch: c, line }),
        };
        if two_chars {
            self.consume();
        }
        Ok(tok)
    }
}

/// Scans all of `input` into tokens, excluding the final [`Token::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, ZincError> {
    let mut t = Tokenizer::new(input);
    let mut out = Vec::new();
    loop {
        match t.next_token()? {
            Token::Eof => return Ok(out),
            tok => out.push(tok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::tokenize;
    use crate::error::ZincError;
    use crate::types::Number;
    use crate::zinc::token::Token;
    use chrono::{NaiveDate, NaiveTime};

    fn single(input: &str) -> Token {
        let mut toks = tokenize(input).unwrap();
        assert_eq!(toks.len(), 1, "expected one token for {input:?}: {toks:?}");
        toks.remove(0)
    }

    fn num(input: &str) -> Number {
        match single(input) {
            Token::Num(n) => n,
            other => panic!("expected number for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn date_literal() {
        assert_eq!(
            single("2016-06-06"),
            Token::Date(NaiveDate::from_ymd_opt(2016, 6, 6).unwrap())
        );
    }

    #[test]
    fn short_time_is_padded() {
        assert_eq!(
            single("8:30"),
            Token::Time(NaiveTime::from_hms_opt(8, 30, 0).unwrap())
        );
        assert_eq!(
            single("23:59:58.5"),
            Token::Time(NaiveTime::from_hms_milli_opt(23, 59, 58, 500).unwrap())
        );
    }

    #[test]
    fn date_time_with_zone_name() {
        match single("2016-01-13T09:51:33-05:00 New_York") {
            Token::DateTime(dt) => {
                assert_eq!(dt.tz(), "New_York");
                assert_eq!(dt.iso(), "2016-01-13T09:51:33-05:00");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn date_time_zulu_and_gmt_offsets() {
        match single("2016-01-13T14:51:33Z") {
            Token::DateTime(dt) => assert_eq!(dt.tz(), "UTC"),
            other => panic!("unexpected {other:?}"),
        }
        match single("2016-01-13T14:51:33Z UTC") {
            Token::DateTime(dt) => assert_eq!(dt.tz(), "UTC"),
            other => panic!("unexpected {other:?}"),
        }
        match single("2016-01-13T09:51:33-05:00 GMT+5") {
            Token::DateTime(dt) => assert_eq!(dt.tz(), "GMT+5"),
            other => panic!("unexpected {other:?}"),
        }
        match single("2020-03-01T10:00:00-05:00 Port-au-Prince") {
            Token::DateTime(dt) => assert_eq!(dt.tz(), "Port-au-Prince"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn date_time_needs_zone() {
        assert!(matches!(
            tokenize("2016-01-13T09:51:33-05:00"),
            Err(ZincError::InvalidTimezone { .. })
        ));
    }

    #[test]
    fn numbers_with_units() {
        assert_eq!(num("-40ms"), Number::with_unit(-40.0, "ms"));
        assert_eq!(num("72.5°F"), Number::with_unit(72.5, "°F"));
        assert_eq!(num("100%"), Number::with_unit(100.0, "%"));
        assert_eq!(num("3kW_h"), Number::with_unit(3.0, "kW_h"));
        assert_eq!(num("12$"), Number::with_unit(12.0, "$"));
        assert_eq!(num("5m/s"), Number::with_unit(5.0, "m/s"));
    }

    #[test]
    fn numbers_with_separators_and_exponents() {
        assert_eq!(num("1_000_000"), Number::new(1_000_000.0));
        assert_eq!(num("1.5e3"), Number::new(1500.0));
        assert_eq!(num("2E-2"), Number::new(0.02));
        assert_eq!(num("1.5em"), Number::with_unit(1.5, "em"));
        assert_eq!(num("-INF"), Number::NEG_INF);
    }

    #[test]
    fn hex_literals() {
        assert_eq!(num("0xff"), Number::new(255.0));
        assert_eq!(num("0xCAFE_BABE"), Number::new(3_405_691_582.0));
        for bad in ["0xffkW", "0x", "0x ", "0xg", "[0x]"] {
            assert!(
                matches!(tokenize(bad), Err(ZincError::InvalidHex { .. })),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn units_stop_at_comments() {
        assert_eq!(
            tokenize("1kW//c").unwrap(),
            vec![Token::Num(Number::with_unit(1.0, "kW"))]
        );
        assert_eq!(
            tokenize("5m/s/* speed */").unwrap(),
            vec![Token::Num(Number::with_unit(5.0, "m/s"))]
        );
        assert_eq!(
            tokenize("1// one\n2").unwrap(),
            vec![
                Token::Num(Number::new(1.0)),
                Token::Nl,
                Token::Num(Number::new(2.0)),
            ]
        );
    }

    #[test]
    fn string_escapes() {
        assert_eq!(
            single(r#""a\nb\t\"q\" \\ \$ é 😀""#),
            Token::Str("a\nb\t\"q\" \\ $ é 😀".into())
        );
        assert!(matches!(
            tokenize(r#""bad \q""#),
            Err(ZincError::InvalidEscape { .. })
        ));
        assert!(matches!(
            tokenize(r#""lone \udc00""#),
            Err(ZincError::InvalidEscape { .. })
        ));
    }

    #[test]
    fn uri_keeps_reserved_escapes() {
        assert_eq!(
            single(r"`http://host/a\#b\`c\\d`"),
            Token::Uri(r"http://host/a\#b`c\d".into())
        );
    }

    #[test]
    fn unterminated_literals() {
        assert!(matches!(
            tokenize("\"abc"),
            Err(ZincError::UnterminatedString { line: 1 })
        ));
        assert!(matches!(
            tokenize("`abc"),
            Err(ZincError::UnterminatedUri { line: 1 })
        ));
        assert!(matches!(
            tokenize("a\n/* open /* nested */"),
            Err(ZincError::UnterminatedComment { line: 2 })
        ));
    }

    #[test]
    fn comments_and_newlines() {
        let toks = tokenize("a // tail\r\nb /* x /* y */ z */ c\rd\n").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Id("a".into()),
                Token::Nl,
                Token::Id("b".into()),
                Token::Id("c".into()),
                Token::Nl,
                Token::Id("d".into()),
                Token::Nl,
            ]
        );
    }

    #[test]
    fn operators_refs_and_symbols() {
        let toks = tokenize("siteRef->dis != @p:a-1 <= ^elec-meter << >> >= ==").unwrap();
        assert_eq!(
            toks,
            vec![
                Token::Id("siteRef".into()),
                Token::Arrow,
                Token::Id("dis".into()),
                Token::NotEq,
                Token::Ref("p:a-1".into()),
                Token::LtEq,
                Token::Symbol("elec-meter".into()),
                Token::Lt2,
                Token::Gt2,
                Token::GtEq,
                Token::Eq,
            ]
        );
    }

    #[test]
    fn reports_lines() {
        let err = tokenize("a\nb\n#").unwrap_err();
        assert_eq!(err, ZincError::UnexpectedChar { ch: '#', line: 3 });
        assert_eq!(err.line(), 3);
    }
}

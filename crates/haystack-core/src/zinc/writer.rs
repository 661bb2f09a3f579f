use crate::grid::{Grid, VERSION};
use crate::types::date_time::{format_date, format_time};
use crate::types::{Dict, Value};
use core::fmt::Write as _;

/// URI characters written after a literal backslash without doubling it.
const URI_RESERVED: &[char] = &[':', '/', '?', '#', '[', ']', '@', '&', '=', ';'];

/// Encoder producing canonical Zinc text.
#[derive(Debug, Default)]
pub struct ZincWriter {
    out: String,
}

impl ZincWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    pub fn write_val(&mut self, val: &Value) {
        match val {
            Value::Null => self.out.push('N'),
            Value::Marker => self.out.push('M'),
            Value::Remove => self.out.push('R'),
            Value::Na => self.out.push_str("NA"),
            Value::Bool(true) => self.out.push('T'),
            Value::Bool(false) => self.out.push('F'),
            Value::Number(n) => {
                let _ = n.write_zinc(&mut self.out);
            }
            Value::Str(s) => self.write_str(s),
            Value::Uri(u) => self.write_uri(u),
            Value::Ref(r) => {
                self.out.push('@');
                self.out.push_str(r.id());
                if let Some(dis) = r.dis() {
                    self.out.push(' ');
                    self.write_str(dis);
                }
            }
            Value::Symbol(s) => {
                self.out.push('^');
                self.out.push_str(s.name());
            }
            Value::Date(d) => self.out.push_str(&format_date(d)),
            Value::Time(t) => self.out.push_str(&format_time(t)),
            Value::DateTime(dt) => {
                let _ = write!(self.out, "{dt}");
            }
            Value::Coord(c) => {
                let _ = write!(self.out, "{c}");
            }
            Value::XStr(x) => {
                self.out.push_str(x.type_name());
                self.out.push('(');
                self.write_str(x.val());
                self.out.push(')');
            }
            Value::List(items) => {
                self.out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_val(item);
                }
                self.out.push(']');
            }
            Value::Dict(d) => {
                self.out.push('{');
                self.write_tags(d, false);
                self.out.push('}');
            }
            Value::Grid(g) => {
                self.out.push_str("<<\n");
                self.write_grid(g);
                self.out.push_str(">>");
            }
        }
    }

    /// Writes `ver:"3.0"` with the grid meta, the column line and one line
    /// per row, each terminated by a newline.
    pub fn write_grid(&mut self, grid: &Grid) {
        self.out.push_str("ver:");
        self.write_str(VERSION);
        let meta: Dict = grid
            .meta()
            .iter()
            .filter(|(name, _)| name.as_str() != "ver")
            .map(|(name, val)| (name.clone(), val.clone()))
            .collect();
        self.write_tags(&meta, true);
        self.out.push('\n');

        for (i, col) in grid.cols().iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.out.push_str(col.name());
            self.write_tags(col.meta(), true);
        }
        self.out.push('\n');

        let single = grid.cols().len() == 1;
        for row in grid.rows() {
            for (i, col) in grid.cols().iter().enumerate() {
                if i > 0 {
                    self.out.push(',');
                }
                match row.get(col.name()) {
                    Some(val) if !val.is_null() => self.write_val(val),
                    _ if single => self.out.push('N'),
                    _ => {}
                }
            }
            self.out.push('\n');
        }
    }

    /// Space separated `name` / `name:val` pairs, markers bare.
    fn write_tags(&mut self, tags: &Dict, leading_space: bool) {
        for (i, (name, val)) in tags.iter().enumerate() {
            if leading_space || i > 0 {
                self.out.push(' ');
            }
            self.out.push_str(name);
            if !matches!(val, Value::Marker) {
                self.out.push(':');
                self.write_val(val);
            }
        }
    }

    fn write_str(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                c => self.write_char(c),
            }
        }
        self.out.push('"');
    }

    fn write_uri(&mut self, s: &str) {
        self.out.push('`');
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '`' => self.out.push_str("\\`"),
                '\\' if chars.peek().is_some_and(|p| URI_RESERVED.contains(p)) => {
                    self.out.push('\\');
                }
                '\\' => self.out.push_str("\\\\"),
                c => self.write_char(c),
            }
        }
        self.out.push('`');
    }

    fn write_char(&mut self, c: char) {
        match c {
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            ' '..='~' => self.out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(self.out, "\\u{unit:04x}");
                }
            }
        }
    }
}

/// Canonical Zinc text of a grid.
pub fn write_grid(grid: &Grid) -> String {
    let mut w = ZincWriter::new();
    w.write_grid(grid);
    w.finish()
}

/// Grids separated by a blank line, readable with
/// [`ZincReader::read_grids`](crate::zinc::ZincReader::read_grids).
pub fn write_grids<'a>(grids: impl IntoIterator<Item = &'a Grid>) -> String {
    let mut w = ZincWriter::new();
    for (i, grid) in grids.into_iter().enumerate() {
        if i > 0 {
            w.out.push('\n');
        }
        w.write_grid(grid);
    }
    w.finish()
}

pub mod coord;
pub mod date_time;
pub mod dict;
pub mod kind;
pub mod name;
pub mod number;
pub mod reference;
pub mod value;
pub mod xstr;

pub use coord::Coord;
pub use date_time::DateTime;
pub use dict::Dict;
pub use kind::Kind;
pub use name::{is_ref_char, is_tag_name, is_tz_name, is_unit};
pub use number::Number;
pub use reference::{Ref, Symbol};
pub use value::Value;
pub use xstr::XStr;

//! Project Haystack data model and codecs.
//!
//! `haystack-core` holds the value model, the Zinc and JSON encodings, and the
//! filter engine. It performs no I/O; records reach it as [`Dict`]s and
//! [`Grid`]s supplied by the caller.
//!
//! ```
//! use haystack_core::{zinc, Filter};
//!
//! let grid = zinc::read_grid(
//!     "ver:\"3.0\"\nid,dis,site,area\n@hq,\"HQ\",M,12000ft²\n@lab,\"Lab\",M,900ft²\n",
//! )
//! .unwrap();
//! let filter = Filter::parse("site and dis == \"Lab\"").unwrap();
//! let hits = filter.select(grid.rows(), &haystack_core::NoPather, None);
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].dis(), Some("Lab"));
//! ```
//!
//! # Feature flags
//!
//! - **`serde`**: `Serialize`/`Deserialize` for [`Value`], [`Dict`] and
//!   [`Grid`] through the JSON encoding.

/// Error types for value construction, grids, Zinc, JSON and filters.
pub mod error;
/// Filter parsing, paths, and evaluation against dicts.
pub mod filter;
/// Grids and the staged grid builder.
pub mod grid;
/// The `_kind`-tagged JSON encoding.
pub mod json;
/// The value sum type, its scalar kinds, and dicts.
pub mod types;
/// Zinc text format tokenizer, reader and writer.
pub mod zinc;

pub use error::{FilterError, GridError, JsonError, ValueError, ZincError};
pub use filter::{CmpOp, Filter, NoPather, Path, Pather};
pub use grid::{Col, Grid, GridBuilder};
pub use json::JsonCodec;
pub use types::{
    is_tag_name, is_tz_name, is_unit, Coord, DateTime, Dict, Kind, Number, Ref, Symbol, Value,
    XStr,
};

//! Zinc, the Haystack text format: tokenizer, reader and writer.
//!
//! ```
//! use haystack_core::zinc;
//!
//! let grid = zinc::read_grid("ver:\"3.0\"\nid,curVal\n@p1,72.5°F\n").unwrap();
//! assert_eq!(grid.len(), 1);
//! assert_eq!(zinc::write_grid(&grid), "ver:\"3.0\"\nid,curVal\n@p1,72.5°F\n");
//! ```

pub mod reader;
pub mod token;
pub mod tokenizer;
pub mod writer;

pub use reader::{read_grid, read_value, ZincReader};
pub use token::Token;
pub use tokenizer::{tokenize, Tokenizer};
pub use writer::{write_grid, write_grids, ZincWriter};

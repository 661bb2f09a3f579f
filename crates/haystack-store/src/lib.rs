//! Persistence seams for a Haystack server.
//!
//! [`RecordStore`], [`HisStore`] and [`WatchStore`] are what an API layer
//! calls into. [`MemoryStore`] implements all three over in-process maps.
//!
//! ```
//! use haystack_core::{zinc, Filter};
//! use haystack_store::{MemoryStore, RecordStore};
//!
//! let grid = zinc::read_grid("ver:\"3.0\"\nid,site\n@a,M\n@b,\n").unwrap();
//! let store = MemoryStore::from_grid(&grid).unwrap();
//! let sites = store.read(&Filter::has("site").unwrap(), None).unwrap();
//! assert_eq!(sites.len(), 1);
//! ```

pub mod error;
pub mod his;
pub mod memory;
pub mod record;
pub mod watch;

pub use error::StoreError;
pub use his::{HisItem, HisRange, HisStore};
pub use memory::MemoryStore;
pub use record::{Diff, DiffOp, RecordStore};
pub use watch::WatchStore;

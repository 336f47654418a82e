//! Catalog query engine.
//!
//! Turns an in-memory listing collection plus a [`FilterConfig`] into an
//! ordered, filtered [`CatalogView`]. The engine is pure and synchronous:
//! no I/O, no shared state, no errors. The same inputs always give the same
//! output, so callers may run it from any thread.
//!
//! ```text
//! &[Listing] ──► FilterConfig::matches ──► SortKey::compare (stable) ──► CatalogView
//! ```

mod filter;
mod query;
mod sort;

pub use filter::{parse_points_bound, Facet, FilterConfig, ALL};
pub use query::{browse, filter_sort, CatalogView};
pub use sort::SortKey;

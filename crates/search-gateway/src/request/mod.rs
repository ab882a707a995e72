//! Request assembly for the search gateway.
//!
//! Everything here is pure: it turns caller parameters into the JSON bodies
//! the engine expects, without touching the network.

pub mod bulk;
pub mod index;
pub mod search;

pub use bulk::{DEFAULT_ID_FIELD, DocWrite, RefreshPolicy};
pub use index::AliasAction;
pub use search::{PointInTime, PointInTimeOptions, SearchRequest};

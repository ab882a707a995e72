//! The search gateway.
//!
//! [`SearchGateway`] wraps one Elasticsearch client and exposes index,
//! alias, mapping, settings and document operations plus search, scroll,
//! point in time and ping. Methods are split across submodules by concern:
//!
//! - `backend` - construction, transport and retry plumbing
//! - `indices` - index lifecycle, aliases, mappings and settings
//! - `documents` - single and bulk writes, deletes
//! - `search_impl` - search, scroll, point in time and ping

mod backend;
mod documents;
mod indices;
mod search_impl;

pub use backend::SearchGateway;

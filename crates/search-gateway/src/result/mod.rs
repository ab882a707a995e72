//! Search result shaping.
//!
//! Converts a raw search response into a pagination envelope:
//!
//! - `page` / `page_size` echoed from the caller
//! - hits flattened into their `_source` documents, with `type`, `score` and
//!   one `<field>_highlight` string per requested highlight field
//! - legacy term facets reshaped to `{id, label, count}` lists
//! - aggregations and suggestions passed through
//!
//! Engine errors are data: a response carrying `error` becomes an envelope
//! with only `page`, `page_size` and `error`.

mod envelope;
mod highlight;
mod raw;
mod shaper;

pub use envelope::{FacetEntry, FacetSet, ResultPage, ResultParams, SearchEnvelope, SearchOutcome};
pub use highlight::{
    HIGHLIGHT_SEPARATOR, HIGHLIGHT_SUFFIX, HighlightFields, MAX_HIGHLIGHTS, format_highlight,
};
pub use raw::{RawFacet, RawFacetTerm, RawHit, RawHits, RawSearchResponse, RawTotal, TotalRelation};
pub use shaper::{build_page, build_result, hits_to_results, transform_facets};

//! The subset of an engine search response the shaper reads.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A successful search response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSearchResponse {
    /// Time the engine spent on the search, echoed as reported.
    pub took: Number,
    /// Hit metadata and the hits themselves.
    pub hits: RawHits,
    /// Legacy term facets.
    #[serde(default)]
    pub facets: Option<Value>,
    /// Aggregation results, kept opaque.
    #[serde(default)]
    pub aggregations: Option<Value>,
    /// Suggester results, kept opaque.
    #[serde(default)]
    pub suggest: Option<Value>,
    /// Scroll context id when the search opened one.
    #[serde(default, rename = "_scroll_id")]
    pub scroll_id: Option<String>,
}

/// The `hits` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHits {
    /// Total hit count.
    pub total: RawTotal,
    /// The page of hits, in rank order.
    pub hits: Vec<RawHit>,
}

/// `hits.total`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawTotal {
    /// Number of matching documents (exact or lower bound).
    pub value: u64,
    /// How to read `value`.
    pub relation: TotalRelation,
}

/// Whether a total hit count is exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalRelation {
    /// The count is exact.
    Eq,
    /// The count is a lower bound.
    Gte,
}

impl fmt::Display for TotalRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TotalRelation::Eq => write!(f, "eq"),
            TotalRelation::Gte => write!(f, "gte"),
        }
    }
}

/// One hit.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    /// The stored document. Absent when source filtering disabled it.
    #[serde(default, rename = "_source")]
    pub source: Map<String, Value>,
    /// Mapping type tag (only sent by old engines).
    #[serde(default, rename = "_type")]
    pub doc_type: Option<String>,
    /// Relevance score; null when sorting by something else.
    #[serde(default, rename = "_score")]
    pub score: Option<Value>,
    /// Highlighted snippets per field.
    #[serde(default)]
    pub highlight: Option<HashMap<String, Vec<String>>>,
}

/// A legacy `terms` facet.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFacet {
    /// Term buckets in engine order.
    pub terms: Vec<RawFacetTerm>,
}

/// One term bucket of a facet.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFacetTerm {
    /// The term value.
    pub term: Value,
    /// Documents carrying the term.
    pub count: Value,
}

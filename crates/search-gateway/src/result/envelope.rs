//! The normalized result envelope.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};

use super::raw::TotalRelation;

/// Caller-side parameters of a shaping call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultParams {
    /// Zero-based page number, echoed as `page`.
    pub page: u32,
    /// Page size, echoed as `page_size`.
    pub page_size: u32,
    /// Comma separated field names to flatten highlights for.
    pub highlight_fields: String,
    /// The free-text query the search was issued with. Not used in output.
    pub query: String,
}

impl Default for ResultParams {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: 10,
            highlight_fields: String::new(),
            query: String::new(),
        }
    }
}

impl ResultParams {
    /// Creates parameters for the given page.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            ..Default::default()
        }
    }

    /// Sets the highlight field list.
    pub fn with_highlight_fields(mut self, fields: impl Into<String>) -> Self {
        self.highlight_fields = fields.into();
        self
    }

    /// Sets the free-text query.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

/// The shaped search result.
///
/// Serializes to `{page, page_size, error}` for failed searches and to
/// `{page, page_size, timetaken, total_results, total_result_relation,
/// results, facets?, aggregations?, suggestions?}` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchEnvelope {
    /// Echoed page number.
    pub page: u32,
    /// Echoed page size.
    pub page_size: u32,
    /// Error or result page.
    #[serde(flatten)]
    pub outcome: SearchOutcome,
}

/// What a search produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    /// The engine reported an error.
    Failed {
        /// The engine's error payload.
        error: Value,
    },
    /// The search succeeded.
    Page(ResultPage),
}

/// A successful page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    /// Engine time, echoed from `took`.
    pub timetaken: Number,
    /// Total matching documents.
    pub total_results: u64,
    /// Whether `total_results` is exact.
    pub total_result_relation: TotalRelation,
    /// Flattened documents in hit order.
    pub results: Vec<Map<String, Value>>,
    /// Reshaped facets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets: Option<FacetSet>,
    /// Aggregations as returned by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Value>,
    /// Suggestions as returned by the engine.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Value>,
}

impl SearchEnvelope {
    /// Returns the error payload of a failed search.
    pub fn error(&self) -> Option<&Value> {
        match &self.outcome {
            SearchOutcome::Failed { error } => Some(error),
            SearchOutcome::Page(_) => None,
        }
    }

    /// Returns the result page of a successful search.
    pub fn page_result(&self) -> Option<&ResultPage> {
        match &self.outcome {
            SearchOutcome::Page(page) => Some(page),
            SearchOutcome::Failed { .. } => None,
        }
    }

    /// Returns true when the engine reported an error.
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Failed { .. })
    }

    /// Converts the envelope into a JSON value.
    pub fn to_value(&self) -> Value {
        // Every field is plain JSON data, so serialization is infallible.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// One reshaped facet bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacetEntry {
    /// The term value.
    pub id: Value,
    /// Display label; the term value again.
    pub label: Value,
    /// Bucket size.
    pub count: Value,
}

/// Facets keyed by name, in the order the engine returned them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FacetSet(Vec<(String, Vec<FacetEntry>)>);

impl FacetSet {
    /// Appends a facet.
    pub fn push(&mut self, name: impl Into<String>, entries: Vec<FacetEntry>) {
        self.0.push((name.into(), entries));
    }

    /// Iterates over facets in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FacetEntry])> {
        self.0.iter().map(|(n, e)| (n.as_str(), e.as_slice()))
    }
}

impl Serialize for FacetSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entries) in &self.0 {
            map.serialize_entry(name, entries)?;
        }
        map.end()
    }
}

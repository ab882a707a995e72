//! Search request assembly.
//!
//! Translates a [`SearchRequest`] into the Query DSL body the engine expects.
//! Optional parts are only emitted when they carry something: an empty query
//! object, an empty aggregation map or an empty `search_after` cursor are all
//! left out of the body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::json::is_empty_value;

/// Default page size.
pub const DEFAULT_SIZE: u32 = 10;

/// A point-in-time handle attached to a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointInTime {
    /// The id returned by `open_point_in_time`.
    pub id: String,
    /// How long to extend the snapshot by (e.g. `"1m"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

impl PointInTime {
    /// Creates a handle without a keep-alive extension.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            keep_alive: None,
        }
    }

    /// Sets the keep-alive extension.
    pub fn with_keep_alive(mut self, keep_alive: impl Into<String>) -> Self {
        self.keep_alive = Some(keep_alive.into());
        self
    }

    /// Returns the `pit` body object.
    pub fn to_value(&self) -> Value {
        let mut pit = json!({ "id": self.id });
        if let Some(ref keep_alive) = self.keep_alive {
            pit["keep_alive"] = json!(keep_alive);
        }
        pit
    }
}

/// Extra parameters of an open-point-in-time call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointInTimeOptions {
    /// Shard routing value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    /// Node or shard preference (e.g. `"_local"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<String>,
    /// Whether missing or closed indices are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_unavailable: Option<bool>,
}

impl PointInTimeOptions {
    /// Sets the routing value.
    pub fn with_routing(mut self, routing: impl Into<String>) -> Self {
        self.routing = Some(routing.into());
        self
    }

    /// Sets the preference.
    pub fn with_preference(mut self, preference: impl Into<String>) -> Self {
        self.preference = Some(preference.into());
        self
    }

    /// Sets whether unavailable indices are ignored.
    pub fn with_ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    /// Returns the routing value, if non-empty.
    pub fn routing(&self) -> Option<&str> {
        self.routing.as_deref().filter(|r| !r.is_empty())
    }

    /// Returns the preference, if non-empty.
    pub fn preference(&self) -> Option<&str> {
        self.preference.as_deref().filter(|p| !p.is_empty())
    }
}

/// A search against one index (or index pattern).
///
/// ```
/// use search_gateway::request::SearchRequest;
/// use serde_json::json;
///
/// let request = SearchRequest::new("orders")
///     .with_source(["id", "order_number"])
///     .with_query(json!({ "term": { "marketplace_id": 1 } }))
///     .with_from(10)
///     .with_size(5);
///
/// let body = request.body();
/// assert_eq!(body["from"], 10);
/// assert_eq!(body["sort"], json!(["_score"]));
/// assert_eq!(body["track_total_hits"], true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    index: String,
    source: Vec<String>,
    query: Option<Value>,
    from: u32,
    size: u32,
    sort: Vec<Value>,
    aggs: Option<Value>,
    scroll: Option<String>,
    search_after: Vec<Value>,
    pit: Option<PointInTime>,
}

impl SearchRequest {
    /// Creates a request with relevance sort and the default page size.
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            source: Vec::new(),
            query: None,
            from: 0,
            size: DEFAULT_SIZE,
            sort: vec![json!("_score")],
            aggs: None,
            scroll: None,
            search_after: Vec::new(),
            pit: None,
        }
    }

    /// Restricts the returned `_source` to the given fields.
    pub fn with_source<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the query clause (the value of the body's `query` key).
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets the offset of the first hit.
    pub fn with_from(mut self, from: u32) -> Self {
        self.from = from;
        self
    }

    /// Sets the number of hits to return.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Replaces the sort list. Entries are field names or sort objects.
    pub fn with_sort<I>(mut self, sort: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.sort = sort.into_iter().collect();
        self
    }

    /// Sets the aggregation map.
    pub fn with_aggs(mut self, aggs: Value) -> Self {
        self.aggs = Some(aggs);
        self
    }

    /// Opens a scroll context kept alive for the given duration (e.g. `"1m"`).
    pub fn with_scroll(mut self, keep_alive: impl Into<String>) -> Self {
        self.scroll = Some(keep_alive.into());
        self
    }

    /// Continues after the given sort values of the previous page's last hit.
    pub fn with_search_after<I>(mut self, cursor: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.search_after = cursor.into_iter().collect();
        self
    }

    /// Runs the search against a point-in-time snapshot.
    pub fn with_pit(mut self, pit: PointInTime) -> Self {
        self.pit = Some(pit);
        self
    }

    /// Returns the index name.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Returns the offset.
    pub fn from(&self) -> u32 {
        self.from
    }

    /// Returns the page size.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the scroll keep-alive, if any.
    pub fn scroll(&self) -> Option<&str> {
        self.scroll.as_deref().filter(|s| !s.is_empty())
    }

    /// Returns the point-in-time handle, if any.
    pub fn pit(&self) -> Option<&PointInTime> {
        self.pit.as_ref().filter(|p| !p.id.is_empty())
    }

    /// Builds the query body.
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert("size".to_string(), json!(self.size));
        body.insert("sort".to_string(), json!(self.sort));
        body.insert("track_total_hits".to_string(), json!(true));

        if self.from != 0 {
            body.insert("from".to_string(), json!(self.from));
        }

        if let Some(query) = self.query.as_ref().filter(|q| !is_empty_value(q)) {
            body.insert("query".to_string(), query.clone());
        }

        if let Some(aggs) = self.aggs.as_ref().filter(|a| !is_empty_value(a)) {
            body.insert("aggs".to_string(), aggs.clone());
        }

        if !self.source.is_empty() {
            body.insert("_source".to_string(), json!(self.source));
        }

        if !self.search_after.is_empty() {
            body.insert("search_after".to_string(), json!(self.search_after));
        }

        Value::Object(body)
    }

    /// Returns the index the request is sent to.
    ///
    /// Point-in-time searches carry the snapshot in the body and must not
    /// name an index in the path.
    pub fn target_index(&self) -> Option<&str> {
        match self.pit() {
            Some(_) => None,
            None => Some(&self.index),
        }
    }

    /// Builds the body as sent on the wire: [`body`](Self::body) plus `pit`.
    pub fn request_body(&self) -> Value {
        let mut body = self.body();
        if let Some(pit) = self.pit() {
            body["pit"] = pit.to_value();
        }
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_body() {
        let body = SearchRequest::new("orders").body();
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();

        assert_eq!(keys, vec!["size", "sort", "track_total_hits"]);
        assert_eq!(body["size"], 10);
        assert_eq!(body["sort"], json!(["_score"]));
        assert_eq!(body["track_total_hits"], true);
    }

    #[test]
    fn test_from_only_when_non_zero() {
        let body = SearchRequest::new("orders").with_from(0).body();
        assert!(body.get("from").is_none());

        let body = SearchRequest::new("orders").with_from(20).body();
        assert_eq!(body["from"], 20);
    }

    #[test]
    fn test_empty_optional_parts_are_omitted() {
        let body = SearchRequest::new("orders")
            .with_query(json!({}))
            .with_aggs(json!({}))
            .with_source(Vec::<String>::new())
            .with_search_after(vec![])
            .body();

        for key in ["query", "aggs", "_source", "search_after"] {
            assert!(body.get(key).is_none(), "{} should be omitted", key);
        }
    }

    #[test]
    fn test_all_standard_parts() {
        let query = json!({ "bool": { "filter": [{ "terms": { "marketplace_id": [1] } }] } });
        let aggs = json!({ "test_aggs": { "terms": { "field": "marketplace_id" } } });

        let body = SearchRequest::new("orders")
            .with_source(["order_number"])
            .with_query(query.clone())
            .with_from(10)
            .with_size(5)
            .with_sort([json!("id")])
            .with_aggs(aggs.clone())
            .with_search_after([json!(10000001)])
            .body();

        assert_eq!(body["query"], query);
        assert_eq!(body["aggs"], aggs);
        assert_eq!(body["_source"], json!(["order_number"]));
        assert_eq!(body["from"], 10);
        assert_eq!(body["size"], 5);
        assert_eq!(body["sort"], json!(["id"]));
        assert_eq!(body["search_after"], json!([10000001]));
    }

    #[test]
    fn test_scroll_and_pit_stay_out_of_query_body() {
        let request = SearchRequest::new("orders")
            .with_scroll("1m")
            .with_pit(PointInTime::new("pit-id").with_keep_alive("5m"));

        let body = request.body();
        assert!(body.get("scroll").is_none());
        assert!(body.get("pit").is_none());

        assert_eq!(request.scroll(), Some("1m"));
        assert_eq!(request.pit().map(|p| p.id.as_str()), Some("pit-id"));
    }

    #[test]
    fn test_pit_wire_form() {
        let request =
            SearchRequest::new("orders").with_pit(PointInTime::new("abc").with_keep_alive("1m"));
        assert_eq!(request.target_index(), None);

        let wire = request.request_body();
        assert_eq!(wire["pit"], json!({ "id": "abc", "keep_alive": "1m" }));
        assert_eq!(wire["track_total_hits"], true);

        let plain = SearchRequest::new("orders");
        assert_eq!(plain.target_index(), Some("orders"));
        assert!(plain.request_body().get("pit").is_none());
    }

    #[test]
    fn test_empty_scroll_and_pit_are_ignored() {
        let request = SearchRequest::new("orders")
            .with_scroll("")
            .with_pit(PointInTime::new(""));
        assert_eq!(request.scroll(), None);
        assert!(request.pit().is_none());
        assert_eq!(request.target_index(), Some("orders"));
    }

    #[test]
    fn test_point_in_time_options() {
        let options = PointInTimeOptions::default()
            .with_routing("tenant-7")
            .with_preference("")
            .with_ignore_unavailable(true);

        assert_eq!(options.routing(), Some("tenant-7"));
        assert_eq!(options.preference(), None);
        assert_eq!(options.ignore_unavailable, Some(true));
        assert_eq!(PointInTimeOptions::default().routing(), None);
    }
}

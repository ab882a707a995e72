//! Turns a raw search response into a [`SearchEnvelope`].

use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{ShapeError, ShapeResult};
use crate::json::{is_empty_value, non_empty};

use super::envelope::{FacetEntry, FacetSet, ResultPage, ResultParams, SearchEnvelope, SearchOutcome};
use super::highlight::{HighlightFields, format_highlight};
use super::raw::{RawFacet, RawHit, RawSearchResponse};

/// Shapes a raw search response.
///
/// A non-empty `error` in the response short-circuits everything else and
/// yields an envelope carrying only `page`, `page_size` and `error`. Without
/// an error the response must follow the engine's success schema.
///
/// ```
/// use search_gateway::result::{ResultParams, build_result};
/// use serde_json::json;
///
/// let raw = json!({
///     "took": 5,
///     "hits": {
///         "total": { "value": 1, "relation": "eq" },
///         "hits": [{ "_source": { "id": 1 }, "_score": 2.0 }]
///     }
/// });
///
/// let envelope = build_result(&raw, &ResultParams::default()).unwrap();
/// assert_eq!(
///     envelope.to_value(),
///     json!({
///         "page": 0,
///         "page_size": 10,
///         "timetaken": 5,
///         "total_results": 1,
///         "total_result_relation": "eq",
///         "results": [{ "id": 1, "type": "", "score": 2.0, "_highlight": "" }]
///     })
/// );
/// ```
pub fn build_result(raw: &Value, params: &ResultParams) -> ShapeResult<SearchEnvelope> {
    if let Some(error) = non_empty(raw.get("error")) {
        return Ok(SearchEnvelope {
            page: params.page,
            page_size: params.page_size,
            outcome: SearchOutcome::Failed {
                error: error.clone(),
            },
        });
    }

    let response = RawSearchResponse::deserialize(raw)?;
    build_page(response, params)
}

/// Shapes an already decoded success response.
pub fn build_page(response: RawSearchResponse, params: &ResultParams) -> ShapeResult<SearchEnvelope> {
    let highlights = HighlightFields::parse(&params.highlight_fields);

    let facets = match response.facets {
        Some(ref facets) if !is_empty_value(facets) => Some(transform_facets(facets)?),
        _ => None,
    };

    let page = ResultPage {
        timetaken: response.took,
        total_results: response.hits.total.value,
        total_result_relation: response.hits.total.relation,
        results: hits_to_results(response.hits.hits, &highlights),
        facets,
        aggregations: response.aggregations.filter(|a| !is_empty_value(a)),
        suggestions: response.suggest.filter(|s| !is_empty_value(s)),
    };

    Ok(SearchEnvelope {
        page: params.page,
        page_size: params.page_size,
        outcome: SearchOutcome::Page(page),
    })
}

/// Flattens hits into result documents, preserving order.
pub fn hits_to_results(hits: Vec<RawHit>, highlights: &HighlightFields) -> Vec<Map<String, Value>> {
    hits.into_iter()
        .map(|hit| {
            let mut doc = hit.source;
            doc.insert("type".to_string(), json!(hit.doc_type.unwrap_or_default()));
            doc.insert("score".to_string(), score_or_zero(hit.score));

            for field in highlights.iter() {
                doc.insert(
                    HighlightFields::key(field),
                    json!(format_highlight(hit.highlight.as_ref(), field)),
                );
            }
            doc
        })
        .collect()
}

/// Absent, null and zero scores all become `0`.
///
/// A non-empty string score other than `"0"` is kept as sent. Any other
/// non-numeric value becomes `0`.
fn score_or_zero(score: Option<Value>) -> Value {
    match score {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|s| s != 0.0) => Value::Number(n),
        Some(Value::String(s)) if !s.is_empty() && s != "0" => Value::String(s),
        _ => json!(0),
    }
}

/// Reshapes legacy term facets into `{id, label, count}` lists.
pub fn transform_facets(facets: &Value) -> ShapeResult<FacetSet> {
    let facets = facets
        .as_object()
        .ok_or_else(|| ShapeError::MalformedResponse {
            message: "facets must be an object".to_string(),
        })?;

    let mut transformed = FacetSet::default();
    for (name, facet) in facets {
        let facet = RawFacet::deserialize(facet).map_err(|e| ShapeError::MalformedResponse {
            message: format!("facet '{}': {}", name, e),
        })?;

        let entries = facet
            .terms
            .into_iter()
            .map(|term| FacetEntry {
                id: term.term.clone(),
                label: term.term,
                count: term.count,
            })
            .collect();
        transformed.push(name.clone(), entries);
    }
    Ok(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_hits(hits: Value) -> Value {
        json!({
            "took": 3,
            "hits": {
                "total": { "value": 42, "relation": "gte" },
                "hits": hits
            }
        })
    }

    #[test]
    fn test_error_short_circuits() {
        let raw = json!({
            "error": { "type": "index_not_found_exception" },
            "took": 1,
            "hits": { "total": { "value": 3, "relation": "eq" }, "hits": [] }
        });
        let envelope = build_result(&raw, &ResultParams::new(2, 25)).unwrap();

        assert!(envelope.is_error());
        assert_eq!(
            envelope.to_value(),
            json!({
                "page": 2,
                "page_size": 25,
                "error": { "type": "index_not_found_exception" }
            })
        );
    }

    #[test]
    fn test_empty_error_is_ignored() {
        for error in [json!(null), json!(""), json!({})] {
            let mut raw = raw_with_hits(json!([]));
            raw["error"] = error;
            let envelope = build_result(&raw, &ResultParams::default()).unwrap();
            assert!(!envelope.is_error());
        }
    }

    #[test]
    fn test_score_rules() {
        let raw = raw_with_hits(json!([
            { "_source": { "id": 1 }, "_score": 1.5 },
            { "_source": { "id": 2 }, "_score": 0.0 },
            { "_source": { "id": 3 }, "_score": null },
            { "_source": { "id": 4 } }
        ]));
        let envelope = build_result(&raw, &ResultParams::default()).unwrap();
        let results = &envelope.page_result().unwrap().results;

        assert_eq!(results[0]["score"], json!(1.5));
        assert_eq!(results[1]["score"], json!(0));
        assert_eq!(results[2]["score"], json!(0));
        assert_eq!(results[3]["score"], json!(0));
    }

    #[test]
    fn test_string_scores() {
        let raw = raw_with_hits(json!([
            { "_source": { "id": 1 }, "_score": "1.5" },
            { "_source": { "id": 2 }, "_score": "0" },
            { "_source": { "id": 3 }, "_score": "" },
            { "_source": { "id": 4 }, "_score": [] }
        ]));
        let envelope = build_result(&raw, &ResultParams::default()).unwrap();
        let results = &envelope.page_result().unwrap().results;

        assert_eq!(results[0]["score"], "1.5");
        assert_eq!(results[1]["score"], json!(0));
        assert_eq!(results[2]["score"], json!(0));
        assert_eq!(results[3]["score"], json!(0));
    }

    #[test]
    fn test_type_and_order() {
        let raw = raw_with_hits(json!([
            { "_source": { "id": "b" }, "_type": "_doc" },
            { "_source": { "id": "a" } }
        ]));
        let envelope = build_result(&raw, &ResultParams::default()).unwrap();
        let results = &envelope.page_result().unwrap().results;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["id"], "b");
        assert_eq!(results[0]["type"], "_doc");
        assert_eq!(results[1]["id"], "a");
        assert_eq!(results[1]["type"], "");
    }

    #[test]
    fn test_injected_keys_follow_source_keys() {
        let raw = raw_with_hits(json!([{ "_source": { "id": 1, "name": "x" } }]));
        let params = ResultParams::default().with_highlight_fields("name");
        let envelope = build_result(&raw, &params).unwrap();
        let keys: Vec<&str> = envelope.page_result().unwrap().results[0]
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["id", "name", "type", "score", "name_highlight"]);
    }

    #[test]
    fn test_highlights_per_requested_field() {
        let raw = raw_with_hits(json!([{
            "_source": { "id": 1 },
            "_score": 3.2,
            "highlight": { "title": ["<em>red</em> a", "<em>red</em> b"] }
        }]));
        let params = ResultParams::default().with_highlight_fields("title,body");
        let envelope = build_result(&raw, &params).unwrap();
        let doc = &envelope.page_result().unwrap().results[0];

        assert_eq!(doc["title_highlight"], "<em>red</em> a \u{2026} <em>red</em> b");
        assert_eq!(doc["body_highlight"], "");
        assert!(doc.get("_highlight").is_none());
    }

    #[test]
    fn test_facets_keep_engine_order() {
        let mut raw = raw_with_hits(json!([]));
        raw["facets"] = json!({
            "size": { "terms": [{ "term": "xl", "count": 1 }] },
            "color": { "terms": [
                { "term": "red", "count": 5 },
                { "term": "blue", "count": 2 }
            ] }
        });
        let envelope = build_result(&raw, &ResultParams::default()).unwrap();
        let facets = envelope.page_result().unwrap().facets.as_ref().unwrap();

        let names: Vec<&str> = facets.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["size", "color"]);
        assert_eq!(
            serde_json::to_value(facets).unwrap()["color"],
            json!([
                { "id": "red", "label": "red", "count": 5 },
                { "id": "blue", "label": "blue", "count": 2 }
            ])
        );
    }

    #[test]
    fn test_optional_sections() {
        let mut raw = raw_with_hits(json!([]));
        raw["facets"] = json!({});
        raw["aggregations"] = json!({ "by_marketplace": { "buckets": [] } });
        raw["suggest"] = json!({});

        let value = build_result(&raw, &ResultParams::default()).unwrap().to_value();
        assert!(value.get("facets").is_none());
        assert!(value.get("suggestions").is_none());
        assert!(value.get("suggest").is_none());
        assert_eq!(value["aggregations"]["by_marketplace"]["buckets"], json!([]));
        assert_eq!(value["total_result_relation"], "gte");
    }

    #[test]
    fn test_source_is_not_aliased() {
        let raw = raw_with_hits(json!([{ "_source": { "id": 1 } }]));
        let _ = build_result(&raw, &ResultParams::default()).unwrap();
        assert!(raw["hits"]["hits"][0]["_source"].get("score").is_none());
    }

    #[test]
    fn test_malformed_response_fails_fast() {
        let raw = json!({ "took": 1, "hits": { "hits": [] } });
        let err = build_result(&raw, &ResultParams::default()).unwrap_err();
        assert!(matches!(err, ShapeError::MalformedResponse { .. }));

        let err = build_result(&Value::Null, &ResultParams::default()).unwrap_err();
        assert!(matches!(err, ShapeError::MalformedResponse { .. }));
    }

    #[test]
    fn test_malformed_facet() {
        let err = transform_facets(&json!({ "color": { "buckets": [] } })).unwrap_err();
        assert!(err.to_string().contains("color"));
    }
}

//! Document request bodies: single add/update and bulk indexing.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{GatewayError, GatewayResult};
use crate::json::scalar_to_id;

/// Default field holding a record's id.
pub const DEFAULT_ID_FIELD: &str = "id";

/// Refresh behaviour requested with a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Refresh the affected shards before responding.
    True,
    /// Do not refresh.
    False,
    /// Wait until the change is visible to search.
    WaitFor,
}

impl From<RefreshPolicy> for elasticsearch::params::Refresh {
    fn from(policy: RefreshPolicy) -> Self {
        match policy {
            RefreshPolicy::True => elasticsearch::params::Refresh::True,
            RefreshPolicy::False => elasticsearch::params::Refresh::False,
            RefreshPolicy::WaitFor => elasticsearch::params::Refresh::WaitFor,
        }
    }
}

/// Extracts a record's id from `id_field`.
pub fn record_id(record: &Value, id_field: &str) -> GatewayResult<String> {
    record
        .get(id_field)
        .and_then(scalar_to_id)
        .ok_or_else(|| GatewayError::MissingDocumentId {
            field: id_field.to_string(),
        })
}

/// How a single-document write is sent.
#[derive(Debug, Clone, PartialEq)]
pub enum DocWrite {
    /// Full index (create or replace) under the record's own id.
    Index {
        /// Document id taken from the record.
        id: String,
        /// The record itself.
        body: Value,
    },
    /// Partial update of an existing document.
    Update {
        /// Caller-supplied document id.
        id: String,
        /// `{"doc": record}`.
        body: Value,
    },
}

/// Decides between full indexing and partial update.
///
/// Without an explicit id the record is indexed whole under the value of its
/// `id_field`. With one, the record becomes the `doc` of a partial update.
pub fn doc_write(record: Value, id: Option<&str>, id_field: &str) -> GatewayResult<DocWrite> {
    match id.filter(|id| !id.is_empty()) {
        None => Ok(DocWrite::Index {
            id: record_id(&record, id_field)?,
            body: record,
        }),
        Some(id) => Ok(DocWrite::Update {
            id: id.to_string(),
            body: json!({ "doc": record }),
        }),
    }
}

/// Builds the bulk body: one `index` action line followed by the document,
/// for each record in order.
pub fn bulk_index_body(index: &str, records: &[Value], id_field: &str) -> GatewayResult<Vec<Value>> {
    if records.is_empty() {
        return Err(GatewayError::NoDocuments {
            index: index.to_string(),
        });
    }

    let mut lines = Vec::with_capacity(records.len() * 2);
    for record in records {
        let id = record_id(record, id_field)?;
        lines.push(json!({ "index": { "_index": index, "_id": id } }));
        lines.push(record.clone());
    }
    Ok(lines)
}

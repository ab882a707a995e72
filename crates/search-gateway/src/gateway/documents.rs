//! Document lifecycle: single writes, bulk indexing and deletes.

use elasticsearch::http::request::JsonBody;
use elasticsearch::{BulkParts, DeleteByQueryParts, DeleteParts, IndexParts, UpdateParts};
use serde_json::Value;
use tracing::debug;

use crate::error::GatewayResult;
use crate::request::bulk::{DocWrite, RefreshPolicy, bulk_index_body, doc_write};

use super::backend::{SearchGateway, expect_success, success_json};

impl SearchGateway {
    /// Adds or updates one document.
    ///
    /// Without an explicit `id` the whole record is indexed under the value
    /// of its `id_field`, replacing any existing document. With an `id` the
    /// record is applied as a partial update of that document.
    pub async fn add_doc(
        &self,
        index: &str,
        record: Value,
        id: Option<&str>,
        id_field: &str,
    ) -> GatewayResult<()> {
        match doc_write(record, id, id_field)? {
            DocWrite::Index { id, body } => {
                let id = id.as_str();
                let response = self
                    .send("add_doc", || {
                        self.client()
                            .index(IndexParts::IndexId(index, id))
                            .body(body.clone())
                            .send()
                    })
                    .await?;
                expect_success("add_doc", response).await?;
                debug!(index, id, "Indexed document");
            }
            DocWrite::Update { id, body } => {
                let id = id.as_str();
                let response = self
                    .send("update_doc", || {
                        self.client()
                            .update(UpdateParts::IndexId(index, id))
                            .body(body.clone())
                            .send()
                    })
                    .await?;
                expect_success("update_doc", response).await?;
                debug!(index, id, "Updated document");
            }
        }
        Ok(())
    }

    /// Indexes many documents with one bulk request.
    ///
    /// Fails before sending anything when `records` is empty. The bulk
    /// response is returned as is; per-item failures are reported in its
    /// `items` and are left to the caller.
    pub async fn add_docs(
        &self,
        index: &str,
        records: &[Value],
        id_field: &str,
    ) -> GatewayResult<Value> {
        let lines = bulk_index_body(index, records, id_field)?;

        let response = self
            .send("add_docs", || {
                let body: Vec<JsonBody<Value>> = lines.iter().cloned().map(JsonBody::new).collect();
                self.client().bulk(BulkParts::None).body(body).send()
            })
            .await?;

        let body = success_json("add_docs", response).await?;
        let errors = body.get("errors").and_then(Value::as_bool).unwrap_or(false);
        debug!(
            index,
            documents = records.len(),
            errors,
            "Bulk indexed documents"
        );
        Ok(body)
    }

    /// Deletes one document.
    ///
    /// `refresh` is only sent when given.
    pub async fn delete_doc(
        &self,
        index: &str,
        id: &str,
        refresh: Option<RefreshPolicy>,
    ) -> GatewayResult<Value> {
        let response = self
            .send("delete_doc", || {
                let request = self.client().delete(DeleteParts::IndexId(index, id));
                let request = match refresh {
                    Some(policy) => request.refresh(policy.into()),
                    None => request,
                };
                request.send()
            })
            .await?;

        success_json("delete_doc", response).await
    }

    /// Deletes every document of an index matching a query body.
    pub async fn delete_by_query(&self, index: &str, body: Value) -> GatewayResult<Value> {
        let names = [index];

        let response = self
            .send("delete_by_query", || {
                self.client()
                    .delete_by_query(DeleteByQueryParts::Index(&names))
                    .body(body.clone())
                    .send()
            })
            .await?;

        success_json("delete_by_query", response).await
    }
}

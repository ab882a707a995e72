//! Query execution: search, scroll, point in time and ping.

use elasticsearch::http::response::Response;
use elasticsearch::{ClearScrollParts, OpenPointInTimeParts, ScrollParts, SearchParts};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::json::non_empty;
use crate::request::{PointInTimeOptions, SearchRequest};

use super::backend::{SearchGateway, json_body, success_json};

impl SearchGateway {
    /// Executes a search.
    ///
    /// When the engine rejects the search with an error body (unknown index,
    /// bad query), the body is returned as `Ok` so it can be shaped into an
    /// error envelope. Only transport failures and unreadable error
    /// responses are returned as `Err`.
    pub async fn search(&self, request: &SearchRequest) -> GatewayResult<Value> {
        let body = request.request_body();
        let scroll = request.scroll();
        let names = [request.index()];
        let parts = match request.target_index() {
            Some(_) => SearchParts::Index(&names),
            None => SearchParts::None,
        };

        debug!(
            index = request.index(),
            from = request.from(),
            size = request.size(),
            scroll = scroll.is_some(),
            pit = request.pit().is_some(),
            "Executing search"
        );

        let response = self
            .send("search", || {
                let search = self.client().search(parts.clone()).body(body.clone());
                let search = match scroll {
                    Some(keep_alive) => search.scroll(keep_alive),
                    None => search,
                };
                search.send()
            })
            .await?;

        search_response("search", response).await
    }

    /// Opens a point-in-time snapshot of an index.
    pub async fn open_point_in_time(&self, index: &str, keep_alive: &str) -> GatewayResult<Value> {
        self.open_point_in_time_with(index, keep_alive, &PointInTimeOptions::default())
            .await
    }

    /// Opens a point-in-time snapshot with routing, preference or
    /// availability options.
    pub async fn open_point_in_time_with(
        &self,
        index: &str,
        keep_alive: &str,
        options: &PointInTimeOptions,
    ) -> GatewayResult<Value> {
        let names = [index];

        let response = self
            .send("open_point_in_time", || {
                let request = self
                    .client()
                    .open_point_in_time(OpenPointInTimeParts::Index(&names))
                    .keep_alive(keep_alive);
                let request = match options.routing() {
                    Some(routing) => request.routing(routing),
                    None => request,
                };
                let request = match options.preference() {
                    Some(preference) => request.preference(preference),
                    None => request,
                };
                let request = match options.ignore_unavailable {
                    Some(ignore) => request.ignore_unavailable(ignore),
                    None => request,
                };
                request.send()
            })
            .await?;

        success_json("open_point_in_time", response).await
    }

    /// Releases a point-in-time snapshot.
    pub async fn close_point_in_time(&self, id: &str) -> GatewayResult<Value> {
        let body = json!({ "id": id });

        let response = self
            .send("close_point_in_time", || {
                self.client().close_point_in_time().body(body.clone()).send()
            })
            .await?;

        success_json("close_point_in_time", response).await
    }

    /// Fetches the next page of a scroll context.
    pub async fn scroll(&self, scroll_id: &str) -> GatewayResult<Value> {
        let body = json!({ "scroll_id": scroll_id });

        let response = self
            .send("scroll", || {
                self.client()
                    .scroll(ScrollParts::None)
                    .body(body.clone())
                    .send()
            })
            .await?;

        search_response("scroll", response).await
    }

    /// Releases a scroll context.
    pub async fn clear_scroll(&self, scroll_id: &str) -> GatewayResult<Value> {
        let body = json!({ "scroll_id": [scroll_id] });

        let response = self
            .send("clear_scroll", || {
                self.client()
                    .clear_scroll(ClearScrollParts::None)
                    .body(body.clone())
                    .send()
            })
            .await?;

        success_json("clear_scroll", response).await
    }

    /// Checks whether the cluster is reachable.
    ///
    /// Never fails: transport errors and error statuses both report `false`.
    pub async fn ping(&self) -> bool {
        match self.send("ping", || self.client().ping().send()).await {
            Ok(response) => {
                let status = response.status_code();
                if !status.is_success() {
                    warn!(status = status.as_u16(), "Ping returned an error status");
                }
                status.is_success()
            }
            Err(e) => {
                warn!(error = %e, "Search engine unavailable");
                false
            }
        }
    }
}

/// Reads a search-like response, keeping engine error bodies as data.
async fn search_response(operation: &'static str, response: Response) -> GatewayResult<Value> {
    let status = response.status_code();
    if status.is_success() {
        return json_body(operation, response).await;
    }

    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<Value>(&text) {
        Ok(body) if non_empty(body.get("error")).is_some() => {
            debug!(operation, status = status.as_u16(), "Engine reported an error");
            Ok(body)
        }
        _ => Err(GatewayError::Response {
            operation,
            status: status.as_u16(),
            body: text,
        }),
    }
}

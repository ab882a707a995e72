//! Index lifecycle: indices, aliases, mappings and settings.

use elasticsearch::cat::CatIndicesParts;
use elasticsearch::indices::{
    IndicesCloseParts, IndicesCreateParts, IndicesDeleteParts, IndicesExistsAliasParts,
    IndicesGetAliasParts, IndicesGetMappingParts, IndicesGetSettingsParts, IndicesOpenParts,
    IndicesPutMappingParts, IndicesPutSettingsParts, IndicesRefreshParts,
};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::error::GatewayResult;
use crate::request::index::{
    AliasAction, alias_actions_body, create_index_body, default_index_settings,
    strip_immutable_settings,
};

use super::backend::{SearchGateway, expect_success, success_json};

impl SearchGateway {
    /// Lists indices matching a name or pattern (cat API, JSON format).
    pub async fn index_list(&self, pattern: &str) -> GatewayResult<Value> {
        let cat = self.client().cat();
        let names = [pattern];

        let response = self
            .send("index_list", || {
                cat.indices(CatIndicesParts::Index(&names))
                    .format("json")
                    .send()
            })
            .await?;

        success_json("index_list", response).await
    }

    /// Creates an index.
    ///
    /// Without settings (or with an empty settings object) the configured
    /// default shard and replica counts are used.
    pub async fn create_index(
        &self,
        index: &str,
        settings: Option<Value>,
        mappings: Option<Value>,
    ) -> GatewayResult<()> {
        let defaults = default_index_settings(
            self.config().default_number_of_shards,
            self.config().default_number_of_replicas,
        );
        let body = create_index_body(settings, mappings, defaults);
        let indices = self.client().indices();

        let response = self
            .send("create_index", || {
                indices
                    .create(IndicesCreateParts::Index(index))
                    .body(body.clone())
                    .send()
            })
            .await?;
        expect_success("create_index", response).await?;

        info!("Created index '{}'", index);
        Ok(())
    }

    /// Deletes an index.
    pub async fn delete_index(&self, index: &str) -> GatewayResult<()> {
        let indices = self.client().indices();
        let names = [index];

        let response = self
            .send("delete_index", || {
                indices.delete(IndicesDeleteParts::Index(&names)).send()
            })
            .await?;
        expect_success("delete_index", response).await?;

        info!("Deleted index '{}'", index);
        Ok(())
    }

    /// Returns the indices an alias points at.
    ///
    /// An unknown alias yields an empty object rather than an error.
    pub async fn alias(&self, name: &str) -> GatewayResult<Value> {
        let indices = self.client().indices();
        let names = [name];

        let response = self
            .send("alias", || {
                indices.get_alias(IndicesGetAliasParts::Name(&names)).send()
            })
            .await?;

        if response.status_code().as_u16() == 404 {
            debug!("Alias '{}' not found", name);
            return Ok(json!({}));
        }

        success_json("alias", response).await
    }

    /// Points an alias at an index.
    pub async fn add_alias(&self, index: &str, alias: &str) -> GatewayResult<()> {
        self.update_alias(AliasAction::Add, index, alias).await?;
        info!("Added alias '{}' -> '{}'", alias, index);
        Ok(())
    }

    /// Detaches an alias from an index.
    pub async fn remove_alias(&self, index: &str, alias: &str) -> GatewayResult<()> {
        self.update_alias(AliasAction::Remove, index, alias).await?;
        info!("Removed alias '{}' -> '{}'", alias, index);
        Ok(())
    }

    async fn update_alias(&self, action: AliasAction, index: &str, alias: &str) -> GatewayResult<()> {
        let body = alias_actions_body(action, index, alias);
        let indices = self.client().indices();

        let response = self
            .send("update_aliases", || {
                indices.update_aliases().body(body.clone()).send()
            })
            .await?;
        expect_success("update_aliases", response).await?;
        Ok(())
    }

    /// Checks whether an alias exists.
    pub async fn alias_exists(&self, name: &str) -> GatewayResult<bool> {
        let indices = self.client().indices();
        let names = [name];

        let response = self
            .send("alias_exists", || {
                indices
                    .exists_alias(IndicesExistsAliasParts::Name(&names))
                    .send()
            })
            .await?;

        match response.status_code().as_u16() {
            404 => Ok(false),
            _ => expect_success("alias_exists", response).await.map(|_| true),
        }
    }

    /// Returns the mapping of an index.
    pub async fn mapping(&self, index: &str) -> GatewayResult<Value> {
        let indices = self.client().indices();
        let names = [index];

        let response = self
            .send("mapping", || {
                indices.get_mapping(IndicesGetMappingParts::Index(&names)).send()
            })
            .await?;

        success_json("mapping", response).await
    }

    /// Adds fields to the mapping of an index.
    pub async fn put_mapping(&self, index: &str, mapping: Value) -> GatewayResult<()> {
        let indices = self.client().indices();
        let names = [index];

        let response = self
            .send("put_mapping", || {
                indices
                    .put_mapping(IndicesPutMappingParts::Index(&names))
                    .body(mapping.clone())
                    .send()
            })
            .await?;
        expect_success("put_mapping", response).await?;

        debug!("Updated mapping of index '{}'", index);
        Ok(())
    }

    /// Returns the settings of an index.
    pub async fn settings(&self, index: &str) -> GatewayResult<Value> {
        let indices = self.client().indices();
        let names = [index];

        let response = self
            .send("settings", || {
                indices
                    .get_settings(IndicesGetSettingsParts::Index(&names))
                    .send()
            })
            .await?;

        success_json("settings", response).await
    }

    /// Updates the settings of an index.
    ///
    /// `number_of_shards` is dropped from the body since it cannot change
    /// after creation. The index is closed for the update and reopened
    /// afterwards, also when the update itself fails.
    pub async fn put_settings(&self, index: &str, settings: Value) -> GatewayResult<()> {
        let body = strip_immutable_settings(settings);

        self.close_index(index).await?;

        let indices = self.client().indices();
        let names = [index];
        let updated = match self
            .send("put_settings", || {
                indices
                    .put_settings(IndicesPutSettingsParts::Index(&names))
                    .body(body.clone())
                    .send()
            })
            .await
        {
            Ok(response) => expect_success("put_settings", response).await.map(|_| ()),
            Err(e) => Err(e),
        };

        if let Err(ref e) = updated {
            warn!("Settings update of index '{}' failed, reopening: {}", index, e);
        }

        let reopened = self.open_index(index).await;
        updated?;
        reopened?;

        info!("Updated settings of index '{}'", index);
        Ok(())
    }

    /// Closes an index.
    pub async fn close_index(&self, index: &str) -> GatewayResult<()> {
        let indices = self.client().indices();
        let names = [index];

        let response = self
            .send("close_index", || {
                indices.close(IndicesCloseParts::Index(&names)).send()
            })
            .await?;
        expect_success("close_index", response).await?;
        Ok(())
    }

    /// Opens a closed index.
    pub async fn open_index(&self, index: &str) -> GatewayResult<()> {
        let indices = self.client().indices();
        let names = [index];

        let response = self
            .send("open_index", || {
                indices.open(IndicesOpenParts::Index(&names)).send()
            })
            .await?;
        expect_success("open_index", response).await?;
        Ok(())
    }

    /// Refreshes an index to make recently written documents searchable.
    ///
    /// The engine refreshes on its own schedule; this is mostly for tests.
    pub async fn refresh_index(&self, index: &str) -> GatewayResult<()> {
        let indices = self.client().indices();
        let names = [index];

        let response = self
            .send("refresh_index", || {
                indices.refresh(IndicesRefreshParts::Index(&names)).send()
            })
            .await?;
        expect_success("refresh_index", response).await?;
        Ok(())
    }
}

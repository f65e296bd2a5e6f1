// ── Backend facade ──
//
// Owns the inventory and metrics clients, converts wire types into the
// domain model, and vends fetch handles for consumers that revalidate.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use hwdash_api::models::{MetricsResponse, ResourceGroupRequest};
use hwdash_api::{InventoryClient, MetricsClient};

use crate::config::BackendConfig;
use crate::convert::{resource_from_api, resources_from_api};
use crate::derived::{build_graph_query, histogram_query, storage_usage_query};
use crate::error::CoreError;
use crate::fetch::FetchHandle;
use crate::filter::DebounceTiming;
use crate::model::{
    CxlSwitch, Device, DeviceType, EntityId, Node, Resource, ResourceGroup, cxl_switches,
};

/// Cheaply cloneable entry point for every backend read and write.
#[derive(Clone)]
pub struct Backend {
    inventory: InventoryClient,
    metrics: MetricsClient,
    debounce: DebounceTiming,
}

impl Backend {
    pub fn new(config: &BackendConfig) -> Result<Self, CoreError> {
        let transport = config.transport();
        let inventory = InventoryClient::new(config.api_url.as_str(), &transport)?;
        let metrics = MetricsClient::new(config.metrics_url.as_str(), &transport)?;
        info!(
            api = %config.api_url,
            metrics = %config.metrics_url,
            "backend configured"
        );
        Ok(Self {
            inventory,
            metrics,
            debounce: config.debounce,
        })
    }

    pub fn debounce(&self) -> DebounceTiming {
        self.debounce
    }

    // ── Inventory reads ──────────────────────────────────────────────

    pub async fn nodes(&self) -> Result<Vec<Node>, CoreError> {
        let nodes = self.inventory.list_nodes().await?;
        Ok(nodes.into_iter().map(Node::from).collect())
    }

    pub async fn resources(&self) -> Result<Vec<Resource>, CoreError> {
        let resources = resources_from_api(self.inventory.list_resources().await?);
        debug!(count = resources.len(), "resources loaded");
        Ok(resources)
    }

    pub async fn resource(&self, id: &EntityId) -> Result<Resource, CoreError> {
        let api = self
            .inventory
            .get_resource(id.as_str())
            .await
            .map_err(|e| CoreError::from(e).not_found_as("Resource", id.as_str()))?;
        resource_from_api(api).ok_or_else(|| CoreError::NotFound {
            entity_type: "Resource of a known device type".into(),
            identifier: id.to_string(),
        })
    }

    /// Switches derived from the full resource list.
    pub async fn cxl_switches(&self) -> Result<Vec<CxlSwitch>, CoreError> {
        Ok(cxl_switches(&self.resources().await?))
    }

    pub async fn resource_groups(&self) -> Result<Vec<ResourceGroup>, CoreError> {
        let groups = self.inventory.list_resource_groups().await?;
        Ok(groups.into_iter().map(ResourceGroup::from).collect())
    }

    pub async fn resource_group(&self, id: &EntityId) -> Result<ResourceGroup, CoreError> {
        self.inventory
            .get_resource_group(id.as_str())
            .await
            .map(ResourceGroup::from)
            .map_err(|e| CoreError::from(e).not_found_as("Resource group", id.as_str()))
    }

    // ── Inventory writes ─────────────────────────────────────────────

    pub async fn create_resource_group(
        &self,
        name: &str,
        description: &str,
    ) -> Result<ResourceGroup, CoreError> {
        let body = ResourceGroupRequest {
            name: name.to_owned(),
            description: description.to_owned(),
        };
        let group = self.inventory.create_resource_group(&body).await?;
        info!(id = %group.id, name, "resource group created");
        Ok(ResourceGroup::from(group))
    }

    pub async fn update_resource_group(
        &self,
        id: &EntityId,
        name: &str,
        description: &str,
    ) -> Result<ResourceGroup, CoreError> {
        let body = ResourceGroupRequest {
            name: name.to_owned(),
            description: description.to_owned(),
        };
        self.inventory
            .update_resource_group(id.as_str(), &body)
            .await
            .map(ResourceGroup::from)
            .map_err(|e| CoreError::from(e).not_found_as("Resource group", id.as_str()))
    }

    pub async fn delete_resource_group(&self, id: &EntityId) -> Result<(), CoreError> {
        self.inventory
            .delete_resource_group(id.as_str())
            .await
            .map_err(|e| CoreError::from(e).not_found_as("Resource group", id.as_str()))?;
        info!(%id, "resource group deleted");
        Ok(())
    }

    /// Replace the group membership of one resource.
    pub async fn set_resource_groups(
        &self,
        id: &EntityId,
        group_ids: &[EntityId],
    ) -> Result<Resource, CoreError> {
        let ids: Vec<String> = group_ids.iter().map(ToString::to_string).collect();
        let api = self
            .inventory
            .set_resource_groups(id.as_str(), &ids)
            .await
            .map_err(|e| CoreError::from(e).not_found_as("Resource", id.as_str()))?;
        info!(%id, groups = ids.len(), "resource group membership updated");
        resource_from_api(api).ok_or_else(|| {
            CoreError::Internal(format!("backend returned resource {id} with unknown type"))
        })
    }

    // ── Metrics ──────────────────────────────────────────────────────

    /// Instant usage of every device of `types`, for the histogram.
    pub async fn query_histogram(
        &self,
        types: &[DeviceType],
    ) -> Result<MetricsResponse, CoreError> {
        Ok(self.metrics.query(&histogram_query(types), None).await?)
    }

    pub async fn query_storage_usage(&self) -> Result<MetricsResponse, CoreError> {
        Ok(self.metrics.query(&storage_usage_query(), None).await?)
    }

    /// Usage/energy range series of one device over the last `window`.
    pub async fn query_graph(
        &self,
        device: &Device,
        window: Duration,
    ) -> Result<MetricsResponse, CoreError> {
        let q = build_graph_query(device, window, Utc::now());
        Ok(self
            .metrics
            .query_range(&q.query, q.start, q.end, q.step)
            .await?)
    }

    // ── Fetch handles ────────────────────────────────────────────────

    pub fn resource_group_fetch(&self) -> FetchHandle<Vec<ResourceGroup>> {
        let this = self.clone();
        FetchHandle::new("resource-groups", move || {
            let this = this.clone();
            async move { this.resource_groups().await }
        })
    }
}

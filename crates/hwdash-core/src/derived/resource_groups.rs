// ── Resource-group name lookup ──

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::CoreError;
use crate::fetch::FetchHandle;
use crate::model::{EntityId, ResourceGroup};

/// Id -> name map over one resource-group snapshot.
///
/// Rebuilt only when handed a different snapshot `Arc`.
#[derive(Debug, Default)]
pub struct ResourceGroupIndex {
    source: Option<Arc<Vec<ResourceGroup>>>,
    names: HashMap<EntityId, String>,
    rebuilds: u64,
}

impl ResourceGroupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the index at `source`. A `None` source empties it.
    pub fn sync(&mut self, source: Option<&Arc<Vec<ResourceGroup>>>) {
        let unchanged = match (&self.source, source) {
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        self.names = source
            .map(|groups| {
                groups
                    .iter()
                    .map(|g| (g.id.clone(), g.name.clone()))
                    .collect()
            })
            .unwrap_or_default();
        self.source = source.cloned();
        self.rebuilds += 1;
        debug!(groups = self.names.len(), "rebuilt resource group index");
    }

    /// Group name, or `""` when the id is unknown or nothing is loaded.
    pub fn name(&self, id: &EntityId) -> &str {
        self.names.get(id).map_or("", String::as_str)
    }

    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }
}

/// The resource-group fetch plus a memoised name index.
pub struct ResourceGroupLookup {
    fetch: FetchHandle<Vec<ResourceGroup>>,
    index: ResourceGroupIndex,
}

impl ResourceGroupLookup {
    pub fn new(fetch: FetchHandle<Vec<ResourceGroup>>) -> Self {
        Self {
            fetch,
            index: ResourceGroupIndex::new(),
        }
    }

    pub fn data(&self) -> Option<Arc<Vec<ResourceGroup>>> {
        self.fetch.data()
    }

    pub fn error(&self) -> Option<Arc<CoreError>> {
        self.fetch.error()
    }

    pub fn is_validating(&self) -> bool {
        self.fetch.is_validating()
    }

    pub fn mutate(&self) {
        self.fetch.mutate();
    }

    pub async fn revalidate(&self) {
        self.fetch.revalidate().await;
    }

    /// Index over the latest fetched snapshot.
    pub fn index(&mut self) -> &ResourceGroupIndex {
        self.index.sync(self.fetch.data().as_ref());
        &self.index
    }

    pub fn name_by_id(&mut self, id: &EntityId) -> &str {
        self.index().name(id)
    }
}

// Async HTTP client for the inventory REST backend.
//
// Base path: whatever the operator configures (e.g. `https://host/cdim/api/v1/`).
// List endpoints answer with `{count, <items>}` envelopes that are stripped
// here so callers only see the item vectors.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, body_preview};
use crate::models::{
    ApiNode, ApiResource, ApiResourceGroup, MembershipRequest, NodeList, ResourceGroupList,
    ResourceGroupRequest, ResourceList,
};
use crate::transport::TransportConfig;

// ── Error response shape from the inventory backend ──────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the inventory backend (nodes, resources, resource groups).
#[derive(Clone)]
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl InventoryClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(parse_error(status, resp).await)
        }
    }

    // ── Nodes ────────────────────────────────────────────────────────

    pub async fn list_nodes(&self) -> Result<Vec<ApiNode>, Error> {
        let list: NodeList = self.get("nodes", &[]).await?;
        Ok(list.nodes)
    }

    // ── Resources ────────────────────────────────────────────────────

    pub async fn list_resources(&self) -> Result<Vec<ApiResource>, Error> {
        let list: ResourceList = self.get("resources", &[("detail", "true")]).await?;
        Ok(list.resources)
    }

    pub async fn get_resource(&self, device_id: &str) -> Result<ApiResource, Error> {
        self.get(&format!("resources/{device_id}"), &[]).await
    }

    /// Replace the resource-group membership of one resource.
    pub async fn set_resource_groups(
        &self,
        device_id: &str,
        group_ids: &[String],
    ) -> Result<ApiResource, Error> {
        let body = MembershipRequest {
            resource_group_ids: group_ids.to_vec(),
        };
        self.put(&format!("resources/{device_id}/resource-groups"), &body)
            .await
    }

    // ── Resource groups ──────────────────────────────────────────────

    pub async fn list_resource_groups(&self) -> Result<Vec<ApiResourceGroup>, Error> {
        let list: ResourceGroupList = self.get("resource-groups", &[]).await?;
        Ok(list.resource_groups)
    }

    pub async fn get_resource_group(&self, group_id: &str) -> Result<ApiResourceGroup, Error> {
        self.get(&format!("resource-groups/{group_id}"), &[]).await
    }

    pub async fn create_resource_group(
        &self,
        body: &ResourceGroupRequest,
    ) -> Result<ApiResourceGroup, Error> {
        self.post("resource-groups", body).await
    }

    pub async fn update_resource_group(
        &self,
        group_id: &str,
        body: &ResourceGroupRequest,
    ) -> Result<ApiResourceGroup, Error> {
        self.put(&format!("resource-groups/{group_id}"), body).await
    }

    pub async fn delete_resource_group(&self, group_id: &str) -> Result<(), Error> {
        self.delete(&format!("resource-groups/{group_id}")).await
    }
}

/// Ensure the base path ends with `/` so relative joins append instead of
/// replacing the last segment.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

// ── Response handling ────────────────────────────────────────────────

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if status.is_success() {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", body_preview(&body)),
            body,
        })
    } else {
        Err(parse_error(status, resp).await)
    }
}

async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
        Error::Api {
            status: status.as_u16(),
            message: err.message.unwrap_or_else(|| status.to_string()),
            code: err.code,
        }
    } else {
        Error::Api {
            status: status.as_u16(),
            message: if raw.is_empty() {
                status.to_string()
            } else {
                body_preview(&raw)
            },
            code: None,
        }
    }
}

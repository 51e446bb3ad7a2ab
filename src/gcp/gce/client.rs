//! # GCE API Client Logic
//!
//! The [`ComputeApi`] trait is the seam between the lifecycle logic and the
//! Compute Engine API. [`ComputeClient`] implements it over the v1 REST
//! endpoints with `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::gcp::gce::error::TransportError;
use crate::gcp::gce::types::{Instance, InstanceDescriptor, InstancePage, Operation, Snapshot};

/// Public Compute Engine v1 endpoint.
pub const GCE_API_BASE: &str = "https://compute.googleapis.com/compute/v1";

/// Instance lifecycle calls the orchestrator depends on.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Submits `instances.insert` and returns the zonal operation.
    async fn insert_instance(
        &self,
        project: &str,
        zone: &str,
        descriptor: &InstanceDescriptor,
    ) -> Result<Operation, TransportError>;

    /// Submits `instances.delete` and returns the zonal operation.
    async fn delete_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<Operation, TransportError>;

    /// Fetches the current state of a zonal operation.
    async fn get_operation(
        &self,
        project: &str,
        zone: &str,
        operation: &str,
    ) -> Result<Operation, TransportError>;

    /// Lists every instance in the zone.
    ///
    /// `None` means the API omitted the `items` field entirely, which is how
    /// it reports an empty zone; `Some(vec![])` means the field was present
    /// but empty.
    async fn list_instances(
        &self,
        project: &str,
        zone: &str,
    ) -> Result<Option<Vec<Instance>>, TransportError>;

    /// Fetches a global snapshot resource.
    async fn get_snapshot(&self, project: &str, snapshot: &str)
    -> Result<Snapshot, TransportError>;
}

/// REST implementation of [`ComputeApi`].
pub struct ComputeClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
}

impl ComputeClient {
    /// Creates a client for `base_url` (usually [`GCE_API_BASE`]).
    ///
    /// `access_token` is sent as a bearer token when present; obtaining it is
    /// left to the caller (e.g. `gcloud auth print-access-token`).
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .build()?;
        let access_token = access_token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    fn zone_url(&self, project: &str, zone: &str, path: &str) -> String {
        format!(
            "{}/projects/{}/zones/{}/{}",
            self.base_url, project, zone, path
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.access_token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &'static str,
        url: &str,
        req: RequestBuilder,
    ) -> Result<T, TransportError> {
        tracing::debug!(method, url, "calling compute API");
        let res = req.send().await.map_err(|source| TransportError::Request {
            method,
            url: url.to_string(),
            source,
        })?;
        let res = check_status(method, url, res).await?;
        res.json::<T>().await.map_err(|source| TransportError::Decode {
            method,
            url: url.to_string(),
            source,
        })
    }
}

async fn check_status(
    method: &'static str,
    url: &str,
    res: Response,
) -> Result<Response, TransportError> {
    if res.status().is_success() {
        return Ok(res);
    }
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    tracing::warn!(method, url, status, "compute API call rejected");
    Err(TransportError::Status {
        method,
        url: url.to_string(),
        status,
        body,
    })
}

#[async_trait]
impl ComputeApi for ComputeClient {
    async fn insert_instance(
        &self,
        project: &str,
        zone: &str,
        descriptor: &InstanceDescriptor,
    ) -> Result<Operation, TransportError> {
        let url = self.zone_url(project, zone, "instances");
        let req = self.request(Method::POST, &url).json(descriptor);
        self.send("POST", &url, req).await
    }

    async fn delete_instance(
        &self,
        project: &str,
        zone: &str,
        name: &str,
    ) -> Result<Operation, TransportError> {
        let url = self.zone_url(project, zone, &format!("instances/{}", name));
        let req = self.request(Method::DELETE, &url);
        self.send("DELETE", &url, req).await
    }

    async fn get_operation(
        &self,
        project: &str,
        zone: &str,
        operation: &str,
    ) -> Result<Operation, TransportError> {
        let url = self.zone_url(project, zone, &format!("operations/{}", operation));
        let req = self.request(Method::GET, &url);
        self.send("GET", &url, req).await
    }

    async fn list_instances(
        &self,
        project: &str,
        zone: &str,
    ) -> Result<Option<Vec<Instance>>, TransportError> {
        let url = self.zone_url(project, zone, "instances");
        let mut page_token: Option<String> = None;
        let mut instances: Option<Vec<Instance>> = None;

        // Loop to handle paginated results.
        loop {
            let mut req = self.request(Method::GET, &url);
            if let Some(ref t) = page_token {
                req = req.query(&[("pageToken", t)]);
            }
            let page: InstancePage = self.send("GET", &url, req).await?;
            if let Some(items) = page.items {
                instances.get_or_insert_with(Vec::new).extend(items);
            }
            page_token = page.next_page_token.filter(|t| !t.is_empty());
            if page_token.is_none() {
                break;
            }
        }

        Ok(instances)
    }

    async fn get_snapshot(
        &self,
        project: &str,
        snapshot: &str,
    ) -> Result<Snapshot, TransportError> {
        let url = format!(
            "{}/projects/{}/global/snapshots/{}",
            self.base_url, project, snapshot
        );
        let req = self.request(Method::GET, &url);
        self.send("GET", &url, req).await
    }
}

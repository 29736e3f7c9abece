use tracing::{info, warn};

use pce_model::{FlowRecord, Label, LabelValue, ResultSet, TrafficQuery};

use crate::config::{PceConfig, PollPolicy};
use crate::errors::ApiError;
use crate::jobs::AsyncJobClient;
use crate::transport::{ApiRequest, HttpTransport, Transport};

pub fn labels_path(org: u32) -> String {
    format!("/orgs/{org}/labels")
}

/// Label collection of an org, optionally restricted to one key.
fn labels_request(org: u32, key: Option<&str>) -> ApiRequest {
    let request = ApiRequest::get(labels_path(org));
    match key {
        Some(key) => request.with_query("key", key),
        None => request,
    }
}

pub fn traffic_query_path(org: u32) -> String {
    format!("/orgs/{org}/traffic_flows/async_queries")
}

/// The PCE operations the exports need, all backed by async jobs.
pub struct PceApi<T = HttpTransport> {
    jobs: AsyncJobClient<T>,
    org: u32,
    poll: PollPolicy,
}

impl PceApi<HttpTransport> {
    /// Build an HTTPS client for `cfg`; fails before any network call when the config is incomplete.
    pub fn connect(cfg: &PceConfig, poll: PollPolicy) -> Result<Self, ApiError> {
        if !cfg.verify_tls {
            warn!(fqdn = %cfg.fqdn, "tls certificate verification disabled");
        }
        let transport = HttpTransport::new(cfg)?;
        Ok(Self::with_transport(transport, cfg.org, poll))
    }
}

impl<T: Transport> PceApi<T> {
    pub fn with_transport(transport: T, org: u32, poll: PollPolicy) -> Self {
        Self {
            jobs: AsyncJobClient::new(transport),
            org,
            poll,
        }
    }

    pub fn jobs(&self) -> &AsyncJobClient<T> {
        &self.jobs
    }

    /// Probe the health endpoint; any answer other than 200 is a rejection.
    pub async fn check_connection(&self) -> Result<(), ApiError> {
        let response = self.jobs.transport().send(ApiRequest::get("/health")).await?;
        if response.status != 200 {
            return Err(ApiError::Rejected {
                status: response.status,
                body: response.body,
            });
        }
        info!("connection to pce successful");
        Ok(())
    }

    /// Every label of the org (or of one key), via an async labels job.
    pub async fn labels(&self, key: Option<&str>) -> Result<ResultSet<Label>, ApiError> {
        let request = labels_request(self.org, key);
        let set = self.jobs.run(request, &self.poll).await?;
        info!(labels = set.len(), skipped = set.skipped, "label snapshot fetched");
        Ok(set)
    }

    /// Values of all labels with `key`, sorted lexicographically.
    pub async fn label_values(&self, key: &str) -> Result<Vec<String>, ApiError> {
        let request = labels_request(self.org, Some(key));
        let set: ResultSet<LabelValue> = self.jobs.run(request, &self.poll).await?;

        let mut values: Vec<String> = set.into_records().into_iter().map(|l| l.value).collect();
        values.sort();
        Ok(values)
    }

    /// Run an async traffic query and return its flows.
    pub async fn traffic_flows(
        &self,
        query: &TrafficQuery,
    ) -> Result<ResultSet<FlowRecord>, ApiError> {
        let body = serde_json::to_value(query)
            .map_err(|e| ApiError::InvalidResponse(format!("failed to encode traffic query: {e}")))?;
        let request = ApiRequest::post(traffic_query_path(self.org), body);

        let set = self.jobs.run(request, &self.poll).await?;
        info!(
            query = %query.query_name,
            flows = set.len(),
            skipped = set.skipped,
            "traffic flows retrieved"
        );
        Ok(set)
    }
}

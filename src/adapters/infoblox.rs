use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::config::InfobloxConfig;
use crate::core::domain::RawNodeEntry;

pub const MEMBER_PATH: &str = "/wapi/v2.7/member?_return_fields%2B=node_info,host_name,service_status";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to appliance failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("appliance answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("member list is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can hand back the raw member list.
#[allow(async_fn_in_trait)]
pub trait NodeSource {
    async fn fetch_nodes(&self) -> Result<Vec<RawNodeEntry>, FetchError>;
}

pub struct InfobloxClient {
    http: Client,
    base_url: String,
    user: String,
    pass: String,
}

impl InfobloxClient {
    pub fn new(cfg: &InfobloxConfig) -> Result<Self, FetchError> {
        Self::with_base_url(format!("https://{}", cfg.host), cfg.user.clone(), cfg.pass.clone())
    }

    /// Appliances ship with self-signed certificates, so certificate checks are off.
    pub fn with_base_url(base_url: impl Into<String>, user: String, pass: String) -> Result<Self, FetchError> {
        let http = Client::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user,
            pass,
        })
    }

    pub fn member_url(&self) -> String {
        format!("{}{}", self.base_url, MEMBER_PATH)
    }
}

impl NodeSource for InfobloxClient {
    async fn fetch_nodes(&self) -> Result<Vec<RawNodeEntry>, FetchError> {
        let url = self.member_url();
        debug!(event = "WAPI_REQUEST", url = %url, "Querying grid members");

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .basic_auth(&self.user, Some(&self.pass))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate(&body, 256) });
        }

        let nodes: Vec<RawNodeEntry> = serde_json::from_str(&body)?;
        info!(event = "WAPI_RESPONSE", nodes = nodes.len(), "Grid members fetched");
        Ok(nodes)
    }
}

fn truncate(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

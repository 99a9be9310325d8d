//! HTTP client for the per-node monitor agent.

use fleet_types::{Coinbase, Node};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

use crate::api::{
    CoinbaseReply, NodeApi, ProposeForm, StatusReply, COINBASE_PATH, NODE_INFO_PATH,
    PROPOSE_PATH, STATUS_PATH, UPDATE_PATH, VERSION_UPDATE_PATH,
};
use crate::RpcError;

/// Port every monitor agent listens on.
pub const DEFAULT_MONITOR_PORT: u16 = 8443;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport settings for [`MonitorClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `"https"` in production; tests run against plain `"http"`.
    pub scheme: String,
    pub port: u16,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// PEM bundle holding the client certificate chain followed by its private key.
    pub identity_pem: Option<Vec<u8>>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            port: DEFAULT_MONITOR_PORT,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            identity_pem: None,
        }
    }
}

impl ClientConfig {
    /// Load the client certificate and key from separate PEM files.
    pub fn with_identity_files(mut self, cert: &Path, key: &Path) -> Result<Self, RpcError> {
        let mut pem = std::fs::read(cert)?;
        if !pem.ends_with(b"\n") {
            pem.push(b'\n');
        }
        pem.extend(std::fs::read(key)?);
        self.identity_pem = Some(pem);
        Ok(self)
    }
}

/// Client for the monitor agent running beside every node.
///
/// Authenticates with a client certificate. The server certificate is not
/// validated: agents use self-signed certificates inside the permissioned
/// network.
#[derive(Clone)]
pub struct MonitorClient {
    /// HTTP client (reusable connection pool).
    http: reqwest::Client,
    scheme: String,
    port: u16,
}

impl MonitorClient {
    pub fn new(config: ClientConfig) -> Result<Self, RpcError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .danger_accept_invalid_certs(true)
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout);

        if let Some(pem) = &config.identity_pem {
            let identity = reqwest::Identity::from_pem(pem)
                .map_err(|e| RpcError::Tls(format!("unable to load client certificate: {e}")))?;
            builder = builder.identity(identity);
        }

        let http = builder
            .build()
            .map_err(|e| RpcError::Tls(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            scheme: config.scheme,
            port: config.port,
        })
    }

    /// Full URL of `path` on the node's monitor agent.
    pub fn url(&self, node: &Node, path: &str) -> String {
        format!("{}://{}:{}{}", self.scheme, node.address, self.port, path)
    }

    async fn get_text(&self, node: &Node, path: &str) -> Result<String, RpcError> {
        let url = self.url(node, path);
        tracing::trace!(%url, "GET");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(RpcError::RequestFailed(format!(
                "HTTP status {} from {url}",
                response.status()
            )));
        }
        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, node: &Node, path: &str) -> Result<T, RpcError> {
        let body = self.get_text(node, path).await?;
        serde_json::from_str(&body)
            .map_err(|e| RpcError::InvalidResponse(format!("{path}: {e}")))
    }
}

impl NodeApi for MonitorClient {
    async fn status(&self, node: &Node) -> Result<bool, RpcError> {
        let reply: StatusReply = self.get_json(node, STATUS_PATH).await?;
        Ok(reply.is_ok())
    }

    async fn node_info(&self, node: &Node) -> Result<String, RpcError> {
        self.get_text(node, NODE_INFO_PATH).await
    }

    async fn coinbase(&self, node: &Node) -> Result<Coinbase, RpcError> {
        let reply: CoinbaseReply = self.get_json(node, COINBASE_PATH).await?;
        Ok(Coinbase::new(reply.data))
    }

    async fn propose(
        &self,
        node: &Node,
        candidate: &Coinbase,
        value: bool,
    ) -> Result<bool, RpcError> {
        let url = self.url(node, PROPOSE_PATH);
        tracing::info!(
            entity = %node.entity,
            %candidate,
            value,
            "propose"
        );
        let response = self
            .http
            .post(&url)
            .json(&ProposeForm::new(candidate, value))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RpcError::RequestFailed(format!(
                "HTTP status {} from {url}",
                response.status()
            )));
        }
        let reply: StatusReply = response.json().await?;
        Ok(reply.is_ok())
    }

    async fn version_update(&self, node: &Node) -> Result<(), RpcError> {
        self.get_text(node, VERSION_UPDATE_PATH).await.map(|_| ())
    }

    async fn update(&self, node: &Node) -> Result<(), RpcError> {
        self.get_text(node, UPDATE_PATH).await.map(|_| ())
    }

    async fn call(&self, node: &Node, path: &str) -> Result<String, RpcError> {
        self.get_text(node, path).await
    }
}

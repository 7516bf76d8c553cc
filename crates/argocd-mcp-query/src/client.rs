//! Authenticated HTTP access to the Argo CD API server.
//!
//! The client owns no business logic: it issues a GET, hands back the status
//! code and body, and leaves interpretation of non-200 responses to callers.

use argocd_mcp_core::config::ArgoCdConfig;
use argocd_mcp_core::error::TransportError;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cancellation and deadline of the invocation that triggered a fetch.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// Raw outcome of an upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

pub struct ArgoCdClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl ArgoCdClient {
    pub fn new(config: &ArgoCdConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .build()
            .map_err(TransportError::request)?;
        Ok(Self {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base_url}/{path}` with the bearer token attached.
    ///
    /// Returns as soon as `ctx` is cancelled or its deadline passes; the
    /// in-flight request is dropped in that case.
    pub async fn fetch(
        &self,
        path: &str,
        query: &[(&str, &str)],
        ctx: &CallContext,
    ) -> Result<UpstreamResponse, TransportError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut request = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let exchange = async {
            let response = request.send().await.map_err(TransportError::request)?;
            let status = response.status().as_u16();
            let body = response.bytes().await.map_err(TransportError::body)?;
            Ok(UpstreamResponse {
                status,
                body: body.to_vec(),
            })
        };
        let deadline = async {
            match ctx.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => Err(TransportError::Cancelled),
            _ = deadline => Err(TransportError::DeadlineExceeded),
            result = exchange => result,
        };
        match &result {
            Ok(response) => debug!(url = %url, status = response.status, "Argo CD responded"),
            Err(e) => debug!(url = %url, error = %e, "Argo CD request failed"),
        }
        result
    }
}

//! Fullnode REST client used to wait for transaction confirmation.

use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use serde::Deserialize;
use tracing::debug;

use crate::config::{CONFIRMATION_POLL_INTERVAL_MS, CONFIRMATION_TIMEOUT_MS};
use crate::error::ChainError;
use crate::models::TransactionHash;
use crate::publish::ChainClient;

/// Result of a single lookup of a transaction.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Lookup {
    /// Unknown to the node yet, or still in the mempool.
    Pending,
    Committed,
}

#[derive(Deserialize)]
struct TransactionStatus {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    vm_status: Option<String>,
}

/// Classify a `GET /transactions/by_hash/{hash}` response.
pub(crate) fn classify(status: u16, body: &str) -> Result<Lookup, ChainError> {
    match status {
        404 => return Ok(Lookup::Pending),
        200..=299 => {}
        other => return Err(ChainError::Http(other)),
    }

    let tx: TransactionStatus =
        serde_json::from_str(body).map_err(|e| ChainError::InvalidResponse(e.to_string()))?;
    if tx.kind == "pending_transaction" {
        return Ok(Lookup::Pending);
    }
    match tx.success {
        Some(true) => Ok(Lookup::Committed),
        Some(false) => Err(ChainError::Failed(
            tx.vm_status.unwrap_or_else(|| "unknown vm status".to_string()),
        )),
        None => Err(ChainError::InvalidResponse(
            "committed transaction without success flag".to_string(),
        )),
    }
}

/// Polls a fullnode until the transaction is committed or the timeout passes.
#[derive(Clone, Debug)]
pub struct RestChainClient {
    fullnode_url: String,
    timeout_ms: u32,
    poll_interval_ms: u32,
}

impl RestChainClient {
    pub fn new(fullnode_url: impl Into<String>) -> Self {
        Self {
            fullnode_url: fullnode_url.into().trim_end_matches('/').to_string(),
            timeout_ms: CONFIRMATION_TIMEOUT_MS,
            poll_interval_ms: CONFIRMATION_POLL_INTERVAL_MS,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u32, poll_interval_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self.poll_interval_ms = poll_interval_ms.max(1);
        self
    }

    fn transaction_url(&self, hash: &TransactionHash) -> String {
        format!("{}/transactions/by_hash/{}", self.fullnode_url, hash)
    }

    async fn lookup(&self, url: &str) -> Result<Lookup, ChainError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|e| ChainError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ChainError::Network(e.to_string()))?;
        classify(status, &body)
    }
}

impl ChainClient for RestChainClient {
    async fn wait_for_transaction(&self, hash: &TransactionHash) -> Result<(), ChainError> {
        let url = self.transaction_url(hash);
        let attempts = self.timeout_ms / self.poll_interval_ms + 1;
        let interval = self.poll_interval_ms;

        let committed = poll(
            attempts,
            |attempt| {
                let url = &url;
                async move {
                    let lookup = self.lookup(url).await?;
                    if lookup == Lookup::Pending {
                        debug!(%hash, attempt, "transaction pending");
                    }
                    Ok(lookup)
                }
            },
            || TimeoutFuture::new(interval),
        )
        .await?;

        if committed {
            Ok(())
        } else {
            Err(ChainError::Timeout(hash.to_string()))
        }
    }
}

/// Run up to `attempts` lookups with a `sleep` between consecutive ones.
///
/// Returns `false` once every attempt came back pending. No sleep follows
/// the last attempt, so the total wait stays within the timeout.
async fn poll<L, LF, S, SF>(attempts: u32, mut lookup: L, mut sleep: S) -> Result<bool, ChainError>
where
    L: FnMut(u32) -> LF,
    LF: Future<Output = Result<Lookup, ChainError>>,
    S: FnMut() -> SF,
    SF: Future<Output = ()>,
{
    for attempt in 1..=attempts {
        if lookup(attempt).await? == Lookup::Committed {
            return Ok(true);
        }
        if attempt < attempts {
            sleep().await;
        }
    }
    Ok(false)
}

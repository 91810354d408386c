use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::domain::{NetworkMetrics, NetworkStatus};
use crate::ports::{NetworkSource, SourceError};

use super::parser::{self, ParseError};
use super::RpcConfig;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Empty result for {0}")]
    MissingResult(String),

    #[error("Block {0} not found")]
    MissingBlock(u64),
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Block header fields we read; transactions are hashes only
#[derive(Debug, Deserialize)]
struct RpcBlock {
    hash: Option<String>,
    timestamp: String,
    #[serde(default)]
    transactions: Vec<Value>,
}

/// Network source reading an Ethereum-compatible node over JSON-RPC
pub struct RpcNetworkSource {
    client: reqwest::Client,
    config: RpcConfig,
    next_id: AtomicU64,
}

impl RpcNetworkSource {
    pub fn new(config: RpcConfig) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            next_id: AtomicU64::new(1),
        })
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let response: RpcResponse = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T, RpcError> {
        let result = self.request(method, params).await?;
        if result.is_null() {
            return Err(RpcError::MissingResult(method.to_string()));
        }
        Ok(serde_json::from_value(result)?)
    }

    async fn block_number(&self) -> Result<u64, RpcError> {
        let quantity: String = self.call("eth_blockNumber", json!([])).await?;
        Ok(parser::parse_quantity(&quantity)?)
    }

    async fn gas_price_gwei(&self) -> Result<f64, RpcError> {
        let quantity: String = self.call("eth_gasPrice", json!([])).await?;
        Ok(parser::wei_to_gwei(parser::parse_quantity_u128(&quantity)?))
    }

    async fn block(&self, number: u64) -> Result<Option<RpcBlock>, RpcError> {
        let result = self
            .request(
                "eth_getBlockByNumber",
                json!([parser::to_quantity(number), false]),
            )
            .await?;

        if result.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(result)?))
    }

    async fn required_block(&self, number: u64) -> Result<RpcBlock, RpcError> {
        self.block(number).await?.ok_or(RpcError::MissingBlock(number))
    }

    async fn average_block_time(&self, best: u64) -> Result<f64, RpcError> {
        let sample = self.config.block_time_sample.min(best);
        if sample == 0 {
            return Ok(0.0);
        }

        let (newest, oldest) = tokio::try_join!(
            self.required_block(best),
            self.required_block(best - sample),
        )?;

        Ok(parser::average_block_time(
            parser::parse_quantity(&newest.timestamp)?,
            parser::parse_quantity(&oldest.timestamp)?,
            sample,
        ))
    }

    async fn recent_transactions(&self, best: u64) -> Result<u64, RpcError> {
        let blocks = try_join_all(
            (0..self.config.recent_tx_blocks)
                .filter_map(|offset| best.checked_sub(offset))
                .map(|number| self.block(number)),
        )
        .await?;

        Ok(blocks
            .iter()
            .flatten()
            .map(|block| block.transactions.len() as u64)
            .sum())
    }

    async fn collect_metrics(&self) -> Result<NetworkMetrics, RpcError> {
        let best = self.block_number().await?;

        let (block, gas_price, block_time, recent_transactions) = tokio::try_join!(
            self.required_block(best),
            self.gas_price_gwei(),
            self.average_block_time(best),
            self.recent_transactions(best),
        )?;

        debug!(
            best,
            gas_price, block_time, recent_transactions, "Fetched network metrics"
        );

        Ok(NetworkMetrics {
            best_block: best,
            best_block_hash: block.hash.unwrap_or_default(),
            block_time,
            gas_price,
            recent_transactions,
            status: NetworkStatus::Healthy,
            timestamp: Utc::now(),
        })
    }
}

#[async_trait]
impl NetworkSource for RpcNetworkSource {
    async fn fetch_metrics(&self) -> Result<NetworkMetrics, SourceError> {
        Ok(self.collect_metrics().await?)
    }

    async fn chain_id(&self) -> Result<u64, SourceError> {
        let quantity: String = self.call("eth_chainId", json!([])).await?;
        Ok(parser::parse_quantity(&quantity)?)
    }
}

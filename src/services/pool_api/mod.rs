//! Pool fee-configuration API client.
//!
//! The pool program publishes its fee tiers through a public HTTP API. The
//! ids it returns are mainnet config accounts; on devnet the pool
//! provisioner re-derives them against the devnet program id.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolApiError {
    #[error("fee config request failed: {0}")]
    Request(String),

    #[error("fee config API reported failure")]
    Unsuccessful,

    #[error("no fee configurations available")]
    Empty,
}

/// One CPMM fee tier. Rates are in hundredths of a basis point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CpmmFeeConfig {
    /// Fee-config account, base58. Rewritten by the devnet remap.
    pub id: String,
    pub index: u16,
    pub protocol_fee_rate: u64,
    pub trade_fee_rate: u64,
    pub fund_fee_rate: u64,
    pub create_pool_fee: String,
}

#[derive(Debug, Deserialize)]
struct FeeConfigResponse {
    success: bool,
    data: Vec<CpmmFeeConfig>,
}

#[async_trait]
#[cfg_attr(test, automock)]
pub trait PoolApiTrait: Send + Sync {
    /// Fetches the published CPMM fee configurations, lowest index first.
    async fn get_cpmm_configs(&self) -> Result<Vec<CpmmFeeConfig>, PoolApiError>;
}

pub struct PoolApiService {
    base_url: String,
    client: Client,
}

impl PoolApiService {
    pub fn new(base_url: String) -> Result<Self, PoolApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PoolApiError::Request(e.to_string()))?;

        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl PoolApiTrait for PoolApiService {
    async fn get_cpmm_configs(&self) -> Result<Vec<CpmmFeeConfig>, PoolApiError> {
        let response: FeeConfigResponse = self
            .client
            .get(format!("{}/main/cpmm-config", self.base_url))
            .send()
            .await
            .map_err(|e| PoolApiError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| PoolApiError::Request(e.to_string()))?
            .json()
            .await
            .map_err(|e| PoolApiError::Request(e.to_string()))?;

        if !response.success {
            return Err(PoolApiError::Unsuccessful);
        }
        if response.data.is_empty() {
            return Err(PoolApiError::Empty);
        }

        let mut configs = response.data;
        configs.sort_by_key(|c| c.index);
        Ok(configs)
    }
}

//! Network configuration.
//!
//! Cluster selection, RPC endpoint, confirmation timing and the pool-program
//! identifiers are static configuration, never user input. Construct a
//! [`NetworkConfig`] explicitly or read it from the environment:
//!
//! - LAUNCHPAD_CLUSTER: "mainnet" or "devnet" (default "devnet")
//! - LAUNCHPAD_RPC_URL: RPC endpoint override
//! - LAUNCHPAD_BLOB_STORE_URL: blob store endpoint for metadata uploads

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::constants::{
    DEVNET_CPMM_FEE_ACCOUNT, DEVNET_CPMM_PROGRAM_ID, MAINNET_CPMM_FEE_ACCOUNT,
    MAINNET_CPMM_PROGRAM_ID, POOL_API_BASE_URL,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    Mainnet,
    Devnet,
}

impl Cluster {
    /// Test/dev clusters need fee-configuration ids re-derived against the
    /// devnet pool program (see the pool provisioner).
    pub fn is_devnet(&self) -> bool {
        matches!(self, Cluster::Devnet)
    }

    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Cluster::Mainnet),
            "devnet" => Ok(Cluster::Devnet),
            other => Err(format!("unknown cluster: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub cluster: Cluster,
    pub rpc_url: String,
    pub request_timeout: Duration,
    pub confirmation_timeout: Duration,
    pub confirmation_poll_interval: Duration,
    pub pool_program_id: Pubkey,
    pub pool_fee_account: Pubkey,
    pub pool_api_url: String,
    pub blob_store_url: String,
}

impl NetworkConfig {
    pub fn for_cluster(cluster: Cluster) -> Self {
        let (program, fee_account) = match cluster {
            Cluster::Mainnet => (MAINNET_CPMM_PROGRAM_ID, MAINNET_CPMM_FEE_ACCOUNT),
            Cluster::Devnet => (DEVNET_CPMM_PROGRAM_ID, DEVNET_CPMM_FEE_ACCOUNT),
        };
        Self {
            cluster,
            rpc_url: cluster.default_rpc_url().to_string(),
            request_timeout: Duration::from_secs(30),
            confirmation_timeout: Duration::from_secs(60),
            confirmation_poll_interval: Duration::from_millis(500),
            // Static program ids, valid by construction.
            pool_program_id: Pubkey::from_str(program).expect("valid pool program id"),
            pool_fee_account: Pubkey::from_str(fee_account).expect("valid pool fee account"),
            pool_api_url: POOL_API_BASE_URL.to_string(),
            blob_store_url: String::new(),
        }
    }

    pub fn devnet() -> Self {
        Self::for_cluster(Cluster::Devnet)
    }

    pub fn mainnet() -> Self {
        Self::for_cluster(Cluster::Mainnet)
    }

    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let cluster = env::var("LAUNCHPAD_CLUSTER")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Cluster::Devnet);

        let mut config = Self::for_cluster(cluster);
        if let Ok(url) = env::var("LAUNCHPAD_RPC_URL") {
            config.rpc_url = url;
        }
        if let Ok(url) = env::var("LAUNCHPAD_BLOB_STORE_URL") {
            config.blob_store_url = url;
        }
        config
    }
}

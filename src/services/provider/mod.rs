//! Ledger RPC provider.
//!
//! Thin abstraction over the non-blocking `RpcClient` exposing the handful of
//! operations the orchestration pipeline needs: rent queries, blockhash
//! fetches, transaction submission and signature-status lookups. Failures are
//! classified into [`SolanaProviderError`] and surfaced to the caller;
//! queries are never retried here, the orchestrator owns that decision.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
#[cfg(test)]
use mockall::automock;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
    rpc_request::TokenAccountsFilter,
};
use solana_sdk::{
    account::Account,
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::Signature,
    transaction::{Transaction, TransactionError},
};
use thiserror::Error;

/// Errors that can occur when interacting with the ledger provider.
#[derive(Error, Debug)]
pub enum SolanaProviderError {
    /// Network/IO error (connection issues, timeouts)
    #[error("network error: {0}")]
    NetworkError(String),

    /// RPC protocol error reported by the node
    #[error("RPC error: {0}")]
    RpcError(String),

    /// Invalid address format
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Account data that does not deserialize into the expected layout
    #[error("invalid account data: {0}")]
    InvalidAccountData(String),
}

impl SolanaProviderError {
    /// Classifies a Solana RPC client error into the appropriate variant.
    pub fn from_rpc_error(error: ClientError) -> Self {
        match error.kind() {
            ClientErrorKind::Io(_) => SolanaProviderError::NetworkError(error.to_string()),
            ClientErrorKind::Reqwest(_) => SolanaProviderError::NetworkError(error.to_string()),
            _ => SolanaProviderError::RpcError(error.to_string()),
        }
    }
}

/// A trait that abstracts the ledger operations the pipeline consumes.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait SolanaProviderTrait: Send + Sync {
    /// Retrieves the latest blockhash; fetched once per plan and shared by
    /// every batch built on it.
    async fn get_latest_blockhash(&self) -> Result<Hash, SolanaProviderError>;

    /// Minimum balance for rent exemption of `data_size` bytes.
    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, SolanaProviderError>;

    /// Submits a signed transaction, returning its signature.
    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError>;

    /// Processed-level status of a submitted transaction: `None` while the
    /// ledger has not seen it, `Some(Err(_))` when it failed on chain.
    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<Result<(), TransactionError>>, SolanaProviderError>;

    /// Whether the transaction reached the provider's commitment level.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
    ) -> Result<bool, SolanaProviderError>;

    /// Fetches a raw account.
    async fn get_account(&self, pubkey: &Pubkey) -> Result<Account, SolanaProviderError>;

    /// All token accounts of `owner` under the given token program, with
    /// their decoded account data.
    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, SolanaProviderError>;
}

pub struct SolanaProvider {
    client: RpcClient,
}

impl std::fmt::Debug for SolanaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaProvider").finish_non_exhaustive()
    }
}

impl SolanaProvider {
    pub fn new(rpc_url: String, timeout: Duration) -> Self {
        Self::new_with_commitment(rpc_url, timeout, CommitmentConfig::confirmed())
    }

    pub fn new_with_commitment(
        rpc_url: String,
        timeout: Duration,
        commitment: CommitmentConfig,
    ) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(rpc_url, timeout, commitment);
        Self { client }
    }
}

#[async_trait]
impl SolanaProviderTrait for SolanaProvider {
    async fn get_latest_blockhash(&self) -> Result<Hash, SolanaProviderError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_minimum_balance_for_rent_exemption(
        &self,
        data_size: usize,
    ) -> Result<u64, SolanaProviderError> {
        debug!("querying rent-exempt minimum for {} bytes", data_size);
        self.client
            .get_minimum_balance_for_rent_exemption(data_size)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn send_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, SolanaProviderError> {
        self.client
            .send_transaction(transaction)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<Result<(), TransactionError>>, SolanaProviderError> {
        self.client
            .get_signature_status(signature)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
    ) -> Result<bool, SolanaProviderError> {
        self.client
            .confirm_transaction(signature)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Account, SolanaProviderError> {
        self.client
            .get_account(pubkey)
            .await
            .map_err(SolanaProviderError::from_rpc_error)
    }

    async fn get_token_accounts_by_owner(
        &self,
        owner: &Pubkey,
        program_id: &Pubkey,
    ) -> Result<Vec<(Pubkey, Account)>, SolanaProviderError> {
        let keyed_accounts = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(*program_id))
            .await
            .map_err(SolanaProviderError::from_rpc_error)?;

        let mut accounts = Vec::with_capacity(keyed_accounts.len());
        for keyed in keyed_accounts {
            let pubkey = Pubkey::from_str(&keyed.pubkey)
                .map_err(|e| SolanaProviderError::InvalidAddress(format!("{}: {e}", keyed.pubkey)))?;
            let account: Account = keyed.account.decode().ok_or_else(|| {
                SolanaProviderError::InvalidAccountData(format!(
                    "undecodable account data for {pubkey}"
                ))
            })?;
            accounts.push((pubkey, account));
        }
        Ok(accounts)
    }
}

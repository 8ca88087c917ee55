//! Portfolio discovery: the tokens a wallet both holds and controls.
//!
//! Lists the owner's Token-2022 accounts, keeps only mints whose mint
//! authority is the owner, and reads each mint's metadata entry straight
//! from its TLV data. This is the listing a pool-creation form offers as
//! candidate legs.

use std::sync::Arc;

use log::warn;
use solana_sdk::pubkey::Pubkey;
use spl_token_2022::extension::{BaseStateWithExtensions, StateWithExtensions};
use spl_token_2022::state::{Account as TokenAccount, Mint};
use spl_token_metadata_interface::state::TokenMetadata;

use crate::models::{LaunchpadError, OwnedToken};
use crate::services::{BlobStoreTrait, SolanaProviderTrait};

pub struct PortfolioService<P, B> {
    provider: Arc<P>,
    blob_store: Arc<B>,
}

impl<P, B> PortfolioService<P, B>
where
    P: SolanaProviderTrait,
    B: BlobStoreTrait,
{
    pub fn new(provider: Arc<P>, blob_store: Arc<B>) -> Self {
        Self {
            provider,
            blob_store,
        }
    }

    /// Tokens of `owner` that carry metadata and whose mint authority is
    /// `owner` itself. Accounts that fail to decode are skipped, not fatal:
    /// a wallet can hold arbitrary third-party accounts.
    pub async fn owned_tokens(&self, owner: &Pubkey) -> Result<Vec<OwnedToken>, LaunchpadError> {
        let accounts = self
            .provider
            .get_token_accounts_by_owner(owner, &spl_token_2022::id())
            .await
            .map_err(|e| LaunchpadError::LedgerQuery(e.to_string()))?;

        let mut tokens = Vec::new();
        for (pubkey, account) in accounts {
            let token_account = match StateWithExtensions::<TokenAccount>::unpack(&account.data) {
                Ok(state) => state,
                Err(e) => {
                    warn!("skipping undecodable token account {}: {}", pubkey, e);
                    continue;
                }
            };
            let mint = token_account.base.mint;

            let mint_account = self
                .provider
                .get_account(&mint)
                .await
                .map_err(|e| LaunchpadError::LedgerQuery(e.to_string()))?;
            let mint_state = match StateWithExtensions::<Mint>::unpack(&mint_account.data) {
                Ok(state) => state,
                Err(e) => {
                    warn!("skipping undecodable mint {}: {}", mint, e);
                    continue;
                }
            };

            if Option::<Pubkey>::from(mint_state.base.mint_authority) != Some(*owner) {
                continue;
            }
            let metadata = match mint_state.get_variable_len_extension::<TokenMetadata>() {
                Ok(metadata) => metadata,
                // No metadata entry: not a launchpad-created token.
                Err(_) => continue,
            };

            let image = self.resolve_image(&metadata.uri).await;
            tokens.push(OwnedToken {
                mint,
                name: metadata.name,
                symbol: metadata.symbol,
                decimals: mint_state.base.decimals,
                image,
            });
        }
        Ok(tokens)
    }

    /// Best-effort: a missing or malformed metadata document leaves the
    /// token listed without an image.
    async fn resolve_image(&self, uri: &str) -> Option<String> {
        if uri.is_empty() {
            return None;
        }
        match self.blob_store.fetch_json(uri).await {
            Ok(document) => document
                .get("image")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            Err(e) => {
                warn!("metadata document {} unavailable: {}", uri, e);
                None
            }
        }
    }
}

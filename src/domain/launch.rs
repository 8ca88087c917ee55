//! End-to-end flows: token launch and pool creation.
//!
//! Assembles the component planners into orchestration plans and runs them.
//! All collaborators are owned by the caller and passed in at construction;
//! nothing here reads global state.

use std::sync::Arc;

use log::info;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;

use crate::config::NetworkConfig;
use crate::constants::MAX_DECIMALS;
use crate::models::{
    ExecutionResult, InstructionBatch, LaunchRequest, LaunchpadError, MintDescriptor,
    OrchestrationPlan, PoolIdentifiers, Stage, TokenSpec,
};
use crate::services::{
    BlobStoreTrait, PoolApiTrait, SolanaProviderTrait, WalletSignerError, WalletSignerTrait,
};

use super::{
    derive_holding_account, mint_account_space, plan_account_creation, plan_holding_account,
    plan_metadata_init, plan_mint, plan_mint_init, plan_pool_creation, remap_fee_configs,
    scale_amount, MintMetadata, Orchestrator,
};

/// Outcome of a token launch: the new mint, the owner's holding account and
/// the full per-stage trace.
#[derive(Debug, Clone)]
pub struct TokenLaunchReceipt {
    pub mint: Pubkey,
    pub holding_account: Pubkey,
    pub result: ExecutionResult,
}

/// Outcome of a pool creation.
#[derive(Debug, Clone)]
pub struct PoolCreationReceipt {
    pub pool: PoolIdentifiers,
    pub result: ExecutionResult,
}

pub struct TokenLaunchService<P, W, B, F> {
    provider: Arc<P>,
    wallet: Arc<W>,
    blob_store: Arc<B>,
    pool_api: Arc<F>,
    config: NetworkConfig,
    orchestrator: Orchestrator<P, W>,
}

impl<P, W, B, F> TokenLaunchService<P, W, B, F>
where
    P: SolanaProviderTrait,
    W: WalletSignerTrait,
    B: BlobStoreTrait,
    F: PoolApiTrait,
{
    pub fn new(
        provider: Arc<P>,
        wallet: Arc<W>,
        blob_store: Arc<B>,
        pool_api: Arc<F>,
        config: NetworkConfig,
    ) -> Self {
        let orchestrator = Orchestrator::new(Arc::clone(&provider), Arc::clone(&wallet), &config);
        Self {
            provider,
            wallet,
            blob_store,
            pool_api,
            config,
            orchestrator,
        }
    }

    /// Creates a mint with on-chain metadata, the owner's holding account
    /// and the initial supply, as a three-stage plan.
    pub async fn launch_token(
        &self,
        request: &LaunchRequest,
    ) -> Result<TokenLaunchReceipt, LaunchpadError> {
        let owner = self.wallet.pubkey().map_err(wallet_error)?;

        if request.decimals > MAX_DECIMALS {
            return Err(LaunchpadError::Validation(format!(
                "decimals must be between 0 and {MAX_DECIMALS}, got {}",
                request.decimals
            )));
        }
        let raw_supply = scale_amount(&request.initial_supply, request.decimals)?;

        let uri = match &request.metadata_uri {
            Some(uri) => uri.clone(),
            None => self.upload_metadata_document(request).await?,
        };
        let spec = TokenSpec {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            uri,
            decimals: request.decimals,
            additional_metadata: request.additional_metadata.clone(),
        };

        let mint_keypair = Keypair::new();
        let mint = mint_keypair.pubkey();
        info!("launching token {} ({}) as mint {}", spec.name, spec.symbol, mint);

        // Stage 1: allocate and initialize the mint, pointer first. Rent is
        // funded for the final size including the metadata entry.
        let metadata = MintMetadata::for_mint(&spec, mint, owner);
        let space = mint_account_space()?;
        let funded_size = space + metadata.tlv_size()?;
        let mut mint_instructions = vec![
            plan_account_creation(
                self.provider.as_ref(),
                &owner,
                &mint,
                space,
                funded_size,
                &spl_token_2022::id(),
            )
            .await?,
        ];
        mint_instructions.extend(plan_mint_init(&mint, &owner, None, spec.decimals, Some(&mint))?);
        mint_instructions.extend(plan_metadata_init(&mint, &owner, &owner, &spec));

        // Stage 2: the owner's holding account.
        let holding_account = derive_holding_account(&owner, &mint, &spl_token_2022::id());
        let holding_instruction =
            plan_holding_account(&owner, &owner, &mint, &spl_token_2022::id());

        // Stage 3: mint the initial supply.
        let mint_instruction = plan_mint(&mint, &holding_account, &owner, raw_supply)?;

        let mut plan = OrchestrationPlan::new(owner);
        plan.push(InstructionBatch::new(Stage::CreateMint, mint_instructions).with_signer(mint_keypair));
        plan.push(InstructionBatch::new(Stage::CreateHoldingAccount, vec![holding_instruction]));
        plan.push(InstructionBatch::new(Stage::MintSupply, vec![mint_instruction]));

        let result = self.orchestrator.execute(plan).await?;
        Ok(TokenLaunchReceipt {
            mint,
            holding_account,
            result,
        })
    }

    /// Registers a two-asset pool for two existing mints. Deposit amounts
    /// are user-entered decimal strings, scaled per leg once both mints are
    /// resolved.
    pub async fn create_pool(
        &self,
        base_mint: &Pubkey,
        quote_mint: &Pubkey,
        base_amount: &str,
        quote_amount: &str,
    ) -> Result<PoolCreationReceipt, LaunchpadError> {
        let creator = self.wallet.pubkey().map_err(wallet_error)?;

        let mint_a = self.resolve_mint(base_mint).await?;
        let mint_b = self.resolve_mint(quote_mint).await?;
        let amount_a = scale_amount(base_amount, mint_a.decimals)?;
        let amount_b = scale_amount(quote_amount, mint_b.decimals)?;

        let mut fee_configs = self
            .pool_api
            .get_cpmm_configs()
            .await
            .map_err(|e| LaunchpadError::FeeConfig(e.to_string()))?;
        if self.config.cluster.is_devnet() {
            remap_fee_configs(&mut fee_configs, &self.config.pool_program_id);
        }
        let fee_config = &fee_configs[0];

        let pool_plan = plan_pool_creation(
            &creator,
            &mint_a,
            &mint_b,
            amount_a,
            amount_b,
            fee_config,
            &self.config.pool_program_id,
            &self.config.pool_fee_account,
        )?;
        info!(
            "creating pool {} for {} / {}",
            pool_plan.identifiers.pool_state, mint_a.address, mint_b.address
        );

        let mut plan = OrchestrationPlan::new(creator);
        plan.push(InstructionBatch::new(Stage::CreatePool, pool_plan.instructions));

        let result = self.orchestrator.execute(plan).await?;
        Ok(PoolCreationReceipt {
            pool: pool_plan.identifiers,
            result,
        })
    }

    /// Resolves an existing mint into a descriptor: owning token program
    /// plus decimals, both read from ledger state.
    pub async fn resolve_mint(&self, mint: &Pubkey) -> Result<MintDescriptor, LaunchpadError> {
        use solana_sdk::program_pack::Pack;
        use spl_token_2022::extension::StateWithExtensions;

        let account = self
            .provider
            .get_account(mint)
            .await
            .map_err(|e| LaunchpadError::LedgerQuery(e.to_string()))?;

        let program_id = account.owner;
        if program_id != spl_token::id() && program_id != spl_token_2022::id() {
            return Err(LaunchpadError::Validation(format!(
                "{mint} is not owned by a token program"
            )));
        }

        let decimals = if program_id == spl_token::id() {
            spl_token::state::Mint::unpack(&account.data)
                .map_err(|e| LaunchpadError::Validation(format!("{mint} is not a mint: {e}")))?
                .decimals
        } else {
            StateWithExtensions::<spl_token_2022::state::Mint>::unpack(&account.data)
                .map_err(|e| LaunchpadError::Validation(format!("{mint} is not a mint: {e}")))?
                .base
                .decimals
        };

        Ok(MintDescriptor {
            address: *mint,
            program_id,
            decimals,
        })
    }

    async fn upload_metadata_document(
        &self,
        request: &LaunchRequest,
    ) -> Result<String, LaunchpadError> {
        let document = serde_json::json!({
            "name": request.name,
            "symbol": request.symbol,
            "image": request.image_url,
        });
        self.blob_store
            .upload_json("metadata.json", &document)
            .await
            .map_err(|e| LaunchpadError::Upload(e.to_string()))
    }
}

fn wallet_error(error: WalletSignerError) -> LaunchpadError {
    match error {
        WalletSignerError::UserRejected => LaunchpadError::UserRejected,
        WalletSignerError::NotConnected => LaunchpadError::WalletNotConnected,
        WalletSignerError::Signing(message) => LaunchpadError::Signing(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BatchState, PlanState};
    use crate::services::{
        CpmmFeeConfig, LocalWalletSigner, MockBlobStoreTrait, MockPoolApiTrait,
        MockSolanaProviderTrait,
    };
    use super::super::derive_amm_config_address;
    use mockall::predicate::eq;
    use solana_sdk::account::Account;
    use solana_sdk::hash::Hash;
    use solana_sdk::program_option::COption;
    use solana_sdk::program_pack::Pack;
    use solana_sdk::transaction::Transaction;
    use std::sync::Mutex;
    use std::time::Duration;

    fn test_config() -> NetworkConfig {
        let mut config = NetworkConfig::devnet();
        config.confirmation_timeout = Duration::from_millis(200);
        config.confirmation_poll_interval = Duration::from_millis(10);
        config
    }

    /// Provider that confirms everything and records submitted transactions.
    fn recording_provider(
        submitted: Arc<Mutex<Vec<Transaction>>>,
    ) -> MockSolanaProviderTrait {
        let mut provider = MockSolanaProviderTrait::new();
        provider
            .expect_get_latest_blockhash()
            .returning(|| Box::pin(async { Ok(Hash::new_unique()) }));
        provider
            .expect_get_minimum_balance_for_rent_exemption()
            .returning(|_| Box::pin(async { Ok(3_480_000) }));
        provider.expect_send_transaction().returning(move |tx| {
            let signature = tx.signatures[0];
            submitted.lock().unwrap().push(tx.clone());
            Box::pin(async move { Ok(signature) })
        });
        provider
            .expect_get_signature_status()
            .returning(|_| Box::pin(async { Ok(Some(Ok(()))) }));
        provider
            .expect_confirm_transaction()
            .returning(|_| Box::pin(async { Ok(true) }));
        provider
    }

    fn mint_account(owner_program: Pubkey, decimals: u8, authority: Pubkey) -> Account {
        let mint = spl_token_2022::state::Mint {
            mint_authority: COption::Some(authority),
            supply: 0,
            decimals,
            is_initialized: true,
            freeze_authority: COption::None,
        };
        let mut data = vec![0u8; spl_token_2022::state::Mint::LEN];
        spl_token_2022::state::Mint::pack(mint, &mut data).unwrap();
        Account {
            lamports: 1_461_600,
            data,
            owner: owner_program,
            executable: false,
            rent_epoch: 0,
        }
    }

    fn kira_request() -> LaunchRequest {
        LaunchRequest {
            name: "Kira".to_string(),
            symbol: "KIR".to_string(),
            image_url: "https://x/kira.png".to_string(),
            metadata_uri: Some("https://x/m.json".to_string()),
            decimals: 9,
            initial_supply: "1000".to_string(),
            additional_metadata: Vec::new(),
        }
    }

    fn service(
        provider: MockSolanaProviderTrait,
        blob_store: MockBlobStoreTrait,
        pool_api: MockPoolApiTrait,
    ) -> (
        TokenLaunchService<
            MockSolanaProviderTrait,
            LocalWalletSigner,
            MockBlobStoreTrait,
            MockPoolApiTrait,
        >,
        Pubkey,
    ) {
        let wallet = Arc::new(LocalWalletSigner::new(Keypair::new()));
        let owner = wallet.pubkey().unwrap();
        let service = TokenLaunchService::new(
            Arc::new(provider),
            wallet,
            Arc::new(blob_store),
            Arc::new(pool_api),
            test_config(),
        );
        (service, owner)
    }

    #[tokio::test]
    async fn launch_mints_the_scaled_supply_in_three_stages() {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let provider = recording_provider(Arc::clone(&submitted));
        let (service, owner) = service(provider, MockBlobStoreTrait::new(), MockPoolApiTrait::new());

        let receipt = service.launch_token(&kira_request()).await.unwrap();

        assert_eq!(receipt.result.state, PlanState::Completed);
        assert_eq!(receipt.result.stages.len(), 3);
        assert!(receipt
            .result
            .stages
            .iter()
            .all(|s| s.state == BatchState::Succeeded));

        let transactions = submitted.lock().unwrap();
        assert_eq!(transactions.len(), 3);

        // Every batch is built on the same blockhash.
        let blockhash = transactions[0].message.recent_blockhash;
        assert!(transactions
            .iter()
            .all(|tx| tx.message.recent_blockhash == blockhash));

        // The create-mint batch funds and initializes the new mint, which
        // co-signs it.
        assert!(transactions[0].message.account_keys.contains(&receipt.mint));
        assert_eq!(transactions[0].message.instructions.len(), 4);

        // The holding account is the derived one.
        assert_eq!(
            receipt.holding_account,
            derive_holding_account(&owner, &receipt.mint, &spl_token_2022::id())
        );

        // 1000 tokens at 9 decimals mint as 10^12 base units.
        let mint_to = &transactions[2].message.instructions[0];
        assert_eq!(mint_to.data[0], 7);
        assert_eq!(
            u64::from_le_bytes(mint_to.data[1..9].try_into().unwrap()),
            1_000_000_000_000
        );
    }

    #[tokio::test]
    async fn launch_uploads_metadata_when_no_uri_is_given() {
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let provider = recording_provider(Arc::clone(&submitted));

        let mut blob_store = MockBlobStoreTrait::new();
        blob_store
            .expect_upload_json()
            .withf(|file_name, document| {
                file_name == "metadata.json"
                    && document["name"] == "Kira"
                    && document["image"] == "https://x/kira.png"
            })
            .times(1)
            .returning(|_, _| {
                Box::pin(async { Ok("https://cdn.example.com/m.json".to_string()) })
            });

        let (service, _) = service(provider, blob_store, MockPoolApiTrait::new());

        let mut request = kira_request();
        request.metadata_uri = None;
        let receipt = service.launch_token(&request).await.unwrap();
        assert!(receipt.result.is_complete());
    }

    #[tokio::test]
    async fn launch_validates_before_any_network_call() {
        // No provider expectations: any RPC call would panic the mock.
        let (service, _) = service(
            MockSolanaProviderTrait::new(),
            MockBlobStoreTrait::new(),
            MockPoolApiTrait::new(),
        );

        let mut request = kira_request();
        request.decimals = 12;
        assert!(matches!(
            service.launch_token(&request).await,
            Err(LaunchpadError::Validation(_))
        ));

        let mut request = kira_request();
        request.initial_supply = "-1".to_string();
        assert!(matches!(
            service.launch_token(&request).await,
            Err(LaunchpadError::Amount(_))
        ));
    }

    #[tokio::test]
    async fn pool_creation_scales_each_leg_by_its_own_decimals() {
        let base = Pubkey::new_from_array([1; 32]);
        let quote = Pubkey::new_from_array([2; 32]);

        let submitted = Arc::new(Mutex::new(Vec::new()));
        let mut provider = recording_provider(Arc::clone(&submitted));
        let owner_placeholder = Pubkey::new_unique();
        provider
            .expect_get_account()
            .with(eq(base))
            .returning(move |_| {
                let account = mint_account(spl_token_2022::id(), 9, owner_placeholder);
                Box::pin(async move { Ok(account) })
            });
        provider
            .expect_get_account()
            .with(eq(quote))
            .returning(move |_| {
                let account = mint_account(spl_token_2022::id(), 6, owner_placeholder);
                Box::pin(async move { Ok(account) })
            });

        let mainnet_id = Pubkey::new_unique();
        let mut pool_api = MockPoolApiTrait::new();
        pool_api.expect_get_cpmm_configs().times(1).returning(move || {
            let config = CpmmFeeConfig {
                id: mainnet_id.to_string(),
                index: 0,
                protocol_fee_rate: 120_000,
                trade_fee_rate: 2_500,
                fund_fee_rate: 40_000,
                create_pool_fee: "150000000".to_string(),
            };
            Box::pin(async move { Ok(vec![config]) })
        });

        let (service, _) = service(provider, MockBlobStoreTrait::new(), pool_api);

        let receipt = service
            .create_pool(&base, &quote, "10", "500")
            .await
            .unwrap();

        assert_eq!(receipt.result.state, PlanState::Completed);
        assert_eq!(receipt.result.stages.len(), 1);
        assert_eq!(receipt.result.stages[0].stage, Stage::CreatePool);

        let transactions = submitted.lock().unwrap();
        let pool_ix = &transactions[0].message.instructions[0];
        // 10 at 9 decimals and 500 at 6 decimals, passed through unchanged.
        assert_eq!(
            u64::from_le_bytes(pool_ix.data[8..16].try_into().unwrap()),
            10_000_000_000
        );
        assert_eq!(
            u64::from_le_bytes(pool_ix.data[16..24].try_into().unwrap()),
            500_000_000
        );

        // On devnet the fee config id is re-derived from the devnet program.
        let config = test_config();
        let expected_config = derive_amm_config_address(&config.pool_program_id, 0);
        assert_eq!(receipt.pool.amm_config, expected_config);
        assert_ne!(expected_config, mainnet_id);
    }

    #[tokio::test]
    async fn pool_creation_rejects_non_mint_accounts() {
        let mint = Pubkey::new_unique();
        let mut provider = MockSolanaProviderTrait::new();
        provider.expect_get_account().returning(|_| {
            Box::pin(async {
                Ok(Account {
                    lamports: 1,
                    data: vec![],
                    owner: solana_sdk::system_program::id(),
                    executable: false,
                    rent_epoch: 0,
                })
            })
        });

        let (service, _) = service(provider, MockBlobStoreTrait::new(), MockPoolApiTrait::new());
        let result = service
            .create_pool(&mint, &Pubkey::new_unique(), "1", "1")
            .await;
        assert!(matches!(result, Err(LaunchpadError::Validation(_))));
    }
}

//! Pool provisioner: plans the CPMM `initialize` instruction for a new
//! two-asset pool and derives every program address involved.

use std::str::FromStr;

use log::debug;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::constants::{
    AMM_CONFIG_SEED, AUTH_SEED, CPMM_INITIALIZE_DISCRIMINATOR, OBSERVATION_SEED,
    POOL_LP_MINT_SEED, POOL_SEED, POOL_VAULT_SEED,
};
use crate::models::{LaunchpadError, MintDescriptor, PoolIdentifiers};
use crate::services::CpmmFeeConfig;

use super::derive_holding_account;

/// Instructions plus the derived addresses of the pool being created.
pub struct PoolPlan {
    pub instructions: Vec<Instruction>,
    pub identifiers: PoolIdentifiers,
}

/// Derives a fee-config account from the pool program and the config index.
pub fn derive_amm_config_address(pool_program: &Pubkey, index: u16) -> Pubkey {
    Pubkey::find_program_address(&[AMM_CONFIG_SEED, &index.to_be_bytes()], pool_program).0
}

/// Rewrites API-provided fee-config ids against the given pool program.
///
/// The fee-config API publishes mainnet config accounts; on test/dev
/// clusters the pool program is a different deployment, so every id must be
/// re-derived from that program and the config index. This remap is a
/// required compatibility step, not an optimization.
pub fn remap_fee_configs(configs: &mut [CpmmFeeConfig], pool_program: &Pubkey) {
    for config in configs.iter_mut() {
        let derived = derive_amm_config_address(pool_program, config.index);
        debug!("remapping fee config {} -> {}", config.id, derived);
        config.id = derived.to_string();
    }
}

/// Plans the registration of a two-asset pool with the given fee tier.
///
/// Amounts arrive pre-scaled to raw base units; both mint descriptors must
/// already be resolved (decimals and owning program known). The pool program
/// requires its token-0 to sort below token-1 byte-wise, so the legs are
/// reordered here and the amounts follow their mints.
pub fn plan_pool_creation(
    creator: &Pubkey,
    mint_a: &MintDescriptor,
    mint_b: &MintDescriptor,
    amount_a: u64,
    amount_b: u64,
    fee_config: &CpmmFeeConfig,
    pool_program: &Pubkey,
    fee_account: &Pubkey,
) -> Result<PoolPlan, LaunchpadError> {
    if mint_a.address == mint_b.address {
        return Err(LaunchpadError::Validation(
            "pool legs must be two distinct mints".to_string(),
        ));
    }
    if amount_a == 0 || amount_b == 0 {
        return Err(LaunchpadError::Validation(
            "pool deposits must be non-zero".to_string(),
        ));
    }

    let amm_config = Pubkey::from_str(&fee_config.id).map_err(|e| {
        LaunchpadError::Validation(format!("invalid fee config id {}: {e}", fee_config.id))
    })?;

    let ((token_0, amount_0), (token_1, amount_1)) =
        if mint_a.address.to_bytes() < mint_b.address.to_bytes() {
            ((mint_a, amount_a), (mint_b, amount_b))
        } else {
            ((mint_b, amount_b), (mint_a, amount_a))
        };

    let (authority, _) = Pubkey::find_program_address(&[AUTH_SEED], pool_program);
    let (pool_state, _) = Pubkey::find_program_address(
        &[
            POOL_SEED,
            amm_config.as_ref(),
            token_0.address.as_ref(),
            token_1.address.as_ref(),
        ],
        pool_program,
    );
    let (lp_mint, _) =
        Pubkey::find_program_address(&[POOL_LP_MINT_SEED, pool_state.as_ref()], pool_program);
    let (token_0_vault, _) = Pubkey::find_program_address(
        &[POOL_VAULT_SEED, pool_state.as_ref(), token_0.address.as_ref()],
        pool_program,
    );
    let (token_1_vault, _) = Pubkey::find_program_address(
        &[POOL_VAULT_SEED, pool_state.as_ref(), token_1.address.as_ref()],
        pool_program,
    );
    let (observation_state, _) =
        Pubkey::find_program_address(&[OBSERVATION_SEED, pool_state.as_ref()], pool_program);

    let creator_token_0 = derive_holding_account(creator, &token_0.address, &token_0.program_id);
    let creator_token_1 = derive_holding_account(creator, &token_1.address, &token_1.program_id);
    // The LP mint is owned by the legacy token program.
    let creator_lp_token = derive_holding_account(creator, &lp_mint, &spl_token::id());

    let open_time: u64 = 0;
    let mut data = Vec::with_capacity(32);
    data.extend_from_slice(&CPMM_INITIALIZE_DISCRIMINATOR);
    data.extend_from_slice(&amount_0.to_le_bytes());
    data.extend_from_slice(&amount_1.to_le_bytes());
    data.extend_from_slice(&open_time.to_le_bytes());

    let accounts = vec![
        AccountMeta::new(*creator, true),
        AccountMeta::new_readonly(amm_config, false),
        AccountMeta::new_readonly(authority, false),
        AccountMeta::new(pool_state, false),
        AccountMeta::new_readonly(token_0.address, false),
        AccountMeta::new_readonly(token_1.address, false),
        AccountMeta::new(lp_mint, false),
        AccountMeta::new(creator_token_0, false),
        AccountMeta::new(creator_token_1, false),
        AccountMeta::new(creator_lp_token, false),
        AccountMeta::new(token_0_vault, false),
        AccountMeta::new(token_1_vault, false),
        AccountMeta::new(*fee_account, false),
        AccountMeta::new(observation_state, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(token_0.program_id, false),
        AccountMeta::new_readonly(token_1.program_id, false),
        AccountMeta::new_readonly(spl_associated_token_account::id(), false),
        AccountMeta::new_readonly(system_program::id(), false),
        AccountMeta::new_readonly(sysvar::rent::id(), false),
    ];

    let instruction = Instruction {
        program_id: *pool_program,
        accounts,
        data,
    };

    Ok(PoolPlan {
        instructions: vec![instruction],
        identifiers: PoolIdentifiers {
            pool_state,
            amm_config,
            authority,
            lp_mint,
            token_0_vault,
            token_1_vault,
            observation_state,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;

    fn fee_config(id: Pubkey, index: u16) -> CpmmFeeConfig {
        CpmmFeeConfig {
            id: id.to_string(),
            index,
            protocol_fee_rate: 120_000,
            trade_fee_rate: 2_500,
            fund_fee_rate: 40_000,
            create_pool_fee: "150000000".to_string(),
        }
    }

    fn descriptor(bytes: [u8; 32], decimals: u8) -> MintDescriptor {
        MintDescriptor {
            address: Pubkey::new_from_array(bytes),
            program_id: spl_token_2022::id(),
            decimals,
        }
    }

    #[test]
    fn fee_config_derivation_is_deterministic() {
        let program = NetworkConfig::devnet().pool_program_id;
        let first = derive_amm_config_address(&program, 0);
        let second = derive_amm_config_address(&program, 0);
        assert_eq!(first, second);
        assert_ne!(first, derive_amm_config_address(&program, 1));
    }

    #[test]
    fn remap_rewrites_every_config_id() {
        let program = NetworkConfig::devnet().pool_program_id;
        let mut configs = vec![
            fee_config(Pubkey::new_unique(), 0),
            fee_config(Pubkey::new_unique(), 1),
        ];
        let original: Vec<_> = configs.iter().map(|c| c.id.clone()).collect();

        remap_fee_configs(&mut configs, &program);

        for (config, original_id) in configs.iter().zip(original) {
            assert_ne!(config.id, original_id);
            assert_eq!(
                config.id,
                derive_amm_config_address(&program, config.index).to_string()
            );
        }
    }

    #[test]
    fn legs_are_reordered_to_the_canonical_token_order() {
        let config = NetworkConfig::devnet();
        let creator = Pubkey::new_unique();
        // mint_a sorts above mint_b, so the legs must swap.
        let mint_a = descriptor([9; 32], 9);
        let mint_b = descriptor([3; 32], 6);

        let plan = plan_pool_creation(
            &creator,
            &mint_a,
            &mint_b,
            10_000_000_000,
            500_000_000,
            &fee_config(Pubkey::new_unique(), 0),
            &config.pool_program_id,
            &config.pool_fee_account,
        )
        .unwrap();

        let instruction = &plan.instructions[0];
        assert_eq!(instruction.accounts[4].pubkey, mint_b.address);
        assert_eq!(instruction.accounts[5].pubkey, mint_a.address);
        // Amounts follow their mints.
        assert_eq!(
            u64::from_le_bytes(instruction.data[8..16].try_into().unwrap()),
            500_000_000
        );
        assert_eq!(
            u64::from_le_bytes(instruction.data[16..24].try_into().unwrap()),
            10_000_000_000
        );
    }

    #[test]
    fn scaled_amounts_pass_through_unchanged() {
        let config = NetworkConfig::devnet();
        let creator = Pubkey::new_unique();
        let mint_a = descriptor([1; 32], 9);
        let mint_b = descriptor([2; 32], 6);

        let plan = plan_pool_creation(
            &creator,
            &mint_a,
            &mint_b,
            10_000_000_000,
            500_000_000,
            &fee_config(Pubkey::new_unique(), 0),
            &config.pool_program_id,
            &config.pool_fee_account,
        )
        .unwrap();

        let data = &plan.instructions[0].data;
        assert_eq!(data[..8], CPMM_INITIALIZE_DISCRIMINATOR);
        assert_eq!(u64::from_le_bytes(data[8..16].try_into().unwrap()), 10_000_000_000);
        assert_eq!(u64::from_le_bytes(data[16..24].try_into().unwrap()), 500_000_000);
        // Pool opens immediately.
        assert_eq!(u64::from_le_bytes(data[24..32].try_into().unwrap()), 0);
    }

    #[test]
    fn identifiers_match_the_instruction_accounts() {
        let config = NetworkConfig::devnet();
        let creator = Pubkey::new_unique();
        let mint_a = descriptor([1; 32], 9);
        let mint_b = descriptor([2; 32], 6);

        let plan = plan_pool_creation(
            &creator,
            &mint_a,
            &mint_b,
            1_000,
            2_000,
            &fee_config(Pubkey::new_unique(), 0),
            &config.pool_program_id,
            &config.pool_fee_account,
        )
        .unwrap();

        let instruction = &plan.instructions[0];
        let ids = &plan.identifiers;
        assert_eq!(instruction.program_id, config.pool_program_id);
        assert_eq!(instruction.accounts.len(), 20);
        assert_eq!(instruction.accounts[0].pubkey, creator);
        assert!(instruction.accounts[0].is_signer);
        assert_eq!(instruction.accounts[1].pubkey, ids.amm_config);
        assert_eq!(instruction.accounts[2].pubkey, ids.authority);
        assert_eq!(instruction.accounts[3].pubkey, ids.pool_state);
        assert_eq!(instruction.accounts[6].pubkey, ids.lp_mint);
        assert_eq!(instruction.accounts[10].pubkey, ids.token_0_vault);
        assert_eq!(instruction.accounts[11].pubkey, ids.token_1_vault);
        assert_eq!(instruction.accounts[12].pubkey, config.pool_fee_account);
        assert_eq!(instruction.accounts[13].pubkey, ids.observation_state);
    }

    #[test]
    fn identical_mints_are_rejected() {
        let config = NetworkConfig::devnet();
        let creator = Pubkey::new_unique();
        let mint = descriptor([1; 32], 9);

        let result = plan_pool_creation(
            &creator,
            &mint,
            &mint,
            1_000,
            2_000,
            &fee_config(Pubkey::new_unique(), 0),
            &config.pool_program_id,
            &config.pool_fee_account,
        );
        assert!(matches!(result, Err(LaunchpadError::Validation(_))));
    }

    #[test]
    fn zero_deposits_are_rejected() {
        let config = NetworkConfig::devnet();
        let creator = Pubkey::new_unique();
        let mint_a = descriptor([1; 32], 9);
        let mint_b = descriptor([2; 32], 6);

        let result = plan_pool_creation(
            &creator,
            &mint_a,
            &mint_b,
            0,
            2_000,
            &fee_config(Pubkey::new_unique(), 0),
            &config.pool_program_id,
            &config.pool_fee_account,
        );
        assert!(matches!(result, Err(LaunchpadError::Validation(_))));
    }
}

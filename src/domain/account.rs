//! Account provisioner: sizes the mint account and plans its creation.

use log::debug;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use solana_system_interface::instruction as system_instruction;
use spl_token_2022::{extension::ExtensionType, state::Mint};

use crate::models::LaunchpadError;
use crate::services::SolanaProviderTrait;

/// Fixed space of a mint account carrying a metadata pointer.
///
/// The variable-length metadata entry is not allocated here: the token
/// program grows the account when the metadata-initialize instruction runs,
/// so only the fixed extensions may be part of the allocated space.
pub fn mint_account_space() -> Result<usize, LaunchpadError> {
    ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::MetadataPointer])
        .map_err(|e| LaunchpadError::InstructionEncoding(e.to_string()))
}

/// Plans the creation of `new_account` with `space` allocated bytes, funded
/// for rent exemption at `funded_size` bytes.
///
/// `funded_size` exceeds `space` whenever the account will be reallocated
/// after creation (the metadata TLV entry), so the creation transfer already
/// covers the final footprint. The rent query may fail with a ledger error;
/// it is surfaced, never retried here.
pub async fn plan_account_creation<P: SolanaProviderTrait>(
    provider: &P,
    payer: &Pubkey,
    new_account: &Pubkey,
    space: usize,
    funded_size: usize,
    owning_program: &Pubkey,
) -> Result<Instruction, LaunchpadError> {
    let lamports = provider
        .get_minimum_balance_for_rent_exemption(funded_size)
        .await
        .map_err(|e| LaunchpadError::LedgerQuery(e.to_string()))?;

    debug!(
        "planning account {} with {} bytes allocated, {} lamports for {} bytes of rent",
        new_account, space, lamports, funded_size
    );

    Ok(system_instruction::create_account(
        payer,
        new_account,
        lamports,
        space as u64,
        owning_program,
    ))
}

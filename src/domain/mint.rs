//! Mint initializer: plans mint initialization and its metadata extension.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_token_2022::extension::metadata_pointer;
use spl_token_2022::instruction as token_instruction;
use spl_token_metadata_interface::instruction as metadata_instruction;
use spl_token_metadata_interface::state::Field;

use crate::constants::MAX_DECIMALS;
use crate::models::{LaunchpadError, TokenSpec};

/// Plans the initialization of a freshly created mint account.
///
/// When a metadata pointer is requested it MUST precede mint initialization:
/// the token program validates pointer state while initializing the mint.
pub fn plan_mint_init(
    mint: &Pubkey,
    mint_authority: &Pubkey,
    freeze_authority: Option<&Pubkey>,
    decimals: u8,
    metadata_pointer: Option<&Pubkey>,
) -> Result<Vec<Instruction>, LaunchpadError> {
    if decimals > MAX_DECIMALS {
        return Err(LaunchpadError::Validation(format!(
            "decimals must be between 0 and {MAX_DECIMALS}, got {decimals}"
        )));
    }

    let mut instructions = Vec::with_capacity(2);
    if let Some(metadata_address) = metadata_pointer {
        instructions.push(
            metadata_pointer::instruction::initialize(
                &spl_token_2022::id(),
                mint,
                Some(*mint_authority),
                Some(*metadata_address),
            )
            .map_err(|e| LaunchpadError::InstructionEncoding(e.to_string()))?,
        );
    }
    instructions.push(
        token_instruction::initialize_mint(
            &spl_token_2022::id(),
            mint,
            mint_authority,
            freeze_authority,
            decimals,
        )
        .map_err(|e| LaunchpadError::InstructionEncoding(e.to_string()))?,
    );
    Ok(instructions)
}

/// Plans writing the metadata entry the pointer refers to. Runs after mint
/// initialization; additional key/value pairs become one update each.
pub fn plan_metadata_init(
    mint: &Pubkey,
    update_authority: &Pubkey,
    mint_authority: &Pubkey,
    spec: &TokenSpec,
) -> Vec<Instruction> {
    let mut instructions = vec![metadata_instruction::initialize(
        &spl_token_2022::id(),
        mint,
        update_authority,
        mint,
        mint_authority,
        spec.name.clone(),
        spec.symbol.clone(),
        spec.uri.clone(),
    )];
    for (key, value) in &spec.additional_metadata {
        instructions.push(metadata_instruction::update_field(
            &spl_token_2022::id(),
            mint,
            update_authority,
            Field::Key(key.clone()),
            value.clone(),
        ));
    }
    instructions
}

//! Token distribution engine: holding-account derivation, initial-supply
//! minting and decimal scaling.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id, instruction::create_associated_token_account,
};
use spl_token_2022::instruction as token_instruction;

use crate::models::{AmountError, LaunchpadError};

/// Derives the owner's holding account for a mint. Pure and idempotent:
/// the same (owner, mint, token program) always yields the same address.
pub fn derive_holding_account(owner: &Pubkey, mint: &Pubkey, token_program: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, token_program)
}

/// Plans the creation of the owner's holding account for a mint.
pub fn plan_holding_account(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    create_associated_token_account(payer, owner, mint, token_program)
}

/// Plans minting `raw_amount` base units into `destination`.
pub fn plan_mint(
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    raw_amount: u64,
) -> Result<Instruction, LaunchpadError> {
    token_instruction::mint_to(
        &spl_token_2022::id(),
        mint,
        destination,
        authority,
        &[],
        raw_amount,
    )
    .map_err(|e| LaunchpadError::InstructionEncoding(e.to_string()))
}

/// Scales a user-entered decimal amount to raw base units: `amount * 10^decimals`.
///
/// Integer arithmetic only. Rejects signs, empty input, multiple dots and
/// more fractional digits than the mint supports; overflow past u64 is its
/// own error so the caller can distinguish "too big" from "not a number".
pub fn scale_amount(amount: &str, decimals: u8) -> Result<u64, AmountError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(AmountError::InvalidAmount("empty amount".to_string()));
    }

    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(AmountError::InvalidAmount(trimmed.to_string()));
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(AmountError::InvalidAmount(trimmed.to_string()));
    }
    if frac_part.len() > decimals as usize {
        return Err(AmountError::InvalidAmount(format!(
            "{trimmed} has more than {decimals} decimal places"
        )));
    }

    let mut value: u64 = 0;
    for digit in int_part.bytes().chain(frac_part.bytes()) {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add((digit - b'0') as u64))
            .ok_or(AmountError::AmountOverflow)?;
    }
    for _ in 0..(decimals as usize - frac_part.len()) {
        value = value.checked_mul(10).ok_or(AmountError::AmountOverflow)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scales_fractional_amounts() {
        assert_eq!(scale_amount("1.234", 9).unwrap(), 1_234_000_000);
        assert_eq!(scale_amount("10", 9).unwrap(), 10_000_000_000);
        assert_eq!(scale_amount("500", 6).unwrap(), 500_000_000);
        assert_eq!(scale_amount(".5", 1).unwrap(), 5);
        assert_eq!(scale_amount("7.", 2).unwrap(), 700);
    }

    #[test]
    fn zero_scales_to_zero_for_any_decimals() {
        for decimals in 0..=9 {
            assert_eq!(scale_amount("0", decimals).unwrap(), 0);
        }
    }

    #[test]
    fn negative_amounts_are_invalid() {
        assert!(matches!(
            scale_amount("-1", 9),
            Err(AmountError::InvalidAmount(_))
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        for input in ["", " ", ".", "1.2.3", "abc", "1e9", "+5", "1 000"] {
            assert!(
                matches!(scale_amount(input, 9), Err(AmountError::InvalidAmount(_))),
                "expected {input:?} to be invalid"
            );
        }
    }

    #[test]
    fn excess_precision_is_invalid() {
        assert!(matches!(
            scale_amount("1.0001", 3),
            Err(AmountError::InvalidAmount(_))
        ));
    }

    #[test]
    fn overflow_is_its_own_error() {
        assert!(matches!(
            scale_amount("18446744073709551616", 0),
            Err(AmountError::AmountOverflow)
        ));
        assert!(matches!(
            scale_amount("99999999999999999999999", 9),
            Err(AmountError::AmountOverflow)
        ));
        // u64::MAX itself still fits with no scaling.
        assert_eq!(
            scale_amount("18446744073709551615", 0).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn holding_account_derivation_is_pure() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let program = spl_token_2022::id();

        let first = derive_holding_account(&owner, &mint, &program);
        let second = derive_holding_account(&owner, &mint, &program);
        assert_eq!(first, second);

        // Any input change moves the address.
        assert_ne!(
            first,
            derive_holding_account(&Pubkey::new_unique(), &mint, &program)
        );
        assert_ne!(
            first,
            derive_holding_account(&owner, &Pubkey::new_unique(), &program)
        );
    }

    #[test]
    fn mint_plan_carries_the_raw_amount() {
        let mint = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let authority = Pubkey::new_unique();

        let instruction = plan_mint(&mint, &destination, &authority, 1_000_000_000_000).unwrap();
        assert_eq!(instruction.program_id, spl_token_2022::id());
        // MintTo discriminant, then the amount in little-endian.
        assert_eq!(instruction.data[0], 7);
        assert_eq!(
            u64::from_le_bytes(instruction.data[1..9].try_into().unwrap()),
            1_000_000_000_000
        );
    }

    proptest! {
        #[test]
        fn whole_numbers_scale_by_powers_of_ten(n in 0u64..1_000_000, decimals in 0u8..=9) {
            let scaled = scale_amount(&n.to_string(), decimals).unwrap();
            prop_assert_eq!(scaled, n * 10u64.pow(decimals as u32));
        }

        #[test]
        fn scaling_never_panics(input in "\\PC{0,24}", decimals in 0u8..=9) {
            let _ = scale_amount(&input, decimals);
        }
    }
}

//! Crate-wide error taxonomy.
//!
//! Component-level failures (provider, wallet, blob store) live next to their
//! services and convert into `LaunchpadError` at the domain boundary so every
//! failure the caller sees carries the stage context it happened in.

use thiserror::Error;

use super::Stage;

/// Decimal-amount scaling failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("amount exceeds the representable integer range")]
    AmountOverflow,
}

/// Metadata codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("token name is {actual} bytes, limit is {limit}")]
    NameTooLong { actual: usize, limit: usize },
    #[error("token symbol is {actual} bytes, limit is {limit}")]
    SymbolTooLong { actual: usize, limit: usize },
}

#[derive(Debug, Error)]
pub enum LaunchpadError {
    /// Bad user input, caught before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    /// A read-only ledger query failed (RPC/network).
    #[error("ledger query failed: {0}")]
    LedgerQuery(String),

    /// Submitting a signed transaction failed before it reached the ledger.
    #[error("ledger submission failed: {0}")]
    LedgerSubmission(String),

    /// A confirmed transaction reported a program-level failure.
    #[error("transaction failed on chain: {0}")]
    OnChain(String),

    #[error("wallet rejected the signing request")]
    UserRejected,

    #[error("wallet not connected")]
    WalletNotConnected,

    #[error("signing failed: {0}")]
    Signing(String),

    /// An instruction builder rejected its inputs.
    #[error("instruction encoding failed: {0}")]
    InstructionEncoding(String),

    #[error("metadata upload failed: {0}")]
    Upload(String),

    #[error("fee configuration fetch failed: {0}")]
    FeeConfig(String),

    /// The plan stopped at `stage`; earlier stages may already be applied
    /// on chain and require manual inspection.
    #[error("plan aborted at stage {stage}")]
    Aborted { stage: Stage },
}

impl LaunchpadError {
    /// Whether re-collecting input and resubmitting the whole plan from
    /// scratch is safe. Ledger-side failures after partial success are not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LaunchpadError::Validation(_)
                | LaunchpadError::Encoding(_)
                | LaunchpadError::Amount(_)
                | LaunchpadError::UserRejected
                | LaunchpadError::WalletNotConnected
        )
    }
}

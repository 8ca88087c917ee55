//! Orchestration plan model: stages, instruction batches and the per-stage
//! execution trace returned to the caller.

use solana_sdk::{instruction::Instruction, pubkey::Pubkey, signature::Signature, signer::keypair::Keypair};
use thiserror::Error;

/// Pipeline stage a batch belongs to. Display renders the kebab-case stage
/// name surfaced in traces and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    CreateMint,
    CreateHoldingAccount,
    MintSupply,
    CreatePool,
}

/// Lifecycle of a single batch inside the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Building,
    Signing,
    Submitting,
    Confirming,
    Succeeded,
    Failed,
}

/// Lifecycle of the plan as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    Running,
    Completed,
    Aborted { stage: Stage },
}

/// An ordered set of instructions that lands on chain atomically, plus the
/// ephemeral keypairs (e.g. a freshly generated mint) that must co-sign it.
pub struct InstructionBatch {
    pub stage: Stage,
    pub instructions: Vec<Instruction>,
    pub ephemeral_signers: Vec<Keypair>,
}

impl InstructionBatch {
    pub fn new(stage: Stage, instructions: Vec<Instruction>) -> Self {
        Self {
            stage,
            instructions,
            ephemeral_signers: Vec::new(),
        }
    }

    pub fn with_signer(mut self, signer: Keypair) -> Self {
        self.ephemeral_signers.push(signer);
        self
    }
}

/// Ordered batches sharing one fee payer and one recent blockhash.
///
/// `continue_on_failure` is always false in this system: the plan aborts at
/// the first batch that fails to confirm.
pub struct OrchestrationPlan {
    pub fee_payer: Pubkey,
    pub batches: Vec<InstructionBatch>,
    pub continue_on_failure: bool,
}

impl OrchestrationPlan {
    pub fn new(fee_payer: Pubkey) -> Self {
        Self {
            fee_payer,
            batches: Vec::new(),
            continue_on_failure: false,
        }
    }

    pub fn push(&mut self, batch: InstructionBatch) {
        self.batches.push(batch);
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// What went wrong for a failed stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageError {
    #[error("wallet rejected the signing request")]
    SigningRejected,
    #[error("signing failed: {0}")]
    Signing(String),
    #[error("submission failed: {0}")]
    Submission(String),
    #[error("transaction failed on chain: {0}")]
    OnChain(String),
    #[error("confirmation check failed: {0}")]
    Confirmation(String),
    #[error("confirmation timed out")]
    ConfirmationTimeout,
}

/// Terminal record for one executed stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: Stage,
    pub state: BatchState,
    pub signature: Option<Signature>,
    pub confirmed: bool,
    pub error: Option<StageError>,
}

impl StageOutcome {
    pub fn succeeded(stage: Stage, signature: Signature) -> Self {
        Self {
            stage,
            state: BatchState::Succeeded,
            signature: Some(signature),
            confirmed: true,
            error: None,
        }
    }

    pub fn failed(stage: Stage, signature: Option<Signature>, error: StageError) -> Self {
        Self {
            stage,
            state: BatchState::Failed,
            signature,
            confirmed: false,
            error: Some(error),
        }
    }
}

/// Full per-stage trace of a plan run. Stages after the first failure were
/// never submitted and are absent from `stages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stages: Vec<StageOutcome>,
    pub state: PlanState,
}

impl ExecutionResult {
    pub fn is_complete(&self) -> bool {
        self.state == PlanState::Completed
    }

    /// The first failed stage, if the plan aborted.
    pub fn first_failure(&self) -> Option<&StageOutcome> {
        self.stages.iter().find(|s| s.state == BatchState::Failed)
    }
}

/// Every pool-program address derived while planning a CPMM pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolIdentifiers {
    pub pool_state: Pubkey,
    pub amm_config: Pubkey,
    pub authority: Pubkey,
    pub lp_mint: Pubkey,
    pub token_0_vault: Pubkey,
    pub token_1_vault: Pubkey,
    pub observation_state: Pubkey,
}

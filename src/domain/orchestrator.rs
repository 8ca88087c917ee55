//! Transaction orchestrator.
//!
//! Drives an [`OrchestrationPlan`] through the per-batch state machine
//! `Building -> Signing -> Submitting -> Confirming -> Succeeded | Failed`.
//! One recent blockhash is fetched per plan and shared by every batch;
//! ephemeral keypairs partial-sign their own batches and the wallet signs
//! everything in a single suspend point before anything is submitted.
//! Batches then submit and confirm strictly in order; the first failure
//! aborts the plan and later batches are never sent. Earlier batches may
//! already be applied on chain, so no rollback is attempted; the returned
//! trace tells the caller exactly how far the plan got.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;
use tokio::sync::Mutex;

use crate::config::NetworkConfig;
use crate::models::{
    BatchState, ExecutionResult, LaunchpadError, OrchestrationPlan, PlanState, Stage, StageError,
    StageOutcome,
};
use crate::services::{SolanaProviderTrait, WalletSignerError, WalletSignerTrait};
use crate::utils::{encode_transaction, poll_until};

/// Terminal confirmation states of one submitted batch.
enum Confirmation {
    Confirmed,
    OnChainError(String),
    TimedOut,
}

pub struct Orchestrator<P, W> {
    provider: Arc<P>,
    wallet: Arc<W>,
    confirmation_timeout: Duration,
    poll_interval: Duration,
    /// Plans execute one at a time per orchestrator: concurrent submissions
    /// from the same wallet race on blockhash and account state.
    execution_guard: Mutex<()>,
}

impl<P, W> Orchestrator<P, W>
where
    P: SolanaProviderTrait,
    W: WalletSignerTrait,
{
    pub fn new(provider: Arc<P>, wallet: Arc<W>, config: &NetworkConfig) -> Self {
        Self {
            provider,
            wallet,
            confirmation_timeout: config.confirmation_timeout,
            poll_interval: config.confirmation_poll_interval,
            execution_guard: Mutex::new(()),
        }
    }

    /// Runs the plan to completion or to its first failure.
    ///
    /// Failures before anything could be submitted (blockhash fetch,
    /// transaction building) return `Err`; once execution starts, the
    /// outcome (including a wallet rejection or a mid-plan abort) is
    /// reported through the [`ExecutionResult`] trace.
    pub async fn execute(
        &self,
        plan: OrchestrationPlan,
    ) -> Result<ExecutionResult, LaunchpadError> {
        let _guard = self.execution_guard.lock().await;

        if plan.is_empty() {
            return Err(LaunchpadError::Validation("plan has no batches".to_string()));
        }

        // Building: one blockhash for the whole plan.
        let blockhash = self
            .provider
            .get_latest_blockhash()
            .await
            .map_err(|e| LaunchpadError::LedgerQuery(e.to_string()))?;
        debug!("plan of {} batches built on blockhash {}", plan.batches.len(), blockhash);

        let mut transactions = Vec::with_capacity(plan.batches.len());
        for batch in &plan.batches {
            debug!("stage {}: {:?}", batch.stage, BatchState::Building);
            let mut transaction =
                Transaction::new_with_payer(&batch.instructions, Some(&plan.fee_payer));
            transaction.message.recent_blockhash = blockhash;
            if !batch.ephemeral_signers.is_empty() {
                let signers: Vec<&Keypair> = batch.ephemeral_signers.iter().collect();
                transaction
                    .try_partial_sign(&signers, blockhash)
                    .map_err(|e| LaunchpadError::Signing(e.to_string()))?;
            }
            transactions.push(transaction);
        }

        // Signing: the wallet suspend point. A rejection aborts before
        // anything reaches the ledger.
        debug!("stage {}: {:?}", plan.batches[0].stage, BatchState::Signing);
        let signed = match self.wallet.sign_all_transactions(transactions).await {
            Ok(signed) => signed,
            Err(e) => {
                let stage = plan.batches[0].stage;
                warn!("wallet signing failed at stage {}: {}", stage, e);
                let error = match e {
                    WalletSignerError::UserRejected => StageError::SigningRejected,
                    WalletSignerError::NotConnected => {
                        StageError::Signing("wallet not connected".to_string())
                    }
                    WalletSignerError::Signing(message) => StageError::Signing(message),
                };
                return Ok(ExecutionResult {
                    stages: vec![StageOutcome::failed(stage, None, error)],
                    state: PlanState::Aborted { stage },
                });
            }
        };

        let mut outcomes = Vec::with_capacity(plan.batches.len());
        for (batch, transaction) in plan.batches.iter().zip(signed) {
            debug!(
                "stage {}: {:?} ({})",
                batch.stage,
                BatchState::Submitting,
                encode_transaction(&transaction).unwrap_or_else(|e| e.to_string())
            );
            let signature = match self.provider.send_transaction(&transaction).await {
                Ok(signature) => signature,
                Err(e) => {
                    warn!("stage {} submission failed: {}", batch.stage, e);
                    outcomes.push(StageOutcome::failed(
                        batch.stage,
                        None,
                        StageError::Submission(e.to_string()),
                    ));
                    return Ok(aborted(outcomes, batch.stage));
                }
            };
            info!("stage {} submitted as {}", batch.stage, signature);

            debug!("stage {}: {:?}", batch.stage, BatchState::Confirming);
            match self.wait_for_confirmation(&signature).await {
                Ok(Confirmation::Confirmed) => {
                    info!("stage {} confirmed", batch.stage);
                    outcomes.push(StageOutcome::succeeded(batch.stage, signature));
                }
                Ok(Confirmation::OnChainError(reason)) => {
                    warn!("stage {} failed on chain: {}", batch.stage, reason);
                    outcomes.push(StageOutcome::failed(
                        batch.stage,
                        Some(signature),
                        StageError::OnChain(reason),
                    ));
                    return Ok(aborted(outcomes, batch.stage));
                }
                Ok(Confirmation::TimedOut) => {
                    warn!(
                        "stage {} unconfirmed after {:?}",
                        batch.stage, self.confirmation_timeout
                    );
                    outcomes.push(StageOutcome::failed(
                        batch.stage,
                        Some(signature),
                        StageError::ConfirmationTimeout,
                    ));
                    return Ok(aborted(outcomes, batch.stage));
                }
                Err(e) => {
                    warn!("stage {} confirmation check failed: {}", batch.stage, e);
                    outcomes.push(StageOutcome::failed(
                        batch.stage,
                        Some(signature),
                        StageError::Confirmation(e.to_string()),
                    ));
                    return Ok(aborted(outcomes, batch.stage));
                }
            }
        }

        Ok(ExecutionResult {
            stages: outcomes,
            state: PlanState::Completed,
        })
    }

    async fn wait_for_confirmation(
        &self,
        signature: &Signature,
    ) -> Result<Confirmation, crate::services::SolanaProviderError> {
        let provider = Arc::clone(&self.provider);
        let signature = *signature;

        let outcome = poll_until(
            move || {
                let provider = Arc::clone(&provider);
                async move {
                    match provider.get_signature_status(&signature).await? {
                        Some(Err(err)) => Ok(Some(Confirmation::OnChainError(err.to_string()))),
                        Some(Ok(())) => {
                            if provider.confirm_transaction(&signature).await? {
                                Ok(Some(Confirmation::Confirmed))
                            } else {
                                Ok(None)
                            }
                        }
                        None => Ok(None),
                    }
                }
            },
            self.confirmation_timeout,
            self.poll_interval,
            "transaction confirmation",
        )
        .await?;

        Ok(outcome.unwrap_or(Confirmation::TimedOut))
    }
}

fn aborted(outcomes: Vec<StageOutcome>, stage: Stage) -> ExecutionResult {
    ExecutionResult {
        stages: outcomes,
        state: PlanState::Aborted { stage },
    }
}

//! Wallet signing collaborator.
//!
//! The connected wallet is externally owned: the pipeline only ever asks it
//! for its public key and for signatures. Signing is the plan's single
//! suspend point: a rejection unwinds the plan before anything is
//! submitted.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
    transaction::Transaction,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WalletSignerError {
    #[error("user rejected the signing request")]
    UserRejected,

    #[error("wallet not connected")]
    NotConnected,

    #[error("signing failed: {0}")]
    Signing(String),
}

/// Trait defining the wallet-side signing operations.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait WalletSignerTrait: Send + Sync {
    /// Public key of the connected wallet.
    fn pubkey(&self) -> Result<Pubkey, WalletSignerError>;

    /// Signs a single transaction in place of the wallet's required slot.
    async fn sign_transaction(
        &self,
        transaction: Transaction,
    ) -> Result<Transaction, WalletSignerError>;

    /// Signs every transaction of a plan in one interaction.
    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, WalletSignerError>;
}

/// In-process wallet backed by a raw keypair, for tests and headless use.
pub struct LocalWalletSigner {
    keypair: Keypair,
}

impl LocalWalletSigner {
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }
}

#[async_trait]
impl WalletSignerTrait for LocalWalletSigner {
    fn pubkey(&self) -> Result<Pubkey, WalletSignerError> {
        Ok(self.keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletSignerError> {
        let blockhash = transaction.message.recent_blockhash;
        transaction
            .try_partial_sign(&[&self.keypair], blockhash)
            .map_err(|e| WalletSignerError::Signing(e.to_string()))?;
        Ok(transaction)
    }

    async fn sign_all_transactions(
        &self,
        transactions: Vec<Transaction>,
    ) -> Result<Vec<Transaction>, WalletSignerError> {
        let mut signed = Vec::with_capacity(transactions.len());
        for transaction in transactions {
            signed.push(self.sign_transaction(transaction).await?);
        }
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_system_interface::instruction as system_instruction;

    fn transfer_transaction(payer: &Pubkey) -> Transaction {
        let instruction = system_instruction::transfer(payer, &Pubkey::new_unique(), 1);
        let mut tx = Transaction::new_with_payer(&[instruction], Some(payer));
        tx.message.recent_blockhash = Hash::new_unique();
        tx
    }

    #[tokio::test]
    async fn local_signer_signs_its_own_slot() {
        let keypair = Keypair::new();
        let payer = keypair.pubkey();
        let signer = LocalWalletSigner::new(keypair);

        let tx = transfer_transaction(&payer);
        let signed = signer.sign_transaction(tx).await.unwrap();
        assert!(signed.is_signed());
    }

    #[tokio::test]
    async fn sign_all_preserves_order() {
        let keypair = Keypair::new();
        let payer = keypair.pubkey();
        let signer = LocalWalletSigner::new(keypair);

        let txs = vec![transfer_transaction(&payer), transfer_transaction(&payer)];
        let messages: Vec<_> = txs.iter().map(|t| t.message.clone()).collect();

        let signed = signer.sign_all_transactions(txs).await.unwrap();
        assert_eq!(signed.len(), 2);
        for (tx, message) in signed.iter().zip(messages) {
            assert_eq!(tx.message, message);
            assert!(tx.is_signed());
        }
    }

    #[tokio::test]
    async fn signing_a_foreign_transaction_fails() {
        let signer = LocalWalletSigner::new(Keypair::new());
        let other_payer = Keypair::new().pubkey();

        let tx = transfer_transaction(&other_payer);
        let result = signer.sign_transaction(tx).await;
        assert!(matches!(result, Err(WalletSignerError::Signing(_))));
    }
}

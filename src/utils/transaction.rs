//! Wire encoding for signed transactions: bincode serialization wrapped in
//! base64, the form RPC nodes and logs carry transactions in.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use solana_sdk::transaction::Transaction;

use crate::models::LaunchpadError;

pub fn encode_transaction(transaction: &Transaction) -> Result<String, LaunchpadError> {
    let bytes = bincode::serialize(transaction)
        .map_err(|e| LaunchpadError::InstructionEncoding(e.to_string()))?;
    Ok(STANDARD.encode(bytes))
}

pub fn decode_transaction(encoded: &str) -> Result<Transaction, LaunchpadError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| LaunchpadError::InstructionEncoding(e.to_string()))?;
    bincode::deserialize(&bytes).map_err(|e| LaunchpadError::InstructionEncoding(e.to_string()))
}

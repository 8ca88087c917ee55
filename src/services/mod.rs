//! External collaborators: the ledger RPC provider, the wallet signer, the
//! blob store hosting metadata documents and the pool fee-configuration API.
//!
//! Every collaborator is a trait with a mockall automock so domain logic is
//! testable without a network.

pub mod blob_store;
pub use blob_store::*;

pub mod pool_api;
pub use pool_api::*;

pub mod provider;
pub use provider::*;

pub mod wallet;
pub use wallet::*;

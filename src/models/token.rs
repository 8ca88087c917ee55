//! Token-side data model: user-supplied token specifications, resolved mint
//! descriptors and the wallet-owned token listing used by the pool form.

use solana_sdk::pubkey::Pubkey;

/// User-supplied description of a token to be created.
///
/// Immutable once handed to the metadata codec; byte limits on `name` and
/// `symbol` are enforced at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub decimals: u8,
    /// Ordered key/value pairs stored verbatim in the metadata extension.
    pub additional_metadata: Vec<(String, String)>,
}

impl TokenSpec {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>, uri: impl Into<String>, decimals: u8) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            uri: uri.into(),
            decimals,
            additional_metadata: Vec::new(),
        }
    }
}

/// A mint as the pool provisioner needs to see it: its address, the token
/// program that owns it, and its decimals.
///
/// Resolved from ledger state for existing mints, or constructed locally for
/// a mint the current flow is about to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintDescriptor {
    pub address: Pubkey,
    pub program_id: Pubkey,
    pub decimals: u8,
}

/// Inputs for the end-to-end token launch flow.
///
/// When `metadata_uri` is set the blob store is bypassed and the URI is used
/// as-is; otherwise a metadata JSON document referencing `image_url` is
/// uploaded first.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    pub name: String,
    pub symbol: String,
    pub image_url: String,
    pub metadata_uri: Option<String>,
    pub decimals: u8,
    pub initial_supply: String,
    pub additional_metadata: Vec<(String, String)>,
}

/// A token the connected wallet both holds and controls (it is the mint
/// authority), as surfaced by portfolio discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedToken {
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub image: Option<String>,
}

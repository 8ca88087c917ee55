//! Constants for token creation and metadata encoding.

/// Size of the TLV type tag preceding the metadata entry on the mint account.
pub const METADATA_TYPE_SIZE: usize = 2;

/// Size of the TLV length prefix preceding the metadata entry.
pub const METADATA_LENGTH_SIZE: usize = 2;

/// Byte limit for a token name after UTF-8 encoding.
pub const MAX_NAME_BYTES: usize = 32;

/// Byte limit for a token symbol after UTF-8 encoding.
pub const MAX_SYMBOL_BYTES: usize = 10;

/// Largest decimals value this system accepts for newly created assets. The
/// ledger allows more, but amounts above 10^19 raw units stop fitting u64
/// math for any useful supply.
pub const MAX_DECIMALS: u8 = 9;

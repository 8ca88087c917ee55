//! Binary metadata codec.
//!
//! Serializes a mint's metadata into the exact byte layout the Token-2022
//! token-metadata extension stores: two fixed 32-byte pubkeys (update
//! authority, zeroed when absent, then the mint), three u32-length-prefixed
//! UTF-8 strings (name, symbol, uri) and the u32-counted list of additional
//! key/value pairs, all little-endian. The TLV entry on the mint account
//! additionally reserves a 2-byte type tag and a 2-byte length prefix, which
//! `tlv_size` accounts for.

use solana_sdk::pubkey::Pubkey;

use crate::constants::{
    MAX_NAME_BYTES, MAX_SYMBOL_BYTES, METADATA_LENGTH_SIZE, METADATA_TYPE_SIZE,
};
use crate::models::{EncodingError, TokenSpec};

/// Metadata of one mint, ready for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintMetadata {
    pub update_authority: Option<Pubkey>,
    pub mint: Pubkey,
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub additional_metadata: Vec<(String, String)>,
}

impl MintMetadata {
    /// Binds a user-supplied spec to the mint it will be written to.
    pub fn for_mint(spec: &TokenSpec, mint: Pubkey, update_authority: Pubkey) -> Self {
        Self {
            update_authority: Some(update_authority),
            mint,
            name: spec.name.clone(),
            symbol: spec.symbol.clone(),
            uri: spec.uri.clone(),
            additional_metadata: spec.additional_metadata.clone(),
        }
    }

    fn check_limits(&self) -> Result<(), EncodingError> {
        if self.name.len() > MAX_NAME_BYTES {
            return Err(EncodingError::NameTooLong {
                actual: self.name.len(),
                limit: MAX_NAME_BYTES,
            });
        }
        if self.symbol.len() > MAX_SYMBOL_BYTES {
            return Err(EncodingError::SymbolTooLong {
                actual: self.symbol.len(),
                limit: MAX_SYMBOL_BYTES,
            });
        }
        Ok(())
    }

    /// Deterministic encoding of the metadata entry value.
    pub fn encode(&self) -> Result<Vec<u8>, EncodingError> {
        self.check_limits()?;

        let mut buf = Vec::with_capacity(self.encoded_len());
        let authority = self.update_authority.map(|p| p.to_bytes()).unwrap_or([0u8; 32]);
        buf.extend_from_slice(&authority);
        buf.extend_from_slice(self.mint.as_ref());
        put_str(&mut buf, &self.name);
        put_str(&mut buf, &self.symbol);
        put_str(&mut buf, &self.uri);
        buf.extend_from_slice(&(self.additional_metadata.len() as u32).to_le_bytes());
        for (key, value) in &self.additional_metadata {
            put_str(&mut buf, key);
            put_str(&mut buf, value);
        }
        Ok(buf)
    }

    /// Bytes the mint account must reserve for this entry, TLV header
    /// included.
    pub fn tlv_size(&self) -> Result<usize, EncodingError> {
        Ok(METADATA_TYPE_SIZE + METADATA_LENGTH_SIZE + self.encode()?.len())
    }

    fn encoded_len(&self) -> usize {
        let pairs: usize = self
            .additional_metadata
            .iter()
            .map(|(k, v)| 8 + k.len() + v.len())
            .sum();
        64 + 4 + self.name.len() + 4 + self.symbol.len() + 4 + self.uri.len() + 4 + pairs
    }
}

fn put_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

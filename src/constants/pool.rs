//! Constants for the CPMM pool program: program ids per cluster, fee
//! receiver accounts and the PDA seeds the program derives its state from.

/// CPMM pool program on the production cluster.
pub const MAINNET_CPMM_PROGRAM_ID: &str = "CPMMoo8L3F4NbTegBCKVNunggL7H1ZpdTHKxQB5qKP1C";

/// CPMM pool program on devnet.
pub const DEVNET_CPMM_PROGRAM_ID: &str = "CPMDWBwJDtYax9qW7AyRuVC19Cc4L4Vcy4n2BHAbHkCW";

/// Pool-creation fee receiver on the production cluster.
pub const MAINNET_CPMM_FEE_ACCOUNT: &str = "DNXgeM9EiiaAbaWvwjHj9fQQLAX5ZsfHyvmYUNRAdNC8";

/// Pool-creation fee receiver on devnet.
pub const DEVNET_CPMM_FEE_ACCOUNT: &str = "G11FKBRaAkHAKuLCgLM6K6NUc9rTjPAznRCjZifrTQe2";

/// Base URL of the pool program's public fee-configuration API.
pub const POOL_API_BASE_URL: &str = "https://api-v3.raydium.io";

// PDA seeds, as fixed by the on-chain pool program.
pub const AMM_CONFIG_SEED: &[u8] = b"amm_config";
pub const AUTH_SEED: &[u8] = b"vault_and_lp_mint_auth_seed";
pub const POOL_SEED: &[u8] = b"pool";
pub const POOL_LP_MINT_SEED: &[u8] = b"pool_lp_mint";
pub const POOL_VAULT_SEED: &[u8] = b"pool_vault";
pub const OBSERVATION_SEED: &[u8] = b"observation";

/// Anchor instruction discriminator of the pool program's `initialize`.
pub const CPMM_INITIALIZE_DISCRIMINATOR: [u8; 8] = [175, 175, 109, 31, 13, 152, 155, 237];

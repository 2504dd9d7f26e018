//! Constants shared between the on-chain reputation-space program and clients.
//!
//! Keep these stable because they affect PDA derivation and instruction
//! encoding.

use solana_program::pubkey::Pubkey;

/// PDA seed for the per-DAO config account.
pub const SEED_CONFIG: &[u8] = b"config";

/// PDA seed for per-user-per-season reputation accounts.
pub const SEED_REPUTATION: &[u8] = b"reputation";

/// PDA seed for the per-DAO project metadata account.
pub const SEED_PROJECT_META: &[u8] = b"project_meta";

/// Maximum number of operations packed into one transaction.
pub const DEFAULT_CHUNK_SIZE: usize = 5;

/// Maximum number of rows accepted by one bulk import.
pub const MAX_BULK_ROWS: usize = 200;

/// Maximum metadata URI length in UTF-8 bytes, not characters.
pub const MAX_METADATA_URI_BYTES: usize = 200;

/// Lowest valid season number. Season 0 is reserved as "unset".
pub const MIN_SEASON: u16 = 1;

/// Decay is expressed in basis points.
pub const MAX_DECAY_BPS: u16 = 10_000;

/// Default program id (placeholder).
///
/// Replace this with the deployed program id when available.
pub const DEFAULT_PROGRAM_ID: &str = "RepSpace11111111111111111111111111111111111";

/// Default privileged identity allowed to close arbitrary stale records
/// (placeholder). Deployments pass their own admin key at client
/// construction; this constant only seeds local development.
pub const DEFAULT_ADMIN_ID: &str = "RepSpaceAdmin111111111111111111111111111111";

pub fn default_program_id() -> Pubkey {
    // Distinct fallback so a bad constant can never make the program id
    // and admin id collapse into the same key.
    DEFAULT_PROGRAM_ID
        .parse()
        .unwrap_or_else(|_| Pubkey::new_from_array([0x01; 32]))
}

pub fn default_admin_id() -> Pubkey {
    DEFAULT_ADMIN_ID
        .parse()
        .unwrap_or_else(|_| Pubkey::new_from_array([0xAD; 32]))
}

//! Stable 8-byte discriminators for record kinds and operations.
//!
//! A discriminator is the first 8 bytes of `sha256("{namespace}:{name}")`,
//! namespace `"account"` for record kinds and `"global"` for operations.
//! The name strings below are part of the wire contract; changing any of
//! them is a protocol version bump.
//!
//! All functions here are pure. Callers may memoize results, but
//! recomputation is always correct without a cache.

use sha2::{Digest, Sha256};

pub const DISCRIMINATOR_LEN: usize = 8;

/// Record kind names, as declared by the on-chain program.
pub mod account_names {
    pub const CONFIG: &str = "Config";
    pub const REPUTATION: &str = "Reputation";
    pub const PROJECT_METADATA: &str = "ProjectMetadata";
}

/// Operation names, as declared by the on-chain program.
pub mod op_names {
    pub const INITIALIZE_CONFIG: &str = "initialize_config";
    pub const SET_DECAY_BPS: &str = "set_decay_bps";
    pub const SET_SEASON: &str = "set_season";
    pub const SET_REP_MINT: &str = "set_rep_mint";
    pub const SET_AUTHORITY: &str = "set_authority";
    pub const UPSERT_PROJECT_METADATA: &str = "upsert_project_metadata";
    pub const ADD_REPUTATION: &str = "add_reputation";
    pub const RESET_REPUTATION: &str = "reset_reputation";
    pub const TRANSFER_REPUTATION: &str = "transfer_reputation";
    pub const CLOSE_CONFIG: &str = "close_config";
    pub const CLOSE_PROJECT_METADATA: &str = "close_project_metadata";
    pub const CLOSE_REPUTATION: &str = "close_reputation";
    pub const ADMIN_CLOSE_ANY: &str = "admin_close_any";
}

fn discriminator(namespace: &str, name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let mut h = Sha256::new();
    h.update(namespace.as_bytes());
    h.update(b":");
    h.update(name.as_bytes());
    let digest = h.finalize();
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Discriminator for a record kind.
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    discriminator("account", name)
}

/// Discriminator for an operation payload.
pub fn global_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    discriminator("global", name)
}

//! PDA derivation helpers for the reputation-space program.
//!
//! These helpers implement deterministic address derivation and are designed
//! to match the on-chain program's seeds byte-for-byte:
//!
//! - config:       `["config", dao_id]`
//! - reputation:   `["reputation", config, user, season_u16_le]`
//! - project meta: `["project_meta", dao_id]`

use solana_program::pubkey::Pubkey;

use crate::constants::{SEED_CONFIG, SEED_PROJECT_META, SEED_REPUTATION};
use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigPdas {
    pub config: (Pubkey, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReputationPdas {
    pub config: (Pubkey, u8),
    pub reputation: (Pubkey, u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectMetaPdas {
    pub config: (Pubkey, u8),
    pub project_meta: (Pubkey, u8),
}

fn find(program_id: &Pubkey, seeds: &[&[u8]]) -> ClientResult<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or(ClientError::Derivation)
}

/// Derive the per-DAO config PDA.
pub fn derive_config(program_id: &Pubkey, dao_id: &Pubkey) -> ClientResult<(Pubkey, u8)> {
    find(program_id, &[SEED_CONFIG, dao_id.as_ref()])
}

/// Derive the reputation PDA for one user in one season.
///
/// The season is encoded as two little-endian bytes, matching the record's
/// wire layout.
pub fn derive_reputation(
    program_id: &Pubkey,
    config: &Pubkey,
    user: &Pubkey,
    season: u16,
) -> ClientResult<(Pubkey, u8)> {
    find(
        program_id,
        &[
            SEED_REPUTATION,
            config.as_ref(),
            user.as_ref(),
            &season.to_le_bytes(),
        ],
    )
}

/// Derive the per-DAO project metadata PDA.
pub fn derive_project_meta(program_id: &Pubkey, dao_id: &Pubkey) -> ClientResult<(Pubkey, u8)> {
    find(program_id, &[SEED_PROJECT_META, dao_id.as_ref()])
}

/// Collect the PDAs used by config-level flows.
pub fn pdas_for_config(program_id: &Pubkey, dao_id: &Pubkey) -> ClientResult<ConfigPdas> {
    Ok(ConfigPdas { config: derive_config(program_id, dao_id)? })
}

/// Collect the PDAs used by reputation flows for one user-season.
pub fn pdas_for_reputation(
    program_id: &Pubkey,
    dao_id: &Pubkey,
    user: &Pubkey,
    season: u16,
) -> ClientResult<ReputationPdas> {
    let config = derive_config(program_id, dao_id)?;
    let reputation = derive_reputation(program_id, &config.0, user, season)?;
    Ok(ReputationPdas { config, reputation })
}

/// Collect the PDAs used by project metadata flows.
pub fn pdas_for_project_meta(program_id: &Pubkey, dao_id: &Pubkey) -> ClientResult<ProjectMetaPdas> {
    Ok(ProjectMetaPdas {
        config: derive_config(program_id, dao_id)?,
        project_meta: derive_project_meta(program_id, dao_id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let program_id = Pubkey::new_unique();
        let dao_id = Pubkey::new_unique();
        let a = derive_config(&program_id, &dao_id).unwrap();
        let b = derive_config(&program_id, &dao_id).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn season_changes_reputation_address() {
        let program_id = Pubkey::new_unique();
        let config = Pubkey::new_unique();
        let user = Pubkey::new_unique();
        let s1 = derive_reputation(&program_id, &config, &user, 1).unwrap();
        let s2 = derive_reputation(&program_id, &config, &user, 2).unwrap();
        assert_ne!(s1.0, s2.0);
    }

    #[test]
    fn distinct_seed_schemes_do_not_collide() {
        let program_id = Pubkey::new_unique();
        let dao_id = Pubkey::new_unique();
        let config = derive_config(&program_id, &dao_id).unwrap();
        let meta = derive_project_meta(&program_id, &dao_id).unwrap();
        assert_ne!(config.0, meta.0);
    }
}

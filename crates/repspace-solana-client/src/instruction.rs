//! Instruction builders for the reputation-space program.
//!
//! Each `ix_*` constructor validates its inputs first, derives the PDAs the
//! operation touches, and returns the finished `Instruction` together with
//! those PDAs so callers can run follow-up checks without re-deriving.
//!
//! Payload encoding is always: 8-byte global discriminator, then fields in
//! declared order, integers little-endian, addresses as 32 raw bytes,
//! strings as u32-LE length + UTF-8 bytes.

use solana_program::instruction::{AccountMeta, Instruction};
use solana_program::pubkey::Pubkey;

use crate::constants::{MAX_DECAY_BPS, MAX_METADATA_URI_BYTES, MIN_SEASON};
use crate::discriminator::{global_discriminator, op_names};
use crate::error::{ClientError, ClientResult};
use crate::pda::{
    self, ConfigPdas, ProjectMetaPdas, ReputationPdas,
};

/// Client handle for one deployment of the program.
///
/// `admin` is the single privileged identity allowed to close arbitrary
/// stale records. It is injected here rather than baked into the builders so
/// tests can use fake privileged identities.
#[derive(Debug, Clone, Copy)]
pub struct SpaceClient {
    pub program_id: Pubkey,
    pub admin: Pubkey,
}

/// PDAs touched by a reputation transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPdas {
    pub config: (Pubkey, u8),
    pub from: (Pubkey, u8),
    pub to: (Pubkey, u8),
}

struct Payload(Vec<u8>);

impl Payload {
    fn new(op_name: &str) -> Self {
        Self(global_discriminator(op_name).to_vec())
    }

    fn u16(mut self, v: u16) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn u64(mut self, v: u64) -> Self {
        self.0.extend_from_slice(&v.to_le_bytes());
        self
    }

    fn pubkey(mut self, v: &Pubkey) -> Self {
        self.0.extend_from_slice(v.as_ref());
        self
    }

    fn string(mut self, v: &str) -> Self {
        self.0.extend_from_slice(&(v.len() as u32).to_le_bytes());
        self.0.extend_from_slice(v.as_bytes());
        self
    }

    fn build(self) -> Vec<u8> {
        self.0
    }
}

fn check_season(season: u16) -> ClientResult<()> {
    if season < MIN_SEASON {
        return Err(ClientError::invalid_input(format!(
            "season must be at least {MIN_SEASON}, got {season}"
        )));
    }
    Ok(())
}

fn check_decay_bps(decay_bps: u16) -> ClientResult<()> {
    if decay_bps > MAX_DECAY_BPS {
        return Err(ClientError::invalid_input(format!(
            "decay must be at most {MAX_DECAY_BPS} bps, got {decay_bps}"
        )));
    }
    Ok(())
}

fn check_metadata_uri(uri: &str) -> ClientResult<()> {
    if uri.len() > MAX_METADATA_URI_BYTES {
        return Err(ClientError::invalid_input(format!(
            "metadata uri is {} bytes, max {MAX_METADATA_URI_BYTES}",
            uri.len()
        )));
    }
    Ok(())
}

impl SpaceClient {
    pub fn new(program_id: Pubkey, admin: Pubkey) -> Self {
        Self { program_id, admin }
    }

    /// Create the per-DAO config account.
    pub fn ix_initialize_config(
        &self,
        payer: Pubkey,
        authority: Pubkey,
        dao_id: Pubkey,
        rep_mint: Pubkey,
        initial_season: u16,
    ) -> ClientResult<(Instruction, ConfigPdas)> {
        check_season(initial_season)?;
        let pdas = pda::pdas_for_config(&self.program_id, &dao_id)?;

        let data = Payload::new(op_names::INITIALIZE_CONFIG)
            .pubkey(&dao_id)
            .pubkey(&rep_mint)
            .u16(initial_season)
            .build();

        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pdas.config.0, false),
                AccountMeta::new_readonly(authority, true),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(solana_program::system_program::id(), false),
            ],
            data,
        };
        Ok((ix, pdas))
    }

    /// Set the decay rate on an existing config.
    pub fn ix_set_decay_bps(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        decay_bps: u16,
    ) -> ClientResult<(Instruction, ConfigPdas)> {
        check_decay_bps(decay_bps)?;
        let pdas = pda::pdas_for_config(&self.program_id, &dao_id)?;
        let data = Payload::new(op_names::SET_DECAY_BPS).u16(decay_bps).build();
        Ok((self.config_mutation(authority, &pdas, data), pdas))
    }

    /// Advance (or rewind) the current season.
    pub fn ix_set_season(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        new_season: u16,
    ) -> ClientResult<(Instruction, ConfigPdas)> {
        check_season(new_season)?;
        let pdas = pda::pdas_for_config(&self.program_id, &dao_id)?;
        let data = Payload::new(op_names::SET_SEASON).u16(new_season).build();
        Ok((self.config_mutation(authority, &pdas, data), pdas))
    }

    /// Replace the reputation mint recorded on the config.
    pub fn ix_set_rep_mint(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        new_mint: Pubkey,
    ) -> ClientResult<(Instruction, ConfigPdas)> {
        let pdas = pda::pdas_for_config(&self.program_id, &dao_id)?;
        let data = Payload::new(op_names::SET_REP_MINT).pubkey(&new_mint).build();
        Ok((self.config_mutation(authority, &pdas, data), pdas))
    }

    /// Hand the config over to a new authority.
    pub fn ix_set_authority(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        new_authority: Pubkey,
    ) -> ClientResult<(Instruction, ConfigPdas)> {
        let pdas = pda::pdas_for_config(&self.program_id, &dao_id)?;
        let data = Payload::new(op_names::SET_AUTHORITY).pubkey(&new_authority).build();
        Ok((self.config_mutation(authority, &pdas, data), pdas))
    }

    /// Create or overwrite the project metadata record for a DAO.
    pub fn ix_upsert_project_metadata(
        &self,
        payer: Pubkey,
        authority: Pubkey,
        dao_id: Pubkey,
        metadata_uri: &str,
    ) -> ClientResult<(Instruction, ProjectMetaPdas)> {
        check_metadata_uri(metadata_uri)?;
        let pdas = pda::pdas_for_project_meta(&self.program_id, &dao_id)?;

        let data = Payload::new(op_names::UPSERT_PROJECT_METADATA)
            .string(metadata_uri)
            .build();

        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(pdas.config.0, false),
                AccountMeta::new(pdas.project_meta.0, false),
                AccountMeta::new_readonly(authority, true),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(solana_program::system_program::id(), false),
            ],
            data,
        };
        Ok((ix, pdas))
    }

    /// Credit points to one user for one season. Creates the reputation
    /// record on first credit.
    pub fn ix_add_reputation(
        &self,
        payer: Pubkey,
        authority: Pubkey,
        dao_id: Pubkey,
        user: Pubkey,
        season: u16,
        amount: u64,
    ) -> ClientResult<(Instruction, ReputationPdas)> {
        check_season(season)?;
        if amount == 0 {
            return Err(ClientError::invalid_input("amount must be positive"));
        }
        let pdas = pda::pdas_for_reputation(&self.program_id, &dao_id, &user, season)?;

        let data = Payload::new(op_names::ADD_REPUTATION).u64(amount).build();

        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(pdas.config.0, false),
                AccountMeta::new(pdas.reputation.0, false),
                AccountMeta::new_readonly(user, false),
                AccountMeta::new_readonly(authority, true),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(solana_program::system_program::id(), false),
            ],
            data,
        };
        Ok((ix, pdas))
    }

    /// Zero a user's points for one season. The record must already exist.
    pub fn ix_reset_reputation(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        user: Pubkey,
        season: u16,
    ) -> ClientResult<(Instruction, ReputationPdas)> {
        check_season(season)?;
        let pdas = pda::pdas_for_reputation(&self.program_id, &dao_id, &user, season)?;

        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(pdas.config.0, false),
                AccountMeta::new(pdas.reputation.0, false),
                AccountMeta::new_readonly(user, false),
                AccountMeta::new_readonly(authority, true),
            ],
            data: Payload::new(op_names::RESET_REPUTATION).build(),
        };
        Ok((ix, pdas))
    }

    /// Move a user's full balance to another user within the same season.
    pub fn ix_transfer_reputation(
        &self,
        payer: Pubkey,
        authority: Pubkey,
        dao_id: Pubkey,
        from_user: Pubkey,
        to_user: Pubkey,
        season: u16,
    ) -> ClientResult<(Instruction, TransferPdas)> {
        check_season(season)?;
        if from_user == to_user {
            return Err(ClientError::invalid_input("transfer source equals destination"));
        }
        let config = pda::derive_config(&self.program_id, &dao_id)?;
        let from = pda::derive_reputation(&self.program_id, &config.0, &from_user, season)?;
        let to = pda::derive_reputation(&self.program_id, &config.0, &to_user, season)?;
        let pdas = TransferPdas { config, from, to };

        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(config.0, false),
                AccountMeta::new(from.0, false),
                AccountMeta::new(to.0, false),
                AccountMeta::new_readonly(from_user, false),
                AccountMeta::new_readonly(to_user, false),
                AccountMeta::new_readonly(authority, true),
                AccountMeta::new(payer, true),
                AccountMeta::new_readonly(solana_program::system_program::id(), false),
            ],
            data: Payload::new(op_names::TRANSFER_REPUTATION).build(),
        };
        Ok((ix, pdas))
    }

    /// Close the config account, refunding rent to `recipient`.
    pub fn ix_close_config(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        recipient: Pubkey,
    ) -> ClientResult<(Instruction, ConfigPdas)> {
        let pdas = pda::pdas_for_config(&self.program_id, &dao_id)?;
        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pdas.config.0, false),
                AccountMeta::new_readonly(authority, true),
                AccountMeta::new(recipient, false),
            ],
            data: Payload::new(op_names::CLOSE_CONFIG).build(),
        };
        Ok((ix, pdas))
    }

    /// Close the project metadata account, refunding rent to `recipient`.
    pub fn ix_close_project_metadata(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        recipient: Pubkey,
    ) -> ClientResult<(Instruction, ProjectMetaPdas)> {
        let pdas = pda::pdas_for_project_meta(&self.program_id, &dao_id)?;
        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(pdas.config.0, false),
                AccountMeta::new(pdas.project_meta.0, false),
                AccountMeta::new_readonly(authority, true),
                AccountMeta::new(recipient, false),
            ],
            data: Payload::new(op_names::CLOSE_PROJECT_METADATA).build(),
        };
        Ok((ix, pdas))
    }

    /// Close one user-season reputation record, refunding rent to
    /// `recipient`.
    pub fn ix_close_reputation(
        &self,
        authority: Pubkey,
        dao_id: Pubkey,
        user: Pubkey,
        season: u16,
        recipient: Pubkey,
    ) -> ClientResult<(Instruction, ReputationPdas)> {
        check_season(season)?;
        let pdas = pda::pdas_for_reputation(&self.program_id, &dao_id, &user, season)?;
        let ix = Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new_readonly(pdas.config.0, false),
                AccountMeta::new(pdas.reputation.0, false),
                AccountMeta::new_readonly(authority, true),
                AccountMeta::new(recipient, false),
            ],
            data: Payload::new(op_names::CLOSE_REPUTATION).build(),
        };
        Ok((ix, pdas))
    }

    /// Privileged close of any program-owned account. Refused for every
    /// caller except the configured admin identity.
    pub fn ix_admin_close_any(
        &self,
        caller: Pubkey,
        target: Pubkey,
        recipient: Pubkey,
    ) -> ClientResult<Instruction> {
        if caller != self.admin {
            return Err(ClientError::Unauthorized);
        }
        Ok(Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(target, false),
                AccountMeta::new_readonly(caller, true),
                AccountMeta::new(recipient, false),
            ],
            data: Payload::new(op_names::ADMIN_CLOSE_ANY).build(),
        })
    }

    fn config_mutation(
        &self,
        authority: Pubkey,
        pdas: &ConfigPdas,
        data: Vec<u8>,
    ) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: vec![
                AccountMeta::new(pdas.config.0, false),
                AccountMeta::new_readonly(authority, true),
            ],
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminator::DISCRIMINATOR_LEN;

    fn client() -> SpaceClient {
        SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique())
    }

    #[test]
    fn initialize_config_payload_layout() {
        let c = client();
        let dao_id = Pubkey::new_unique();
        let rep_mint = Pubkey::new_unique();
        let (ix, pdas) = c
            .ix_initialize_config(Pubkey::new_unique(), Pubkey::new_unique(), dao_id, rep_mint, 7)
            .unwrap();

        assert_eq!(&ix.data[..8], global_discriminator(op_names::INITIALIZE_CONFIG));
        assert_eq!(&ix.data[8..40], dao_id.as_ref());
        assert_eq!(&ix.data[40..72], rep_mint.as_ref());
        assert_eq!(&ix.data[72..74], 7u16.to_le_bytes());
        assert_eq!(ix.data.len(), 74);
        assert_eq!(ix.accounts[0].pubkey, pdas.config.0);
    }

    #[test]
    fn initialize_config_rejects_season_zero_before_derivation() {
        let c = client();
        let err = c
            .ix_initialize_config(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                0,
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn set_decay_rejects_over_ten_thousand() {
        let c = client();
        let err = c
            .ix_set_decay_bps(Pubkey::new_unique(), Pubkey::new_unique(), 10_001)
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));

        assert!(c
            .ix_set_decay_bps(Pubkey::new_unique(), Pubkey::new_unique(), 10_000)
            .is_ok());
    }

    #[test]
    fn metadata_uri_limit_is_bytes_not_chars() {
        let c = client();
        // 67 four-byte chars: 268 bytes but only 67 characters.
        let uri: String = "\u{1F600}".repeat(67);
        assert_eq!(uri.chars().count(), 67);
        let err = c
            .ix_upsert_project_metadata(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                &uri,
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn upsert_metadata_string_is_length_prefixed() {
        let c = client();
        let (ix, _) = c
            .ix_upsert_project_metadata(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                "ar://abc",
            )
            .unwrap();
        assert_eq!(&ix.data[8..12], 8u32.to_le_bytes());
        assert_eq!(&ix.data[12..], b"ar://abc");
    }

    #[test]
    fn add_reputation_roles() {
        let c = client();
        let payer = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let (ix, pdas) = c
            .ix_add_reputation(payer, authority, Pubkey::new_unique(), Pubkey::new_unique(), 3, 42)
            .unwrap();

        assert_eq!(ix.data.len(), DISCRIMINATOR_LEN + 8);
        assert_eq!(&ix.data[8..], 42u64.to_le_bytes());

        // reputation PDA writable, authority signer, payer signer+writable
        let rep = &ix.accounts[1];
        assert_eq!(rep.pubkey, pdas.reputation.0);
        assert!(rep.is_writable && !rep.is_signer);
        let auth = &ix.accounts[3];
        assert!(auth.is_signer && !auth.is_writable);
        let pay = &ix.accounts[4];
        assert_eq!(pay.pubkey, payer);
        assert!(pay.is_signer && pay.is_writable);
    }

    #[test]
    fn add_reputation_rejects_zero_amount() {
        let c = client();
        let err = c
            .ix_add_reputation(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                1,
                0,
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn transfer_derives_two_distinct_reputation_pdas() {
        let c = client();
        let (ix, pdas) = c
            .ix_transfer_reputation(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                2,
            )
            .unwrap();
        assert_ne!(pdas.from.0, pdas.to.0);
        assert_eq!(ix.accounts[1].pubkey, pdas.from.0);
        assert_eq!(ix.accounts[2].pubkey, pdas.to.0);
    }

    #[test]
    fn admin_close_any_requires_admin_caller() {
        let c = client();
        let err = c
            .ix_admin_close_any(Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique())
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));

        assert!(c
            .ix_admin_close_any(c.admin, Pubkey::new_unique(), Pubkey::new_unique())
            .is_ok());
    }
}

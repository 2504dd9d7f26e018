//! Legacy-record reconciliation ("self-heal") for reputation addresses.
//!
//! Before a per-user-season operation, the derived reputation address is
//! inspected and classified. A record that exists, is program-owned, but
//! fails strict decode or carries the wrong season is legacy and must not be
//! mutated directly. Only the configured privileged identity may repair it,
//! by prepending a privileged close ahead of the main operation; any other
//! caller proceeds unrepaired and accepts a possible downstream failure.

use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use tracing::{debug, info};

use crate::batch::AccountReader;
use crate::error::ClientResult;
use crate::instruction::SpaceClient;
use crate::state::ReputationRecord;

/// Classification of one derived reputation address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountState {
    /// Nothing at the address.
    NoAccount,
    /// Program-owned record decoding to the expected season.
    Healthy(ReputationRecord),
    /// Program-owned record that fails strict decode or carries a
    /// mismatched season.
    Legacy,
    /// Owned by some other program. Not repairable client-side.
    ForeignOwner(Pubkey),
}

/// What the caller should do about a reputation address.
#[derive(Debug, Clone, PartialEq)]
pub enum RepairPlan {
    /// Proceed with the main operation as-is.
    Proceed(AccountState),
    /// Prepend this privileged close, then run the main operation.
    CloseFirst(Instruction),
    /// Legacy record found but the caller lacks the privilege to repair.
    /// The main operation still runs and may fail downstream.
    ProceedUnrepaired,
}

#[derive(Debug, Clone, Copy)]
pub struct ReconciliationEngine {
    client: SpaceClient,
}

impl ReconciliationEngine {
    pub fn new(client: SpaceClient) -> Self {
        Self { client }
    }

    /// Classify the account at `address` against `expected_season`.
    ///
    /// A decode failure here is deliberately swallowed into `Legacy` rather
    /// than surfaced: during reconciliation the record's contents only
    /// matter insofar as they prove the record healthy.
    pub fn inspect<R: AccountReader>(
        &self,
        reader: &R,
        address: &Pubkey,
        expected_season: u16,
    ) -> ClientResult<AccountState> {
        let Some(raw) = reader.get_account(address)? else {
            return Ok(AccountState::NoAccount);
        };
        if raw.owner != self.client.program_id {
            return Ok(AccountState::ForeignOwner(raw.owner));
        }
        match ReputationRecord::decode(&raw.data) {
            Ok(rec) if rec.season == expected_season => Ok(AccountState::Healthy(rec)),
            Ok(rec) => {
                debug!(%address, found = rec.season, expected = expected_season, "season mismatch");
                Ok(AccountState::Legacy)
            }
            Err(err) => {
                debug!(%address, %err, "undecodable program-owned record");
                Ok(AccountState::Legacy)
            }
        }
    }

    /// Decide whether a repair close must run before the main operation on
    /// `address`. Rent from a repaired record is refunded to `recipient`.
    pub fn plan<R: AccountReader>(
        &self,
        reader: &R,
        caller: Pubkey,
        address: &Pubkey,
        expected_season: u16,
        recipient: Pubkey,
    ) -> ClientResult<RepairPlan> {
        let state = self.inspect(reader, address, expected_season)?;
        match state {
            AccountState::Legacy if caller == self.client.admin => {
                info!(%address, "injecting privileged close for legacy record");
                let ix = self.client.ix_admin_close_any(caller, *address, recipient)?;
                Ok(RepairPlan::CloseFirst(ix))
            }
            AccountState::Legacy => Ok(RepairPlan::ProceedUnrepaired),
            // A foreign owner cannot be closed by our program either way.
            AccountState::ForeignOwner(_) => Ok(RepairPlan::ProceedUnrepaired),
            other => Ok(RepairPlan::Proceed(other)),
        }
    }
}

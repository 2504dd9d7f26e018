//! Best-effort enumeration of program-owned records.
//!
//! A scan fetches every account owned by the program and lenient-decodes
//! each one; anything that fails to decode is simply not a record of the
//! kind we care about. Decode failures never abort a scan.

use solana_program::pubkey::Pubkey;

use crate::batch::RawAccount;
use crate::error::ClientResult;
use crate::state::{self, ConfigRecord, Record};

/// Scan capability: list all accounts owned by a program.
pub trait ProgramScanner {
    fn program_accounts(&self, program_id: &Pubkey) -> ClientResult<Vec<(Pubkey, RawAccount)>>;
}

/// List every valid config record owned by the program.
pub fn list_configs<S: ProgramScanner>(
    scanner: &S,
    program_id: &Pubkey,
) -> ClientResult<Vec<(Pubkey, ConfigRecord)>> {
    let mut out = Vec::new();
    for (address, raw) in scanner.program_accounts(program_id)? {
        if let Some(Record::Config(rec)) = state::try_decode_any(&raw.data) {
            out.push((address, rec));
        }
    }
    Ok(out)
}

/// List every record of any known kind owned by the program.
pub fn list_records<S: ProgramScanner>(
    scanner: &S,
    program_id: &Pubkey,
) -> ClientResult<Vec<(Pubkey, Record)>> {
    let mut out = Vec::new();
    for (address, raw) in scanner.program_accounts(program_id)? {
        if let Some(rec) = state::try_decode_any(&raw.data) {
            out.push((address, rec));
        }
    }
    Ok(out)
}

//! RPC-backed implementations of the read, scan, and submit capabilities.
//!
//! Everything network-facing lives here; the rest of the crate only sees
//! the capability traits. Transaction assembly follows the usual
//! sign-with-payer flow; timeouts and confirmation policy belong to the
//! underlying `RpcClient`.

use solana_client::rpc_client::RpcClient;
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use tracing::debug;

use crate::batch::{AccountReader, InstructionSubmitter, RawAccount};
use crate::error::{ClientError, ClientResult};
use crate::scan::ProgramScanner;

/// Blocking RPC gateway. Implements the read and scan capabilities and
/// hands out submitters bound to a payer keypair.
pub struct RpcGateway {
    rpc: RpcClient,
}

impl RpcGateway {
    pub fn new(rpc_url: &str) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(
                rpc_url.to_string(),
                CommitmentConfig::confirmed(),
            ),
        }
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// A submit capability that signs with `payer` and pays fees from it.
    pub fn submitter<'a>(&'a self, payer: &'a Keypair) -> RpcSubmitter<'a> {
        RpcSubmitter { rpc: &self.rpc, payer }
    }
}

impl AccountReader for RpcGateway {
    fn get_account(&self, address: &Pubkey) -> ClientResult<Option<RawAccount>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Ok(response
            .value
            .map(|acc| RawAccount { owner: acc.owner, data: acc.data }))
    }
}

impl ProgramScanner for RpcGateway {
    fn program_accounts(&self, program_id: &Pubkey) -> ClientResult<Vec<(Pubkey, RawAccount)>> {
        let accounts = self
            .rpc
            .get_program_accounts(program_id)
            .map_err(|e| ClientError::transport(e.to_string()))?;
        Ok(accounts
            .into_iter()
            .map(|(address, acc)| (address, RawAccount { owner: acc.owner, data: acc.data }))
            .collect())
    }
}

/// Submit capability bound to one fee payer.
pub struct RpcSubmitter<'a> {
    rpc: &'a RpcClient,
    payer: &'a Keypair,
}

impl InstructionSubmitter for RpcSubmitter<'_> {
    fn submit(&self, instructions: &[Instruction]) -> ClientResult<String> {
        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .map_err(|e| ClientError::transport(e.to_string()))?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &[self.payer],
            blockhash,
        );
        let sig = self
            .rpc
            .send_and_confirm_transaction(&tx)
            .map_err(|e| ClientError::transport(e.to_string()))?;
        debug!(%sig, ops = instructions.len(), "transaction confirmed");
        Ok(sig.to_string())
    }
}

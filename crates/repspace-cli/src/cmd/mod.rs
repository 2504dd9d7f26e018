use anyhow::{anyhow, Result};
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signer};

use repspace_solana_client::batch::InstructionSubmitter;
use repspace_solana_client::constants;
use repspace_solana_client::rpc::RpcGateway;
use repspace_solana_client::SpaceClient;

use crate::args::{Cli, Command};

mod bulk;
mod init;
mod metadata;
mod set;
mod show;

/// Shared command context: client handle, RPC gateway, optional signer.
///
/// Without a keypair, mutating commands plan and print but never submit;
/// `--as` then supplies the acting identity.
pub struct Ctx {
    pub client: SpaceClient,
    pub gateway: RpcGateway,
    pub keypair: Option<Keypair>,
    pub as_identity: Option<Pubkey>,
}

impl Ctx {
    fn from_cli(cli: &Cli) -> Result<Self> {
        let program_id = match &cli.program_id {
            Some(s) => parse_pubkey(s, "program id")?,
            None => constants::default_program_id(),
        };
        let admin = match &cli.admin {
            Some(s) => parse_pubkey(s, "admin identity")?,
            None => constants::default_admin_id(),
        };
        let keypair = match &cli.keypair {
            Some(path) => Some(
                read_keypair_file(path)
                    .map_err(|e| anyhow!("failed to read keypair {path}: {e}"))?,
            ),
            None => None,
        };
        let as_identity = match &cli.as_identity {
            Some(s) => Some(parse_pubkey(s, "acting identity")?),
            None => None,
        };
        Ok(Self {
            client: SpaceClient::new(program_id, admin),
            gateway: RpcGateway::new(&cli.url),
            keypair,
            as_identity,
        })
    }

    /// The identity commands act as: the keypair's pubkey when signing,
    /// otherwise the `--as` identity for plan-only runs.
    pub fn actor(&self) -> Result<Pubkey> {
        if let Some(kp) = &self.keypair {
            return Ok(kp.pubkey());
        }
        self.as_identity
            .ok_or_else(|| anyhow!("pass --keypair to submit, or --as to plan without one"))
    }

    /// Submit one instruction when a signer is available; `None` means the
    /// command was plan-only.
    pub fn submit_one(&self, ix: Instruction) -> Result<Option<String>> {
        match &self.keypair {
            Some(kp) => Ok(Some(self.gateway.submitter(kp).submit(&[ix])?)),
            None => Ok(None),
        }
    }
}

pub fn parse_pubkey(s: &str, what: &str) -> Result<Pubkey> {
    s.parse().map_err(|_| anyhow!("invalid {what}: {s}"))
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let ctx = Ctx::from_cli(&cli)?;
    match cli.command {
        Command::Init { dao, rep_mint, season } => init::run(&ctx, &dao, &rep_mint, season),
        Command::Show { dao } => show::run(&ctx, dao.as_deref()),
        Command::Set { dao, field } => set::run(&ctx, &dao, field),
        Command::Metadata { dao, uri } => metadata::run(&ctx, &dao, &uri),
        Command::Bulk { dao, season, file, reset_first, chunk_size } => {
            bulk::run(&ctx, &dao, season, &file, reset_first, chunk_size)
        }
    }
}

#[cfg(test)]
pub(crate) fn plan_only_ctx(client: SpaceClient, actor: Pubkey) -> Ctx {
    Ctx {
        client,
        gateway: RpcGateway::new("http://localhost:8899"),
        keypair: None,
        as_identity: Some(actor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_falls_back_to_as_identity_without_a_keypair() {
        let who = Pubkey::new_unique();
        let ctx = plan_only_ctx(
            SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique()),
            who,
        );
        assert!(ctx.keypair.is_none());
        assert_eq!(ctx.actor().unwrap(), who);
    }

    #[test]
    fn actor_errors_when_neither_keypair_nor_identity_is_given() {
        let mut ctx = plan_only_ctx(
            SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique()),
            Pubkey::new_unique(),
        );
        ctx.as_identity = None;
        assert!(ctx.actor().is_err());
    }
}

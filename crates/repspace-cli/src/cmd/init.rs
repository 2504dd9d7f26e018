use anyhow::Result;
use serde::Serialize;

use crate::cmd::{parse_pubkey, Ctx};
use crate::output;

#[derive(Debug, Serialize)]
pub struct InitOut {
    pub config: String,
    pub bump: u8,
    pub season: u16,
    /// `None` on a plan-only run (no keypair given).
    pub signature: Option<String>,
}

pub fn run(ctx: &Ctx, dao: &str, rep_mint: &str, season: u16) -> Result<()> {
    let dao = parse_pubkey(dao, "dao id")?;
    let rep_mint = parse_pubkey(rep_mint, "rep mint")?;
    let authority = ctx.actor()?;

    let (ix, pdas) =
        ctx.client
            .ix_initialize_config(authority, authority, dao, rep_mint, season)?;

    let signature = ctx.submit_one(ix)?;

    output::print(&InitOut {
        config: pdas.config.0.to_string(),
        bump: pdas.config.1,
        season,
        signature,
    })
}

use anyhow::Result;
use serde::Serialize;

use crate::args::SetField;
use crate::cmd::{parse_pubkey, Ctx};
use crate::output;

#[derive(Debug, Serialize)]
pub struct SetOut {
    pub config: String,
    pub field: String,
    /// `None` on a plan-only run (no keypair given).
    pub signature: Option<String>,
}

pub fn run(ctx: &Ctx, dao: &str, field: SetField) -> Result<()> {
    let dao = parse_pubkey(dao, "dao id")?;
    let authority = ctx.actor()?;

    let (ix, pdas, field_name) = match field {
        SetField::Season { value } => {
            let (ix, pdas) = ctx.client.ix_set_season(authority, dao, value)?;
            (ix, pdas, "season")
        }
        SetField::Decay { value } => {
            let (ix, pdas) = ctx.client.ix_set_decay_bps(authority, dao, value)?;
            (ix, pdas, "decay_bps")
        }
        SetField::Mint { value } => {
            let mint = parse_pubkey(&value, "rep mint")?;
            let (ix, pdas) = ctx.client.ix_set_rep_mint(authority, dao, mint)?;
            (ix, pdas, "rep_mint")
        }
        SetField::Authority { value } => {
            let new_authority = parse_pubkey(&value, "new authority")?;
            let (ix, pdas) = ctx.client.ix_set_authority(authority, dao, new_authority)?;
            (ix, pdas, "authority")
        }
    };

    let signature = ctx.submit_one(ix)?;
    output::print(&SetOut {
        config: pdas.config.0.to_string(),
        field: field_name.to_string(),
        signature,
    })
}

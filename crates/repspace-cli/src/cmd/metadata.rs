use anyhow::Result;
use serde::Serialize;

use crate::cmd::{parse_pubkey, Ctx};
use crate::output;

#[derive(Debug, Serialize)]
pub struct MetadataOut {
    pub project_meta: String,
    pub uri: String,
    /// `None` on a plan-only run (no keypair given).
    pub signature: Option<String>,
}

pub fn run(ctx: &Ctx, dao: &str, uri: &str) -> Result<()> {
    let dao = parse_pubkey(dao, "dao id")?;
    let authority = ctx.actor()?;

    let (ix, pdas) = ctx
        .client
        .ix_upsert_project_metadata(authority, authority, dao, uri)?;

    let signature = ctx.submit_one(ix)?;
    output::print(&MetadataOut {
        project_meta: pdas.project_meta.0.to_string(),
        uri: uri.to_string(),
        signature,
    })
}

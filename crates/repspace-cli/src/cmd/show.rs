use anyhow::Result;
use serde::Serialize;

use repspace_solana_client::batch::AccountReader;
use repspace_solana_client::state::ConfigRecord;
use repspace_solana_client::{pda, scan};

use crate::cmd::{parse_pubkey, Ctx};
use crate::output;

#[derive(Debug, Serialize)]
pub struct ConfigOut {
    pub address: String,
    pub dao_id: String,
    pub authority: String,
    pub rep_mint: String,
    pub current_season: u16,
    pub decay_bps: u16,
}

impl ConfigOut {
    fn new(address: &solana_program::pubkey::Pubkey, rec: &ConfigRecord) -> Self {
        Self {
            address: address.to_string(),
            dao_id: rec.dao_id.to_string(),
            authority: rec.authority.to_string(),
            rep_mint: rec.rep_mint.to_string(),
            current_season: rec.current_season,
            decay_bps: rec.decay_bps,
        }
    }
}

pub fn run(ctx: &Ctx, dao: Option<&str>) -> Result<()> {
    match dao {
        Some(dao) => {
            let dao = parse_pubkey(dao, "dao id")?;
            let (address, _) = pda::derive_config(&ctx.client.program_id, &dao)?;
            let raw = ctx
                .gateway
                .get_account(&address)?
                .ok_or_else(|| anyhow::anyhow!("no config at {address}"))?;
            // Targeted read: decode failures surface.
            let rec = ConfigRecord::decode(&raw.data)?;
            output::print(&ConfigOut::new(&address, &rec))
        }
        None => {
            let configs = scan::list_configs(&ctx.gateway, &ctx.client.program_id)?;
            let out: Vec<_> = configs
                .iter()
                .map(|(addr, rec)| ConfigOut::new(addr, rec))
                .collect();
            output::print(&out)
        }
    }
}

use std::fs;

use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use repspace_solana_client::bulk::{self, BulkMode};
use repspace_solana_client::submit_in_batches;

use crate::cmd::{parse_pubkey, Ctx};
use crate::output;

#[derive(Debug, Serialize)]
pub struct BulkOut {
    pub rows: usize,
    pub rejected_lines: usize,
    pub operations: usize,
    /// False on a plan-only run: operations were planned (including any
    /// repair closes) but nothing was submitted.
    pub submitted: bool,
    pub batches_succeeded: usize,
    pub first_failed_batch: Option<usize>,
    pub signatures: Vec<String>,
}

pub fn run(
    ctx: &Ctx,
    dao: &str,
    season: u16,
    file: &str,
    reset_first: bool,
    chunk_size: usize,
) -> Result<()> {
    let dao = parse_pubkey(dao, "dao id")?;
    let caller = ctx.actor()?;

    let input = fs::read_to_string(file)
        .map_err(|e| anyhow!("failed to read {file}: {e}"))?;
    let parsed = bulk::parse_bulk_rows(&input);
    for err in &parsed.errors {
        output::eprintln_line(&format!("line {}: {}", err.line, err.reason));
    }
    if parsed.rows.is_empty() {
        return Err(anyhow!("no valid rows in {file}"));
    }

    let mode = if reset_first { BulkMode::ResetThenAdd } else { BulkMode::Add };
    let ops = bulk::plan_bulk_operations(
        &ctx.client,
        &ctx.gateway,
        caller,
        caller,
        dao,
        season,
        &parsed.rows,
        mode,
        bulk::default_max_rows(),
    )?;

    let Some(keypair) = &ctx.keypair else {
        return output::print(&BulkOut {
            rows: parsed.rows.len(),
            rejected_lines: parsed.errors.len(),
            operations: ops.len(),
            submitted: false,
            batches_succeeded: 0,
            first_failed_batch: None,
            signatures: Vec::new(),
        });
    };

    let bar = progress_bar(ops.len() as u64);
    let submitter = ctx.gateway.submitter(keypair);
    let report = submit_in_batches(&submitter, &ops, chunk_size, |p| {
        bar.set_position(p.ops_done as u64);
    })?;
    bar.finish_and_clear();

    let succeeded = report.succeeded();
    let first_failed = report.first_failed_index();
    let mut signatures = Vec::with_capacity(succeeded);
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(sig) => signatures.push(sig.clone()),
            Err(err) => output::eprintln_line(&format!(
                "batch {} failed after {succeeded} succeeded: {err}; \
                 landed batches are not rolled back",
                outcome.index
            )),
        }
    }

    output::print(&BulkOut {
        rows: parsed.rows.len(),
        rejected_lines: parsed.errors.len(),
        operations: ops.len(),
        submitted: true,
        batches_succeeded: succeeded,
        first_failed_batch: first_failed,
        signatures,
    })
}

fn progress_bar(total: u64) -> ProgressBar {
    if output::is_json() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} ops")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

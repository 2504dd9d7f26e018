//! Bulk reputation import: text parsing, row validation, and operation
//! planning.
//!
//! Input is one row per line, `wallet,amount` or whitespace separated.
//! Duplicate wallets merge by summing amounts; every invalid row produces
//! one line-numbered error. Amounts arrive as UI-entered decimals and are
//! floored to whole points before validation.

use std::collections::HashMap;
use std::str::FromStr;

use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use tracing::debug;

use crate::batch::AccountReader;
use crate::constants::MAX_BULK_ROWS;
use crate::error::{ClientError, ClientResult};
use crate::instruction::SpaceClient;
use crate::pda;
use crate::reconcile::{AccountState, ReconciliationEngine, RepairPlan};

/// One validated bulk row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkRow {
    pub wallet: Pubkey,
    pub amount: u64,
}

/// One rejected input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRowError {
    /// 1-based line number in the input text.
    pub line: usize,
    pub reason: String,
}

/// Parse result: valid merged rows plus per-line errors. Both can be
/// non-empty at once; the caller decides whether errors abort the import.
#[derive(Debug, Default)]
pub struct BulkParseOutcome {
    pub rows: Vec<BulkRow>,
    pub errors: Vec<BulkRowError>,
}

/// Floor a UI-entered amount to whole points and validate it is a positive
/// integer representable in 64 bits.
pub fn points_from_ui(amount: f64) -> ClientResult<u64> {
    if !amount.is_finite() {
        return Err(ClientError::invalid_input("amount is not a finite number"));
    }
    let floored = amount.floor();
    if floored < 1.0 {
        return Err(ClientError::invalid_input("amount must floor to at least 1"));
    }
    if floored >= u64::MAX as f64 {
        return Err(ClientError::invalid_input("amount does not fit in 64 bits"));
    }
    Ok(floored as u64)
}

/// Parse bulk import text. Blank lines and `#` comments are skipped.
/// Rows for the same wallet merge in first-seen order.
pub fn parse_bulk_rows(input: &str) -> BulkParseOutcome {
    let mut outcome = BulkParseOutcome::default();
    let mut index: HashMap<Pubkey, usize> = HashMap::new();

    for (line_no, raw) in input.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (wallet_str, amount_str) = match split_row(line) {
            Some(parts) => parts,
            None => {
                outcome.errors.push(BulkRowError {
                    line: line_no,
                    reason: "expected `wallet,amount`".into(),
                });
                continue;
            }
        };

        let wallet = match Pubkey::from_str(wallet_str) {
            Ok(w) => w,
            Err(_) => {
                outcome.errors.push(BulkRowError {
                    line: line_no,
                    reason: format!("invalid wallet address `{wallet_str}`"),
                });
                continue;
            }
        };

        let amount = match amount_str.parse::<f64>().map_err(|_| ()).and_then(|a| {
            points_from_ui(a).map_err(|_| ())
        }) {
            Ok(a) => a,
            Err(()) => {
                outcome.errors.push(BulkRowError {
                    line: line_no,
                    reason: format!("invalid or non-positive amount `{amount_str}`"),
                });
                continue;
            }
        };

        match index.get(&wallet) {
            Some(&i) => {
                let row = &mut outcome.rows[i];
                match row.amount.checked_add(amount) {
                    Some(sum) => row.amount = sum,
                    None => outcome.errors.push(BulkRowError {
                        line: line_no,
                        reason: "merged amount overflows 64 bits".into(),
                    }),
                }
            }
            None => {
                index.insert(wallet, outcome.rows.len());
                outcome.rows.push(BulkRow { wallet, amount });
            }
        }
    }
    outcome
}

fn split_row(line: &str) -> Option<(&str, &str)> {
    let (w, a) = match line.split_once(',') {
        Some((w, a)) => (w, a),
        None => line.split_once(char::is_whitespace)?,
    };
    let (w, a) = (w.trim(), a.trim());
    if w.is_empty() || a.is_empty() {
        return None;
    }
    Some((w, a))
}

/// Per-row behaviour of a bulk import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkMode {
    /// Credit on top of whatever exists.
    Add,
    /// Zero an existing healthy record before crediting.
    ResetThenAdd,
}

/// Turn validated rows into the ordered operation list for one bulk import.
///
/// Each row's reputation address is inspected first; a privileged caller
/// gets a repair close prepended for legacy records. A repair supersedes the
/// reset for that row: the close already removes the record, so the credit
/// recreates it from zero. A reset is likewise skipped when no record exists
/// or when a legacy record could not be repaired.
pub fn plan_bulk_operations<R: AccountReader>(
    client: &SpaceClient,
    reader: &R,
    caller: Pubkey,
    payer: Pubkey,
    dao_id: Pubkey,
    season: u16,
    rows: &[BulkRow],
    mode: BulkMode,
    max_rows: usize,
) -> ClientResult<Vec<Instruction>> {
    if rows.is_empty() {
        return Err(ClientError::invalid_input("no valid rows to submit"));
    }
    if rows.len() > max_rows {
        return Err(ClientError::invalid_input(format!(
            "{} rows exceed the maximum of {max_rows}",
            rows.len()
        )));
    }

    let engine = ReconciliationEngine::new(*client);
    let mut ops = Vec::with_capacity(rows.len() * 2);

    for row in rows {
        let pdas = pda::pdas_for_reputation(&client.program_id, &dao_id, &row.wallet, season)?;
        let plan = engine.plan(reader, caller, &pdas.reputation.0, season, payer)?;
        debug!(wallet = %row.wallet, ?plan, "planned row");

        match plan {
            RepairPlan::CloseFirst(close_ix) => {
                ops.push(close_ix);
            }
            RepairPlan::Proceed(AccountState::Healthy(_)) => {
                if mode == BulkMode::ResetThenAdd {
                    let (reset_ix, _) =
                        client.ix_reset_reputation(caller, dao_id, row.wallet, season)?;
                    ops.push(reset_ix);
                }
            }
            RepairPlan::Proceed(_) | RepairPlan::ProceedUnrepaired => {}
        }

        let (add_ix, _) =
            client.ix_add_reputation(payer, caller, dao_id, row.wallet, season, row.amount)?;
        ops.push(add_ix);
    }
    Ok(ops)
}

/// Default row cap re-exported next to the planner that enforces it.
pub fn default_max_rows() -> usize {
    MAX_BULK_ROWS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_wallets_merge_and_bad_rows_get_line_numbers() {
        let alice = Pubkey::new_unique();
        let input = format!("{alice},10\n{alice},5\n{},-1\nnot-an-address,3", Pubkey::new_unique());
        let outcome = parse_bulk_rows(&input);

        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0], BulkRow { wallet: alice, amount: 15 });

        assert_eq!(outcome.errors.len(), 2);
        assert_eq!(outcome.errors[0].line, 3);
        assert!(outcome.errors[0].reason.contains("amount"));
        assert_eq!(outcome.errors[1].line, 4);
        assert!(outcome.errors[1].reason.contains("wallet"));
    }

    #[test]
    fn whitespace_separator_and_comments_are_accepted() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let input = format!("# airdrop week 12\n\n{a}\t10\n{b} 2.9\n");
        let outcome = parse_bulk_rows(&input);
        assert!(outcome.errors.is_empty());
        assert_eq!(
            outcome.rows,
            vec![BulkRow { wallet: a, amount: 10 }, BulkRow { wallet: b, amount: 2 }]
        );
    }

    #[test]
    fn ui_amounts_are_floored_and_must_be_positive() {
        assert_eq!(points_from_ui(10.9).unwrap(), 10);
        assert_eq!(points_from_ui(1.0).unwrap(), 1);
        assert!(points_from_ui(0.5).is_err());
        assert!(points_from_ui(0.0).is_err());
        assert!(points_from_ui(-3.0).is_err());
        assert!(points_from_ui(f64::NAN).is_err());
        assert!(points_from_ui(f64::INFINITY).is_err());
        assert!(points_from_ui(2.0_f64.powi(64)).is_err());
    }

    #[test]
    fn merge_order_is_first_seen() {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        let input = format!("{b},1\n{a},2\n{b},3\n");
        let outcome = parse_bulk_rows(&input);
        assert_eq!(
            outcome.rows,
            vec![BulkRow { wallet: b, amount: 4 }, BulkRow { wallet: a, amount: 2 }]
        );
    }
}

//! Size-bounded, strictly sequential batch submission.
//!
//! Operations are partitioned into consecutive chunks; each chunk becomes
//! one transaction handed to the submit capability. Batch `k + 1` is never
//! submitted before batch `k`'s outcome is known, and a failing batch stops
//! forward progress. Already-landed batches are never rolled back; partial
//! application is a reported outcome, not an error state.

use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::constants::DEFAULT_CHUNK_SIZE;
use crate::error::{ClientError, ClientResult};

/// Raw account as returned by the read capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// Read capability: fetch one account's owner and data, or `None` when
/// nothing exists at the address.
pub trait AccountReader {
    fn get_account(&self, address: &Pubkey) -> ClientResult<Option<RawAccount>>;
}

/// Submit capability: sign and land one transaction containing the given
/// instructions in order, returning a transaction id.
pub trait InstructionSubmitter {
    fn submit(&self, instructions: &[Instruction]) -> ClientResult<String>;
}

/// Outcome of one submitted batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub index: usize,
    pub op_count: usize,
    pub result: Result<String, ClientError>,
}

/// Aggregated outcomes of one bulk submission.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchOutcome>,
}

/// Progress callback payload, emitted after each batch settles.
#[derive(Debug, Clone, Copy)]
pub struct BatchProgress {
    pub batch_index: usize,
    pub batch_count: usize,
    pub ops_done: usize,
    pub ops_total: usize,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn first_failed_index(&self) -> Option<usize> {
        self.outcomes.iter().find(|o| o.result.is_err()).map(|o| o.index)
    }

    pub fn is_complete_success(&self) -> bool {
        self.first_failed_index().is_none()
    }

    /// Collapse the report into a `Result`, surfacing a
    /// `PartialBatchFailure` when any batch failed.
    pub fn into_result(self) -> ClientResult<Vec<String>> {
        let succeeded = self.succeeded();
        let mut ids = Vec::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            match outcome.result {
                Ok(id) => ids.push(id),
                Err(source) => {
                    return Err(ClientError::PartialBatchFailure {
                        succeeded,
                        failed_index: outcome.index,
                        source: Box::new(source),
                    });
                }
            }
        }
        Ok(ids)
    }
}

/// Submit `operations` in order, `chunk_size` per transaction.
///
/// `on_progress` fires after every settled batch, success or failure.
pub fn submit_in_batches<S, F>(
    submitter: &S,
    operations: &[Instruction],
    chunk_size: usize,
    mut on_progress: F,
) -> ClientResult<BatchReport>
where
    S: InstructionSubmitter,
    F: FnMut(BatchProgress),
{
    if chunk_size == 0 {
        return Err(ClientError::invalid_input("chunk size must be positive"));
    }

    let batch_count = operations.len().div_ceil(chunk_size);
    let mut report = BatchReport::default();
    let mut ops_done = 0usize;

    for (index, chunk) in operations.chunks(chunk_size).enumerate() {
        debug!(index, ops = chunk.len(), "submitting batch");
        let result = submitter.submit(chunk);
        let failed = result.is_err();
        if let Err(err) = &result {
            warn!(index, %err, "batch failed, stopping");
        }
        ops_done += chunk.len();
        report.outcomes.push(BatchOutcome { index, op_count: chunk.len(), result });
        on_progress(BatchProgress {
            batch_index: index,
            batch_count,
            ops_done,
            ops_total: operations.len(),
        });
        if failed {
            break;
        }
    }
    Ok(report)
}

/// Convenience wrapper using the default chunk size and no progress hook.
pub fn submit_all<S: InstructionSubmitter>(
    submitter: &S,
    operations: &[Instruction],
) -> ClientResult<BatchReport> {
    submit_in_batches(submitter, operations, DEFAULT_CHUNK_SIZE, |_| {})
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Submitter that records chunk sizes and fails on request.
    struct FakeSubmitter {
        calls: RefCell<Vec<usize>>,
        fail_at: Option<usize>,
    }

    impl FakeSubmitter {
        fn ok() -> Self {
            Self { calls: RefCell::new(Vec::new()), fail_at: None }
        }

        fn failing_at(index: usize) -> Self {
            Self { calls: RefCell::new(Vec::new()), fail_at: Some(index) }
        }
    }

    impl InstructionSubmitter for FakeSubmitter {
        fn submit(&self, instructions: &[Instruction]) -> ClientResult<String> {
            let mut calls = self.calls.borrow_mut();
            let index = calls.len();
            calls.push(instructions.len());
            if self.fail_at == Some(index) {
                return Err(ClientError::transport("node unavailable"));
            }
            Ok(format!("sig-{index}"))
        }
    }

    fn noop_ix() -> Instruction {
        Instruction { program_id: Pubkey::new_unique(), accounts: vec![], data: vec![] }
    }

    #[test]
    fn thirteen_ops_chunk_five_gives_batches_of_5_5_3() {
        let ops: Vec<_> = (0..13).map(|_| noop_ix()).collect();
        let submitter = FakeSubmitter::ok();
        let report = submit_in_batches(&submitter, &ops, 5, |_| {}).unwrap();

        assert_eq!(*submitter.calls.borrow(), vec![5, 5, 3]);
        assert_eq!(report.succeeded(), 3);
        assert!(report.is_complete_success());
        assert_eq!(report.into_result().unwrap(), vec!["sig-0", "sig-1", "sig-2"]);
    }

    #[test]
    fn failure_stops_forward_progress() {
        let ops: Vec<_> = (0..12).map(|_| noop_ix()).collect();
        let submitter = FakeSubmitter::failing_at(1);
        let report = submit_in_batches(&submitter, &ops, 5, |_| {}).unwrap();

        // Third batch never submitted.
        assert_eq!(*submitter.calls.borrow(), vec![5, 5]);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.first_failed_index(), Some(1));

        match report.into_result().unwrap_err() {
            ClientError::PartialBatchFailure { succeeded, failed_index, .. } => {
                assert_eq!(succeeded, 1);
                assert_eq!(failed_index, 1);
            }
            other => panic!("expected partial batch failure, got {other}"),
        }
    }

    #[test]
    fn progress_reports_every_settled_batch() {
        let ops: Vec<_> = (0..7).map(|_| noop_ix()).collect();
        let submitter = FakeSubmitter::ok();
        let mut seen = Vec::new();
        submit_in_batches(&submitter, &ops, 5, |p| seen.push((p.batch_index, p.ops_done)))
            .unwrap();
        assert_eq!(seen, vec![(0, 5), (1, 7)]);
    }

    #[test]
    fn zero_chunk_size_is_invalid_input() {
        let submitter = FakeSubmitter::ok();
        let err = submit_in_batches(&submitter, &[], 0, |_| {}).unwrap_err();
        assert!(matches!(err, ClientError::InvalidInput(_)));
    }

    #[test]
    fn empty_operation_list_is_a_trivial_success() {
        let submitter = FakeSubmitter::ok();
        let report = submit_all(&submitter, &[]).unwrap();
        assert!(report.outcomes.is_empty());
        assert!(report.is_complete_success());
    }
}

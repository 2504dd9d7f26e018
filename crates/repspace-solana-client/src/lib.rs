//! repspace-solana-client
//!
//! Client protocol layer for the repspace reputation-space program:
//!
//! - deterministic PDA derivation for config, reputation, and project
//!   metadata accounts
//! - stable 8-byte discriminators for record kinds and operations
//! - strict binary codecs for the three on-chain record layouts
//! - typed instruction builders with fail-fast input validation
//! - size-bounded, strictly sequential batch submission
//! - privileged reconciliation of legacy per-user-season records
//!
//! Network access is isolated behind the capability traits in [`batch`] and
//! [`scan`]; [`rpc`] provides the `RpcClient`-backed implementations. The
//! on-chain program id and the privileged admin identity are supplied by
//! the consumer; the defaults in [`constants`] are development placeholders.

pub mod batch;
pub mod bulk;
pub mod constants;
pub mod discriminator;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod reconcile;
pub mod rpc;
pub mod scan;
pub mod state;

pub use batch::{
    submit_all, submit_in_batches, AccountReader, BatchOutcome, BatchProgress, BatchReport,
    InstructionSubmitter, RawAccount,
};
pub use bulk::{parse_bulk_rows, plan_bulk_operations, points_from_ui, BulkMode, BulkRow};
pub use error::{ClientError, ClientResult, DecodeError};
pub use instruction::SpaceClient;
pub use reconcile::{AccountState, ReconciliationEngine, RepairPlan};
pub use state::{ConfigRecord, ProjectMetadataRecord, Record, ReputationRecord};

//! End-to-end bulk import flow against in-memory capabilities:
//! parse rows, reconcile legacy records, plan operations, submit batches.

use std::cell::RefCell;
use std::collections::HashMap;

use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;

use repspace_solana_client::batch::{AccountReader, InstructionSubmitter, RawAccount};
use repspace_solana_client::bulk::{self, BulkMode, BulkRow};
use repspace_solana_client::discriminator::{global_discriminator, op_names};
use repspace_solana_client::error::{ClientError, ClientResult};
use repspace_solana_client::pda;
use repspace_solana_client::state::ReputationRecord;
use repspace_solana_client::{submit_in_batches, SpaceClient};

struct FakeChain {
    accounts: HashMap<Pubkey, RawAccount>,
}

impl AccountReader for FakeChain {
    fn get_account(&self, address: &Pubkey) -> ClientResult<Option<RawAccount>> {
        Ok(self.accounts.get(address).cloned())
    }
}

struct RecordingSubmitter {
    batches: RefCell<Vec<Vec<Instruction>>>,
    fail_at: Option<usize>,
}

impl RecordingSubmitter {
    fn new(fail_at: Option<usize>) -> Self {
        Self { batches: RefCell::new(Vec::new()), fail_at }
    }
}

impl InstructionSubmitter for RecordingSubmitter {
    fn submit(&self, instructions: &[Instruction]) -> ClientResult<String> {
        let mut batches = self.batches.borrow_mut();
        let index = batches.len();
        batches.push(instructions.to_vec());
        if self.fail_at == Some(index) {
            return Err(ClientError::transport("blockhash expired"));
        }
        Ok(format!("sig-{index}"))
    }
}

fn discriminator_of(ix: &Instruction) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&ix.data[..8]);
    out
}

fn stale_record(user: Pubkey, season: u16) -> RawAccount {
    let rec = ReputationRecord {
        version: 1,
        user,
        season,
        points: 77,
        last_update_slot: 123,
        bump: 255,
    };
    RawAccount { owner: Pubkey::default(), data: rec.encode() }
}

#[test]
fn admin_bulk_import_injects_close_before_add_for_stale_rows() {
    let client = SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique());
    let dao_id = Pubkey::new_unique();
    let season = 4u16;
    let payer = Pubkey::new_unique();

    let stale_user = Pubkey::new_unique();
    let fresh_user = Pubkey::new_unique();

    // A record from season 3 sits at stale_user's season-4 address.
    let stale_addr = pda::pdas_for_reputation(&client.program_id, &dao_id, &stale_user, season)
        .unwrap()
        .reputation
        .0;
    let mut stale = stale_record(stale_user, 3);
    stale.owner = client.program_id;
    let chain = FakeChain { accounts: HashMap::from([(stale_addr, stale)]) };

    let rows = vec![
        BulkRow { wallet: stale_user, amount: 10 },
        BulkRow { wallet: fresh_user, amount: 20 },
    ];
    let ops = bulk::plan_bulk_operations(
        &client,
        &chain,
        client.admin,
        payer,
        dao_id,
        season,
        &rows,
        BulkMode::Add,
        200,
    )
    .unwrap();

    // close + add for the stale row, plain add for the fresh row
    assert_eq!(ops.len(), 3);
    assert_eq!(discriminator_of(&ops[0]), global_discriminator(op_names::ADMIN_CLOSE_ANY));
    assert_eq!(ops[0].accounts[0].pubkey, stale_addr);
    assert_eq!(discriminator_of(&ops[1]), global_discriminator(op_names::ADD_REPUTATION));
    assert_eq!(ops[1].accounts[1].pubkey, stale_addr);
    assert_eq!(discriminator_of(&ops[2]), global_discriminator(op_names::ADD_REPUTATION));
}

#[test]
fn non_admin_caller_never_gets_a_close_injected() {
    let client = SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique());
    let dao_id = Pubkey::new_unique();
    let season = 4u16;
    let authority = Pubkey::new_unique();

    let user = Pubkey::new_unique();
    let addr = pda::pdas_for_reputation(&client.program_id, &dao_id, &user, season)
        .unwrap()
        .reputation
        .0;
    let mut stale = stale_record(user, 2);
    stale.owner = client.program_id;
    let chain = FakeChain { accounts: HashMap::from([(addr, stale)]) };

    let rows = vec![BulkRow { wallet: user, amount: 5 }];
    let ops = bulk::plan_bulk_operations(
        &client, &chain, authority, authority, dao_id, season, &rows, BulkMode::Add, 200,
    )
    .unwrap();

    assert_eq!(ops.len(), 1);
    assert_eq!(discriminator_of(&ops[0]), global_discriminator(op_names::ADD_REPUTATION));
}

#[test]
fn repair_supersedes_reset_for_that_row() {
    let client = SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique());
    let dao_id = Pubkey::new_unique();
    let season = 6u16;

    let stale_user = Pubkey::new_unique();
    let healthy_user = Pubkey::new_unique();

    let stale_addr = pda::pdas_for_reputation(&client.program_id, &dao_id, &stale_user, season)
        .unwrap()
        .reputation
        .0;
    let healthy_addr =
        pda::pdas_for_reputation(&client.program_id, &dao_id, &healthy_user, season)
            .unwrap()
            .reputation
            .0;

    let mut stale = stale_record(stale_user, 1);
    stale.owner = client.program_id;
    let mut healthy = stale_record(healthy_user, season);
    healthy.owner = client.program_id;
    let chain =
        FakeChain { accounts: HashMap::from([(stale_addr, stale), (healthy_addr, healthy)]) };

    let rows = vec![
        BulkRow { wallet: stale_user, amount: 1 },
        BulkRow { wallet: healthy_user, amount: 2 },
    ];
    let ops = bulk::plan_bulk_operations(
        &client,
        &chain,
        client.admin,
        client.admin,
        dao_id,
        season,
        &rows,
        BulkMode::ResetThenAdd,
        200,
    )
    .unwrap();

    let discs: Vec<_> = ops.iter().map(discriminator_of).collect();
    assert_eq!(
        discs,
        vec![
            // stale row: close then add, no reset
            global_discriminator(op_names::ADMIN_CLOSE_ANY),
            global_discriminator(op_names::ADD_REPUTATION),
            // healthy row: reset then add
            global_discriminator(op_names::RESET_REPUTATION),
            global_discriminator(op_names::ADD_REPUTATION),
        ]
    );
}

#[test]
fn row_cap_is_enforced_before_any_submission() {
    let client = SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique());
    let chain = FakeChain { accounts: HashMap::new() };
    let rows: Vec<_> = (0..201)
        .map(|_| BulkRow { wallet: Pubkey::new_unique(), amount: 1 })
        .collect();

    let err = bulk::plan_bulk_operations(
        &client,
        &chain,
        client.admin,
        client.admin,
        Pubkey::new_unique(),
        1,
        &rows,
        BulkMode::Add,
        200,
    )
    .unwrap_err();
    assert!(matches!(err, ClientError::InvalidInput(_)));
}

#[test]
fn planned_operations_flow_through_sequential_batches() {
    let client = SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique());
    let dao_id = Pubkey::new_unique();
    let chain = FakeChain { accounts: HashMap::new() };
    let rows: Vec<_> = (0..13)
        .map(|_| BulkRow { wallet: Pubkey::new_unique(), amount: 1 })
        .collect();

    let ops = bulk::plan_bulk_operations(
        &client, &chain, client.admin, client.admin, dao_id, 1, &rows, BulkMode::Add, 200,
    )
    .unwrap();
    assert_eq!(ops.len(), 13);

    let submitter = RecordingSubmitter::new(None);
    let report = submit_in_batches(&submitter, &ops, 5, |_| {}).unwrap();
    let sizes: Vec<_> = submitter.batches.borrow().iter().map(Vec::len).collect();
    assert_eq!(sizes, vec![5, 5, 3]);
    assert!(report.is_complete_success());

    // Submitted instructions keep planning order.
    let flat: Vec<_> = submitter.batches.borrow().concat();
    assert_eq!(flat, ops);
}

#[test]
fn partial_failure_reports_progress_made() {
    let client = SpaceClient::new(Pubkey::new_unique(), Pubkey::new_unique());
    let chain = FakeChain { accounts: HashMap::new() };
    let rows: Vec<_> = (0..8)
        .map(|_| BulkRow { wallet: Pubkey::new_unique(), amount: 3 })
        .collect();
    let ops = bulk::plan_bulk_operations(
        &client,
        &chain,
        client.admin,
        client.admin,
        Pubkey::new_unique(),
        2,
        &rows,
        BulkMode::Add,
        200,
    )
    .unwrap();

    let submitter = RecordingSubmitter::new(Some(1));
    let report = submit_in_batches(&submitter, &ops, 5, |_| {}).unwrap();
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.first_failed_index(), Some(1));
    assert_eq!(submitter.batches.borrow().len(), 2);
}

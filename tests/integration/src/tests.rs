//! Integration tests for the tip jar.
//!
//! These tests exercise the contract entry points directly using
//! `cosmwasm_std::testing` mocks. Tips go through the ledger, and the
//! lottery reads the ledger's monthly totals through a mocked querier
//! (`MockQuerier::update_wasm`) that serves the ledger's real responses.
//!
//! Run:
//! ```bash
//! cargo test -p tipjar-integration-tests
//! ```

use std::collections::BTreeMap;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{
    coins, from_json, Addr, BankMsg, Binary, ContractResult, CosmosMsg, Env, Event, MemoryStorage,
    OwnedDeps, Reply, SubMsgResponse, SubMsgResult, SystemError, SystemResult, Timestamp, Uint128,
    WasmQuery,
};
use sha2::{Digest, Sha256};
use tipjar_common::lottery::{derive_randomness, draw};
use tipjar_common::month::MonthId;
use tipjar_common::types::RecordStatus;
use tipjar_ledger::msg::{MonthlyTotalsResponse, TopSendersResponse, TransfersResponse};
use tipjar_lottery::state::LotteryOutcome;

type TestDeps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

// ─── Constants ───

const DENOM: &str = "utip";
/// 2024-09-30T23:59:59Z
const SEP_30_2024: u64 = 1_727_740_799;
/// 2024-10-01T00:00:00Z
const OCT_1_2024: u64 = 1_727_740_800;
/// 2024-11-01T00:00:00Z
const NOV_1_2024: u64 = 1_730_419_200;
const SEED_HEX: &str = "7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a7a";

fn october() -> MonthId {
    MonthId::new(2024, 10).unwrap()
}

fn env_at(seconds: u64) -> Env {
    let mut env = mock_env();
    env.block.time = Timestamp::from_seconds(seconds);
    env
}

// ─── Ledger helpers ───

fn setup_ledger(deps: &mut TestDeps) {
    let admin = deps.api.addr_make("admin");
    let msg = tipjar_ledger::msg::InstantiateMsg {
        denom: DENOM.to_string(),
        fee_collector: deps.api.addr_make("fee_collector").to_string(),
        platform_fee_bps: None,
    };
    tipjar_ledger::contract::instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg)
        .unwrap();
}

/// Apply as `owner`, approve with `members`. Returns the project id.
fn create_project(deps: &mut TestDeps, owner: &str, members: &[&str]) -> u64 {
    let owner = deps.api.addr_make(owner);
    tipjar_ledger::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&owner, &[]),
        tipjar_ledger::msg::ExecuteMsg::Apply {
            project_name: "Open Source Thing".to_string(),
            homepage_url: "https://example.org".to_string(),
            description: "Tools everyone uses".to_string(),
            contact_name: "Maintainer".to_string(),
            contact_email: "maintainer@example.org".to_string(),
        },
    )
    .unwrap();

    let res = tipjar_ledger::contract::query(
        deps.as_ref(),
        mock_env(),
        tipjar_ledger::msg::QueryMsg::Applications {
            status: Some(tipjar_ledger::state::ApplicationStatus::Pending),
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let pending: tipjar_ledger::msg::ApplicationsResponse = from_json(res).unwrap();
    let application_id = pending.applications.last().unwrap().id;

    let admin = deps.api.addr_make("admin");
    let members = members
        .iter()
        .map(|m| deps.api.addr_make(m).to_string())
        .collect();
    tipjar_ledger::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&admin, &[]),
        tipjar_ledger::msg::ExecuteMsg::ReviewApplication {
            application_id,
            approve: true,
            members,
        },
    )
    .unwrap();

    let application = tipjar_ledger::state::APPLICATIONS
        .load(deps.as_ref().storage, application_id)
        .unwrap();
    application.project_id.unwrap()
}

fn tip(deps: &mut TestDeps, sender: &str, project_id: u64, amount: u128, seconds: u64) {
    let sender = deps.api.addr_make(sender);
    tipjar_ledger::contract::execute(
        deps.as_mut(),
        env_at(seconds),
        message_info(&sender, &coins(amount, DENOM)),
        tipjar_ledger::msg::ExecuteMsg::Tip {
            project_id,
            message: Some(format!("thanks from {}", sender)),
        },
    )
    .unwrap();
}

fn ledger_totals(deps: &TestDeps, month: MonthId) -> Binary {
    tipjar_ledger::contract::query(
        deps.as_ref(),
        mock_env(),
        tipjar_ledger::msg::QueryMsg::MonthlyTotals { month: Some(month) },
    )
    .unwrap()
}

// ─── Lottery helpers ───

/// Lottery deps whose querier answers MonthlyTotals with the ledger's own
/// responses, keyed by month.
fn setup_lottery(responses: BTreeMap<u32, Binary>, with_minter: bool) -> TestDeps {
    let mut deps = mock_dependencies();
    let ledger = deps.api.addr_make("ledger").to_string();

    deps.querier.update_wasm(move |query| match query {
        WasmQuery::Smart { contract_addr, msg } if *contract_addr == ledger => {
            let parsed: Result<tipjar_lottery::msg::LedgerQueryMsg, _> = from_json(msg);
            match parsed {
                Ok(tipjar_lottery::msg::LedgerQueryMsg::MonthlyTotals { month: Some(month) }) => {
                    match responses.get(&month.key()) {
                        Some(binary) => SystemResult::Ok(ContractResult::Ok(binary.clone())),
                        None => SystemResult::Err(SystemError::InvalidRequest {
                            error: "month not prepared".to_string(),
                            request: Default::default(),
                        }),
                    }
                }
                _ => SystemResult::Err(SystemError::InvalidRequest {
                    error: "Unknown query".to_string(),
                    request: Default::default(),
                }),
            }
        }
        _ => SystemResult::Err(SystemError::InvalidRequest {
            error: "Only ledger smart queries supported".to_string(),
            request: Default::default(),
        }),
    });

    let admin = deps.api.addr_make("admin");
    let msg = tipjar_lottery::msg::InstantiateMsg {
        operator: deps.api.addr_make("operator").to_string(),
        ledger: deps.api.addr_make("ledger").to_string(),
        record_minter: with_minter.then(|| deps.api.addr_make("minter").to_string()),
    };
    tipjar_lottery::contract::instantiate(deps.as_mut(), mock_env(), message_info(&admin, &[]), msg)
        .unwrap();
    deps
}

/// Commit `SEED_HEX` for `month` one day before it starts. Returns the commit env.
fn commit_seed(deps: &mut TestDeps, month: MonthId) -> Env {
    let env = env_at(month.start().unwrap().seconds() - 86_400);
    let operator = deps.api.addr_make("operator");
    tipjar_lottery::contract::execute(
        deps.as_mut(),
        env.clone(),
        message_info(&operator, &[]),
        tipjar_lottery::msg::ExecuteMsg::CommitSeed {
            month,
            seed_commit: hex::encode(Sha256::digest(hex::decode(SEED_HEX).unwrap())),
        },
    )
    .unwrap();
    env
}

/// Reveal `SEED_HEX` for `month` at `seconds`, committing it first if needed.
fn draw_month(deps: &mut TestDeps, month: MonthId, seconds: u64) -> cosmwasm_std::Response {
    if !tipjar_lottery::state::SEED_COMMITS.has(deps.as_ref().storage, month.key()) {
        commit_seed(deps, month);
    }
    let operator = deps.api.addr_make("operator");
    tipjar_lottery::contract::execute(
        deps.as_mut(),
        env_at(seconds),
        message_info(&operator, &[]),
        tipjar_lottery::msg::ExecuteMsg::DrawLottery {
            month: Some(month),
            seed_hex: SEED_HEX.to_string(),
        },
    )
    .unwrap()
}

fn outcome(deps: &TestDeps, month: MonthId) -> Option<LotteryOutcome> {
    let res = tipjar_lottery::contract::query(
        deps.as_ref(),
        mock_env(),
        tipjar_lottery::msg::QueryMsg::Outcome { month },
    )
    .unwrap();
    from_json(res).unwrap()
}

/// A ledger with one two-member project and a month of tips.
/// October: alice 600, bob 300, carol 100. September and November have
/// one tip each that must not count toward October.
fn ledger_with_october_tips() -> (TestDeps, u64) {
    let mut deps = mock_dependencies();
    setup_ledger(&mut deps);
    let project_id = create_project(&mut deps, "owner", &["dev1", "dev2"]);

    tip(&mut deps, "alice", project_id, 5_000, SEP_30_2024);
    tip(&mut deps, "alice", project_id, 400, OCT_1_2024);
    tip(&mut deps, "bob", project_id, 300, OCT_1_2024 + 3_600);
    tip(&mut deps, "carol", project_id, 100, OCT_1_2024 + 86_400);
    tip(&mut deps, "alice", project_id, 200, NOV_1_2024 - 1);
    tip(&mut deps, "bob", project_id, 9_000, NOV_1_2024);

    (deps, project_id)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_tip_splits_between_fee_collector_and_members() {
    let mut deps = mock_dependencies();
    setup_ledger(&mut deps);
    let project_id = create_project(&mut deps, "owner", &["dev1", "dev2", "dev3"]);

    let alice = deps.api.addr_make("alice");
    let res = tipjar_ledger::contract::execute(
        deps.as_mut(),
        env_at(OCT_1_2024),
        message_info(&alice, &coins(1_000, DENOM)),
        tipjar_ledger::msg::ExecuteMsg::Tip {
            project_id,
            message: None,
        },
    )
    .unwrap();

    // 950 / 3 = 316 per member, the remainder goes to the fee collector
    let mut paid = BTreeMap::new();
    for sub in &res.messages {
        let CosmosMsg::Bank(BankMsg::Send { to_address, amount }) = &sub.msg else {
            panic!("expected bank send");
        };
        paid.insert(to_address.clone(), amount[0].amount.u128());
    }
    assert_eq!(paid.values().sum::<u128>(), 1_000);
    for member in ["dev1", "dev2", "dev3"] {
        assert_eq!(paid[&deps.api.addr_make(member).to_string()], 316);
    }
    assert_eq!(paid[&deps.api.addr_make("fee_collector").to_string()], 52);
}

#[test]
fn test_monthly_aggregation_across_window() {
    let (deps, project_id) = ledger_with_october_tips();

    let totals: MonthlyTotalsResponse = from_json(ledger_totals(&deps, october())).unwrap();
    assert_eq!(totals.month, october());
    assert_eq!(totals.grand_total, Uint128::new(1_000));
    let by_sender: BTreeMap<Addr, u128> = totals
        .totals
        .iter()
        .map(|t| (t.sender.clone(), t.total_amount.u128()))
        .collect();
    assert_eq!(by_sender.len(), 3);
    assert_eq!(by_sender[&deps.api.addr_make("alice")], 600);
    assert_eq!(by_sender[&deps.api.addr_make("bob")], 300);
    assert_eq!(by_sender[&deps.api.addr_make("carol")], 100);

    let res = tipjar_ledger::contract::query(
        deps.as_ref(),
        mock_env(),
        tipjar_ledger::msg::QueryMsg::TopSenders {
            month: Some(october()),
            limit: None,
        },
    )
    .unwrap();
    let top: TopSendersResponse = from_json(res).unwrap();
    let order: Vec<Addr> = top.senders.iter().map(|t| t.sender.clone()).collect();
    assert_eq!(
        order,
        vec![
            deps.api.addr_make("alice"),
            deps.api.addr_make("bob"),
            deps.api.addr_make("carol"),
        ]
    );

    // Every tip, any month, shows up under the project
    let res = tipjar_ledger::contract::query(
        deps.as_ref(),
        mock_env(),
        tipjar_ledger::msg::QueryMsg::ReceivedTransfers {
            project_id,
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let received: TransfersResponse = from_json(res).unwrap();
    assert_eq!(received.transfers.len(), 6);
}

#[test]
fn test_full_month_lottery_flow() {
    let (ledger, _) = ledger_with_october_tips();
    let october_totals = ledger_totals(&ledger, october());

    let mut responses = BTreeMap::new();
    responses.insert(october().key(), october_totals.clone());
    let mut deps = setup_lottery(responses, true);
    let commit_env = commit_seed(&mut deps, october());

    let draw_time = NOV_1_2024 + 3_600;
    let res = draw_month(&mut deps, october(), draw_time);
    assert_eq!(res.messages.len(), 1);
    assert!(res.events.iter().any(|e| e.ty == "tipjar_lottery_drawn"));

    // The stored outcome matches an independent run of the weighted draw
    let totals: MonthlyTotalsResponse = from_json(&october_totals).unwrap();
    let randomness = derive_randomness(
        &hex::decode(SEED_HEX).unwrap(),
        commit_env.block.height,
        commit_env.block.time.nanos(),
        "202410",
    );
    let expected = draw(&totals.totals, &randomness).unwrap().unwrap();

    let stored = outcome(&deps, october()).unwrap();
    assert_eq!(stored.winner, expected.winner);
    assert_eq!(stored.winning_ticket, expected.winning_ticket);
    assert_eq!(stored.grand_total, Uint128::new(1_000));
    assert_eq!(stored.num_senders, 3);
    assert_eq!(stored.seed, SEED_HEX);
    assert!(totals.totals.iter().any(|t| t.sender == stored.winner));
    assert_eq!(stored.record, RecordStatus::Pending);

    // Minter reports the token id through its wasm event
    #[allow(deprecated)]
    let reply = Reply {
        id: tipjar_lottery::execute::MINT_REPLY_ID,
        payload: Binary::default(),
        gas_used: 0,
        result: SubMsgResult::Ok(SubMsgResponse {
            events: vec![Event::new("wasm")
                .add_attribute("action", "mint_record")
                .add_attribute("token_id", "202410")],
            data: None,
            msg_responses: vec![],
        }),
    };
    tipjar_lottery::contract::reply(deps.as_mut(), mock_env(), reply).unwrap();
    assert_eq!(
        outcome(&deps, october()).unwrap().record,
        RecordStatus::Minted {
            token_id: Some("202410".to_string())
        }
    );

    // A month is drawn once
    let operator = deps.api.addr_make("operator");
    let err = tipjar_lottery::contract::execute(
        deps.as_mut(),
        env_at(draw_time + 60),
        message_info(&operator, &[]),
        tipjar_lottery::msg::ExecuteMsg::DrawLottery {
            month: Some(october()),
            seed_hex: SEED_HEX.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        tipjar_lottery::ContractError::AlreadyDrawn { .. }
    ));
}

#[test]
fn test_month_without_tips_has_no_winner() {
    let (ledger, _) = ledger_with_october_tips();
    let august = MonthId::new(2024, 8).unwrap();

    let august_totals: MonthlyTotalsResponse =
        from_json(ledger_totals(&ledger, august)).unwrap();
    assert!(august_totals.totals.is_empty());
    assert!(august_totals.grand_total.is_zero());

    let mut responses = BTreeMap::new();
    responses.insert(august.key(), ledger_totals(&ledger, august));
    let mut deps = setup_lottery(responses, true);

    let res = draw_month(&mut deps, august, NOV_1_2024);
    assert!(res.messages.is_empty());
    assert!(res
        .attributes
        .iter()
        .any(|a| a.key == "result" && a.value == "no_winner"));
    assert!(outcome(&deps, august).is_none());
}

#[test]
fn test_failed_mint_is_retried_without_redrawing() {
    let (ledger, _) = ledger_with_october_tips();
    let mut responses = BTreeMap::new();
    responses.insert(october().key(), ledger_totals(&ledger, october()));
    let mut deps = setup_lottery(responses, true);

    draw_month(&mut deps, october(), NOV_1_2024);
    let winner = outcome(&deps, october()).unwrap().winner;

    let failed = Reply {
        id: tipjar_lottery::execute::MINT_REPLY_ID,
        payload: Binary::default(),
        gas_used: 0,
        result: SubMsgResult::Err("minter paused".to_string()),
    };
    tipjar_lottery::contract::reply(deps.as_mut(), mock_env(), failed).unwrap();

    let stored = outcome(&deps, october()).unwrap();
    assert_eq!(stored.winner, winner);
    assert!(matches!(stored.record, RecordStatus::Failed { .. }));

    let operator = deps.api.addr_make("operator");
    let res = tipjar_lottery::contract::execute(
        deps.as_mut(),
        mock_env(),
        message_info(&operator, &[]),
        tipjar_lottery::msg::ExecuteMsg::RetryMint { month: october() },
    )
    .unwrap();
    assert_eq!(res.messages.len(), 1);

    let stored = outcome(&deps, october()).unwrap();
    assert_eq!(stored.winner, winner);
    assert_eq!(stored.record, RecordStatus::Pending);
}

#[test]
fn test_lottery_without_minter_only_records_outcome() {
    let (ledger, _) = ledger_with_october_tips();
    let mut responses = BTreeMap::new();
    responses.insert(october().key(), ledger_totals(&ledger, october()));
    let mut deps = setup_lottery(responses, false);

    let res = draw_month(&mut deps, october(), NOV_1_2024);
    assert!(res.messages.is_empty());

    let stored = outcome(&deps, october()).unwrap();
    assert_eq!(stored.record, RecordStatus::NotRequested);

    let res = tipjar_lottery::contract::query(
        deps.as_ref(),
        mock_env(),
        tipjar_lottery::msg::QueryMsg::WinnerHistory {
            address: stored.winner.to_string(),
            start_after: None,
            limit: None,
        },
    )
    .unwrap();
    let history: tipjar_lottery::msg::WinnerHistoryResponse = from_json(res).unwrap();
    assert_eq!(history.months, vec![october()]);
}

use cosmwasm_std::{
    to_json_binary, DepsMut, Env, Event, MessageInfo, QueryRequest, Reply, Response, StdError,
    Storage, SubMsg, SubMsgResult, WasmMsg, WasmQuery,
};
use sha2::{Digest, Sha256};
use tipjar_common::lottery::{derive_randomness, draw};
use tipjar_common::month::MonthId;
use tipjar_common::types::RecordStatus;

use crate::error::ContractError;
use crate::msg::{LedgerQueryMsg, RecordMinterExecuteMsg, UpdateConfigParams};
use crate::state::{
    LedgerMonthlyTotals, LotteryOutcome, SeedCommit, CONFIG, OUTCOMES, PENDING_MINT,
    SEED_COMMITS, WINNER_MONTHS,
};

pub const MINT_REPLY_ID: u64 = 1;
pub const MIN_SEED_BYTES: usize = 32;

fn validate_month(month: MonthId) -> Result<MonthId, ContractError> {
    MonthId::new(month.year, month.month).map_err(|_| ContractError::InvalidMonth {
        year: month.year,
        month: month.month,
    })
}

/// Commit to `sha256(seed)` for a month that has not started yet.
///
/// The seed is revealed with `DrawLottery`. The commitment predates every tip
/// of the month it draws.
pub fn commit_seed(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    month: MonthId,
    seed_commit: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can commit a seed".to_string(),
        });
    }

    let month = validate_month(month)?;
    let label = month.label();
    let current = MonthId::containing(env.block.time)?;
    if month <= current {
        return Err(ContractError::CommitWindowClosed { month: label });
    }
    if SEED_COMMITS.has(deps.storage, month.key()) {
        return Err(ContractError::AlreadyCommitted { month: label });
    }

    let commit = hex::decode(&seed_commit).map_err(|_| ContractError::InvalidHex {
        field: "seed_commit".to_string(),
    })?;
    if commit.len() != 32 {
        return Err(ContractError::InvalidHex {
            field: "seed_commit".to_string(),
        });
    }

    let stored = SeedCommit {
        commit: hex::encode(commit),
        committed_at: env.block.time,
        committed_height: env.block.height,
    };
    SEED_COMMITS.save(deps.storage, month.key(), &stored)?;

    Ok(Response::new()
        .add_attribute("action", "commit_seed")
        .add_attribute("month", &label)
        .add_event(
            Event::new("tipjar_seed_committed")
                .add_attribute("month", &label)
                .add_attribute("seed_commit", &stored.commit)
                .add_attribute("committed_height", stored.committed_height.to_string()),
        ))
}

/// Draw one winner for `month`, weighted by each sender's monthly total.
///
/// `seed_hex` must match the seed committed for the month. Randomness is
/// bound to the commit block, not the draw block.
pub fn draw_lottery(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    month: Option<MonthId>,
    seed_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can draw the lottery".to_string(),
        });
    }

    let current = MonthId::containing(env.block.time)?;
    let month = match month {
        Some(m) => validate_month(m)?,
        None => current,
    };
    let label = month.label();

    if month > current {
        return Err(ContractError::MonthInFuture { month: label });
    }
    if OUTCOMES.has(deps.storage, month.key()) {
        return Err(ContractError::AlreadyDrawn { month: label });
    }

    let seed = hex::decode(&seed_hex).map_err(|_| ContractError::InvalidHex {
        field: "seed_hex".to_string(),
    })?;
    if seed.len() < MIN_SEED_BYTES {
        return Err(ContractError::SeedTooShort {
            len: seed.len(),
            min: MIN_SEED_BYTES,
        });
    }

    let commit = SEED_COMMITS
        .may_load(deps.storage, month.key())?
        .ok_or(ContractError::NoCommit {
            month: label.clone(),
        })?;
    let seed_hash: [u8; 32] = Sha256::digest(&seed).into();
    if hex::encode(seed_hash) != commit.commit {
        return Err(ContractError::CommitMismatch);
    }

    let totals_query = QueryRequest::Wasm(WasmQuery::Smart {
        contract_addr: config.ledger.to_string(),
        msg: to_json_binary(&LedgerQueryMsg::MonthlyTotals { month: Some(month) })?,
    });
    let totals: LedgerMonthlyTotals = deps.querier.query(&totals_query)?;
    let num_senders = u32::try_from(totals.totals.len())
        .map_err(|_| StdError::generic_err("sender count exceeds u32"))?;

    let randomness = derive_randomness(
        &seed,
        commit.committed_height,
        commit.committed_at.nanos(),
        &label,
    );

    let Some(selection) = draw(&totals.totals, &randomness)? else {
        return Ok(Response::new()
            .add_attribute("action", "draw_lottery")
            .add_attribute("month", &label)
            .add_attribute("result", "no_winner")
            .add_event(
                Event::new("tipjar_lottery_no_winner")
                    .add_attribute("month", &label)
                    .add_attribute("num_senders", num_senders.to_string()),
            ));
    };

    let record = if config.record_minter.is_some() {
        RecordStatus::Pending
    } else {
        RecordStatus::NotRequested
    };

    let outcome = LotteryOutcome {
        month,
        label: label.clone(),
        winner: selection.winner.clone(),
        winner_total: selection.winner_total,
        winning_ticket: selection.winning_ticket,
        grand_total: selection.grand_total,
        num_senders,
        seed: hex::encode(&seed),
        randomness: hex::encode(randomness),
        drawn_at: env.block.time,
        drawn_by: info.sender.clone(),
        record,
    };
    OUTCOMES.save(deps.storage, month.key(), &outcome)?;
    WINNER_MONTHS.save(deps.storage, (&outcome.winner, month.key()), &())?;

    let mut response = Response::new()
        .add_attribute("action", "draw_lottery")
        .add_attribute("month", &label)
        .add_attribute("result", "winner")
        .add_attribute("winner", outcome.winner.to_string())
        .add_event(
            Event::new("tipjar_lottery_drawn")
                .add_attribute("month", &label)
                .add_attribute("winner", outcome.winner.to_string())
                .add_attribute("winner_total", outcome.winner_total.to_string())
                .add_attribute("winning_ticket", outcome.winning_ticket.to_string())
                .add_attribute("grand_total", outcome.grand_total.to_string())
                .add_attribute("num_senders", num_senders.to_string())
                .add_attribute("randomness", &outcome.randomness),
        );

    if let Some(minter) = &config.record_minter {
        response = response.add_submessage(mint_record_msg(deps.storage, minter, &outcome)?);
    }

    Ok(response)
}

/// Build the record mint for `outcome` and remember which month the reply
/// belongs to.
fn mint_record_msg(
    storage: &mut dyn Storage,
    minter: impl Into<String>,
    outcome: &LotteryOutcome,
) -> Result<SubMsg, ContractError> {
    PENDING_MINT.save(storage, &outcome.month.key())?;

    let MonthId { year, month } = outcome.month;
    let mint = RecordMinterExecuteMsg::MintRecord {
        month: outcome.label.clone(),
        winner: outcome.winner.to_string(),
        name: format!("{} {} Lottery Result", year, month),
        symbol: outcome.label.clone(),
        description: format!("This is the {} {} lottery result.", year, month),
    };

    Ok(SubMsg::reply_always(
        WasmMsg::Execute {
            contract_addr: minter.into(),
            msg: to_json_binary(&mint)?,
            funds: vec![],
        },
        MINT_REPLY_ID,
    ))
}

/// Record the mint result on the pending outcome.
///
/// A failed mint never rolls back the draw; the outcome keeps its winner and
/// is marked `Failed` so it can be retried.
pub fn handle_mint_reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    let month_key = PENDING_MINT.load(deps.storage)?;
    PENDING_MINT.remove(deps.storage);

    let mut outcome = OUTCOMES.load(deps.storage, month_key)?;

    let event = match msg.result {
        SubMsgResult::Ok(sub) => {
            let token_id = sub
                .events
                .iter()
                .flat_map(|e| e.attributes.iter())
                .find(|a| a.key == "token_id")
                .map(|a| a.value.clone());

            let mut event = Event::new("tipjar_record_minted")
                .add_attribute("month", &outcome.label)
                .add_attribute("winner", outcome.winner.to_string());
            if let Some(id) = &token_id {
                event = event.add_attribute("token_id", id);
            }
            outcome.record = RecordStatus::Minted { token_id };
            event
        }
        SubMsgResult::Err(reason) => {
            let event = Event::new("tipjar_record_failed")
                .add_attribute("month", &outcome.label)
                .add_attribute("reason", &reason);
            outcome.record = RecordStatus::Failed { reason };
            event
        }
    };

    OUTCOMES.save(deps.storage, month_key, &outcome)?;

    Ok(Response::new()
        .add_attribute("action", "mint_reply")
        .add_attribute("month", &outcome.label)
        .add_event(event))
}

/// Re-send the record mint for a month whose previous mint failed.
pub fn retry_mint(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    month: MonthId,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator && info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only operator or admin can retry a mint".to_string(),
        });
    }

    let mut outcome = OUTCOMES
        .may_load(deps.storage, month.key())?
        .ok_or(ContractError::OutcomeNotFound {
            month: month.label(),
        })?;
    if !matches!(outcome.record, RecordStatus::Failed { .. }) {
        return Err(ContractError::MintNotFailed {
            month: outcome.label,
        });
    }
    let minter = config.record_minter.ok_or(ContractError::NoRecordMinter)?;

    outcome.record = RecordStatus::Pending;
    OUTCOMES.save(deps.storage, month.key(), &outcome)?;

    let mint = mint_record_msg(deps.storage, minter, &outcome)?;

    Ok(Response::new()
        .add_attribute("action", "retry_mint")
        .add_attribute("month", &outcome.label)
        .add_submessage(mint))
}

pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        operator,
        ledger,
        record_minter,
        clear_record_minter,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(op) = operator {
        config.operator = deps.api.addr_validate(&op)?;
    }
    if let Some(ledger) = ledger {
        config.ledger = deps.api.addr_validate(&ledger)?;
    }
    if clear_record_minter == Some(true) {
        config.record_minter = None;
    } else if let Some(minter) = record_minter {
        config.record_minter = Some(deps.api.addr_validate(&minter)?);
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}

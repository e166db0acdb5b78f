use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;
use tipjar_common::month::MonthId;

use crate::msg::{OutcomesResponse, WinnerHistoryResponse};
use crate::state::{CONFIG, OUTCOMES, SEED_COMMITS, WINNER_MONTHS};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_outcome(deps: Deps, month: MonthId) -> StdResult<Binary> {
    let outcome = OUTCOMES.may_load(deps.storage, month.key())?;
    to_json_binary(&outcome)
}

pub fn query_seed_commit(deps: Deps, month: MonthId) -> StdResult<Binary> {
    let commit = SEED_COMMITS.may_load(deps.storage, month.key())?;
    to_json_binary(&commit)
}

pub fn query_outcomes(
    deps: Deps,
    start_after: Option<MonthId>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(|m| Bound::exclusive(m.key()));

    let outcomes = OUTCOMES
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(_, outcome)| outcome))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&OutcomesResponse { outcomes })
}

pub fn query_winner_history(
    deps: Deps,
    address: String,
    start_after: Option<MonthId>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start = start_after.map(|m| Bound::exclusive(m.key()));

    let months = WINNER_MONTHS
        .prefix(&addr)
        .keys(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|k| k.map(MonthId::from_key))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&WinnerHistoryResponse {
        address: addr,
        months,
    })
}

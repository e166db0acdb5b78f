use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult, Storage};
use cw_storage_plus::Bound;
use tipjar_common::aggregate::{all_senders, leaderboard, sender_total, TOP_SENDERS_LIMIT};
use tipjar_common::lottery::grand_total;
use tipjar_common::month::MonthId;
use tipjar_common::types::TransferRecord;

use crate::msg::{
    ApplicationsResponse, MonthlyTotalsResponse, ProjectStatsResponse, ProjectsResponse,
    SenderMonthlyTotalResponse, TopSendersResponse, TransfersResponse,
};
use crate::state::{
    ApplicationStatus, APPLICATIONS, CONFIG, PROFILES, PROJECTS, PROJECT_MESSAGES,
    RECEIVED_TRANSFERS, SENT_TRANSFERS, TRANSFERS, TRANSFER_TIMELINE,
};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

fn page_limit(limit: Option<u32>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize
}

/// Explicit month, or the month of the current block.
pub fn resolve_month(env: &Env, month: Option<MonthId>) -> StdResult<MonthId> {
    match month {
        Some(m) => MonthId::new(m.year, m.month),
        None => MonthId::containing(env.block.time),
    }
}

/// Every transfer recorded within the month window, oldest first.
pub fn month_transfers(storage: &dyn Storage, month: &MonthId) -> StdResult<Vec<TransferRecord>> {
    let (start, end) = month.window()?;
    TRANSFER_TIMELINE
        .keys(
            storage,
            Some(Bound::inclusive((start.nanos(), 0))),
            Some(Bound::inclusive((end.nanos(), u64::MAX))),
            Order::Ascending,
        )
        .map(|key| {
            let (_, transfer_id) = key?;
            TRANSFERS.load(storage, transfer_id)
        })
        .collect()
}

/// Resolve a page of transfer ids from one of the log indexes.
fn load_transfers<I>(
    storage: &dyn Storage,
    ids: I,
    limit: Option<u32>,
) -> StdResult<Vec<TransferRecord>>
where
    I: Iterator<Item = StdResult<u64>>,
{
    ids.take(page_limit(limit))
        .map(|transfer_id| TRANSFERS.load(storage, transfer_id?))
        .collect()
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_application(deps: Deps, application_id: u64) -> StdResult<Binary> {
    let application = APPLICATIONS.load(deps.storage, application_id)?;
    to_json_binary(&application)
}

pub fn query_applications(
    deps: Deps,
    status: Option<ApplicationStatus>,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let start = start_after.map(Bound::exclusive);

    let applications = APPLICATIONS
        .range(deps.storage, start, None, Order::Ascending)
        .filter(|r| match (r, &status) {
            (Ok((_, app)), Some(wanted)) => &app.status == wanted,
            _ => true,
        })
        .take(page_limit(limit))
        .map(|r| r.map(|(_, app)| app))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&ApplicationsResponse { applications })
}

pub fn query_project(deps: Deps, project_id: u64) -> StdResult<Binary> {
    let project = PROJECTS.load(deps.storage, project_id)?;
    to_json_binary(&project)
}

pub fn query_projects(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let start = start_after.map(Bound::exclusive);

    let projects = PROJECTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_limit(limit))
        .map(|r| r.map(|(_, project)| project))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&ProjectsResponse { projects })
}

pub fn query_project_stats(deps: Deps, project_id: u64) -> StdResult<Binary> {
    let project = PROJECTS.load(deps.storage, project_id)?;
    to_json_binary(&ProjectStatsResponse {
        project_id,
        donor_count: project.donor_count,
        total_received: project.total_received,
    })
}

pub fn query_profile(deps: Deps, address: String) -> StdResult<Binary> {
    let address = deps.api.addr_validate(&address)?;
    let profile = PROFILES.may_load(deps.storage, &address)?;
    to_json_binary(&profile)
}

pub fn query_transfer(deps: Deps, transfer_id: u64) -> StdResult<Binary> {
    let transfer = TRANSFERS.load(deps.storage, transfer_id)?;
    to_json_binary(&transfer)
}

pub fn query_sent_transfers(
    deps: Deps,
    sender: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let sender = deps.api.addr_validate(&sender)?;
    let ids = SENT_TRANSFERS.prefix(&sender).keys(
        deps.storage,
        start_after.map(Bound::exclusive),
        None,
        Order::Ascending,
    );
    let transfers = load_transfers(deps.storage, ids, limit)?;
    to_json_binary(&TransfersResponse { transfers })
}

pub fn query_received_transfers(
    deps: Deps,
    project_id: u64,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let ids = RECEIVED_TRANSFERS.prefix(project_id).keys(
        deps.storage,
        start_after.map(Bound::exclusive),
        None,
        Order::Ascending,
    );
    let transfers = load_transfers(deps.storage, ids, limit)?;
    to_json_binary(&TransfersResponse { transfers })
}

pub fn query_project_messages(
    deps: Deps,
    project_id: u64,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let ids = PROJECT_MESSAGES.prefix(project_id).keys(
        deps.storage,
        start_after.map(Bound::exclusive),
        None,
        Order::Ascending,
    );
    let transfers = load_transfers(deps.storage, ids, limit)?;
    to_json_binary(&TransfersResponse { transfers })
}

pub fn query_monthly_transfers(
    deps: Deps,
    env: Env,
    month: Option<MonthId>,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let month = resolve_month(&env, month)?;
    let (start, end) = month.window()?;

    // Resume right after the last transfer of the previous page, never before
    // the month starts
    let lower = match start_after {
        Some(transfer_id) => {
            let last = TRANSFERS.load(deps.storage, transfer_id)?;
            if last.timestamp < start {
                Bound::inclusive((start.nanos(), 0))
            } else {
                Bound::exclusive((last.timestamp.nanos(), transfer_id))
            }
        }
        None => Bound::inclusive((start.nanos(), 0)),
    };

    let transfers = TRANSFER_TIMELINE
        .keys(
            deps.storage,
            Some(lower),
            Some(Bound::inclusive((end.nanos(), u64::MAX))),
            Order::Ascending,
        )
        .take(page_limit(limit))
        .map(|key| {
            let (_, transfer_id) = key?;
            TRANSFERS.load(deps.storage, transfer_id)
        })
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&TransfersResponse { transfers })
}

pub fn query_monthly_totals(deps: Deps, env: Env, month: Option<MonthId>) -> StdResult<Binary> {
    let month = resolve_month(&env, month)?;
    let records = month_transfers(deps.storage, &month)?;
    let totals = all_senders(&records)?;
    let grand_total = grand_total(&totals)?;

    to_json_binary(&MonthlyTotalsResponse {
        month,
        totals,
        grand_total,
    })
}

pub fn query_top_senders(
    deps: Deps,
    env: Env,
    month: Option<MonthId>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let month = resolve_month(&env, month)?;
    let limit = limit
        .map(|l| (l as usize).min(TOP_SENDERS_LIMIT))
        .unwrap_or(TOP_SENDERS_LIMIT);
    let records = month_transfers(deps.storage, &month)?;
    let senders = leaderboard(all_senders(&records)?, limit);

    to_json_binary(&TopSendersResponse { month, senders })
}

pub fn query_sender_monthly_total(
    deps: Deps,
    env: Env,
    sender: String,
    month: Option<MonthId>,
) -> StdResult<Binary> {
    let sender = deps.api.addr_validate(&sender)?;
    let month = resolve_month(&env, month)?;
    let records = month_transfers(deps.storage, &month)?;
    let total_amount = sender_total(&records, &sender)?;

    to_json_binary(&SenderMonthlyTotalResponse {
        sender,
        month,
        total_amount,
    })
}

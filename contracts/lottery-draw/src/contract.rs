use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg, UpdateConfigParams};
use crate::query;
use crate::state::{LotteryConfig, CONFIG};

const CONTRACT_NAME: &str = "crates.io:tipjar-lottery";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let record_minter = msg
        .record_minter
        .map(|m| deps.api.addr_validate(&m))
        .transpose()?;

    let config = LotteryConfig {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
        ledger: deps.api.addr_validate(&msg.ledger)?,
        record_minter,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "lottery")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CommitSeed { month, seed_commit } => {
            execute::commit_seed(deps, env, info, month, seed_commit)
        }
        ExecuteMsg::DrawLottery { month, seed_hex } => {
            execute::draw_lottery(deps, env, info, month, seed_hex)
        }
        ExecuteMsg::RetryMint { month } => execute::retry_mint(deps, env, info, month),
        ExecuteMsg::UpdateConfig {
            operator,
            ledger,
            record_minter,
            clear_record_minter,
        } => execute::update_config(
            deps,
            env,
            info,
            UpdateConfigParams {
                operator,
                ledger,
                record_minter,
                clear_record_minter,
            },
        ),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        execute::MINT_REPLY_ID => execute::handle_mint_reply(deps, env, msg),
        id => Err(ContractError::UnknownReply { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Outcome { month } => query::query_outcome(deps, month),
        QueryMsg::SeedCommit { month } => query::query_seed_commit(deps, month),
        QueryMsg::Outcomes { start_after, limit } => {
            query::query_outcomes(deps, start_after, limit)
        }
        QueryMsg::WinnerHistory {
            address,
            start_after,
            limit,
        } => query::query_winner_history(deps, address, start_after, limit),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}

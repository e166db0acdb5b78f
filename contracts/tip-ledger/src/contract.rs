use cosmwasm_std::{entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ApplyParams, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{Config, CONFIG, NEXT_APPLICATION_ID, NEXT_PROJECT_ID, NEXT_TRANSFER_ID};

const CONTRACT_NAME: &str = "crates.io:tipjar-ledger";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let platform_fee_bps = msg
        .platform_fee_bps
        .unwrap_or(execute::DEFAULT_PLATFORM_FEE_BPS);
    execute::validate_bps("platform_fee_bps", platform_fee_bps)?;

    let config = Config {
        admin: info.sender.clone(),
        denom: msg.denom,
        fee_collector: deps.api.addr_validate(&msg.fee_collector)?,
        platform_fee_bps,
    };
    CONFIG.save(deps.storage, &config)?;

    NEXT_APPLICATION_ID.save(deps.storage, &0)?;
    NEXT_PROJECT_ID.save(deps.storage, &0)?;
    NEXT_TRANSFER_ID.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "tip-ledger")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("denom", config.denom))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Apply {
            project_name,
            homepage_url,
            description,
            contact_name,
            contact_email,
        } => execute::apply(
            deps,
            env,
            info,
            ApplyParams {
                project_name,
                homepage_url,
                description,
                contact_name,
                contact_email,
            },
        ),
        ExecuteMsg::ReviewApplication {
            application_id,
            approve,
            members,
        } => execute::review_application(deps, env, info, application_id, approve, members),
        ExecuteMsg::AddMember { project_id, member } => {
            execute::add_member(deps, env, info, project_id, member)
        }
        ExecuteMsg::Tip {
            project_id,
            message,
        } => execute::tip(deps, env, info, project_id, message),
        ExecuteMsg::UpdateProfile {
            name,
            description,
            image_url,
        } => execute::update_profile(deps, env, info, name, description, image_url),
        ExecuteMsg::UpdateConfig {
            admin,
            fee_collector,
            platform_fee_bps,
        } => execute::update_config(deps, env, info, admin, fee_collector, platform_fee_bps),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Application { application_id } => {
            query::query_application(deps, application_id)
        }
        QueryMsg::Applications {
            status,
            start_after,
            limit,
        } => query::query_applications(deps, status, start_after, limit),
        QueryMsg::Project { project_id } => query::query_project(deps, project_id),
        QueryMsg::Projects { start_after, limit } => {
            query::query_projects(deps, start_after, limit)
        }
        QueryMsg::ProjectStats { project_id } => query::query_project_stats(deps, project_id),
        QueryMsg::Transfer { transfer_id } => query::query_transfer(deps, transfer_id),
        QueryMsg::SentTransfers {
            sender,
            start_after,
            limit,
        } => query::query_sent_transfers(deps, sender, start_after, limit),
        QueryMsg::ReceivedTransfers {
            project_id,
            start_after,
            limit,
        } => query::query_received_transfers(deps, project_id, start_after, limit),
        QueryMsg::ProjectMessages {
            project_id,
            start_after,
            limit,
        } => query::query_project_messages(deps, project_id, start_after, limit),
        QueryMsg::MonthlyTransfers {
            month,
            start_after,
            limit,
        } => query::query_monthly_transfers(deps, env, month, start_after, limit),
        QueryMsg::MonthlyTotals { month } => query::query_monthly_totals(deps, env, month),
        QueryMsg::TopSenders { month, limit } => {
            query::query_top_senders(deps, env, month, limit)
        }
        QueryMsg::Profile { address } => query::query_profile(deps, address),
        QueryMsg::SenderMonthlyTotal { sender, month } => {
            query::query_sender_monthly_total(deps, env, sender, month)
        }
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

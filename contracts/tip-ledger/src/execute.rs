use cosmwasm_std::{
    coins, Addr, BankMsg, DepsMut, Env, Event, MessageInfo, Response, StdResult, Uint128,
};
use tipjar_common::types::TransferRecord;

use crate::error::ContractError;
use crate::msg::ApplyParams;
use crate::state::{
    Application, ApplicationStatus, Profile, Project, APPLICATIONS, CONFIG,
    NEXT_APPLICATION_ID, NEXT_PROJECT_ID, NEXT_TRANSFER_ID, PROFILES, PROJECTS, PROJECT_DONORS,
    PROJECT_MESSAGES, RECEIVED_TRANSFERS, SENT_TRANSFERS, TRANSFERS, TRANSFER_TIMELINE,
};

pub const BPS_DENOMINATOR: u16 = 10_000;
pub const DEFAULT_PLATFORM_FEE_BPS: u16 = 500;
pub const MAX_MESSAGE_LEN: usize = 280;
pub const MAX_PROFILE_NAME_LEN: usize = 64;
pub const MAX_PROFILE_DESCRIPTION_LEN: usize = 1_000;
pub const MAX_PROFILE_IMAGE_URL_LEN: usize = 512;

/// How one tip is paid out.
#[derive(Debug, PartialEq)]
pub struct TipSplit {
    pub platform_fee: Uint128,
    pub per_member: Uint128,
}

/// Split a tip between the platform and `num_members` payout members.
///
/// The member pool is `amount * (10000 - fee_bps) / 10000`, divided equally and
/// rounded down. Everything the members don't receive, including rounding
/// dust, goes to the platform, so the parts always add up to `amount`.
pub fn split_tip(
    amount: Uint128,
    platform_fee_bps: u16,
    num_members: usize,
) -> StdResult<TipSplit> {
    let member_pool = amount.multiply_ratio(
        (BPS_DENOMINATOR - platform_fee_bps) as u128,
        BPS_DENOMINATOR as u128,
    );
    let members = Uint128::new(num_members as u128);
    let per_member = member_pool.checked_div(members)?;
    let platform_fee = amount.checked_sub(per_member.checked_mul(members)?)?;

    Ok(TipSplit {
        platform_fee,
        per_member,
    })
}

pub fn validate_bps(field: &str, value: u16) -> Result<(), ContractError> {
    if value > BPS_DENOMINATOR {
        return Err(ContractError::InvalidBps {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

fn validate_members(
    deps: &DepsMut,
    project_id: u64,
    members: &[String],
) -> Result<Vec<Addr>, ContractError> {
    let mut validated: Vec<Addr> = Vec::with_capacity(members.len());
    for member in members {
        let addr = deps.api.addr_validate(member)?;
        if validated.contains(&addr) {
            return Err(ContractError::DuplicateMember {
                project_id,
                member: member.clone(),
            });
        }
        validated.push(addr);
    }
    Ok(validated)
}

/// Submit a project application. Anyone can call.
pub fn apply(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: ApplyParams,
) -> Result<Response, ContractError> {
    let ApplyParams {
        project_name,
        homepage_url,
        description,
        contact_name,
        contact_email,
    } = params;

    if project_name.trim().is_empty() {
        return Err(ContractError::InvalidApplication {
            reason: "project name is empty".to_string(),
        });
    }
    if !contact_email.contains('@') {
        return Err(ContractError::InvalidApplication {
            reason: "contact email is not an address".to_string(),
        });
    }

    let id = NEXT_APPLICATION_ID.may_load(deps.storage)?.unwrap_or(0);
    NEXT_APPLICATION_ID.save(deps.storage, &(id + 1))?;

    let application = Application {
        id,
        project_name: project_name.clone(),
        homepage_url,
        description,
        contact_name,
        contact_email,
        applicant: info.sender.clone(),
        submitted_at: env.block.time,
        status: ApplicationStatus::Pending,
        reviewed_at: None,
        project_id: None,
    };
    APPLICATIONS.save(deps.storage, id, &application)?;

    Ok(Response::new()
        .add_attribute("action", "apply")
        .add_attribute("application_id", id.to_string())
        .add_event(
            Event::new("tipjar_application_submitted")
                .add_attribute("application_id", id.to_string())
                .add_attribute("applicant", info.sender.to_string())
                .add_attribute("project_name", project_name),
        ))
}

/// Approve or reject a pending application. Admin only.
pub fn review_application(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    application_id: u64,
    approve: bool,
    members: Vec<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can review applications".to_string(),
        });
    }

    let mut application = APPLICATIONS
        .may_load(deps.storage, application_id)?
        .ok_or(ContractError::ApplicationNotFound { application_id })?;
    if application.status != ApplicationStatus::Pending {
        return Err(ContractError::ApplicationNotPending { application_id });
    }

    application.reviewed_at = Some(env.block.time);

    if !approve {
        application.status = ApplicationStatus::Rejected;
        APPLICATIONS.save(deps.storage, application_id, &application)?;

        return Ok(Response::new()
            .add_attribute("action", "review_application")
            .add_attribute("application_id", application_id.to_string())
            .add_attribute("status", "rejected")
            .add_event(
                Event::new("tipjar_application_rejected")
                    .add_attribute("application_id", application_id.to_string()),
            ));
    }

    let project_id = NEXT_PROJECT_ID.may_load(deps.storage)?.unwrap_or(0);
    let members = if members.is_empty() {
        vec![application.applicant.clone()]
    } else {
        validate_members(&deps, project_id, &members)?
    };

    let project = Project {
        id: project_id,
        name: application.project_name.clone(),
        homepage_url: application.homepage_url.clone(),
        description: application.description.clone(),
        owner: application.applicant.clone(),
        members,
        created_at: env.block.time,
        total_received: Uint128::zero(),
        donor_count: 0,
    };
    PROJECTS.save(deps.storage, project_id, &project)?;
    NEXT_PROJECT_ID.save(deps.storage, &(project_id + 1))?;

    application.status = ApplicationStatus::Approved;
    application.project_id = Some(project_id);
    APPLICATIONS.save(deps.storage, application_id, &application)?;

    Ok(Response::new()
        .add_attribute("action", "review_application")
        .add_attribute("application_id", application_id.to_string())
        .add_attribute("status", "approved")
        .add_attribute("project_id", project_id.to_string())
        .add_event(
            Event::new("tipjar_project_created")
                .add_attribute("project_id", project_id.to_string())
                .add_attribute("application_id", application_id.to_string())
                .add_attribute("owner", project.owner.to_string())
                .add_attribute("num_members", project.members.len().to_string()),
        ))
}

/// Add a payout member. Project owner only.
pub fn add_member(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    project_id: u64,
    member: String,
) -> Result<Response, ContractError> {
    let mut project = PROJECTS
        .may_load(deps.storage, project_id)?
        .ok_or(ContractError::ProjectNotFound { project_id })?;
    if info.sender != project.owner {
        return Err(ContractError::Unauthorized {
            reason: "only the project owner can add members".to_string(),
        });
    }

    let addr = deps.api.addr_validate(&member)?;
    if project.members.contains(&addr) {
        return Err(ContractError::DuplicateMember { project_id, member });
    }
    project.members.push(addr.clone());
    PROJECTS.save(deps.storage, project_id, &project)?;

    Ok(Response::new()
        .add_attribute("action", "add_member")
        .add_attribute("project_id", project_id.to_string())
        .add_attribute("member", addr.to_string()))
}

/// Tip a project: split the funds to the platform and the project members and
/// append the transfer to the log.
pub fn tip(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    project_id: u64,
    message: Option<String>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    // Validate funds: exactly one coin of the configured denom
    if info.funds.is_empty() {
        return Err(ContractError::NoFundsSent);
    }
    if info.funds.len() != 1 {
        return Err(ContractError::InvalidFunds);
    }
    let sent = &info.funds[0];
    if sent.denom != config.denom {
        return Err(ContractError::WrongDenom {
            expected: config.denom,
            denom: sent.denom.clone(),
        });
    }
    let amount = sent.amount;
    if amount.is_zero() {
        return Err(ContractError::NoFundsSent);
    }

    if let Some(text) = &message {
        if text.len() > MAX_MESSAGE_LEN {
            return Err(ContractError::MessageTooLong {
                len: text.len(),
                max: MAX_MESSAGE_LEN,
            });
        }
    }
    let message = message.filter(|text| !text.trim().is_empty());

    let mut project = PROJECTS
        .may_load(deps.storage, project_id)?
        .ok_or(ContractError::ProjectNotFound { project_id })?;
    if project.members.is_empty() {
        return Err(ContractError::NoMembers { project_id });
    }

    let split = split_tip(amount, config.platform_fee_bps, project.members.len())?;

    let mut sends: Vec<BankMsg> = Vec::with_capacity(project.members.len() + 1);
    if !split.platform_fee.is_zero() {
        sends.push(BankMsg::Send {
            to_address: config.fee_collector.to_string(),
            amount: coins(split.platform_fee.u128(), &config.denom),
        });
    }
    if !split.per_member.is_zero() {
        for member in &project.members {
            sends.push(BankMsg::Send {
                to_address: member.to_string(),
                amount: coins(split.per_member.u128(), &config.denom),
            });
        }
    }

    // Append to the log and its indexes
    let transfer_id = NEXT_TRANSFER_ID.may_load(deps.storage)?.unwrap_or(0);
    NEXT_TRANSFER_ID.save(deps.storage, &(transfer_id + 1))?;

    let record = TransferRecord {
        id: transfer_id,
        sender: info.sender.clone(),
        recipient: project_id.to_string(),
        amount,
        timestamp: env.block.time,
        message,
    };
    TRANSFERS.save(deps.storage, transfer_id, &record)?;
    TRANSFER_TIMELINE.save(deps.storage, (env.block.time.nanos(), transfer_id), &())?;
    SENT_TRANSFERS.save(deps.storage, (&info.sender, transfer_id), &())?;
    RECEIVED_TRANSFERS.save(deps.storage, (project_id, transfer_id), &())?;
    if record.message.is_some() {
        PROJECT_MESSAGES.save(deps.storage, (project_id, transfer_id), &())?;
    }

    // Project stats
    let donated = PROJECT_DONORS.may_load(deps.storage, (project_id, &info.sender))?;
    if donated.is_none() {
        project.donor_count += 1;
    }
    PROJECT_DONORS.save(
        deps.storage,
        (project_id, &info.sender),
        &donated.unwrap_or_default().checked_add(amount)?,
    )?;
    project.total_received = project.total_received.checked_add(amount)?;
    PROJECTS.save(deps.storage, project_id, &project)?;

    Ok(Response::new()
        .add_messages(sends)
        .add_attribute("action", "tip")
        .add_attribute("transfer_id", transfer_id.to_string())
        .add_attribute("sender", info.sender.to_string())
        .add_attribute("amount", amount.to_string())
        .add_event(
            Event::new("tipjar_tip")
                .add_attribute("transfer_id", transfer_id.to_string())
                .add_attribute("sender", info.sender.to_string())
                .add_attribute("project_id", project_id.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("platform_fee", split.platform_fee.to_string())
                .add_attribute("per_member", split.per_member.to_string())
                .add_attribute("num_members", project.members.len().to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Create or replace the sender's profile.
pub fn update_profile(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    name: String,
    description: String,
    image_url: Option<String>,
) -> Result<Response, ContractError> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(ContractError::InvalidProfile {
            reason: "name is empty".to_string(),
        });
    }
    if name.len() > MAX_PROFILE_NAME_LEN {
        return Err(ContractError::InvalidProfile {
            reason: format!("name is longer than {} bytes", MAX_PROFILE_NAME_LEN),
        });
    }
    if description.len() > MAX_PROFILE_DESCRIPTION_LEN {
        return Err(ContractError::InvalidProfile {
            reason: format!(
                "description is longer than {} bytes",
                MAX_PROFILE_DESCRIPTION_LEN
            ),
        });
    }
    let image_url = image_url.filter(|url| !url.trim().is_empty());
    if let Some(url) = &image_url {
        if url.len() > MAX_PROFILE_IMAGE_URL_LEN {
            return Err(ContractError::InvalidProfile {
                reason: format!("image url is longer than {} bytes", MAX_PROFILE_IMAGE_URL_LEN),
            });
        }
    }

    let created = !PROFILES.has(deps.storage, &info.sender);
    let profile = Profile {
        address: info.sender.clone(),
        name,
        description,
        image_url,
        updated_at: env.block.time,
    };
    PROFILES.save(deps.storage, &info.sender, &profile)?;

    Ok(Response::new()
        .add_attribute("action", "update_profile")
        .add_attribute("address", info.sender.to_string())
        .add_event(
            Event::new("tipjar_profile_updated")
                .add_attribute("address", info.sender.to_string())
                .add_attribute("created", created.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    admin: Option<String>,
    fee_collector: Option<String>,
    platform_fee_bps: Option<u16>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update config".to_string(),
        });
    }

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(collector) = fee_collector {
        config.fee_collector = deps.api.addr_validate(&collector)?;
    }
    if let Some(bps) = platform_fee_bps {
        validate_bps("platform_fee_bps", bps)?;
        config.platform_fee_bps = bps;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new().add_attribute("action", "update_config"))
}

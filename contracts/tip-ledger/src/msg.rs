use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};
use tipjar_common::month::MonthId;
use tipjar_common::types::{MonthlyTotal, TransferRecord};

use crate::state::{Application, ApplicationStatus, Config, Profile, Project};

#[cw_serde]
pub struct InstantiateMsg {
    pub denom: String,
    pub fee_collector: String,
    /// Defaults to 500 (5%)
    pub platform_fee_bps: Option<u16>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Submit a project for review. Anyone can apply.
    Apply {
        project_name: String,
        homepage_url: String,
        description: String,
        contact_name: String,
        contact_email: String,
    },
    /// Approve or reject a pending application. Admin only.
    /// On approval `members` becomes the payout list; the applicant is used
    /// when it is empty.
    ReviewApplication {
        application_id: u64,
        approve: bool,
        members: Vec<String>,
    },
    /// Add a payout member to a project. Project owner only.
    AddMember { project_id: u64, member: String },
    /// Tip a project. Send exactly one coin of the configured denom.
    Tip {
        project_id: u64,
        message: Option<String>,
    },
    /// Create or replace the sender's own profile.
    UpdateProfile {
        name: String,
        description: String,
        image_url: Option<String>,
    },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        fee_collector: Option<String>,
        platform_fee_bps: Option<u16>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

/// Fields of `ExecuteMsg::Apply`.
pub struct ApplyParams {
    pub project_name: String,
    pub homepage_url: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(Application)]
    Application { application_id: u64 },
    /// The admin review queue when filtered by `Pending`.
    #[returns(ApplicationsResponse)]
    Applications {
        status: Option<ApplicationStatus>,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Project)]
    Project { project_id: u64 },
    #[returns(ProjectsResponse)]
    Projects {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(ProjectStatsResponse)]
    ProjectStats { project_id: u64 },
    #[returns(TransferRecord)]
    Transfer { transfer_id: u64 },
    #[returns(TransfersResponse)]
    SentTransfers {
        sender: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(TransfersResponse)]
    ReceivedTransfers {
        project_id: u64,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Support messages left on a project's tips.
    #[returns(TransfersResponse)]
    ProjectMessages {
        project_id: u64,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Raw transfers of a month, oldest first. `month` defaults to the
    /// month of the current block.
    #[returns(TransfersResponse)]
    MonthlyTransfers {
        month: Option<MonthId>,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Every sender's total for the month.
    #[returns(MonthlyTotalsResponse)]
    MonthlyTotals { month: Option<MonthId> },
    /// Monthly leaderboard, at most 10 entries.
    #[returns(TopSendersResponse)]
    TopSenders {
        month: Option<MonthId>,
        limit: Option<u32>,
    },
    #[returns(Option<Profile>)]
    Profile { address: String },
    #[returns(SenderMonthlyTotalResponse)]
    SenderMonthlyTotal {
        sender: String,
        month: Option<MonthId>,
    },
}

#[cw_serde]
pub struct ApplicationsResponse {
    pub applications: Vec<Application>,
}

#[cw_serde]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

#[cw_serde]
pub struct ProjectStatsResponse {
    pub project_id: u64,
    pub donor_count: u32,
    pub total_received: Uint128,
}

#[cw_serde]
pub struct TransfersResponse {
    pub transfers: Vec<TransferRecord>,
}

#[cw_serde]
pub struct MonthlyTotalsResponse {
    pub month: MonthId,
    pub totals: Vec<MonthlyTotal>,
    pub grand_total: Uint128,
}

#[cw_serde]
pub struct TopSendersResponse {
    pub month: MonthId,
    pub senders: Vec<MonthlyTotal>,
}

#[cw_serde]
pub struct SenderMonthlyTotalResponse {
    pub sender: Addr,
    pub month: MonthId,
    pub total_amount: Uint128,
}

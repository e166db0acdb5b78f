use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};
use tipjar_common::types::TransferRecord;

pub const CONFIG: Item<Config> = Item::new("config");
pub const NEXT_APPLICATION_ID: Item<u64> = Item::new("next_app_id");
pub const NEXT_PROJECT_ID: Item<u64> = Item::new("next_project_id");
pub const NEXT_TRANSFER_ID: Item<u64> = Item::new("next_transfer_id");

pub const APPLICATIONS: Map<u64, Application> = Map::new("applications");
pub const PROJECTS: Map<u64, Project> = Map::new("projects");
/// Public profile per wallet, written only by that wallet.
pub const PROFILES: Map<&Addr, Profile> = Map::new("profiles");

/// Append-only transfer log. Records are never updated or removed.
pub const TRANSFERS: Map<u64, TransferRecord> = Map::new("transfers");
/// (timestamp_nanos, transfer_id): time-ordered view of the log, used for
/// month window scans.
pub const TRANSFER_TIMELINE: Map<(u64, u64), ()> = Map::new("transfer_timeline");
/// (sender, transfer_id)
pub const SENT_TRANSFERS: Map<(&Addr, u64), ()> = Map::new("sent_transfers");
/// (project_id, transfer_id)
pub const RECEIVED_TRANSFERS: Map<(u64, u64), ()> = Map::new("received_transfers");
/// (project_id, transfer_id), only transfers that carry a message
pub const PROJECT_MESSAGES: Map<(u64, u64), ()> = Map::new("project_messages");
/// Lifetime amount each donor gave to a project. Presence marks a distinct donor.
pub const PROJECT_DONORS: Map<(u64, &Addr), Uint128> = Map::new("project_donors");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Token denom accepted for tips
    pub denom: String,
    /// Receives the platform share of every tip
    pub fee_collector: Addr,
    /// Platform share in basis points (500 = 5%)
    pub platform_fee_bps: u16,
}

#[cw_serde]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

#[cw_serde]
pub struct Application {
    pub id: u64,
    pub project_name: String,
    pub homepage_url: String,
    pub description: String,
    pub contact_name: String,
    pub contact_email: String,
    pub applicant: Addr,
    pub submitted_at: Timestamp,
    pub status: ApplicationStatus,
    pub reviewed_at: Option<Timestamp>,
    /// Set once the application is approved
    pub project_id: Option<u64>,
}

#[cw_serde]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub homepage_url: String,
    pub description: String,
    pub owner: Addr,
    /// Payout addresses; each receives an equal share of the member pool
    pub members: Vec<Addr>,
    pub created_at: Timestamp,
    pub total_received: Uint128,
    pub donor_count: u32,
}

#[cw_serde]
pub struct Profile {
    pub address: Addr,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub updated_at: Timestamp,
}

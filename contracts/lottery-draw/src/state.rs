use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};
use tipjar_common::month::MonthId;
use tipjar_common::types::{MonthlyTotal, RecordStatus};

pub const CONFIG: Item<LotteryConfig> = Item::new("config");
/// One outcome per month, keyed by `MonthId::key()`. A month that already has
/// an outcome can never be drawn again.
pub const OUTCOMES: Map<u32, LotteryOutcome> = Map::new("outcomes");
/// (winner, month_key)
pub const WINNER_MONTHS: Map<(&Addr, u32), ()> = Map::new("winner_months");
/// Seed commitments keyed by `MonthId::key()`, made before the month starts.
pub const SEED_COMMITS: Map<u32, SeedCommit> = Map::new("seed_commits");
/// Month whose record mint is in flight, consumed by the reply handler.
pub const PENDING_MINT: Item<u32> = Item::new("pending_mint");

#[cw_serde]
pub struct LotteryConfig {
    pub admin: Addr,
    /// Only the operator can trigger draws
    pub operator: Addr,
    /// Tip ledger holding the transfer log
    pub ledger: Addr,
    /// Contract that mints a durable record for each outcome
    pub record_minter: Option<Addr>,
}

#[cw_serde]
pub struct LotteryOutcome {
    pub month: MonthId,
    /// `YYYYMM`
    pub label: String,
    pub winner: Addr,
    pub winner_total: Uint128,
    pub winning_ticket: Uint128,
    pub grand_total: Uint128,
    pub num_senders: u32,
    /// Revealed seed, hex-encoded. `sha256(seed)` equals the month's commit.
    pub seed: String,
    /// sha256 draw randomness, hex-encoded
    pub randomness: String,
    pub drawn_at: Timestamp,
    pub drawn_by: Addr,
    pub record: RecordStatus,
}

#[cw_serde]
pub struct SeedCommit {
    /// hex sha256 of the operator seed
    pub commit: String,
    pub committed_at: Timestamp,
    pub committed_height: u64,
}

/// Response type for the ledger's `MonthlyTotals` query.
/// Mirrors MonthlyTotalsResponse from the ledger contract.
#[cw_serde]
pub struct LedgerMonthlyTotals {
    pub month: MonthId,
    pub totals: Vec<MonthlyTotal>,
    pub grand_total: Uint128,
}

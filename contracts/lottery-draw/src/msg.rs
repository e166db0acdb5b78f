use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Addr;
use tipjar_common::month::MonthId;

use crate::state::{LotteryConfig, LotteryOutcome, SeedCommit};

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
    pub ledger: String,
    pub record_minter: Option<String>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Commit to the draw seed of a future month. Operator only.
    /// `seed_commit` is the hex sha256 of the seed.
    CommitSeed {
        month: MonthId,
        seed_commit: String,
    },
    /// Draw the monthly lottery. Operator only.
    /// `month` defaults to the month of the current block. `seed_hex` reveals
    /// the seed committed for the month, at least 32 bytes.
    DrawLottery {
        month: Option<MonthId>,
        seed_hex: String,
    },
    /// Re-send the record mint for a month whose mint failed.
    /// Operator or admin.
    RetryMint { month: MonthId },
    /// Update configuration. Admin only.
    UpdateConfig {
        operator: Option<String>,
        ledger: Option<String>,
        record_minter: Option<String>,
        clear_record_minter: Option<bool>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

/// Fields of `ExecuteMsg::UpdateConfig`.
pub struct UpdateConfigParams {
    pub operator: Option<String>,
    pub ledger: Option<String>,
    pub record_minter: Option<String>,
    pub clear_record_minter: Option<bool>,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LotteryConfig)]
    Config {},
    #[returns(Option<LotteryOutcome>)]
    Outcome { month: MonthId },
    #[returns(Option<SeedCommit>)]
    SeedCommit { month: MonthId },
    #[returns(OutcomesResponse)]
    Outcomes {
        start_after: Option<MonthId>,
        limit: Option<u32>,
    },
    /// Months the address has won, oldest first.
    #[returns(WinnerHistoryResponse)]
    WinnerHistory {
        address: String,
        start_after: Option<MonthId>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct OutcomesResponse {
    pub outcomes: Vec<LotteryOutcome>,
}

#[cw_serde]
pub struct WinnerHistoryResponse {
    pub address: Addr,
    pub months: Vec<MonthId>,
}

/// Subset of the ledger's query interface
#[cw_serde]
pub enum LedgerQueryMsg {
    MonthlyTotals { month: Option<MonthId> },
}

/// Record minter's execute interface
#[cw_serde]
pub enum RecordMinterExecuteMsg {
    MintRecord {
        /// `YYYYMM`
        month: String,
        winner: String,
        name: String,
        symbol: String,
        description: String,
    },
}

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};

/// A single tip as recorded in the append-only transfer log.
#[cw_serde]
pub struct TransferRecord {
    pub id: u64,
    pub sender: Addr,
    /// Project id of the receiving project, rendered as a string.
    pub recipient: String,
    pub amount: Uint128,
    pub timestamp: Timestamp,
    pub message: Option<String>,
}

/// Sum of one sender's transfers within a calendar month.
/// Always derived from the log, never stored.
#[cw_serde]
pub struct MonthlyTotal {
    pub sender: Addr,
    pub total_amount: Uint128,
}

/// Status of the durable record minted for a lottery outcome.
#[cw_serde]
pub enum RecordStatus {
    /// No record minter was configured when the draw happened.
    NotRequested,
    Pending,
    /// `token_id` is whatever the minter reported, if anything.
    Minted { token_id: Option<String> },
    Failed { reason: String },
}

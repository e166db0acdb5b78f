use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: u16, month: u8 },

    #[error("month {month} has not started yet")]
    MonthInFuture { month: String },

    #[error("lottery for {month} has already been drawn")]
    AlreadyDrawn { month: String },

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },

    #[error("seed is {len} bytes, need at least {min}")]
    SeedTooShort { len: usize, min: usize },

    #[error("seed for {month} must be committed before the month starts")]
    CommitWindowClosed { month: String },

    #[error("seed for {month} is already committed")]
    AlreadyCommitted { month: String },

    #[error("no seed committed for {month}")]
    NoCommit { month: String },

    #[error("commit pre-image mismatch: sha256(seed) != commit")]
    CommitMismatch,

    #[error("no lottery outcome for {month}")]
    OutcomeNotFound { month: String },

    #[error("record for {month} has not failed, nothing to retry")]
    MintNotFailed { month: String },

    #[error("no record minter configured")]
    NoRecordMinter,

    #[error("unknown reply id {id}")]
    UnknownReply { id: u64 },
}

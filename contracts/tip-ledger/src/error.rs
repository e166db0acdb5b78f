use cosmwasm_std::{OverflowError, StdError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("no funds sent with tip")]
    NoFundsSent,

    #[error("must send exactly one coin")]
    InvalidFunds,

    #[error("must send {expected} denom, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error("invalid basis points: {field} = {value} (must be <= 10000)")]
    InvalidBps { field: String, value: u16 },

    #[error("invalid application: {reason}")]
    InvalidApplication { reason: String },

    #[error("application {application_id} not found")]
    ApplicationNotFound { application_id: u64 },

    #[error("application {application_id} has already been reviewed")]
    ApplicationNotPending { application_id: u64 },

    #[error("project {project_id} not found")]
    ProjectNotFound { project_id: u64 },

    #[error("project {project_id} has no members to pay out to")]
    NoMembers { project_id: u64 },

    #[error("{member} is already a member of project {project_id}")]
    DuplicateMember { project_id: u64, member: String },

    #[error("invalid profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("message is {len} bytes, max is {max}")]
    MessageTooLong { len: usize, max: usize },
}

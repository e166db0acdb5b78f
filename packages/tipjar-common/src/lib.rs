pub mod aggregate;
pub mod lottery;
pub mod month;
pub mod types;

pub use aggregate::{all_senders, leaderboard, sender_total, top_senders, TOP_SENDERS_LIMIT};
pub use lottery::{derive_randomness, draw, grand_total, select, ticket_from_randomness, Selection};
pub use month::MonthId;
pub use types::{MonthlyTotal, RecordStatus, TransferRecord};

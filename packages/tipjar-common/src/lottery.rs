use cosmwasm_std::{Addr, StdResult, Uint128};
use sha2::{Digest, Sha256};

use crate::types::MonthlyTotal;

/// The result of a single weighted draw.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub winner: Addr,
    pub winner_total: Uint128,
    pub winning_ticket: Uint128,
    pub grand_total: Uint128,
}

/// Sum of all monthly totals.
pub fn grand_total(totals: &[MonthlyTotal]) -> StdResult<Uint128> {
    totals
        .iter()
        .try_fold(Uint128::zero(), |acc, t| Ok(acc.checked_add(t.total_amount)?))
}

/// Cumulative-weight roulette scan.
///
/// Returns the first entry whose inclusive running sum is strictly greater
/// than `ticket`. Each sender therefore owns the half-open ticket range
/// `[cumulative_start, cumulative_end)`.
pub fn select(totals: &[MonthlyTotal], ticket: Uint128) -> Option<&MonthlyTotal> {
    let mut cumulative = Uint128::zero();
    for entry in totals {
        cumulative = cumulative.saturating_add(entry.total_amount);
        if cumulative > ticket {
            return Some(entry);
        }
    }
    None
}

/// Map 32 random bytes onto `[0, grand_total)`.
///
/// `ticket = uint128(randomness[0..16]) % grand_total`. `None` when there is
/// no weight to draw from.
pub fn ticket_from_randomness(randomness: &[u8; 32], grand_total: Uint128) -> Option<Uint128> {
    if grand_total.is_zero() {
        return None;
    }
    let mut ticket_bytes = [0u8; 16];
    ticket_bytes.copy_from_slice(&randomness[0..16]);
    let ticket_raw = u128::from_be_bytes(ticket_bytes);
    Some(Uint128::new(ticket_raw % grand_total.u128()))
}

/// Run one draw over `totals` using `randomness` as the only entropy.
///
/// The same slice is used for the grand total and the scan, so each sender's
/// chance is exactly `total_amount / grand_total`. `Ok(None)` means no winner:
/// the input was empty or every total was zero.
pub fn draw(totals: &[MonthlyTotal], randomness: &[u8; 32]) -> StdResult<Option<Selection>> {
    let grand_total = grand_total(totals)?;
    let Some(winning_ticket) = ticket_from_randomness(randomness, grand_total) else {
        return Ok(None);
    };

    Ok(select(totals, winning_ticket).map(|entry| Selection {
        winner: entry.sender.clone(),
        winner_total: entry.total_amount,
        winning_ticket,
        grand_total,
    }))
}

/// `sha256(seed || block_height_be || block_time_nanos_be || month_label)`
pub fn derive_randomness(
    seed: &[u8],
    block_height: u64,
    block_time_nanos: u64,
    month_label: &str,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(seed);
    hasher.update(block_height.to_be_bytes());
    hasher.update(block_time_nanos.to_be_bytes());
    hasher.update(month_label.as_bytes());
    hasher.finalize().into()
}

use std::collections::BTreeMap;

use cosmwasm_std::{Addr, StdResult, Uint128};

use crate::types::{MonthlyTotal, TransferRecord};

/// Size of the monthly donor leaderboard.
pub const TOP_SENDERS_LIMIT: usize = 10;

/// Sum transfers per sender.
///
/// The records are expected to be pre-filtered to one month window. The
/// result is ordered by sender address so the same input always produces the
/// same sequence, which the lottery relies on for its cumulative scan.
pub fn all_senders<'a, I>(records: I) -> StdResult<Vec<MonthlyTotal>>
where
    I: IntoIterator<Item = &'a TransferRecord>,
{
    let mut totals: BTreeMap<&Addr, Uint128> = BTreeMap::new();
    for record in records {
        let total = totals.entry(&record.sender).or_default();
        *total = total.checked_add(record.amount)?;
    }

    Ok(totals
        .into_iter()
        .map(|(sender, total_amount)| MonthlyTotal {
            sender: sender.clone(),
            total_amount,
        })
        .collect())
}

/// Rank already-aggregated totals, highest first, keeping at most `limit`.
/// The sort is stable, so ties keep their incoming order.
pub fn leaderboard(mut totals: Vec<MonthlyTotal>, limit: usize) -> Vec<MonthlyTotal> {
    totals.sort_by(|a, b| b.total_amount.cmp(&a.total_amount));
    totals.truncate(limit);
    totals
}

/// `all_senders` followed by `leaderboard`.
pub fn top_senders<'a, I>(records: I, limit: usize) -> StdResult<Vec<MonthlyTotal>>
where
    I: IntoIterator<Item = &'a TransferRecord>,
{
    Ok(leaderboard(all_senders(records)?, limit))
}

/// Total transferred by one sender within the given records.
pub fn sender_total<'a, I>(records: I, sender: &Addr) -> StdResult<Uint128>
where
    I: IntoIterator<Item = &'a TransferRecord>,
{
    records
        .into_iter()
        .filter(|r| &r.sender == sender)
        .try_fold(Uint128::zero(), |acc, r| Ok(acc.checked_add(r.amount)?))
}

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdError, StdResult, Timestamp};

/// Largest whole second that still fits into a nanosecond `Timestamp`.
const MAX_TIMESTAMP_SECONDS: u64 = u64::MAX / 1_000_000_000;

/// A calendar month in UTC (the chain clock).
///
/// Field order gives chronological ordering, and `key()` is the big-endian
/// friendly `year * 100 + month` used as a storage key.
#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord, Hash)]
pub struct MonthId {
    pub year: u16,
    pub month: u8,
}

impl MonthId {
    /// Build a month, rejecting anything whose window cannot be represented
    /// as a block timestamp.
    pub fn new(year: u16, month: u8) -> StdResult<Self> {
        let id = MonthId { year, month };
        id.window()?;
        Ok(id)
    }

    /// The month containing the given block time.
    pub fn containing(time: Timestamp) -> StdResult<Self> {
        let seconds = i64::try_from(time.seconds())
            .map_err(|_| StdError::generic_err("timestamp out of range"))?;
        let datetime = DateTime::from_timestamp(seconds, time.subsec_nanos() as u32)
            .ok_or_else(|| StdError::generic_err("timestamp out of range"))?;
        let year = u16::try_from(datetime.year())
            .map_err(|_| StdError::generic_err("year out of range"))?;
        Ok(MonthId {
            year,
            month: datetime.month() as u8,
        })
    }

    /// `YYYYMM`, with a zero-padded month.
    pub fn label(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    pub fn key(&self) -> u32 {
        self.year as u32 * 100 + self.month as u32
    }

    pub fn from_key(key: u32) -> Self {
        MonthId {
            year: (key / 100) as u16,
            month: (key % 100) as u8,
        }
    }

    pub fn next(&self) -> StdResult<Self> {
        if self.month >= 12 {
            let year = self
                .year
                .checked_add(1)
                .ok_or_else(|| StdError::generic_err("year out of range"))?;
            Ok(MonthId { year, month: 1 })
        } else {
            Ok(MonthId {
                year: self.year,
                month: self.month + 1,
            })
        }
    }

    /// First nanosecond of the month.
    pub fn start(&self) -> StdResult<Timestamp> {
        let date = NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, 1)
            .ok_or_else(|| StdError::generic_err(format!("invalid month {}", self)))?;
        let seconds = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| StdError::generic_err(format!("invalid month {}", self)))?
            .and_utc()
            .timestamp();
        match u64::try_from(seconds) {
            Ok(s) if s <= MAX_TIMESTAMP_SECONDS => Ok(Timestamp::from_seconds(s)),
            _ => Err(StdError::generic_err(format!(
                "month {} is outside the timestamp range",
                self
            ))),
        }
    }

    /// Inclusive `[month_start, month_end]` window. `month_end` is the last
    /// nanosecond before the next month starts.
    pub fn window(&self) -> StdResult<(Timestamp, Timestamp)> {
        let start = self.start()?;
        let next_start = self.next()?.start()?;
        Ok((start, Timestamp::from_nanos(next_start.nanos() - 1)))
    }

    pub fn contains(&self, time: Timestamp) -> StdResult<bool> {
        let (start, end) = self.window()?;
        Ok(time >= start && time <= end)
    }
}

impl fmt::Display for MonthId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

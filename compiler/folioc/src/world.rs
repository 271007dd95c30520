//! Hosts for evaluation: in-memory and file-system worlds.

mod memory;
mod system;

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Datelike;
use folio_eval::value::Datetime;

pub use memory::MemoryWorld;
pub use system::SystemWorld;

/// The name every world gives its main file when none is chosen.
pub(crate) const MAIN: &str = "/main.fol";

/// Today's UTC date from the system clock, moved by `offset_days` days.
fn system_today(offset_days: Option<i32>) -> Option<Datetime> {
    let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let seconds = i64::try_from(since_epoch.as_secs()).ok()?;
    let date = chrono::DateTime::from_timestamp(seconds, 0)?.date_naive();
    Datetime::from_ymd(date.year(), date.month(), date.day())?
        .shift_days(offset_days.unwrap_or(0))
}

#[cfg(test)]
mod tests;

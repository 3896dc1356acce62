//! Time helpers shared by the service and the generator

use chrono::{NaiveDateTime, Timelike, Utc};

/// Current UTC wall-clock time without zone, truncated to whole seconds
/// (the precision of the `orders.create_date` column as exposed).
pub fn now_naive() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond(0).unwrap_or(now)
}

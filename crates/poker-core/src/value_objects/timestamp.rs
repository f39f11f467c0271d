//! Millisecond timestamps used across rooms, stories and votes

use chrono::Utc;

/// Current time in milliseconds since the Unix epoch
#[inline]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

//! Timestamp utilities

use chrono::{DateTime, SubsecRound, Utc};

/// Current UTC timestamp, truncated to microseconds so values survive a
/// round trip through the database unchanged
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

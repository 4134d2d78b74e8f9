//! Limit/offset normalization for list queries

use subtrack_common::models::DEFAULT_LIMIT;

/// Largest page a client may request
pub const MAX_LIMIT: i64 = 100;

/// Sanitized limit/offset pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

/// Clamp client supplied limit and offset
///
/// # Examples
/// ```
/// use subtrack_api::pagination::normalize_page;
///
/// let p = normalize_page(0, -5);
/// assert_eq!(p.limit, 10);
/// assert_eq!(p.offset, 0);
///
/// let p = normalize_page(500, 20);
/// assert_eq!(p.limit, 100);
/// assert_eq!(p.offset, 20);
/// ```
pub fn normalize_page(limit: i64, offset: i64) -> Page {
    let limit = if limit <= 0 {
        DEFAULT_LIMIT
    } else {
        limit.min(MAX_LIMIT)
    };

    Page {
        limit,
        offset: offset.max(0),
    }
}

/// Parse a raw query-string value, falling back to `default` when it is
/// absent or not an integer
pub fn parse_or_default(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(default)
}

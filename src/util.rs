//! Shared utility functions for the briskfarm application.

use axum::http::HeaderMap;
use chrono::{DateTime, FixedOffset, NaiveDateTime};

use crate::error::{AppError, Result};

/// Extract client IP address and user-agent from request headers.
///
/// Tries `x-forwarded-for` first (for proxied requests), then `x-real-ip`.
/// Both values end up on donation rows for fraud/audit purposes.
pub fn extract_request_info(headers: &HeaderMap) -> (Option<String>, Option<String>) {
    let ip = headers
        .get("x-forwarded-for")
        .or_else(|| headers.get("x-real-ip"))
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    (ip, user_agent)
}

/// Extract a Bearer token from the Authorization header.
///
/// Returns the token string without the "Bearer " prefix, or None if
/// the header is missing, malformed, or empty after the prefix.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
}

/// Parse an ISO-8601 datetime from a query parameter into a Unix timestamp.
///
/// Tolerates the common artifact where a `+00:00` offset was decoded as a
/// space in the query string:
///
///   `2026-01-20T10:00:00+00:00`  parses as-is
///   `2026-01-20T10:00:00 00:00`  is repaired to the form above
///
/// The space fix only applies when the value contains a `T` separator, a
/// space, and no `+` already, matching exactly the shape produced by an
/// offset-bearing value passed raw in a query string. Values without an
/// offset are interpreted as UTC.
pub fn parse_query_datetime(field: &str, value: &str) -> Result<i64> {
    let mut raw = value.to_string();
    if raw.contains('T') && raw.contains(' ') && !raw.contains('+') {
        raw = raw.replacen(' ', "+", 1);
    }

    if let Ok(dt) = DateTime::<FixedOffset>::parse_from_rfc3339(&raw) {
        return Ok(dt.timestamp());
    }

    // No offset: treat the naive value as UTC
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map(|ndt| ndt.and_utc().timestamp())
        .map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid {}; expected ISO8601 datetime string",
                field
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_query_datetime("date_from", "2026-01-20T10:00:00+00:00").unwrap();
        assert_eq!(ts, 1_768_903_200);
    }

    #[test]
    fn repairs_space_decoded_offset() {
        let fixed = parse_query_datetime("date_from", "2026-01-20T10:00:00 00:00").unwrap();
        let plain = parse_query_datetime("date_from", "2026-01-20T10:00:00+00:00").unwrap();
        assert_eq!(fixed, plain);
    }

    #[test]
    fn parses_naive_datetime_as_utc() {
        let ts = parse_query_datetime("date_to", "2026-01-20T10:00:00").unwrap();
        assert_eq!(ts, 1_768_903_200);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_query_datetime("date_from", "not-a-date").is_err());
        assert!(parse_query_datetime("date_from", "2026-13-45T99:00:00").is_err());
    }
}

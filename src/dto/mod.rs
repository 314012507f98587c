//! Request/response payloads crossing the HTTP boundary.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod admin;
pub mod common;
pub mod health;
pub mod player;
pub mod quiz;
pub mod validation;

/// Render an epoch-seconds timestamp as RFC 3339 for response payloads.
pub(crate) fn format_unix_timestamp(secs: u64) -> String {
    OffsetDateTime::from_unix_timestamp(secs as i64)
        .ok()
        .and_then(|timestamp| timestamp.format(&Rfc3339).ok())
        .unwrap_or_else(|| "invalid-timestamp".into())
}

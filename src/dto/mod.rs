//! Wire-facing data types for the WebSocket gateway and HTTP routes.

use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod health;
pub mod room;
pub mod ws;

/// RFC 3339 timestamp for outbound chat messages.
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

use thiserror::Error;

/// Failures raised while consuming the live feed.
///
/// None of these are fatal: the controller logs them and drops the offending
/// message or point, the chart keeps whatever it already had.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The socket could not be constructed (missing or invalid URI, connect refused).
    #[error("websocket at {uri} is unavailable: {reason}")]
    TransportUnavailable { uri: String, reason: String },

    /// The connection failed after it was established.
    #[error("websocket transport error: {0}")]
    Transport(String),

    /// The inbound payload is not a valid column.
    #[error("malformed column payload: {0}")]
    Parse(String),

    /// A point's timestamp does not match `YYYY-MM-DD HH-MM-SS`.
    #[error("invalid timestamp {text:?}: {reason}")]
    TimestampFormat { text: String, reason: String },

    /// The historical snapshot could not be fetched or decoded.
    #[error("snapshot unavailable: {0}")]
    Snapshot(String),

    /// `connect` was requested while a connection is already in progress or open.
    #[error("cannot connect while {0}")]
    InvalidState(crate::feed::StreamState),
}

pub type FeedResult<T> = Result<T, FeedError>;

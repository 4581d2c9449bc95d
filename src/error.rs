/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// The per-attempt timer fired before a response arrived.
    #[error("timed out after {limit_ms} ms")]
    TimedOut {
        /// Timeout budget the attempt was given, in milliseconds.
        limit_ms: u64,
    },
    /// Non-success HTTP status code with raw response body.
    #[error("Error {status}: {body}")]
    Http { status: u16, body: String },
    /// A 2xx response body that could not be decoded as the expected JSON.
    #[error("decode error: {0}")]
    Decode(String),
}

impl CallError {
    /// True when the failure came from the per-attempt timer.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

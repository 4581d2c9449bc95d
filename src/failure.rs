use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::CallError;

/// Uniform failure value produced once every attempt is exhausted.
///
/// Serializes as `{"success": false, "message": "..."}` so callers that
/// forward a failure to their own JSON consumers can branch on a single
/// field instead of catching anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallFailure {
    /// Human-readable description of the last attempt's failure.
    pub message: String,
    /// Whether the last attempt was abandoned by its timeout.
    pub timed_out: bool,
}

impl From<CallError> for CallFailure {
    fn from(err: CallError) -> Self {
        Self {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for CallFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CallFailure {}

impl Serialize for CallFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // `timed_out` is advisory and stays out of the wire shape.
        let mut state = serializer.serialize_struct("CallFailure", 2)?;
        state.serialize_field("success", &false)?;
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

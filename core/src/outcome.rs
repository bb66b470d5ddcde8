//! The result of one HTTP call.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;

use crate::error_message::ErrorMessage;

/// Either the parsed JSON of a 2xx response or the formatted error of a
/// failed one, paired with the failure status.
///
/// Serializes as `{"data": ..., "failureStatus": <status or null>}`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<M = ErrorMessage> {
    Success(Value),
    Failure { status: u16, error: M },
}

impl<M> Outcome<M> {
    /// `None` on success, otherwise the HTTP status of the failed response.
    pub fn failure_status(&self) -> Option<u16> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { status, .. } => Some(*status),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }

    pub fn success(&self) -> Option<&Value> {
        match self {
            Outcome::Success(data) => Some(data),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&M> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { error, .. } => Some(error),
        }
    }
}

impl<M: Serialize> Serialize for Outcome<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Success(data) => state.serialize_field("data", data)?,
            Outcome::Failure { error, .. } => state.serialize_field("data", error)?,
        }
        state.serialize_field("failureStatus", &self.failure_status())?;
        state.end()
    }
}

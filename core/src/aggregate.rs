//! Pure reducers that fold outcomes into UI state.
//!
//! # Design
//! Callers typically fire several requests at once, then merge each success
//! under a key of their choosing and gather every failure into one list of
//! messages. Neither function mutates its inputs.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::outcome::Outcome;

/// Key under which accumulated failures are reported.
pub const ERROR_MESSAGES_KEY: &str = "errorMessages";

/// A single-key state update produced by `process_response`.
///
/// Serializes as `{"<key>": data}` or `{"errorMessages": [...]}`.
#[derive(Debug, Clone, PartialEq)]
pub enum PartialUpdate<M> {
    State { key: String, data: Value },
    ErrorMessages(Vec<M>),
}

impl<M: Serialize> Serialize for PartialUpdate<M> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            PartialUpdate::State { key, data } => map.serialize_entry(key, data)?,
            PartialUpdate::ErrorMessages(messages) => {
                map.serialize_entry(ERROR_MESSAGES_KEY, messages)?
            }
        }
        map.end()
    }
}

/// Fold one outcome into a state update.
///
/// A failure yields `error_messages` with the failure's message appended; a
/// success yields its data keyed by `state`.
pub fn process_response<M: Clone>(
    response: &Outcome<M>,
    state: &str,
    error_messages: &[M],
) -> PartialUpdate<M> {
    match response {
        Outcome::Failure { error, .. } => {
            let mut messages = error_messages.to_vec();
            messages.push(error.clone());
            PartialUpdate::ErrorMessages(messages)
        }
        Outcome::Success(data) => PartialUpdate::State {
            key: state.to_string(),
            data: data.clone(),
        },
    }
}

/// Collect the messages of every failed outcome, in input order.
pub fn process_errors<M: Clone>(responses: &[Outcome<M>]) -> Vec<M> {
    responses
        .iter()
        .filter_map(|response| response.error().cloned())
        .collect()
}

//! Event type validation

use crate::error::{EdgeAssociationError, EdgeAssociationResult};
use crate::types::EventType;

/// Checks a declared event type against the Lambda@Edge triggers.
///
/// Matching is exact and case-sensitive.
pub fn validate_event_type(candidate: &str) -> EdgeAssociationResult<EventType> {
    EventType::ALL
        .into_iter()
        .find(|event_type| event_type.as_str() == candidate)
        .ok_or_else(|| EdgeAssociationError::InvalidEventType {
            event_type: candidate.to_string(),
            allowed: EventType::ALL
                .iter()
                .map(|event_type| event_type.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

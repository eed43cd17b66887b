// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Invocation records and the latency comparison.

use crate::client::{ClientError, ClientLabel};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum accepted latency difference between the two clients.
pub const DEFAULT_TOLERANCE_MS: u64 = 8_000;

/// One timed call to one client.
#[derive(Debug)]
pub struct ClientInvocation {
    /// Which client was called
    pub label: ClientLabel,
    /// Wall-clock time the call was launched
    pub started_at: DateTime<Utc>,
    /// Wall-clock time the call settled
    pub ended_at: DateTime<Utc>,
    /// Elapsed time measured on a monotonic clock
    pub duration_ms: u64,
    /// Response payload or the error the client reported
    pub outcome: Result<serde_json::Value, ClientError>,
}

impl ClientInvocation {
    /// True if the client produced a response.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The response payload, if the call succeeded.
    pub fn response(&self) -> Option<&serde_json::Value> {
        self.outcome.as_ref().ok()
    }

    /// The error, if the call failed.
    pub fn error(&self) -> Option<&ClientError> {
        self.outcome.as_ref().err()
    }
}

/// Result of judging two latencies against a tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonOutcome {
    /// Absolute difference between the two durations
    pub time_difference_ms: u64,
    /// Whether the difference is at most the tolerance
    pub within_tolerance: bool,
}

impl ComparisonOutcome {
    /// Compare two durations. A difference equal to the tolerance passes.
    pub fn evaluate(first_ms: u64, second_ms: u64, tolerance_ms: u64) -> Self {
        let time_difference_ms = first_ms.abs_diff(second_ms);
        Self {
            time_difference_ms,
            within_tolerance: time_difference_ms <= tolerance_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difference_within_tolerance() {
        let outcome = ComparisonOutcome::evaluate(2_000, 3_500, DEFAULT_TOLERANCE_MS);
        assert_eq!(outcome.time_difference_ms, 1_500);
        assert!(outcome.within_tolerance);
    }

    #[test]
    fn test_difference_exceeds_tolerance() {
        let outcome = ComparisonOutcome::evaluate(1_000, 9_500, DEFAULT_TOLERANCE_MS);
        assert_eq!(outcome.time_difference_ms, 8_500);
        assert!(!outcome.within_tolerance);
    }

    #[test]
    fn test_difference_is_symmetric() {
        assert_eq!(
            ComparisonOutcome::evaluate(9_500, 1_000, DEFAULT_TOLERANCE_MS),
            ComparisonOutcome::evaluate(1_000, 9_500, DEFAULT_TOLERANCE_MS)
        );
    }

    #[test]
    fn test_boundary_is_inclusive() {
        assert!(ComparisonOutcome::evaluate(0, 8_000, 8_000).within_tolerance);
        assert!(!ComparisonOutcome::evaluate(0, 8_001, 8_000).within_tolerance);
    }

    #[test]
    fn test_invocation_accessors() {
        let now = Utc::now();
        let failed = ClientInvocation {
            label: ClientLabel::FrameworkWrapped,
            started_at: now,
            ended_at: now,
            duration_ms: 0,
            outcome: Err(ClientError::MissingImage),
        };
        assert!(!failed.is_success());
        assert!(failed.response().is_none());
        assert!(matches!(failed.error(), Some(ClientError::MissingImage)));
    }
}

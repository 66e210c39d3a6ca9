// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-group ingestion outcomes returned to the caller.

use serde::{Deserialize, Serialize};

/// Outcome for one logical record group ("metrics" or "workouts").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GroupOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Merged outcome of one ingestion call. Built once, never mutated.
///
/// Callers must inspect per-group outcomes for partial-failure detection;
/// the HTTP status only carries the overall class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionOutcome {
    pub metrics: GroupOutcome,
    pub workouts: GroupOutcome,
}

impl IngestionOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.metrics.success && self.workouts.success
    }

    pub fn any_succeeded(&self) -> bool {
        self.metrics.success || self.workouts.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_classes() {
        let both_ok = IngestionOutcome {
            metrics: GroupOutcome::ok("no records"),
            workouts: GroupOutcome::ok("2 workouts upserted"),
        };
        assert!(both_ok.all_succeeded());

        let partial = IngestionOutcome {
            metrics: GroupOutcome::ok("5 records upserted"),
            workouts: GroupOutcome::failed("store unreachable"),
        };
        assert!(!partial.all_succeeded());
        assert!(partial.any_succeeded());

        let both_failed = IngestionOutcome {
            metrics: GroupOutcome::failed("store unreachable"),
            workouts: GroupOutcome::failed("store unreachable"),
        };
        assert!(!both_failed.any_succeeded());
    }

    #[test]
    fn test_group_outcome_serializes_without_empty_fields() {
        let body = serde_json::to_value(GroupOutcome::ok("no records")).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "no records");
        assert!(body.get("error").is_none());
    }
}

//! Job status definitions for tracking scrape progress
//!
//! A job's status moves through a fixed lifecycle; invalid transitions are
//! rejected so a resumed invocation can never corrupt a terminal job.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a scrape job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Job record exists but no invocation has started it yet
    Pending,

    /// An invocation is currently driving this job
    Running,

    /// The time budget ran out before the last page; resumable
    Incomplete,

    /// All pages crawled, or the item cap was reached
    Complete,

    /// A fatal error stopped the job; resumable only via explicit reset
    Failed,
}

impl JobStatus {
    /// Returns true for statuses that end the job (restart requires reset)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Returns true when a follow-up invocation may pick the job back up
    pub fn is_resumable(&self) -> bool {
        matches!(self, Self::Pending | Self::Running | Self::Incomplete)
    }

    /// Validates the status transition matrix
    ///
    /// `Running -> Running` is allowed: per-page checkpoints re-persist the
    /// running status, and a crashed invocation leaves `Running` behind for
    /// the next one to adopt (last checkpoint wins).
    pub fn can_transition(&self, to: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, to),
            (Pending, Running)
                | (Running, Running)
                | (Running, Incomplete)
                | (Running, Complete)
                | (Running, Failed)
                | (Incomplete, Running)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use JobStatus::*;

    #[test]
    fn test_is_terminal() {
        assert!(Complete.is_terminal());
        assert!(Failed.is_terminal());

        assert!(!Pending.is_terminal());
        assert!(!Running.is_terminal());
        assert!(!Incomplete.is_terminal());
    }

    #[test]
    fn test_is_resumable() {
        assert!(Pending.is_resumable());
        assert!(Running.is_resumable());
        assert!(Incomplete.is_resumable());

        assert!(!Complete.is_resumable());
        assert!(!Failed.is_resumable());
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(Pending.can_transition(Running));
        assert!(Running.can_transition(Incomplete));
        assert!(Running.can_transition(Complete));
        assert!(Running.can_transition(Failed));
        assert!(Running.can_transition(Running));
        assert!(Incomplete.can_transition(Running));
    }

    #[test]
    fn test_terminal_states_are_sticky() {
        for to in [Pending, Running, Incomplete, Complete, Failed] {
            assert!(!Complete.can_transition(to));
            assert!(!Failed.can_transition(to));
        }
    }

    #[test]
    fn test_no_shortcut_from_pending() {
        assert!(!Pending.can_transition(Complete));
        assert!(!Pending.can_transition(Incomplete));
        assert!(!Pending.can_transition(Failed));
    }

    #[test]
    fn test_serde_representation() {
        let json = serde_json::to_string(&Incomplete).unwrap();
        assert_eq!(json, "\"incomplete\"");
        let parsed: JobStatus = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(parsed, Running);
    }
}

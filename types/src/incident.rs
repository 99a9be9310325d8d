//! Incidents: human-readable anomalies accumulated on a node during a run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Enode;

/// A problem observed for one node during a crawl.
///
/// None of these abort a run; they are collected on the node and surface in
/// the final report. `Display` renders the operator-facing text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Incident {
    /// Liveness check failed or did not answer `"ok"`.
    MonitorUnavailable,
    /// The node-info dump could not be fetched.
    SnapshotUnavailable { reason: String },
    /// The node-info dump was fetched but could not be interpreted.
    SnapshotUnreadable { reason: String },
    /// The node reports an identity different from its directory entry.
    EnodeMismatch { reported: Enode },
    /// The node is peered with an enode that is not in the directory.
    UnknownEnode { peer: Enode },
    /// The node was never reached from the entry validator.
    AppearsOffline,
}

impl Incident {
    /// Whether this incident means the node could not be inspected.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::MonitorUnavailable
                | Self::SnapshotUnavailable { .. }
                | Self::SnapshotUnreadable { .. }
                | Self::AppearsOffline
        )
    }
}

impl fmt::Display for Incident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonitorUnavailable => write!(f, "monitor not available"),
            Self::SnapshotUnavailable { reason } => {
                write!(f, "node info not available: {reason}")
            }
            Self::SnapshotUnreadable { reason } => {
                write!(f, "node info unreadable: {reason}")
            }
            Self::EnodeMismatch { reported } => {
                write!(f, "enode mismatch: node reports {reported}")
            }
            Self::UnknownEnode { peer } => write!(f, "unknown enode {peer}"),
            Self::AppearsOffline => write!(f, "node appears offline"),
        }
    }
}

//! Policy decision alphabet.

use serde::{Deserialize, Serialize};

/// What a policy wants to happen for one instrument on one bar.
///
/// At most one non-`Hold` decision is emitted per instrument per bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// No action
    Hold,
    /// Open a long position
    EnterLong,
    /// Close the open long position
    ExitLong,
}

impl Decision {
    /// Check whether this decision requests an order.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Decision::Hold)
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Hold => write!(f, "hold"),
            Decision::EnterLong => write!(f, "enter_long"),
            Decision::ExitLong => write!(f, "exit_long"),
        }
    }
}

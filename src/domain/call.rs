//! Call state model for the browser phone.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallDirection {
    Outgoing,
    Incoming,
}

/// Lifecycle of a single call: `idle -> ringing -> in_call -> idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum CallState {
    Idle,
    Ringing { direction: CallDirection },
    InCall { direction: CallDirection },
}

impl CallState {
    pub fn is_idle(&self) -> bool {
        matches!(self, CallState::Idle)
    }

    pub fn direction(&self) -> Option<CallDirection> {
        match self {
            CallState::Idle => None,
            CallState::Ringing { direction } | CallState::InCall { direction } => {
                Some(*direction)
            }
        }
    }
}

impl Display for CallState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CallState::Idle => write!(f, "idle"),
            CallState::Ringing { .. } => write!(f, "ringing"),
            CallState::InCall { .. } => write!(f, "in_call"),
        }
    }
}

/// Parameters handed to the telephony device when placing a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DialParams {
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "From")]
    pub from: String,
}

/// Formats whole seconds as `mm:ss`, rolling minutes past 99 as needed.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

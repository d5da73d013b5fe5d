use std::fmt;

use crate::recalc::PromptKind;
use crate::resolve::PromptAction;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Edit or paste addressed a row the store does not have.
    RowOutOfRange { row: usize, len: usize },
    /// `resolve`/`cancel` called with no prompt open.
    NoPendingPrompt,
    /// The open prompt does not offer this action.
    ActionNotOffered { kind: PromptKind, action: PromptAction },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RowOutOfRange { row, len } => {
                write!(f, "row {row} out of range (store has {len} rows)")
            }
            Self::NoPendingPrompt => write!(f, "no prompt is open"),
            Self::ActionNotOffered { kind, action } => {
                write!(f, "prompt '{kind}' does not offer '{action}'")
            }
        }
    }
}

impl std::error::Error for SessionError {}

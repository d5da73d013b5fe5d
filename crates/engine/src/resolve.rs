//! Turning a prompt answer into a corrective patch.

use serde::{Deserialize, Serialize};

use crate::date::DateParser;
use crate::recalc::{day_count, end_from, start_from, PromptKind, ScheduleView};
use crate::row::{RowPatch, TaskRow};

/// The user's answer to a prompt: which field to preserve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptAction {
    /// Move the opposite date so the duration stays.
    KeepDuration,
    KeepStart,
    KeepEnd,
}

impl std::fmt::Display for PromptAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KeepDuration => write!(f, "keep-duration"),
            Self::KeepStart => write!(f, "keep-start"),
            Self::KeepEnd => write!(f, "keep-end"),
        }
    }
}

/// Compute the patch for answering a `kind` prompt with `action`.
///
/// Never fails: a snapshot missing a field the resolution needs, or an
/// action the kind does not offer, produces no field changes. Whenever the
/// patched row would end before it starts, the duration is cleared.
pub fn resolve_prompt(
    snapshot: &TaskRow,
    kind: PromptKind,
    action: PromptAction,
    parser: &DateParser,
) -> RowPatch {
    let view = ScheduleView::read(snapshot, parser);
    let mut patch = RowPatch::default();

    if let (Some(start), Some(end), Some(days)) = (view.start, view.end, view.positive_days()) {
        match (kind, action) {
            (PromptKind::StartChanged, PromptAction::KeepDuration)
            | (PromptKind::DurationChanged, PromptAction::KeepStart) => {
                patch.end = end_from(start, days);
            }
            (PromptKind::EndChanged, PromptAction::KeepDuration)
            | (PromptKind::DurationChanged, PromptAction::KeepEnd) => {
                patch.start = start_from(end, days);
            }
            (PromptKind::StartChanged, PromptAction::KeepEnd)
            | (PromptKind::EndChanged, PromptAction::KeepStart) => {
                patch.duration = Some(day_count(start, end));
            }
            _ => {}
        }
    }

    let patched = ScheduleView {
        start: match &patch.start {
            Some(text) => parser.parse(text),
            None => view.start,
        },
        end: match &patch.end {
            Some(text) => parser.parse(text),
            None => view.end,
        },
        days: None,
    };
    if patched.is_reversed() {
        patch.duration = Some(None);
    }

    patch
}

//! Start/end/duration recalculation planning.
//!
//! After one of the three schedule fields is committed, the planner decides
//! whether the dependent field can be derived silently (exactly two of the
//! three are populated) or whether the user has to choose which field to
//! keep (all three populated). The planner is a pure function of the row
//! snapshot and the edited field; pending prompts live with the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{add_days, format_date, inclusive_day_count, sub_days, DateParser};
use crate::resolve::PromptAction;
use crate::row::{RowPatch, ScheduleField, TaskRow};

/// Which field triggered an ambiguous edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptKind {
    StartChanged,
    EndChanged,
    DurationChanged,
}

impl PromptKind {
    pub fn edited_field(&self) -> ScheduleField {
        match self {
            Self::StartChanged => ScheduleField::Start,
            Self::EndChanged => ScheduleField::End,
            Self::DurationChanged => ScheduleField::Duration,
        }
    }

    /// The two resolutions offered for this kind.
    pub fn actions(&self) -> [PromptAction; 2] {
        match self {
            Self::StartChanged => [PromptAction::KeepDuration, PromptAction::KeepEnd],
            Self::EndChanged => [PromptAction::KeepDuration, PromptAction::KeepStart],
            Self::DurationChanged => [PromptAction::KeepStart, PromptAction::KeepEnd],
        }
    }

    pub fn offers(&self, action: PromptAction) -> bool {
        self.actions().contains(&action)
    }
}

impl From<ScheduleField> for PromptKind {
    fn from(field: ScheduleField) -> Self {
        match field {
            ScheduleField::Start => Self::StartChanged,
            ScheduleField::End => Self::EndChanged,
            ScheduleField::Duration => Self::DurationChanged,
        }
    }
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartChanged => write!(f, "start-changed"),
            Self::EndChanged => write!(f, "end-changed"),
            Self::DurationChanged => write!(f, "duration-changed"),
        }
    }
}

/// An edit that needs a user decision before dependents are touched.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub kind: PromptKind,
    /// The row right after the primary edit was committed.
    pub snapshot: TaskRow,
}

/// The planner's decision for one edit.
#[derive(Debug, Clone, PartialEq)]
pub enum RecalcPlan {
    /// Nothing to derive; the edit stands on its own.
    Unchanged,
    /// Dependent fields to write immediately.
    AutoPatch(RowPatch),
    Prompt(PromptRequest),
}

/// Parsed schedule fields of a row.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScheduleView {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub days: Option<u32>,
}

impl ScheduleView {
    pub fn read(row: &TaskRow, parser: &DateParser) -> Self {
        Self {
            start: parser.parse(&row.start),
            end: parser.parse(&row.end),
            days: row.duration,
        }
    }

    pub fn positive_days(&self) -> Option<u32> {
        self.days.filter(|&d| d > 0)
    }

    pub fn is_reversed(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if e < s)
    }
}

/// End date of a task starting on `start` lasting `days` (inclusive).
pub(crate) fn end_from(start: NaiveDate, days: u32) -> Option<String> {
    add_days(start, i64::from(days) - 1).map(format_date)
}

/// Start date of a task ending on `end` lasting `days` (inclusive).
pub(crate) fn start_from(end: NaiveDate, days: u32) -> Option<String> {
    sub_days(end, i64::from(days) - 1).map(format_date)
}

/// Inclusive day count as a storable duration; `None` when `end < start`.
pub(crate) fn day_count(start: NaiveDate, end: NaiveDate) -> Option<u32> {
    u32::try_from(inclusive_day_count(start, end))
        .ok()
        .filter(|&d| d > 0)
}

/// Decide what follows from committing `edited` on `row`.
///
/// With all three fields populated every edit is ambiguous and yields a
/// prompt; silent derivation only happens when two of the three are set.
pub fn plan_after_edit(row: &TaskRow, edited: ScheduleField, parser: &DateParser) -> RecalcPlan {
    let view = ScheduleView::read(row, parser);
    let days = view.positive_days();

    let ambiguous = match edited {
        ScheduleField::Start => view.end.is_some() && days.is_some(),
        ScheduleField::End => view.start.is_some() && days.is_some(),
        ScheduleField::Duration => view.start.is_some() && view.end.is_some(),
    };
    if ambiguous {
        return RecalcPlan::Prompt(PromptRequest {
            kind: PromptKind::from(edited),
            snapshot: row.clone(),
        });
    }

    let mut patch = RowPatch::default();

    // start + duration -> end
    if matches!(edited, ScheduleField::Start | ScheduleField::Duration) {
        if let (Some(start), Some(days)) = (view.start, days) {
            patch.end = end_from(start, days);
        }
    }

    // start + end -> duration
    if matches!(edited, ScheduleField::Start | ScheduleField::End) {
        if let (Some(start), Some(end)) = (view.start, view.end) {
            if end >= start {
                patch.duration = Some(day_count(start, end));
            }
        }
    }

    // end cleared -> duration cleared
    if edited == ScheduleField::End && view.start.is_some() && view.end.is_none() {
        patch.duration = Some(None);
    }

    let merged = patch.applied_to(row);
    if merged.duration.is_some() && ScheduleView::read(&merged, parser).is_reversed() {
        patch.duration = Some(None);
    }

    if patch.is_empty() {
        RecalcPlan::Unchanged
    } else {
        RecalcPlan::AutoPatch(patch)
    }
}

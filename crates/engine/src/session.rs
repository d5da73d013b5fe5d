//! Edit orchestration: grid edits in, cell writes and prompts out.
//!
//! `EditSession` commits the primary value of each edit, runs the planner
//! for schedule fields, writes auto-patches through the `RowStore`, and
//! owns the prompt slot. Only one prompt is open at a time. Further
//! ambiguous edits on other rows wait in a FIFO queue (or are rejected,
//! per `PromptPolicy`); a newer schedule edit on a row supersedes any prompt
//! that row already has. Queued prompts are re-planned against the row's
//! current contents before they are shown.

use std::collections::VecDeque;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{DateParser, DEFAULT_CENTURY_PIVOT};
use crate::error::SessionError;
use crate::events::{
    CellsWrittenEvent, EditEvent, EventCollector, PromptEvent, PromptResolvedEvent, SessionEvent,
    WriteOrigin,
};
use crate::recalc::{plan_after_edit, PromptKind, PromptRequest, RecalcPlan};
use crate::resolve::{resolve_prompt, PromptAction};
use crate::row::{CellWrite, Field, RowPatch, ScheduleField};
use crate::store::RowStore;

/// How pasted schedule cells are committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PastePolicy {
    /// Each pasted start/end/duration cell goes through the planner like a
    /// typed edit.
    #[default]
    Replan,
    /// Pasted cells are converted and written as-is; no dependents change.
    Raw,
}

/// What happens to an ambiguous edit while another prompt is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptPolicy {
    #[default]
    Queue,
    /// Drop the new prompt; its primary edit stays committed.
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub century_pivot: u32,
    pub paste: PastePolicy,
    pub prompts: PromptPolicy,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            century_pivot: DEFAULT_CENTURY_PIVOT,
            paste: PastePolicy::default(),
            prompts: PromptPolicy::default(),
        }
    }
}

/// A prompt waiting for the user, tied to its row.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPrompt {
    pub row: usize,
    pub request: PromptRequest,
}

impl PendingPrompt {
    pub fn kind(&self) -> PromptKind {
        self.request.kind
    }

    fn event(&self) -> PromptEvent {
        PromptEvent {
            row: self.row,
            kind: self.request.kind,
        }
    }
}

/// Result of committing one edit.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Only the edited cell changed.
    Committed,
    AutoPatched(RowPatch),
    PromptOpened(PromptKind),
    PromptQueued(PromptKind),
    PromptRejected(PromptKind),
}

/// Summary of a paste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteReport {
    pub cells_written: usize,
    /// Pasted rows that fell past the end of the store.
    pub rows_skipped: usize,
    /// Prompts opened or queued by replanned cells.
    pub prompts: usize,
}

pub struct EditSession {
    options: SessionOptions,
    today: NaiveDate,
    open: Option<PendingPrompt>,
    queue: VecDeque<PendingPrompt>,
    events: EventCollector,
}

impl EditSession {
    pub fn new(options: SessionOptions, today: NaiveDate) -> Self {
        Self {
            options,
            today,
            open: None,
            queue: VecDeque::new(),
            events: EventCollector::new(),
        }
    }

    /// Session seeded with the local date. Hosts call `set_today` at midnight.
    pub fn with_local_today(options: SessionOptions) -> Self {
        Self::new(options, crate::date::local_today())
    }

    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Parser bound to this session's date and century pivot.
    pub fn parser(&self) -> DateParser {
        DateParser::new(self.today).with_century_pivot(self.options.century_pivot)
    }

    /// The prompt currently shown to the user.
    pub fn pending(&self) -> Option<&PendingPrompt> {
        self.open.as_ref()
    }

    pub fn queued(&self) -> impl Iterator<Item = &PendingPrompt> {
        self.queue.iter()
    }

    pub fn events(&self) -> &EventCollector {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain()
    }

    /// Commit a grid edit and apply whatever follows from it.
    pub fn commit_edit<S: RowStore>(
        &mut self,
        store: &mut S,
        edit: EditEvent,
    ) -> Result<EditOutcome, SessionError> {
        let len = store.row_count();
        if edit.row >= len {
            log::warn!("edit to row {} ignored: store has {} rows", edit.row, len);
            return Err(SessionError::RowOutOfRange { row: edit.row, len });
        }

        let write = CellWrite::from_raw(edit.field, &edit.raw, &self.parser());
        self.write(store, edit.row, vec![write], WriteOrigin::Edit);

        match edit.field.schedule() {
            Some(field) => Ok(self.replan(store, edit.row, field)),
            None => Ok(EditOutcome::Committed),
        }
    }

    /// Answer the open prompt.
    pub fn resolve<S: RowStore>(
        &mut self,
        store: &mut S,
        action: PromptAction,
    ) -> Result<RowPatch, SessionError> {
        let prompt = self.open.take().ok_or(SessionError::NoPendingPrompt)?;
        let kind = prompt.kind();
        if !kind.offers(action) {
            self.open = Some(prompt);
            return Err(SessionError::ActionNotOffered { kind, action });
        }

        let patch = resolve_prompt(&prompt.request.snapshot, kind, action, &self.parser());
        log::debug!("row {}: {} resolved with {}: {:?}", prompt.row, kind, action, patch);
        self.write(store, prompt.row, patch.writes(), WriteOrigin::Resolution);
        self.events.push(SessionEvent::PromptResolved(PromptResolvedEvent {
            row: prompt.row,
            kind,
            action,
        }));

        self.advance(store);
        Ok(patch)
    }

    /// Close the open prompt without an answer. The primary edit stays;
    /// dependent fields are left as they were.
    pub fn cancel<S: RowStore>(&mut self, store: &mut S) -> Result<(), SessionError> {
        let prompt = self.open.take().ok_or(SessionError::NoPendingPrompt)?;
        log::debug!("row {}: {} cancelled", prompt.row, prompt.kind());
        self.events.push(SessionEvent::PromptDismissed(prompt.event()));
        self.advance(store);
        Ok(())
    }

    /// Paste a block of raw cells with its top-left corner at `top_row`.
    ///
    /// `columns[j]` names the column of the j-th cell in every pasted row;
    /// cells beyond `columns` are ignored.
    pub fn paste<S: RowStore>(
        &mut self,
        store: &mut S,
        top_row: usize,
        columns: &[Field],
        cells: &[Vec<String>],
    ) -> Result<PasteReport, SessionError> {
        let len = store.row_count();
        if top_row >= len {
            log::warn!("paste at row {} ignored: store has {} rows", top_row, len);
            return Err(SessionError::RowOutOfRange { row: top_row, len });
        }

        let mut report = PasteReport::default();
        for (offset, values) in cells.iter().enumerate() {
            let row = top_row + offset;
            if row >= len {
                report.rows_skipped += 1;
                continue;
            }
            for (&field, raw) in columns.iter().zip(values) {
                log::trace!("paste row {row} {field}: {raw:?}");
                report.cells_written += 1;
                let replan = self.options.paste == PastePolicy::Replan;
                if replan && field.schedule().is_some() {
                    let edit = EditEvent::new(row, field, raw.as_str());
                    let outcome = self.commit_edit(store, edit)?;
                    if matches!(
                        outcome,
                        EditOutcome::PromptOpened(_) | EditOutcome::PromptQueued(_)
                    ) {
                        report.prompts += 1;
                    }
                } else {
                    let write = CellWrite::from_raw(field, raw, &self.parser());
                    self.write(store, row, vec![write], WriteOrigin::Paste);
                    // a prompt snapshot taken before this write is stale
                    if field.schedule().is_some() {
                        self.supersede(store, row);
                    }
                }
            }
        }

        if report.rows_skipped > 0 {
            log::warn!(
                "paste: {} rows past the end of the table were skipped",
                report.rows_skipped
            );
        }
        Ok(report)
    }

    fn replan<S: RowStore>(
        &mut self,
        store: &mut S,
        row: usize,
        field: ScheduleField,
    ) -> EditOutcome {
        let Some(snapshot) = store.row(row).cloned() else {
            return EditOutcome::Committed;
        };

        match plan_after_edit(&snapshot, field, &self.parser()) {
            RecalcPlan::Prompt(request) => self.offer(PendingPrompt { row, request }),
            RecalcPlan::AutoPatch(patch) => {
                log::debug!("row {row}: auto-patch after {} edit: {:?}", field.field(), patch);
                self.write(store, row, patch.writes(), WriteOrigin::AutoPatch);
                self.supersede(store, row);
                EditOutcome::AutoPatched(patch)
            }
            RecalcPlan::Unchanged => {
                self.supersede(store, row);
                EditOutcome::Committed
            }
        }
    }

    /// Place a new prompt: replace the row's existing prompt, open it, queue
    /// it, or reject it.
    fn offer(&mut self, prompt: PendingPrompt) -> EditOutcome {
        let kind = prompt.kind();

        if let Some(open) = self.open.as_mut().filter(|open| open.row == prompt.row) {
            let old = std::mem::replace(open, prompt);
            log::debug!("row {}: {} replaces open {}", old.row, kind, old.kind());
            self.events.push(SessionEvent::PromptDismissed(old.event()));
            self.events.push(SessionEvent::PromptOpened(PromptEvent { row: old.row, kind }));
            return EditOutcome::PromptOpened(kind);
        }

        if let Some(slot) = self.queue.iter_mut().find(|queued| queued.row == prompt.row) {
            let old = std::mem::replace(slot, prompt);
            log::debug!("row {}: {} replaces queued {}", old.row, kind, old.kind());
            self.events.push(SessionEvent::PromptDismissed(old.event()));
            self.events.push(SessionEvent::PromptQueued(PromptEvent { row: old.row, kind }));
            return EditOutcome::PromptQueued(kind);
        }

        if self.open.is_none() {
            log::debug!("row {}: {} prompt opened", prompt.row, kind);
            self.events.push(SessionEvent::PromptOpened(prompt.event()));
            self.open = Some(prompt);
            return EditOutcome::PromptOpened(kind);
        }

        match self.options.prompts {
            PromptPolicy::Queue => {
                let ahead = self.open.as_ref().map_or(0, |p| p.row);
                log::debug!("row {}: {} prompt queued behind row {}", prompt.row, kind, ahead);
                self.events.push(SessionEvent::PromptQueued(prompt.event()));
                self.queue.push_back(prompt);
                EditOutcome::PromptQueued(kind)
            }
            PromptPolicy::Reject => {
                log::debug!("row {}: {} prompt rejected, another prompt is open", prompt.row, kind);
                self.events.push(SessionEvent::PromptDismissed(prompt.event()));
                EditOutcome::PromptRejected(kind)
            }
        }
    }

    /// Drop prompts for `row` after a later schedule write made their snapshot stale.
    fn supersede<S: RowStore>(&mut self, store: &mut S, row: usize) {
        let events = &mut self.events;
        self.queue.retain(|queued| {
            if queued.row == row {
                events.push(SessionEvent::PromptDismissed(queued.event()));
                false
            } else {
                true
            }
        });

        if self.open.as_ref().is_some_and(|open| open.row == row) {
            if let Some(open) = self.open.take() {
                log::debug!("row {row}: open {} superseded by a later edit", open.kind());
                self.events.push(SessionEvent::PromptDismissed(open.event()));
            }
            self.advance(store);
        }
    }

    /// Promote queued prompts until one is still ambiguous or the queue is empty.
    fn advance<S: RowStore>(&mut self, store: &mut S) {
        while self.open.is_none() {
            let Some(next) = self.queue.pop_front() else {
                break;
            };
            let Some(current) = store.row(next.row).cloned() else {
                self.events.push(SessionEvent::PromptDismissed(next.event()));
                continue;
            };

            let field = next.kind().edited_field();
            match plan_after_edit(&current, field, &self.parser()) {
                RecalcPlan::Prompt(request) => {
                    let prompt = PendingPrompt { row: next.row, request };
                    log::debug!("row {}: queued {} prompt opened", prompt.row, prompt.kind());
                    self.events.push(SessionEvent::PromptOpened(prompt.event()));
                    self.open = Some(prompt);
                }
                RecalcPlan::AutoPatch(patch) => {
                    log::debug!("row {}: queued {} no longer ambiguous", next.row, next.kind());
                    self.events.push(SessionEvent::PromptDismissed(next.event()));
                    self.write(store, next.row, patch.writes(), WriteOrigin::AutoPatch);
                }
                RecalcPlan::Unchanged => {
                    self.events.push(SessionEvent::PromptDismissed(next.event()));
                }
            }
        }
    }

    fn write<S: RowStore>(
        &mut self,
        store: &mut S,
        row: usize,
        writes: Vec<CellWrite>,
        origin: WriteOrigin,
    ) {
        if writes.is_empty() {
            return;
        }
        let fields = writes.iter().map(CellWrite::field).collect();
        for write in writes {
            store.set_cell(row, write);
        }
        self.events.push(SessionEvent::CellsWritten(CellsWrittenEvent { row, fields, origin }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::TaskRow;
    use crate::store::RowList;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn scheduled(start: &str, end: &str, duration: Option<u32>) -> TaskRow {
        TaskRow {
            start: start.into(),
            end: end.into(),
            duration,
            ..TaskRow::default()
        }
    }

    fn full_rows(n: usize) -> RowList {
        RowList::from_rows(vec![scheduled("2025-01-01", "2025-01-10", Some(10)); n])
    }

    #[test]
    fn text_edit_commits_only_that_cell() {
        let mut store = RowList::seeded(1);
        let mut session = EditSession::new(SessionOptions::default(), today());

        let outcome = session
            .commit_edit(&mut store, EditEvent::new(0, Field::Name, "Excavation"))
            .unwrap();
        assert_eq!(outcome, EditOutcome::Committed);
        assert_eq!(store.rows()[0].name, "Excavation");
        assert_eq!(session.events().cells_written().len(), 1);
    }

    #[test]
    fn out_of_range_edit_is_an_error() {
        let mut store = RowList::seeded(2);
        let mut session = EditSession::new(SessionOptions::default(), today());
        let err = session
            .commit_edit(&mut store, EditEvent::new(5, Field::Start, "today"))
            .unwrap_err();
        assert_eq!(err, SessionError::RowOutOfRange { row: 5, len: 2 });
    }

    #[test]
    fn relative_input_uses_session_today() {
        let mut store = RowList::seeded(1);
        let mut session = EditSession::new(SessionOptions::default(), today());
        session.set_today(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap());
        session
            .commit_edit(&mut store, EditEvent::new(0, Field::Start, "+7"))
            .unwrap();
        assert_eq!(store.rows()[0].start, "2025-02-17");
    }

    #[test]
    fn resolve_without_prompt_fails() {
        let mut store = RowList::seeded(1);
        let mut session = EditSession::new(SessionOptions::default(), today());
        assert_eq!(
            session.resolve(&mut store, PromptAction::KeepDuration),
            Err(SessionError::NoPendingPrompt)
        );
        assert_eq!(session.cancel(&mut store), Err(SessionError::NoPendingPrompt));
    }

    #[test]
    fn unoffered_action_keeps_prompt_open() {
        let mut store = full_rows(1);
        let mut session = EditSession::new(SessionOptions::default(), today());
        session
            .commit_edit(&mut store, EditEvent::new(0, Field::Start, "2025-01-05"))
            .unwrap();

        let err = session.resolve(&mut store, PromptAction::KeepStart).unwrap_err();
        assert_eq!(
            err,
            SessionError::ActionNotOffered {
                kind: PromptKind::StartChanged,
                action: PromptAction::KeepStart,
            }
        );
        assert!(session.pending().is_some());
    }

    #[test]
    fn reject_policy_drops_second_prompt() {
        let mut store = full_rows(2);
        let options = SessionOptions {
            prompts: PromptPolicy::Reject,
            ..SessionOptions::default()
        };
        let mut session = EditSession::new(options, today());

        session
            .commit_edit(&mut store, EditEvent::new(0, Field::Duration, "3"))
            .unwrap();
        let outcome = session
            .commit_edit(&mut store, EditEvent::new(1, Field::Duration, "4"))
            .unwrap();

        assert_eq!(outcome, EditOutcome::PromptRejected(PromptKind::DurationChanged));
        assert_eq!(store.rows()[1].duration, Some(4));
        assert_eq!(session.queued().count(), 0);
        assert_eq!(session.pending().map(|p| p.row), Some(0));
    }

    #[test]
    fn same_row_edit_replaces_open_prompt() {
        let mut store = full_rows(1);
        let mut session = EditSession::new(SessionOptions::default(), today());

        session
            .commit_edit(&mut store, EditEvent::new(0, Field::Start, "2025-01-03"))
            .unwrap();
        let outcome = session
            .commit_edit(&mut store, EditEvent::new(0, Field::Duration, "2"))
            .unwrap();

        assert_eq!(outcome, EditOutcome::PromptOpened(PromptKind::DurationChanged));
        let pending = session.pending().unwrap();
        assert_eq!(pending.kind(), PromptKind::DurationChanged);
        assert_eq!(pending.request.snapshot.start, "2025-01-03");
        assert_eq!(pending.request.snapshot.duration, Some(2));
        assert_eq!(session.events().prompts_dismissed().len(), 1);
    }
}

//! Event types for edit-session notifications.
//!
//! The UI drains these after each call into the session to refresh cells
//! and show or hide the prompt. Tests use them to check ordering.

use crate::recalc::PromptKind;
use crate::resolve::PromptAction;
use crate::row::Field;

/// An edit committed by the grid (blur, enter, navigation away, paste).
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent {
    pub row: usize,
    pub field: Field,
    /// Text exactly as typed or pasted.
    pub raw: String,
}

impl EditEvent {
    pub fn new(row: usize, field: Field, raw: impl Into<String>) -> Self {
        Self {
            row,
            field,
            raw: raw.into(),
        }
    }
}

/// Why cells were written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOrigin {
    /// The primary value of an edit.
    Edit,
    /// Derived silently by the planner.
    AutoPatch,
    /// Derived from a prompt answer.
    Resolution,
    /// Bulk paste written without planning.
    Paste,
}

/// Events emitted by `EditSession`.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    CellsWritten(CellsWrittenEvent),
    /// A prompt became the open prompt.
    PromptOpened(PromptEvent),
    /// A prompt is waiting behind the open one.
    PromptQueued(PromptEvent),
    PromptResolved(PromptResolvedEvent),
    /// A prompt was cancelled, rejected, or superseded without an answer.
    PromptDismissed(PromptEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellsWrittenEvent {
    pub row: usize,
    pub fields: Vec<Field>,
    pub origin: WriteOrigin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptEvent {
    pub row: usize,
    pub kind: PromptKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptResolvedEvent {
    pub row: usize,
    pub kind: PromptKind,
    pub action: PromptAction,
}

/// Accumulates session events until the UI drains them.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<SessionEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    /// Take all collected events, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CellsWritten events.
    pub fn cells_written(&self) -> Vec<&CellsWrittenEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::CellsWritten(c) => Some(c),
                _ => None,
            })
            .collect()
    }

    /// Filter to only PromptOpened events.
    pub fn prompts_opened(&self) -> Vec<&PromptEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::PromptOpened(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Filter to only PromptDismissed events.
    pub fn prompts_dismissed(&self) -> Vec<&PromptEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::PromptDismissed(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

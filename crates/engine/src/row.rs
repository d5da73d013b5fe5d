//! Task rows and typed cell writes.
//!
//! A `TaskRow` is one line of the schedule table. Only `start`, `end` and
//! `duration` matter to the recalculation engine; the remaining columns are
//! carried through untouched.

use serde::{Deserialize, Serialize};

use crate::date::DateParser;
use crate::numeric::{coerce_days, to_number};

/// Column of the schedule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Start,
    End,
    Duration,
    /// Percent of work remaining.
    RemainingPct,
    /// Percent of work completed.
    CompletePct,
    Owner,
    Status,
}

impl Field {
    /// All columns in table order.
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Start,
        Field::End,
        Field::Duration,
        Field::RemainingPct,
        Field::CompletePct,
        Field::Owner,
        Field::Status,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Start => "start",
            Self::End => "end",
            Self::Duration => "duration",
            Self::RemainingPct => "remaining_pct",
            Self::CompletePct => "complete_pct",
            Self::Owner => "owner",
            Self::Status => "status",
        }
    }

    /// The schedule field this column drives, if any.
    pub fn schedule(&self) -> Option<ScheduleField> {
        match self {
            Self::Start => Some(ScheduleField::Start),
            Self::End => Some(ScheduleField::End),
            Self::Duration => Some(ScheduleField::Duration),
            _ => None,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("unknown column '{s}'"))
    }
}

/// One of the three mutually dependent fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleField {
    Start,
    End,
    Duration,
}

impl ScheduleField {
    pub fn field(&self) -> Field {
        match self {
            Self::Start => Field::Start,
            Self::End => Field::End,
            Self::Duration => Field::Duration,
        }
    }
}

/// A single schedule row.
///
/// `start` and `end` hold canonical `YYYY-MM-DD` text or are empty.
/// `duration` is an inclusive calendar-day count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub start: String,
    pub end: String,
    pub duration: Option<u32>,
    pub remaining_pct: Option<f64>,
    pub complete_pct: Option<f64>,
    pub owner: String,
    pub status: String,
}

impl TaskRow {
    /// An empty row with the given id.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Apply a single cell write in place.
    pub fn apply(&mut self, write: &CellWrite) {
        match write {
            CellWrite::Name(v) => self.name = v.clone(),
            CellWrite::Start(v) => self.start = v.clone(),
            CellWrite::End(v) => self.end = v.clone(),
            CellWrite::Duration(v) => self.duration = *v,
            CellWrite::RemainingPct(v) => self.remaining_pct = *v,
            CellWrite::CompletePct(v) => self.complete_pct = *v,
            CellWrite::Owner(v) => self.owner = v.clone(),
            CellWrite::Status(v) => self.status = v.clone(),
        }
    }

    /// Reset one column to its empty value.
    pub fn clear(&mut self, field: Field) {
        self.apply(&CellWrite::empty(field));
    }
}

/// A value committed to one column of a row.
///
/// This is the `set_cell` payload: column and value travel together so a
/// duration can never be written into a text column.
#[derive(Debug, Clone, PartialEq)]
pub enum CellWrite {
    Name(String),
    Start(String),
    End(String),
    Duration(Option<u32>),
    RemainingPct(Option<f64>),
    CompletePct(Option<f64>),
    Owner(String),
    Status(String),
}

impl CellWrite {
    pub fn field(&self) -> Field {
        match self {
            Self::Name(_) => Field::Name,
            Self::Start(_) => Field::Start,
            Self::End(_) => Field::End,
            Self::Duration(_) => Field::Duration,
            Self::RemainingPct(_) => Field::RemainingPct,
            Self::CompletePct(_) => Field::CompletePct,
            Self::Owner(_) => Field::Owner,
            Self::Status(_) => Field::Status,
        }
    }

    /// The empty value for a column.
    pub fn empty(field: Field) -> Self {
        match field {
            Field::Name => Self::Name(String::new()),
            Field::Start => Self::Start(String::new()),
            Field::End => Self::End(String::new()),
            Field::Duration => Self::Duration(None),
            Field::RemainingPct => Self::RemainingPct(None),
            Field::CompletePct => Self::CompletePct(None),
            Field::Owner => Self::Owner(String::new()),
            Field::Status => Self::Status(String::new()),
        }
    }

    /// Convert raw grid input into the committed value for `field`.
    ///
    /// Dates are canonicalized (unparseable input commits as empty text),
    /// durations become non-negative whole days, percentages become numbers.
    pub fn from_raw(field: Field, raw: &str, parser: &DateParser) -> Self {
        match field {
            Field::Name => Self::Name(raw.to_string()),
            Field::Start => Self::Start(parser.canonicalize(raw).text),
            Field::End => Self::End(parser.canonicalize(raw).text),
            Field::Duration => Self::Duration(coerce_days(raw)),
            Field::RemainingPct => Self::RemainingPct(to_number(raw)),
            Field::CompletePct => Self::CompletePct(to_number(raw)),
            Field::Owner => Self::Owner(raw.to_string()),
            Field::Status => Self::Status(raw.to_string()),
        }
    }
}

/// Corrective updates to the schedule fields of one row.
///
/// `None` leaves a field untouched. For `duration`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowPatch {
    pub start: Option<String>,
    pub end: Option<String>,
    pub duration: Option<Option<u32>>,
}

impl RowPatch {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.duration.is_none()
    }

    /// The cell writes this patch performs, in start/end/duration order.
    pub fn writes(&self) -> Vec<CellWrite> {
        let mut writes = Vec::new();
        if let Some(start) = &self.start {
            writes.push(CellWrite::Start(start.clone()));
        }
        if let Some(end) = &self.end {
            writes.push(CellWrite::End(end.clone()));
        }
        if let Some(duration) = self.duration {
            writes.push(CellWrite::Duration(duration));
        }
        writes
    }

    /// A copy of `row` with this patch applied.
    pub fn applied_to(&self, row: &TaskRow) -> TaskRow {
        let mut next = row.clone();
        for write in self.writes() {
            next.apply(&write);
        }
        next
    }
}

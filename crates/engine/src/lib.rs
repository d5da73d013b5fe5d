//! `plangrid-engine`: schedule date-consistency engine.
//!
//! Keeps start, end and inclusive duration of task rows consistent while a
//! user edits them. Pure planning in `recalc` and `resolve`; `session` wires
//! the plans to a row store and a single pending prompt. No IO.

pub mod date;
pub mod dependency;
pub mod error;
pub mod events;
pub mod numeric;
pub mod recalc;
pub mod resolve;
pub mod resources;
pub mod rollup;
pub mod row;
pub mod session;
pub mod store;

pub use date::{DateParser, DEFAULT_CENTURY_PIVOT};
pub use error::SessionError;
pub use recalc::{plan_after_edit, PromptKind, PromptRequest, RecalcPlan};
pub use resolve::{resolve_prompt, PromptAction};
pub use row::{CellWrite, Field, RowPatch, ScheduleField, TaskRow};
pub use session::{EditOutcome, EditSession, PastePolicy, PromptPolicy, SessionOptions};
pub use store::{RowList, RowStore};

//! Summary-task rollup: a parent spans its children.

use crate::date::{format_date, DateParser};
use crate::recalc::day_count;
use crate::row::{RowPatch, TaskRow};

/// Start, end and duration for a summary row covering `children`.
///
/// Start is the earliest child start, end the latest child end. If no child
/// has a start, or none has an end, all three fields are cleared.
pub fn rollup_summary<'a>(
    children: impl IntoIterator<Item = &'a TaskRow>,
    parser: &DateParser,
) -> RowPatch {
    let mut min_start = None;
    let mut max_end = None;
    for child in children {
        if let Some(start) = parser.parse(&child.start) {
            min_start = Some(min_start.map_or(start, |m: chrono::NaiveDate| m.min(start)));
        }
        if let Some(end) = parser.parse(&child.end) {
            max_end = Some(max_end.map_or(end, |m: chrono::NaiveDate| m.max(end)));
        }
    }

    match (min_start, max_end) {
        (Some(start), Some(end)) => RowPatch {
            start: Some(format_date(start)),
            end: Some(format_date(end)),
            duration: Some(day_count(start, end)),
        },
        _ => RowPatch {
            start: Some(String::new()),
            end: Some(String::new()),
            duration: Some(None),
        },
    }
}

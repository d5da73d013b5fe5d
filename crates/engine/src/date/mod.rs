//! Calendar dates for the schedule: flexible parsing of typed input and
//! whole-day arithmetic.
//!
//! All dates are `chrono::NaiveDate`, so there is no time-of-day to strip.
//! Nothing in this module reads the system clock except [`local_today`];
//! relative input ("today", "+7") resolves against the date injected into
//! [`DateParser`].

mod arith;
mod parse;

pub use arith::{add_days, format_date, inclusive_day_count, local_today, sub_days};
pub use parse::{parse_date, Canonical, DateParser, DEFAULT_CENTURY_PIVOT};

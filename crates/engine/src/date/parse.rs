use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::arith::{add_days, format_date};

/// Two-digit years at or above this map to 19YY, below it to 20YY.
pub const DEFAULT_CENTURY_PIVOT: u32 = 70;

static RELATIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]\d{1,4}$").unwrap());
static COMPACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})$").unwrap());
static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})$").unwrap());
static DAY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[./-](\d{1,2})(?:[./-](\d{2,4}))?$").unwrap());
static TEXT_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.?\s*([a-zæøå]+)\s*(\d{2,4})?$").unwrap());

/// English and Norwegian month names and abbreviations.
const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1), ("januar", 1), ("january", 1),
    ("feb", 2), ("februar", 2), ("february", 2),
    ("mar", 3), ("mars", 3), ("march", 3),
    ("apr", 4), ("april", 4),
    ("mai", 5), ("may", 5),
    ("jun", 6), ("juni", 6), ("june", 6),
    ("jul", 7), ("juli", 7), ("july", 7),
    ("aug", 8), ("august", 8),
    ("sep", 9), ("sept", 9), ("september", 9),
    ("okt", 10), ("oct", 10), ("oktober", 10), ("october", 10),
    ("nov", 11), ("november", 11),
    ("des", 12), ("dec", 12), ("desember", 12), ("december", 12),
];

/// Lookup keyed by the first four letters of each name.
static MONTH_KEYS: Lazy<HashMap<String, u32>> = Lazy::new(|| {
    MONTH_NAMES
        .iter()
        .map(|&(name, month)| (month_key(name), month))
        .collect()
});

fn month_key(token: &str) -> String {
    token.chars().filter(|c| c.is_alphabetic()).take(4).collect()
}

/// Result of [`DateParser::canonicalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    /// `YYYY-MM-DD`, or empty when the input did not parse.
    pub text: String,
    pub date: Option<NaiveDate>,
}

/// Parses the date formats people type into a schedule cell.
///
/// Accepted, case-insensitive, surrounding whitespace ignored:
/// - `today`, `i dag`, `idag`, and `+N` / `-N` days from today (1-4 digits)
/// - `YYYYMMDD`
/// - `YYYY-M-D` with `-`, `/` or `.` separators
/// - `D.M.YYYY`, `D/M/YY`, `D-M` (day first; year defaults to today's year)
/// - `7 mar 2025`, `7.mars`, `1 february 25`
/// - RFC 3339 / RFC 2822 timestamps and `March 7, 2025` as a last resort
///
/// Impossible dates such as `31.02.2025` are rejected, never rolled over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParser {
    today: NaiveDate,
    century_pivot: u32,
}

impl DateParser {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            century_pivot: DEFAULT_CENTURY_PIVOT,
        }
    }

    pub fn with_century_pivot(mut self, pivot: u32) -> Self {
        self.century_pivot = pivot.min(99);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn century_pivot(&self) -> u32 {
        self.century_pivot
    }

    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lower = trimmed.to_lowercase();
        let s = lower.as_str();

        if matches!(s, "today" | "i dag" | "idag") {
            return Some(self.today);
        }
        if RELATIVE.is_match(s) {
            let offset: i64 = s.parse().ok()?;
            return add_days(self.today, offset);
        }

        if let Some(caps) = COMPACT.captures(s) {
            return ymd(num(&caps[1])?, num(&caps[2])?, num(&caps[3])?);
        }
        if let Some(caps) = YEAR_FIRST.captures(s) {
            return ymd(num(&caps[1])?, num(&caps[2])?, num(&caps[3])?);
        }
        if let Some(caps) = DAY_FIRST.captures(s) {
            let year = match caps.get(3) {
                Some(y) => self.expand_year(num(y.as_str())?),
                None => self.today.year(),
            };
            return ymd(year, num(&caps[2])?, num(&caps[1])?);
        }
        if let Some(caps) = TEXT_MONTH.captures(s) {
            let month = *MONTH_KEYS.get(&month_key(&caps[2]))?;
            let year = match caps.get(3) {
                Some(y) => self.expand_year(num(y.as_str())?),
                None => self.today.year(),
            };
            return ymd(year, month as i32, num(&caps[1])?);
        }

        parse_fallback(trimmed)
    }

    /// Parse and render as canonical text.
    pub fn canonicalize(&self, raw: &str) -> Canonical {
        let date = self.parse(raw);
        Canonical {
            text: date.map(format_date).unwrap_or_default(),
            date,
        }
    }

    fn expand_year(&self, year: i32) -> i32 {
        if year >= 100 {
            year
        } else if year >= self.century_pivot as i32 {
            1900 + year
        } else {
            2000 + year
        }
    }
}

/// Parse with the default century pivot.
pub fn parse_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    DateParser::new(today).parse(raw)
}

fn num(digits: &str) -> Option<i32> {
    digits.parse().ok()
}

fn ymd(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
}

/// Generic timestamp and English month-first forms.
fn parse_fallback(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in ["%B %d, %Y", "%B %d %Y", "%A, %B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    None
}

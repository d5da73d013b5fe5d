use chrono::{Days, Local, NaiveDate};

/// Shift `date` by `n` calendar days. `None` only if the result leaves the
/// representable calendar.
pub fn add_days(date: NaiveDate, n: i64) -> Option<NaiveDate> {
    let days = Days::new(n.unsigned_abs());
    if n >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
}

pub fn sub_days(date: NaiveDate, n: i64) -> Option<NaiveDate> {
    add_days(date, n.checked_neg()?)
}

/// Number of calendar days in `[a, b]`, counting both ends.
///
/// `inclusive_day_count(d, d) == 1`. The result is zero or negative when
/// `b < a`; callers check ordering first.
pub fn inclusive_day_count(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days() + 1
}

/// Canonical `YYYY-MM-DD` text.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The current date in the local time zone.
///
/// The engine never calls this itself; hosts use it to seed
/// [`DateParser`](super::DateParser) and the edit session.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn add_and_sub_cross_month_and_year() {
        assert_eq!(add_days(date(2025, 1, 30), 3), Some(date(2025, 2, 2)));
        assert_eq!(add_days(date(2024, 12, 31), 1), Some(date(2025, 1, 1)));
        assert_eq!(add_days(date(2025, 3, 1), -1), Some(date(2025, 2, 28)));
        assert_eq!(sub_days(date(2024, 3, 1), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_days(date(2025, 5, 5), 0), Some(date(2025, 5, 5)));
    }

    #[test]
    fn add_days_reports_overflow() {
        assert_eq!(add_days(NaiveDate::MAX, 1), None);
        assert_eq!(sub_days(NaiveDate::MIN, 1), None);
        assert_eq!(sub_days(date(2025, 1, 1), i64::MIN), None);
    }

    #[test]
    fn inclusive_count_counts_both_ends() {
        assert_eq!(inclusive_day_count(date(2025, 1, 1), date(2025, 1, 1)), 1);
        assert_eq!(inclusive_day_count(date(2025, 1, 1), date(2025, 1, 10)), 10);
        assert_eq!(inclusive_day_count(date(2025, 1, 5), date(2025, 1, 10)), 6);
        assert_eq!(inclusive_day_count(date(2025, 1, 10), date(2025, 1, 5)), -4);
    }

    #[test]
    fn format_zero_pads() {
        assert_eq!(format_date(date(2025, 3, 7)), "2025-03-07");
        assert_eq!(format_date(date(987, 11, 30)), "0987-11-30");
    }
}

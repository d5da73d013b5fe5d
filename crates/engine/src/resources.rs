//! Rough staffing estimate for a task.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceEstimate {
    /// Total work in hours.
    pub effort_hours: f64,
    /// Working hours per person per day, e.g. 7.5.
    pub hours_per_day: f64,
    /// Share of each person's day available to the task, 0..=100.
    pub availability_pct: f64,
    /// Calendar days the task runs.
    pub duration_days: u32,
}

/// People needed to finish the effort within the duration, rounded up.
/// Any non-positive input yields 0.
pub fn estimate_resources(estimate: &ResourceEstimate) -> u32 {
    let ResourceEstimate {
        effort_hours,
        hours_per_day,
        availability_pct,
        duration_days,
    } = *estimate;
    if effort_hours <= 0.0
        || hours_per_day <= 0.0
        || availability_pct <= 0.0
        || duration_days == 0
    {
        return 0;
    }
    let per_person = hours_per_day * (availability_pct / 100.0) * f64::from(duration_days);
    let needed = (effort_hours / per_person).ceil();
    if needed.is_finite() {
        needed.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(
        effort_hours: f64,
        hours_per_day: f64,
        availability_pct: f64,
        duration_days: u32,
    ) -> ResourceEstimate {
        ResourceEstimate {
            effort_hours,
            hours_per_day,
            availability_pct,
            duration_days,
        }
    }

    #[test]
    fn rounds_up_to_whole_people() {
        // 7.5h * 100% * 10d = 75h per person
        assert_eq!(estimate_resources(&estimate(75.0, 7.5, 100.0, 10)), 1);
        assert_eq!(estimate_resources(&estimate(76.0, 7.5, 100.0, 10)), 2);
        // half-time doubles the headcount
        assert_eq!(estimate_resources(&estimate(150.0, 7.5, 50.0, 10)), 4);
    }

    #[test]
    fn non_positive_inputs_yield_zero() {
        assert_eq!(estimate_resources(&estimate(0.0, 7.5, 100.0, 10)), 0);
        assert_eq!(estimate_resources(&estimate(10.0, 0.0, 100.0, 10)), 0);
        assert_eq!(estimate_resources(&estimate(10.0, 7.5, -5.0, 10)), 0);
        assert_eq!(estimate_resources(&estimate(10.0, 7.5, 100.0, 0)), 0);
    }
}

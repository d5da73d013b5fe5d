//! Predecessor/successor links between two tasks.
//!
//! Not wired into the edit flow: callers decide when to apply a link and
//! feed the resulting patch back through their store. Lag is counted in
//! plain calendar days.

use serde::{Deserialize, Serialize};

use crate::date::{add_days, format_date, DateParser};
use crate::row::{RowPatch, TaskRow};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyKind {
    /// Successor starts when the predecessor finishes.
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl DependencyKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for DependencyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FS" => Ok(Self::FinishToStart),
            "SS" => Ok(Self::StartToStart),
            "FF" => Ok(Self::FinishToFinish),
            "SF" => Ok(Self::StartToFinish),
            other => Err(format!("unknown dependency type '{other}'")),
        }
    }
}

/// A link from a predecessor to a successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub kind: DependencyKind,
    /// Calendar days added to the anchor date; may be negative.
    #[serde(default)]
    pub lag_days: i64,
}

impl Dependency {
    pub fn new(kind: DependencyKind) -> Self {
        Self { kind, lag_days: 0 }
    }

    pub fn with_lag(mut self, lag_days: i64) -> Self {
        self.lag_days = lag_days;
        self
    }
}

/// The successor date implied by `dep` on `predecessor`.
///
/// FS and SS move the successor's start, FF and SF its end. If the
/// predecessor lacks the anchor date the patch is empty.
pub fn compute_dependency(
    predecessor: &TaskRow,
    dep: &Dependency,
    parser: &DateParser,
) -> RowPatch {
    let anchor = match dep.kind {
        DependencyKind::FinishToStart | DependencyKind::FinishToFinish => &predecessor.end,
        DependencyKind::StartToStart | DependencyKind::StartToFinish => &predecessor.start,
    };
    let Some(date) = parser.parse(anchor).and_then(|d| add_days(d, dep.lag_days)) else {
        return RowPatch::default();
    };

    let text = format_date(date);
    match dep.kind {
        DependencyKind::FinishToStart | DependencyKind::StartToStart => RowPatch {
            start: Some(text),
            ..RowPatch::default()
        },
        DependencyKind::FinishToFinish | DependencyKind::StartToFinish => RowPatch {
            end: Some(text),
            ..RowPatch::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn parser() -> DateParser {
        DateParser::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
    }

    fn pred() -> TaskRow {
        TaskRow {
            start: "2025-03-03".into(),
            end: "2025-03-14".into(),
            duration: Some(12),
            ..TaskRow::empty("1")
        }
    }

    #[test]
    fn each_kind_moves_the_right_field() {
        let p = parser();
        let fs = compute_dependency(&pred(), &Dependency::new(DependencyKind::FinishToStart), &p);
        assert_eq!(fs.start.as_deref(), Some("2025-03-14"));
        assert_eq!(fs.end, None);

        let ss_dep = Dependency::new(DependencyKind::StartToStart).with_lag(2);
        let ss = compute_dependency(&pred(), &ss_dep, &p);
        assert_eq!(ss.start.as_deref(), Some("2025-03-05"));

        let ff_dep = Dependency::new(DependencyKind::FinishToFinish).with_lag(-4);
        let ff = compute_dependency(&pred(), &ff_dep, &p);
        assert_eq!(ff.end.as_deref(), Some("2025-03-10"));
        assert_eq!(ff.start, None);

        let sf = compute_dependency(&pred(), &Dependency::new(DependencyKind::StartToFinish), &p);
        assert_eq!(sf.end.as_deref(), Some("2025-03-03"));
    }

    #[test]
    fn missing_anchor_gives_empty_patch() {
        let mut row = pred();
        row.end.clear();
        let fs_dep = Dependency::new(DependencyKind::FinishToStart);
        let patch = compute_dependency(&row, &fs_dep, &parser());
        assert!(patch.is_empty());
    }

    #[test]
    fn kind_codes() {
        assert_eq!("fs".parse::<DependencyKind>().unwrap(), DependencyKind::FinishToStart);
        assert_eq!(" SF ".parse::<DependencyKind>().unwrap(), DependencyKind::StartToFinish);
        assert!("XX".parse::<DependencyKind>().is_err());
        assert_eq!(DependencyKind::FinishToFinish.to_string(), "FF");

        let dep: Dependency = serde_json::from_str(r#"{"kind":"SS"}"#).unwrap();
        assert_eq!(dep, Dependency::new(DependencyKind::StartToStart));
    }
}

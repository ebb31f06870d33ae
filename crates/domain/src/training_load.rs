use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};

use crate::{Activity, ActivityKind};

/// Minutes assumed for an activity without a recorded duration.
pub const DEFAULT_DURATION: f32 = 30.0;

impl ActivityKind {
    #[must_use]
    pub fn load_multiplier(self) -> f32 {
        match self {
            ActivityKind::Strength => 1.0,
            ActivityKind::Cardio => 0.8,
            ActivityKind::Sport => 0.7,
            ActivityKind::Mobility => 0.3,
            ActivityKind::Custom => 0.6,
        }
    }
}

impl Activity {
    /// Training load in arbitrary units.
    #[must_use]
    pub fn load(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let load = (self.duration.unwrap_or(DEFAULT_DURATION) * self.kind.load_multiplier())
            .round()
            .max(0.0) as u32;
        load
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LoadStatus {
    Undertraining,
    Optimal,
    Overtraining,
}

impl LoadStatus {
    pub const MIN_SESSIONS: u32 = 2;
    pub const MAX_SESSIONS: u32 = 7;
    pub const MIN_LOAD: u32 = 60;
    pub const MAX_LOAD: u32 = 300;

    /// Classify a week.
    ///
    /// Undertraining takes precedence, so a single session with a huge load is still
    /// considered undertraining.
    #[must_use]
    pub fn classify(total_load: u32, session_count: u32) -> Self {
        if session_count < Self::MIN_SESSIONS || total_load < Self::MIN_LOAD {
            LoadStatus::Undertraining
        } else if total_load > Self::MAX_LOAD || session_count > Self::MAX_SESSIONS {
            LoadStatus::Overtraining
        } else {
            LoadStatus::Optimal
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyLoad {
    pub week_start: NaiveDate,
    pub strength_load: u32,
    /// Load of all activities except strength training.
    pub cardio_load: u32,
    pub total_load: u32,
    pub session_count: u32,
    pub status: LoadStatus,
}

#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(u64::from(
        date.weekday().num_days_from_monday(),
    )))
    .unwrap_or(date)
}

/// Aggregate the load of all activities per week, in chronological order.
///
/// Weeks without any activity are omitted.
#[must_use]
pub fn weekly_loads(activities: &[Activity]) -> Vec<WeeklyLoad> {
    let mut weeks: BTreeMap<NaiveDate, (u32, u32, u32)> = BTreeMap::new();

    for activity in activities {
        let (strength, cardio, sessions) = weeks.entry(week_start(activity.date)).or_default();
        if activity.kind == ActivityKind::Strength {
            *strength += activity.load();
        } else {
            *cardio += activity.load();
        }
        *sessions += 1;
    }

    weeks
        .into_iter()
        .map(|(week_start, (strength_load, cardio_load, session_count))| {
            let total_load = strength_load + cardio_load;
            WeeklyLoad {
                week_start,
                strength_load,
                cardio_load,
                total_load,
                session_count,
                status: LoadStatus::classify(total_load, session_count),
            }
        })
        .collect()
}

pub const ROLLING_WEEKS: usize = 4;

/// Average total load of the last four weeks in `weekly_loads`.
#[must_use]
pub fn rolling_average_load(weekly_loads: &[WeeklyLoad]) -> f32 {
    let recent = &weekly_loads[weekly_loads.len().saturating_sub(ROLLING_WEEKS)..];
    if recent.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let avg = recent.iter().map(|w| w.total_load).sum::<u32>() as f32 / recent.len() as f32;
    avg
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn activity(date: NaiveDate, kind: ActivityKind, duration: Option<f32>) -> Activity {
        Activity {
            id: 1.into(),
            date,
            kind,
            duration,
            distance: None,
            notes: String::new(),
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[rstest]
    #[case(ActivityKind::Strength, Some(60.0), 60)]
    #[case(ActivityKind::Cardio, Some(45.0), 36)]
    #[case(ActivityKind::Sport, Some(90.0), 63)]
    #[case(ActivityKind::Mobility, Some(25.0), 8)]
    #[case(ActivityKind::Custom, Some(50.0), 30)]
    #[case(ActivityKind::Strength, None, 30)]
    #[case(ActivityKind::Cardio, None, 24)]
    #[case(ActivityKind::Mobility, None, 9)]
    fn test_activity_load(
        #[case] kind: ActivityKind,
        #[case] duration: Option<f32>,
        #[case] expected: u32,
    ) {
        assert_eq!(activity(date(2024, 1, 1), kind, duration).load(), expected);
    }

    #[rstest]
    #[case::low_load(59, 5, LoadStatus::Undertraining)]
    #[case::single_session(301, 1, LoadStatus::Undertraining)]
    #[case::no_sessions(0, 0, LoadStatus::Undertraining)]
    #[case::optimal(150, 3, LoadStatus::Optimal)]
    #[case::lower_bound(60, 2, LoadStatus::Optimal)]
    #[case::upper_bound(300, 7, LoadStatus::Optimal)]
    #[case::high_load(301, 8, LoadStatus::Overtraining)]
    #[case::high_load_few_sessions(400, 3, LoadStatus::Overtraining)]
    #[case::many_sessions(200, 8, LoadStatus::Overtraining)]
    fn test_load_status_classify(
        #[case] total_load: u32,
        #[case] session_count: u32,
        #[case] expected: LoadStatus,
    ) {
        assert_eq!(LoadStatus::classify(total_load, session_count), expected);
    }

    #[rstest]
    #[case(date(2024, 1, 1), date(2024, 1, 1))]
    #[case(date(2024, 1, 3), date(2024, 1, 1))]
    #[case(date(2024, 1, 7), date(2024, 1, 1))]
    #[case(date(2024, 1, 8), date(2024, 1, 8))]
    #[case(date(2024, 3, 2), date(2024, 2, 26))]
    fn test_week_start(#[case] day: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(week_start(day), expected);
    }

    #[test]
    fn test_weekly_loads() {
        let activities = vec![
            activity(date(2024, 1, 10), ActivityKind::Cardio, Some(40.0)),
            activity(date(2024, 1, 1), ActivityKind::Strength, Some(60.0)),
            activity(date(2024, 1, 3), ActivityKind::Mobility, None),
            activity(date(2024, 1, 7), ActivityKind::Sport, Some(60.0)),
            activity(date(2024, 1, 4), ActivityKind::Strength, None),
        ];
        assert_eq!(
            weekly_loads(&activities),
            vec![
                WeeklyLoad {
                    week_start: date(2024, 1, 1),
                    strength_load: 90,
                    cardio_load: 51,
                    total_load: 141,
                    session_count: 4,
                    status: LoadStatus::Optimal,
                },
                WeeklyLoad {
                    week_start: date(2024, 1, 8),
                    strength_load: 0,
                    cardio_load: 32,
                    total_load: 32,
                    session_count: 1,
                    status: LoadStatus::Undertraining,
                },
            ]
        );
        assert_eq!(weekly_loads(&[]), vec![]);
    }

    #[rstest]
    #[case(&[], 0.0)]
    #[case(&[100], 100.0)]
    #[case(&[100, 200], 150.0)]
    #[case(&[1000, 100, 200, 300, 400], 250.0)]
    fn test_rolling_average_load(#[case] loads: &[u32], #[case] expected: f32) {
        let weekly_loads = loads
            .iter()
            .zip(0..)
            .map(|(total_load, week)| WeeklyLoad {
                week_start: date(2024, 1, 1) + Days::new(7 * week),
                strength_load: *total_load,
                cardio_load: 0,
                total_load: *total_load,
                session_count: 3,
                status: LoadStatus::classify(*total_load, 3),
            })
            .collect::<Vec<_>>();
        assert_eq!(rolling_average_load(&weekly_loads), expected);
    }
}

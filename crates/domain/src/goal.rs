use chrono::NaiveDate;

use crate::{
    Activity, ActivityService, BodyMetric, BodyMetricService, ExerciseID, ReadError, Set,
    SetService, week_start,
};

#[allow(async_fn_in_trait)]
pub trait GoalService: SetService + ActivityService + BodyMetricService {
    /// Progress toward `goal` on `today`, or `None` if there is no current value.
    async fn get_goal_progress(
        &self,
        goal: &Goal,
        today: NaiveDate,
    ) -> Result<Option<f32>, ReadError> {
        let sets = self.get_sets().await?;
        let activities = self.get_activities().await?;
        let body_metrics = self.get_body_metrics().await?;
        Ok(goal
            .current_value(&sets, &activities, &body_metrics, today)
            .map(|current| goal.progress(current)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalKind {
    BodyWeight,
    BodyFat,
    OneRepMax(ExerciseID),
    WeeklySessions,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goal {
    pub kind: GoalKind,
    pub start: f32,
    pub target: f32,
}

impl Goal {
    /// Fraction of the way from the start value to the target value, between 0 and 1.
    ///
    /// Targets below the start value (e.g. losing weight) are supported.
    #[must_use]
    pub fn progress(&self, current: f32) -> f32 {
        let distance = self.target - self.start;
        if distance.abs() < f32::EPSILON {
            return if (current - self.target).abs() < f32::EPSILON {
                1.0
            } else {
                0.0
            };
        }
        ((current - self.start) / distance).clamp(0.0, 1.0)
    }

    /// Current value of the goal's metric.
    ///
    /// Weekly sessions are counted for the week containing `today`.
    #[must_use]
    pub fn current_value(
        &self,
        sets: &[Set],
        activities: &[Activity],
        body_metrics: &[BodyMetric],
        today: NaiveDate,
    ) -> Option<f32> {
        match self.kind {
            GoalKind::BodyWeight => latest(body_metrics, |m| m.weight),
            GoalKind::BodyFat => latest(body_metrics, |m| m.body_fat),
            GoalKind::OneRepMax(exercise_id) => sets
                .iter()
                .filter(|s| s.exercise_id == exercise_id)
                .map(Set::one_rep_max)
                .filter(|v| *v > 0.0)
                .reduce(f32::max),
            GoalKind::WeeklySessions => {
                let week = week_start(today);
                #[allow(clippy::cast_precision_loss)]
                Some(
                    activities
                        .iter()
                        .filter(|a| week_start(a.date) == week && a.date <= today)
                        .count() as f32,
                )
            }
        }
    }
}

fn latest(body_metrics: &[BodyMetric], field: impl Fn(&BodyMetric) -> Option<f32>) -> Option<f32> {
    body_metrics
        .iter()
        .filter_map(|m| field(m).map(|v| (m.date, v)))
        .max_by_key(|(date, _)| *date)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::Days;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::ActivityKind;

    use super::*;

    fn day(d: u64) -> NaiveDate {
        // Monday
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(d)
    }

    #[rstest]
    #[case::gain_halfway(100.0, 120.0, 110.0, 0.5)]
    #[case::gain_reached(100.0, 120.0, 125.0, 1.0)]
    #[case::gain_regressed(100.0, 120.0, 95.0, 0.0)]
    #[case::loss_quarter(90.0, 82.0, 88.0, 0.25)]
    #[case::loss_reached(90.0, 82.0, 82.0, 1.0)]
    #[case::loss_regressed(90.0, 82.0, 91.0, 0.0)]
    #[case::no_distance_reached(80.0, 80.0, 80.0, 1.0)]
    #[case::no_distance_missed(80.0, 80.0, 81.0, 0.0)]
    fn test_goal_progress(
        #[case] start: f32,
        #[case] target: f32,
        #[case] current: f32,
        #[case] expected: f32,
    ) {
        let goal = Goal {
            kind: GoalKind::BodyWeight,
            start,
            target,
        };
        assert_approx_eq!(goal.progress(current), expected, 0.0001);
    }

    #[test]
    fn test_goal_current_value() {
        let sets = vec![
            Set {
                exercise_id: 1.into(),
                weight: Some(100.0),
                reps: Some(5),
                set_index: 0,
                date: day(0),
            },
            Set {
                exercise_id: 1.into(),
                weight: Some(110.0),
                reps: Some(1),
                set_index: 1,
                date: day(0),
            },
            Set {
                exercise_id: 2.into(),
                weight: Some(200.0),
                reps: Some(1),
                set_index: 0,
                date: day(0),
            },
        ];
        let activities = [0_u64, 2, 6, 7]
            .into_iter()
            .map(|d| Activity {
                id: u128::from(d).into(),
                date: day(d),
                kind: ActivityKind::Cardio,
                duration: None,
                distance: None,
                notes: String::new(),
            })
            .collect::<Vec<_>>();
        let body_metrics = vec![
            BodyMetric {
                date: day(4),
                weight: Some(80.0),
                ..BodyMetric::default()
            },
            BodyMetric {
                date: day(2),
                weight: Some(81.0),
                body_fat: Some(18.0),
                ..BodyMetric::default()
            },
        ];

        let value = |kind| {
            Goal {
                kind,
                start: 0.0,
                target: 1.0,
            }
            .current_value(&sets, &activities, &body_metrics, day(3))
        };

        assert_eq!(value(GoalKind::BodyWeight), Some(80.0));
        assert_eq!(value(GoalKind::BodyFat), Some(18.0));
        assert_eq!(value(GoalKind::OneRepMax(1.into())), Some(117.0));
        assert_eq!(value(GoalKind::OneRepMax(3.into())), None);
        assert_eq!(value(GoalKind::WeeklySessions), Some(2.0));
    }
}

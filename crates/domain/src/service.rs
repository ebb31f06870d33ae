use log::{debug, error};

use crate::{
    Activity, ActivityRepository, ActivityService, BodyMetric, BodyMetricRepository,
    BodyMetricService, ExerciseSummaryService, GoalService, Preferences, PreferencesRepository,
    PreferencesService, ReadError, ReportService, Set, SetRepository, SetService, UpdateError,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $error: ident, $action: literal, $entity: literal) => {{
        let result = $func.await;
        match result {
            Ok(_) => {}
            Err(ref err) => match err {
                $error::Storage(crate::StorageError::NoConnection) => {
                    debug!("failed to {} {}: {err}", $action, $entity);
                }
                _ => {
                    error!("failed to {} {}: {err}", $action, $entity);
                }
            },
        }
        result
    }};
}

impl<R: SetRepository> SetService for Service<R> {
    async fn get_sets(&self) -> Result<Vec<Set>, ReadError> {
        log_on_error!(self.repository.read_sets(), ReadError, "get", "sets")
    }
}

impl<R: ActivityRepository> ActivityService for Service<R> {
    async fn get_activities(&self) -> Result<Vec<Activity>, ReadError> {
        log_on_error!(
            self.repository.read_activities(),
            ReadError,
            "get",
            "activities"
        )
    }
}

impl<R: BodyMetricRepository> BodyMetricService for Service<R> {
    async fn get_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError> {
        log_on_error!(
            self.repository.read_body_metrics(),
            ReadError,
            "get",
            "body metrics"
        )
    }
}

impl<R: PreferencesRepository> PreferencesService for Service<R> {
    async fn get_preferences(&self) -> Result<Preferences, ReadError> {
        log_on_error!(
            self.repository.read_preferences(),
            ReadError,
            "get",
            "preferences"
        )
    }

    async fn set_preferences(&self, preferences: Preferences) -> Result<(), UpdateError> {
        log_on_error!(
            self.repository.write_preferences(preferences),
            UpdateError,
            "set",
            "preferences"
        )
    }
}

impl<R: SetRepository + PreferencesRepository> ExerciseSummaryService for Service<R> {}

impl<R: SetRepository + ActivityRepository + BodyMetricRepository> ReportService for Service<R> {}

impl<R: SetRepository + ActivityRepository + BodyMetricRepository> GoalService for Service<R> {}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::Mutex};

    use assert_approx_eq::assert_approx_eq;
    use chrono::{Days, NaiveDate};
    use pretty_assertions::assert_eq;

    use crate::{
        ActivityKind, EnergyExpenditure, ExerciseID, Goal, GoalKind, Sex, StorageError,
        TrendDirection,
    };

    use super::*;

    struct Repository {
        sets: Vec<Set>,
        activities: Vec<Activity>,
        body_metrics: Vec<BodyMetric>,
        preferences: Mutex<Preferences>,
        connected: bool,
    }

    impl Repository {
        fn check(&self) -> Result<(), StorageError> {
            if self.connected {
                Ok(())
            } else {
                Err(StorageError::NoConnection)
            }
        }
    }

    impl SetRepository for Repository {
        async fn read_sets(&self) -> Result<Vec<Set>, ReadError> {
            self.check()?;
            Ok(self.sets.clone())
        }
    }

    impl ActivityRepository for Repository {
        async fn read_activities(&self) -> Result<Vec<Activity>, ReadError> {
            self.check()?;
            Ok(self.activities.clone())
        }
    }

    impl BodyMetricRepository for Repository {
        async fn read_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError> {
            self.check()?;
            Ok(self.body_metrics.clone())
        }
    }

    impl PreferencesRepository for Repository {
        async fn read_preferences(&self) -> Result<Preferences, ReadError> {
            self.check()?;
            Ok(self.preferences.lock().unwrap().clone())
        }

        async fn write_preferences(&self, preferences: Preferences) -> Result<(), UpdateError> {
            self.check()?;
            *self.preferences.lock().unwrap() = preferences;
            Ok(())
        }
    }

    fn day(d: u64) -> NaiveDate {
        // Monday
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap() + Days::new(d)
    }

    fn set(exercise_id: u128, weight: f32, reps: u32, date: NaiveDate) -> Set {
        Set {
            exercise_id: exercise_id.into(),
            weight: Some(weight),
            reps: Some(reps),
            set_index: 0,
            date,
        }
    }

    fn repository(connected: bool) -> Repository {
        Repository {
            sets: vec![
                set(1, 100.0, 5, day(0)),
                set(2, 60.0, 10, day(0)),
                set(2, 60.0, 10, day(0)),
                set(1, 105.0, 5, day(9)),
            ],
            activities: vec![
                Activity {
                    id: 1.into(),
                    date: day(0),
                    kind: ActivityKind::Strength,
                    duration: Some(60.0),
                    distance: None,
                    notes: String::new(),
                },
                Activity {
                    id: 2.into(),
                    date: day(8),
                    kind: ActivityKind::Cardio,
                    duration: Some(30.0),
                    distance: Some(5.0),
                    notes: String::new(),
                },
                Activity {
                    id: 3.into(),
                    date: day(9),
                    kind: ActivityKind::Strength,
                    duration: None,
                    distance: None,
                    notes: String::new(),
                },
            ],
            body_metrics: vec![
                BodyMetric {
                    date: day(0),
                    weight: Some(81.0),
                    height: Some(180.0),
                    age: Some(30),
                    sex: Some(Sex::MALE),
                    ..BodyMetric::default()
                },
                BodyMetric {
                    date: day(7),
                    weight: Some(80.0),
                    steps: Some(10000),
                    ..BodyMetric::default()
                },
            ],
            preferences: Mutex::new(Preferences::default()),
            connected,
        }
    }

    #[tokio::test]
    async fn test_get_exercise_summaries() {
        let service = Service::new(repository(true));

        let summaries = service.get_exercise_summaries().await.unwrap();
        assert_eq!(
            summaries.iter().map(|s| s.exercise_id).collect::<Vec<_>>(),
            vec![ExerciseID::from(2), ExerciseID::from(1)]
        );

        service
            .set_exercise_tracked(1.into(), true)
            .await
            .unwrap();
        let summaries = service.get_exercise_summaries().await.unwrap();
        assert_eq!(
            summaries.iter().map(|s| s.exercise_id).collect::<Vec<_>>(),
            vec![ExerciseID::from(1), ExerciseID::from(2)]
        );

        let preferences = service
            .set_exercise_tracked(1.into(), false)
            .await
            .unwrap();
        assert_eq!(preferences, Preferences::default());
    }

    #[tokio::test]
    async fn test_get_weekly_loads() {
        let service = Service::new(repository(true));
        let loads = service.get_weekly_loads().await.unwrap();
        assert_eq!(
            loads.iter().map(|l| l.total_load).collect::<Vec<_>>(),
            vec![60, 54]
        );
        assert_approx_eq!(service.get_rolling_average_load().await.unwrap(), 57.0, 0.001);
    }

    #[tokio::test]
    async fn test_get_metabolism() {
        let service = Service::new(repository(true));
        let metabolism = service.get_metabolism(day(7), 300.0).await.unwrap();
        assert_eq!(
            metabolism.energy_expenditure,
            Some(EnergyExpenditure {
                bmr: 1780,
                workout_calories: 300,
                step_calories: 400,
                total: 2480,
            })
        );
        assert_eq!(
            metabolism.weight_trend.map(|t| t.direction),
            Some(TrendDirection::Losing)
        );
        assert!(!metabolism.weight_freshness.unwrap().is_stale());

        let metabolism = service.get_metabolism(day(30), 0.0).await.unwrap();
        assert!(metabolism.weight_freshness.unwrap().is_stale());
    }

    #[tokio::test]
    async fn test_get_weekly_report() {
        let service = Service::new(repository(true));
        let report = service
            .get_weekly_report(day(9), &BTreeMap::from([(1.into(), "Squat".to_string())]))
            .await
            .unwrap();
        assert_eq!(report.week_start, day(7));
        assert_eq!(report.workout_count, 2);
        assert_eq!(
            report
                .new_records
                .iter()
                .map(|r| (r.exercise_id, r.value))
                .collect::<Vec<_>>(),
            vec![(ExerciseID::from(1), 122.5)]
        );
        assert_eq!(
            report.text,
            format!(
                "You completed 2 workouts and burned an estimated {} kcal. \
                 Your weight is trending down by 1.0 kg per week. \
                 New personal record: Squat!",
                report.calories
            )
        );
    }

    #[tokio::test]
    async fn test_get_weekly_report_ignores_later_sets() {
        let mut repository = repository(true);
        repository.sets.push(set(1, 110.0, 5, day(14)));
        let service = Service::new(repository);
        let report = service
            .get_weekly_report(day(9), &BTreeMap::new())
            .await
            .unwrap();
        assert_eq!(
            report
                .new_records
                .iter()
                .map(|r| (r.exercise_id, r.value, r.date))
                .collect::<Vec<_>>(),
            vec![(ExerciseID::from(1), 122.5, day(9))]
        );
    }

    #[tokio::test]
    async fn test_get_goal_progress() {
        let service = Service::new(repository(true));
        let goal = Goal {
            kind: GoalKind::BodyWeight,
            start: 82.0,
            target: 78.0,
        };
        assert_eq!(
            service.get_goal_progress(&goal, day(9)).await.unwrap(),
            Some(0.5)
        );
        let goal = Goal {
            kind: GoalKind::OneRepMax(3.into()),
            start: 100.0,
            target: 120.0,
        };
        assert_eq!(service.get_goal_progress(&goal, day(9)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_no_connection() {
        let service = Service::new(repository(false));
        assert!(matches!(
            service.get_personal_records().await,
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
        assert!(matches!(
            service.get_composition().await,
            Err(ReadError::Storage(StorageError::NoConnection))
        ));
        assert!(matches!(
            service.set_preferences(Preferences::default()).await,
            Err(UpdateError::Storage(StorageError::NoConnection))
        ));
        assert!(service.get_weekly_report(day(0), &BTreeMap::new()).await.is_err());
    }
}

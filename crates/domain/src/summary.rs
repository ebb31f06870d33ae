use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};

use crate::{
    ActivityService, BodyMetricService, ExerciseID, PersonalRecord, Profile, ReadError,
    RecordKind, SetService, TrendDirection, WeightTrend, activity_calories, personal_records,
    week_start, weight_trend,
};

/// Number of record names listed before the list is cut off.
pub const MAX_LISTED_RECORDS: usize = 3;

/// Days of body weight history considered for the weight trend of a report.
pub const TREND_DAYS: u64 = 28;

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub workout_count: usize,
    pub calories: u32,
    pub weight_trend: Option<WeightTrend>,
    pub new_records: Vec<PersonalRecord>,
    pub text: String,
}

#[allow(async_fn_in_trait)]
pub trait ReportService: SetService + ActivityService + BodyMetricService {
    /// Summarize the week containing `today`.
    ///
    /// Data logged after `today` is ignored. New records are estimated 1RM records achieved
    /// during the week. Exercises missing in `exercise_names` are labeled with their ID.
    async fn get_weekly_report(
        &self,
        today: NaiveDate,
        exercise_names: &BTreeMap<ExerciseID, String>,
    ) -> Result<WeeklyReport, ReadError> {
        let sets = self
            .get_sets()
            .await?
            .into_iter()
            .filter(|s| s.date <= today)
            .collect::<Vec<_>>();
        let activities = self.get_activities().await?;
        let body_metrics = self
            .get_body_metrics()
            .await?
            .into_iter()
            .filter(|m| m.date <= today)
            .collect::<Vec<_>>();

        let week_start = week_start(today);
        let in_week = |date: NaiveDate| week_start <= date && date <= today;

        let body_weight = Profile::latest(&body_metrics).weight.unwrap_or_default();
        let workouts = activities
            .iter()
            .filter(|a| in_week(a.date))
            .collect::<Vec<_>>();
        let calories = workouts
            .iter()
            .map(|a| activity_calories(a, &sets, body_weight).calories)
            .sum::<u32>();

        let trend_start = today.checked_sub_days(Days::new(TREND_DAYS)).unwrap_or(today);
        let recent_body_metrics = body_metrics
            .into_iter()
            .filter(|m| trend_start <= m.date)
            .collect::<Vec<_>>();
        let weight_trend = weight_trend(&recent_body_metrics);

        let new_records = personal_records(&sets)
            .into_iter()
            .filter(|r| r.kind == RecordKind::EstimatedOneRepMax && in_week(r.date))
            .collect::<Vec<_>>();
        let labels = new_records
            .iter()
            .map(|r| {
                exercise_names
                    .get(&r.exercise_id)
                    .cloned()
                    .unwrap_or_else(|| r.exercise_id.to_string())
            })
            .collect::<Vec<_>>();

        Ok(WeeklyReport {
            week_start,
            workout_count: workouts.len(),
            calories,
            weight_trend,
            text: narrative(workouts.len(), calories, weight_trend.as_ref(), &labels),
            new_records,
        })
    }
}

/// Describe a week of training in one to three sentences.
///
/// The text is built from fixed templates, so identical inputs always produce identical output.
#[must_use]
pub fn narrative<S: AsRef<str>>(
    workout_count: usize,
    total_calories: u32,
    weight_trend: Option<&WeightTrend>,
    new_records: &[S],
) -> String {
    let mut sentences = vec![workout_sentence(workout_count, total_calories)];

    if let Some(trend) = weight_trend {
        sentences.push(trend_sentence(trend));
    }

    if let Some(sentence) = records_sentence(new_records) {
        sentences.push(sentence);
    }

    sentences.join(" ")
}

fn workout_sentence(workout_count: usize, total_calories: u32) -> String {
    match workout_count {
        0 => "No workouts logged yet this week.".to_string(),
        1 => format!("You completed 1 workout and burned an estimated {total_calories} kcal."),
        n => format!("You completed {n} workouts and burned an estimated {total_calories} kcal."),
    }
}

fn trend_sentence(trend: &WeightTrend) -> String {
    match trend.direction {
        TrendDirection::Losing => format!(
            "Your weight is trending down by {:.1} kg per week.",
            trend.rate.abs()
        ),
        TrendDirection::Gaining => format!(
            "Your weight is trending up by {:.1} kg per week.",
            trend.rate.abs()
        ),
        TrendDirection::Stable => "Your weight is holding steady.".to_string(),
    }
}

fn records_sentence<S: AsRef<str>>(new_records: &[S]) -> Option<String> {
    match new_records {
        [] => None,
        [record] => Some(format!("New personal record: {}!", record.as_ref())),
        records => {
            let listed = records
                .iter()
                .take(MAX_LISTED_RECORDS)
                .map(|record| record.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            let end = if records.len() > MAX_LISTED_RECORDS {
                "…"
            } else {
                "!"
            };
            Some(format!("New personal records: {listed}{end}"))
        }
    }
}

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::{BodyMetric, ExerciseID, PreferencesService, ReadError, Set, SetService, epley};

#[allow(async_fn_in_trait)]
pub trait ExerciseSummaryService: SetService + PreferencesService {
    /// Exercise summaries with tracked exercises first.
    async fn get_exercise_summaries(&self) -> Result<Vec<ExerciseSummary>, ReadError> {
        let summaries = exercise_summaries(&self.get_sets().await?);
        Ok(self.get_preferences().await?.order_summaries(summaries))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSummary {
    pub exercise_id: ExerciseID,
    pub total_volume: f32,
    pub max_weight: f32,
    pub estimated_one_rep_max: f32,
    pub set_count: usize,
    pub last_date: NaiveDate,
}

/// Summarize the sets of each exercise.
///
/// The result is sorted by total volume in descending order. Exercises with equal volume
/// keep the order in which they first appear in `sets`.
#[must_use]
pub fn exercise_summaries(sets: &[Set]) -> Vec<ExerciseSummary> {
    let mut summaries: Vec<ExerciseSummary> = vec![];

    for set in sets {
        let index = if let Some(index) = summaries
            .iter()
            .position(|s| s.exercise_id == set.exercise_id)
        {
            index
        } else {
            summaries.push(ExerciseSummary {
                exercise_id: set.exercise_id,
                total_volume: 0.0,
                max_weight: 0.0,
                estimated_one_rep_max: 0.0,
                set_count: 0,
                last_date: set.date,
            });
            summaries.len() - 1
        };
        let summary = &mut summaries[index];
        summary.total_volume += set.volume();
        summary.max_weight = summary.max_weight.max(set.weight.unwrap_or_default());
        summary.estimated_one_rep_max = summary.estimated_one_rep_max.max(set.one_rep_max());
        summary.set_count += 1;
        summary.last_date = summary.last_date.max(set.date);
    }

    summaries.sort_by(|a, b| b.total_volume.total_cmp(&a.total_volume));
    summaries
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    MaxWeight,
    EstimatedOneRepMax,
    MaxReps,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub exercise_id: ExerciseID,
    pub kind: RecordKind,
    pub value: f32,
    pub weight: f32,
    pub reps: u32,
    pub date: NaiveDate,
}

/// Determine the best set of each exercise for every record kind.
///
/// The records of one exercise may originate from different sets. On equal values the
/// earlier date wins, then the lower set index, then the earlier position in `sets`.
#[must_use]
pub fn personal_records(sets: &[Set]) -> Vec<PersonalRecord> {
    let mut exercises: Vec<ExerciseID> = vec![];
    let mut best: BTreeMap<(ExerciseID, RecordKind), (f32, &Set)> = BTreeMap::new();

    for set in sets {
        if !exercises.contains(&set.exercise_id) {
            exercises.push(set.exercise_id);
        }
        for (kind, value) in record_values(set) {
            best.entry((set.exercise_id, kind))
                .and_modify(|(best_value, best_set)| {
                    if supersedes(value, set, *best_value, best_set) {
                        *best_value = value;
                        *best_set = set;
                    }
                })
                .or_insert((value, set));
        }
    }

    exercises
        .into_iter()
        .flat_map(|exercise_id| {
            [
                RecordKind::MaxWeight,
                RecordKind::EstimatedOneRepMax,
                RecordKind::MaxReps,
            ]
            .into_iter()
            .filter_map(|kind| {
                best.get(&(exercise_id, kind))
                    .map(|(value, set)| PersonalRecord {
                        exercise_id,
                        kind,
                        value: *value,
                        weight: set.weight.unwrap_or_default(),
                        reps: set.reps.unwrap_or_default(),
                        date: set.date,
                    })
            })
            .collect::<Vec<_>>()
        })
        .collect()
}

fn record_values(set: &Set) -> Vec<(RecordKind, f32)> {
    let mut values = vec![];
    if let Some(weight) = set.weight {
        if weight > 0.0 {
            values.push((RecordKind::MaxWeight, weight));
        }
        if let Some(reps) = set.reps {
            if reps > 0 {
                if weight > 0.0 {
                    values.push((RecordKind::EstimatedOneRepMax, epley(weight, reps)));
                }
                #[allow(clippy::cast_precision_loss)]
                values.push((RecordKind::MaxReps, reps as f32));
            }
        }
    }
    values
}

fn supersedes(value: f32, set: &Set, best_value: f32, best_set: &Set) -> bool {
    value > best_value
        || (value == best_value
            && (set.date, set.set_index) < (best_set.date, best_set.set_index))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BodyRecordKind {
    Weight,
    Waist,
    BodyFat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyRecord {
    pub kind: BodyRecordKind,
    pub value: f32,
    pub date: NaiveDate,
}

/// Determine the lowest recorded weight, waist and body fat.
#[must_use]
pub fn body_records(body_metrics: &[BodyMetric]) -> Vec<BodyRecord> {
    let fields: [(BodyRecordKind, fn(&BodyMetric) -> Option<f32>); 3] = [
        (BodyRecordKind::Weight, |m| m.weight),
        (BodyRecordKind::Waist, |m| m.waist),
        (BodyRecordKind::BodyFat, |m| m.body_fat),
    ];
    fields
        .into_iter()
        .filter_map(|(kind, field)| {
            body_metrics
                .iter()
                .filter_map(|m| field(m).filter(|v| *v > 0.0).map(|v| (v, m.date)))
                .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
                .map(|(value, date)| BodyRecord { kind, value, date })
        })
        .collect()
}

pub const PLATEAU_MIN_SETS: usize = 6;
pub const PLATEAU_SESSIONS: usize = 3;
pub const PLATEAU_THRESHOLD: f32 = 0.03;

/// Check whether the estimated 1RM of an exercise stopped improving.
///
/// The best estimate of each of the last three training days is compared. A spread of
/// less than 3 % of the maximum is considered a plateau.
#[must_use]
pub fn is_plateau(sets: &[Set], exercise_id: ExerciseID) -> bool {
    let sets = sets
        .iter()
        .filter(|s| s.exercise_id == exercise_id && s.is_weighted())
        .collect::<Vec<_>>();

    if sets.len() < PLATEAU_MIN_SETS {
        return false;
    }

    let mut best_per_day: BTreeMap<NaiveDate, f32> = BTreeMap::new();
    for set in sets {
        let estimate = epley(set.weight.unwrap_or_default(), set.reps.unwrap_or_default());
        best_per_day
            .entry(set.date)
            .and_modify(|best| *best = best.max(estimate))
            .or_insert(estimate);
    }

    if best_per_day.len() < PLATEAU_SESSIONS {
        return false;
    }

    let recent = best_per_day
        .values()
        .rev()
        .take(PLATEAU_SESSIONS)
        .copied()
        .collect::<Vec<_>>();
    let max = recent.iter().copied().fold(f32::MIN, f32::max);
    let min = recent.iter().copied().fold(f32::MAX, f32::min);

    max > 0.0 && (max - min) / max < PLATEAU_THRESHOLD
}

#[must_use]
pub fn plateaued_exercises(sets: &[Set]) -> BTreeSet<ExerciseID> {
    sets.iter()
        .map(|s| s.exercise_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|exercise_id| is_plateau(sets, *exercise_id))
        .collect()
}

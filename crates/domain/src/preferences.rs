use std::collections::BTreeSet;

use crate::{ExerciseID, ExerciseSummary, ReadError, UpdateError};

#[allow(async_fn_in_trait)]
pub trait PreferencesService {
    async fn get_preferences(&self) -> Result<Preferences, ReadError>;
    async fn set_preferences(&self, preferences: Preferences) -> Result<(), UpdateError>;

    async fn set_exercise_tracked(
        &self,
        exercise_id: ExerciseID,
        tracked: bool,
    ) -> Result<Preferences, UpdateError> {
        let mut preferences = self.get_preferences().await?;
        if tracked {
            preferences.tracked_exercises.insert(exercise_id);
        } else {
            preferences.tracked_exercises.remove(&exercise_id);
        }
        self.set_preferences(preferences.clone()).await?;
        Ok(preferences)
    }
}

#[allow(async_fn_in_trait)]
pub trait PreferencesRepository {
    async fn read_preferences(&self) -> Result<Preferences, ReadError>;
    async fn write_preferences(&self, preferences: Preferences) -> Result<(), UpdateError>;
}

/// User choices that affect presentation only, never the calculated values.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Preferences {
    pub tracked_exercises: BTreeSet<ExerciseID>,
}

impl Preferences {
    #[must_use]
    pub fn is_tracked(&self, exercise_id: ExerciseID) -> bool {
        self.tracked_exercises.contains(&exercise_id)
    }

    /// Move the summaries of tracked exercises to the front, keeping the order otherwise.
    #[must_use]
    pub fn order_summaries(&self, mut summaries: Vec<ExerciseSummary>) -> Vec<ExerciseSummary> {
        summaries.sort_by_key(|s| !self.is_tracked(s.exercise_id));
        summaries
    }
}

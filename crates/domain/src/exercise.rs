use std::collections::BTreeSet;

use chrono::NaiveDate;
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{PersonalRecord, ReadError, one_rep_max, personal_records, plateaued_exercises};

#[allow(async_fn_in_trait)]
pub trait SetService {
    async fn get_sets(&self) -> Result<Vec<Set>, ReadError>;

    async fn get_personal_records(&self) -> Result<Vec<PersonalRecord>, ReadError> {
        Ok(personal_records(&self.get_sets().await?))
    }

    async fn get_plateaued_exercises(&self) -> Result<BTreeSet<ExerciseID>, ReadError> {
        Ok(plateaued_exercises(&self.get_sets().await?))
    }
}

#[allow(async_fn_in_trait)]
pub trait SetRepository {
    async fn read_sets(&self) -> Result<Vec<Set>, ReadError>;
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(Uuid);

impl ExerciseID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for ExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ExerciseID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// A single logged set of a strength exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct Set {
    pub exercise_id: ExerciseID,
    pub weight: Option<f32>,
    pub reps: Option<u32>,
    pub set_index: u32,
    pub date: NaiveDate,
}

impl Set {
    /// Weight times reps, or zero if either is missing.
    #[must_use]
    pub fn volume(&self) -> f32 {
        match (self.weight, self.reps) {
            #[allow(clippy::cast_precision_loss)]
            (Some(weight), Some(reps)) => weight * reps as f32,
            _ => 0.0,
        }
    }

    #[must_use]
    pub fn one_rep_max(&self) -> f32 {
        match (self.weight, self.reps) {
            (Some(weight), Some(reps)) => one_rep_max(weight, reps),
            _ => 0.0,
        }
    }

    /// Whether the set carries a usable weight and rep count for strength estimates.
    #[must_use]
    pub fn is_weighted(&self) -> bool {
        self.weight.is_some_and(|w| w > 0.0) && self.reps.is_some_and(|r| r > 0)
    }
}

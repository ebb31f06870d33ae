use chrono::NaiveDate;
use derive_more::{Deref, Display};
use uuid::Uuid;

use crate::{ReadError, WeeklyLoad, rolling_average_load, weekly_loads};

#[allow(async_fn_in_trait)]
pub trait ActivityService {
    async fn get_activities(&self) -> Result<Vec<Activity>, ReadError>;

    async fn get_weekly_loads(&self) -> Result<Vec<WeeklyLoad>, ReadError> {
        Ok(weekly_loads(&self.get_activities().await?))
    }

    async fn get_rolling_average_load(&self) -> Result<f32, ReadError> {
        Ok(rolling_average_load(&self.get_weekly_loads().await?))
    }
}

#[allow(async_fn_in_trait)]
pub trait ActivityRepository {
    async fn read_activities(&self) -> Result<Vec<Activity>, ReadError>;
}

#[derive(Deref, Display, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ActivityID(Uuid);

impl ActivityID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl From<Uuid> for ActivityID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for ActivityID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::AsRefStr,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ActivityKind {
    Strength,
    Cardio,
    Sport,
    Mobility,
    Custom,
}

/// A logged workout session.
#[derive(Debug, Clone, PartialEq)]
pub struct Activity {
    pub id: ActivityID,
    pub date: NaiveDate,
    pub kind: ActivityKind,
    /// Minutes
    pub duration: Option<f32>,
    /// Kilometres
    pub distance: Option<f32>,
    pub notes: String,
}

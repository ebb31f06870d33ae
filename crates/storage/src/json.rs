use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Mutex,
};

use chrono::NaiveDate;
use fitlog_domain::{self as domain, ReadError, StorageError, UpdateError};
use log::{debug, warn};
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed to access snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<Error> for StorageError {
    fn from(value: Error) -> Self {
        StorageError::Other(Box::new(value))
    }
}

/// Exported training log held in memory.
///
/// Only the preferences can be changed. If the snapshot was opened from a file, changed
/// preferences are written back to that file and kept in memory only if the write succeeds.
pub struct Storage {
    path: Option<PathBuf>,
    sets: Vec<domain::Set>,
    activities: Vec<domain::Activity>,
    body_metrics: Vec<domain::BodyMetric>,
    preferences: Mutex<domain::Preferences>,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut storage = Self::from_json(&fs::read_to_string(path)?)?;
        storage.path = Some(path.to_path_buf());
        debug!("opened snapshot {}", path.display());
        Ok(storage)
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        debug!(
            "loaded {} sets, {} activities and {} body metrics",
            snapshot.sets.len(),
            snapshot.activities.len(),
            snapshot.body_metrics.len()
        );
        Ok(Self {
            path: None,
            sets: snapshot.sets.into_iter().map(domain::Set::from).collect(),
            activities: snapshot
                .activities
                .into_iter()
                .map(domain::Activity::from)
                .collect(),
            body_metrics: snapshot
                .body_metrics
                .into_iter()
                .map(domain::BodyMetric::from)
                .collect(),
            preferences: Mutex::new(snapshot.preferences.into()),
        })
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        self.snapshot_json(&*self.lock_preferences()?)
    }

    fn snapshot_json(&self, preferences: &domain::Preferences) -> Result<String, StorageError> {
        let snapshot = Snapshot {
            sets: self.sets.iter().map(Set::from).collect(),
            activities: self.activities.iter().map(Activity::from).collect(),
            body_metrics: self.body_metrics.iter().map(BodyMetric::from).collect(),
            preferences: Preferences::from(preferences),
        };
        serde_json::to_string_pretty(&snapshot).map_err(|err| Error::from(err).into())
    }

    fn lock_preferences(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, domain::Preferences>, StorageError> {
        self.preferences
            .lock()
            .map_err(|err| StorageError::Other(err.to_string().into()))
    }

    fn persist(&self, preferences: &domain::Preferences) -> Result<(), StorageError> {
        if let Some(path) = &self.path {
            fs::write(path, self.snapshot_json(preferences)?).map_err(Error::from)?;
            debug!("wrote snapshot {}", path.display());
        }
        Ok(())
    }
}

impl domain::SetRepository for Storage {
    async fn read_sets(&self) -> Result<Vec<domain::Set>, ReadError> {
        Ok(self.sets.clone())
    }
}

impl domain::ActivityRepository for Storage {
    async fn read_activities(&self) -> Result<Vec<domain::Activity>, ReadError> {
        Ok(self.activities.clone())
    }
}

impl domain::BodyMetricRepository for Storage {
    async fn read_body_metrics(&self) -> Result<Vec<domain::BodyMetric>, ReadError> {
        Ok(self.body_metrics.clone())
    }
}

impl domain::PreferencesRepository for Storage {
    async fn read_preferences(&self) -> Result<domain::Preferences, ReadError> {
        Ok(self.lock_preferences()?.clone())
    }

    async fn write_preferences(&self, preferences: domain::Preferences) -> Result<(), UpdateError> {
        let mut current = self.lock_preferences()?;
        self.persist(&preferences)?;
        *current = preferences;
        Ok(())
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
struct Snapshot {
    sets: Vec<Set>,
    activities: Vec<Activity>,
    body_metrics: Vec<BodyMetric>,
    preferences: Preferences,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
struct Set {
    exercise_id: Uuid,
    weight: Option<f32>,
    reps: Option<u32>,
    #[serde(default)]
    set_index: u32,
    date: NaiveDate,
}

impl From<&domain::Set> for Set {
    fn from(value: &domain::Set) -> Self {
        Self {
            exercise_id: *value.exercise_id,
            weight: value.weight,
            reps: value.reps,
            set_index: value.set_index,
            date: value.date,
        }
    }
}

impl From<Set> for domain::Set {
    fn from(value: Set) -> Self {
        Self {
            exercise_id: value.exercise_id.into(),
            weight: value.weight,
            reps: value.reps,
            set_index: value.set_index,
            date: value.date,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
struct Activity {
    id: Uuid,
    date: NaiveDate,
    kind: String,
    duration: Option<f32>,
    distance: Option<f32>,
    #[serde(default)]
    notes: String,
}

impl From<&domain::Activity> for Activity {
    fn from(value: &domain::Activity) -> Self {
        Self {
            id: *value.id,
            date: value.date,
            kind: value.kind.to_string(),
            duration: value.duration,
            distance: value.distance,
            notes: value.notes.clone(),
        }
    }
}

impl From<Activity> for domain::Activity {
    fn from(value: Activity) -> Self {
        let kind = domain::ActivityKind::from_str(&value.kind).unwrap_or_else(|_| {
            warn!("unknown activity kind \"{}\"", value.kind);
            domain::ActivityKind::Custom
        });
        Self {
            id: value.id.into(),
            date: value.date,
            kind,
            duration: value.duration,
            distance: value.distance,
            notes: value.notes,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
struct BodyMetric {
    date: NaiveDate,
    weight: Option<f32>,
    waist: Option<f32>,
    body_fat: Option<f32>,
    height: Option<f32>,
    age: Option<u32>,
    sex: Option<String>,
    steps: Option<u32>,
}

impl From<&domain::BodyMetric> for BodyMetric {
    fn from(value: &domain::BodyMetric) -> Self {
        Self {
            date: value.date,
            weight: value.weight,
            waist: value.waist,
            body_fat: value.body_fat,
            height: value.height,
            age: value.age,
            sex: value.sex.map(|sex| sex.to_string()),
            steps: value.steps,
        }
    }
}

impl From<BodyMetric> for domain::BodyMetric {
    fn from(value: BodyMetric) -> Self {
        Self {
            date: value.date,
            weight: value.weight,
            waist: value.waist,
            body_fat: value.body_fat,
            height: value.height,
            age: value.age,
            sex: value.sex.as_deref().map(|sex| {
                if !matches!(sex, "female" | "male") {
                    warn!("unknown sex \"{sex}\"");
                }
                domain::Sex::from(sex)
            }),
            steps: value.steps,
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq)]
struct Preferences {
    #[serde(default)]
    tracked_exercises: Vec<Uuid>,
}

impl From<&domain::Preferences> for Preferences {
    fn from(value: &domain::Preferences) -> Self {
        Self {
            tracked_exercises: value.tracked_exercises.iter().map(|id| **id).collect(),
        }
    }
}

impl From<Preferences> for domain::Preferences {
    fn from(value: Preferences) -> Self {
        Self {
            tracked_exercises: value
                .tracked_exercises
                .into_iter()
                .map(domain::ExerciseID::from)
                .collect(),
        }
    }
}

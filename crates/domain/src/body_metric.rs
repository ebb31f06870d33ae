use std::fmt;

use chrono::NaiveDate;
use log::debug;

use crate::{
    BodyRecord, CompositionAnalysis, Metabolism, Profile, ReadError, WeightFreshness,
    analyze_composition, body_records, tdee, weight_freshness, weight_trend,
};

#[allow(async_fn_in_trait)]
pub trait BodyMetricService {
    async fn get_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError>;

    async fn get_body_records(&self) -> Result<Vec<BodyRecord>, ReadError> {
        Ok(body_records(&self.get_body_metrics().await?))
    }

    async fn get_composition(&self) -> Result<CompositionAnalysis, ReadError> {
        Ok(analyze_composition(&self.get_body_metrics().await?))
    }

    /// Energy expenditure on `today`, based on the latest profile and the steps logged on that day.
    async fn get_metabolism(
        &self,
        today: NaiveDate,
        workout_calories: f32,
    ) -> Result<Metabolism, ReadError> {
        let body_metrics = self.get_body_metrics().await?;
        let profile = Profile::latest(&body_metrics);
        let steps = body_metrics
            .iter()
            .find(|m| m.date == today)
            .and_then(|m| m.steps)
            .unwrap_or_default();
        let weight_freshness = weight_freshness(&body_metrics, today);

        if let Some(warning) = weight_freshness.as_ref().and_then(WeightFreshness::warning) {
            debug!("{warning}");
        }

        Ok(Metabolism {
            profile,
            energy_expenditure: profile.bmr().map(|bmr| tdee(bmr, workout_calories, steps)),
            weight_trend: weight_trend(&body_metrics),
            weight_freshness,
        })
    }
}

#[allow(async_fn_in_trait)]
pub trait BodyMetricRepository {
    async fn read_body_metrics(&self) -> Result<Vec<BodyMetric>, ReadError>;
}

/// A day's body measurements. At most one row exists per day.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BodyMetric {
    pub date: NaiveDate,
    /// Kilograms
    pub weight: Option<f32>,
    /// Centimetres
    pub waist: Option<f32>,
    /// Percent
    pub body_fat: Option<f32>,
    /// Centimetres
    pub height: Option<f32>,
    /// Years
    pub age: Option<u32>,
    pub sex: Option<Sex>,
    pub steps: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    FEMALE,
    MALE,
}

impl From<&str> for Sex {
    fn from(value: &str) -> Self {
        match value {
            "female" => Sex::FEMALE,
            _ => Sex::MALE,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Sex::FEMALE => "female",
                Sex::MALE => "male",
            }
        )
    }
}

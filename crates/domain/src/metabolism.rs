use chrono::NaiveDate;

use crate::{BodyMetric, Sex};

#[derive(Debug, Clone, PartialEq)]
pub struct Metabolism {
    pub profile: Profile,
    pub energy_expenditure: Option<EnergyExpenditure>,
    pub weight_trend: Option<WeightTrend>,
    pub weight_freshness: Option<WeightFreshness>,
}

/// Body measurements needed to estimate the basal metabolic rate.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Profile {
    pub weight: Option<f32>,
    pub height: Option<f32>,
    pub age: Option<u32>,
    pub sex: Option<Sex>,
}

impl Profile {
    /// Collect the most recent value of each field.
    ///
    /// The fields change rarely and are often not recorded together, so they may originate from
    /// different measurements.
    #[must_use]
    pub fn latest(body_metrics: &[BodyMetric]) -> Self {
        let mut sorted = body_metrics.iter().collect::<Vec<_>>();
        sorted.sort_by_key(|m| std::cmp::Reverse(m.date));
        Self {
            weight: sorted.iter().find_map(|m| m.weight),
            height: sorted.iter().find_map(|m| m.height),
            age: sorted.iter().find_map(|m| m.age),
            sex: sorted.iter().find_map(|m| m.sex),
        }
    }

    #[must_use]
    pub fn bmr(&self) -> Option<i32> {
        Some(bmr(self.weight?, self.height?, self.age?, self.sex?))
    }
}

/// Basal metabolic rate in kcal per day (Mifflin-St Jeor).
#[must_use]
pub fn bmr(weight: f32, height: f32, age: u32, sex: Sex) -> i32 {
    #[allow(clippy::cast_precision_loss)]
    let base = 10.0 * weight + 6.25 * height - 5.0 * age as f32;
    let offset = match sex {
        Sex::MALE => 5.0,
        Sex::FEMALE => -161.0,
    };
    #[allow(clippy::cast_possible_truncation)]
    let result = (base + offset).round() as i32;
    result
}

pub const KCAL_PER_STEP: f32 = 0.04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergyExpenditure {
    pub bmr: i32,
    pub workout_calories: i32,
    pub step_calories: i32,
    pub total: i32,
}

/// Total daily energy expenditure in kcal.
///
/// No activity factor is applied to the BMR. All activity must be passed explicitly, so that
/// workouts are not counted twice.
#[must_use]
pub fn tdee(bmr: i32, workout_calories: f32, steps: u32) -> EnergyExpenditure {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let (workout_calories, step_calories) = (
        workout_calories.round() as i32,
        (steps as f32 * KCAL_PER_STEP).round() as i32,
    );
    EnergyExpenditure {
        bmr,
        workout_calories,
        step_calories,
        total: bmr + workout_calories + step_calories,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum TrendDirection {
    Losing,
    Stable,
    Gaining,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightTrend {
    /// Kilograms per week
    pub rate: f32,
    pub direction: TrendDirection,
    /// Estimated daily energy surplus (positive) or deficit (negative) in kcal
    pub energy_balance: i32,
}

impl WeightTrend {
    pub const MIN_DAYS: i64 = 3;
    /// Weekly change in kg below which the weight is considered stable.
    pub const STABLE_RATE: f32 = 0.1;
    pub const KCAL_PER_KG: f32 = 7700.0;
}

/// Derive the weight trend from the first and the last weight measurement.
///
/// `None` is returned if there are fewer than two measurements or if they are less than three
/// days apart.
#[must_use]
pub fn weight_trend(body_metrics: &[BodyMetric]) -> Option<WeightTrend> {
    let mut points = body_metrics
        .iter()
        .filter_map(|m| m.weight.filter(|w| *w > 0.0).map(|w| (m.date, w)))
        .collect::<Vec<_>>();
    points.sort_by_key(|(date, _)| *date);

    let (first_date, first_weight) = *points.first()?;
    let (last_date, last_weight) = *points.last()?;
    let span = (last_date - first_date).num_days();

    if points.len() < 2 || span < WeightTrend::MIN_DAYS {
        return None;
    }

    let change = last_weight - first_weight;
    #[allow(clippy::cast_precision_loss)]
    let span = span as f32;
    let rate = change * 7.0 / span;

    let direction = if rate.abs() < WeightTrend::STABLE_RATE {
        TrendDirection::Stable
    } else if rate < 0.0 {
        TrendDirection::Losing
    } else {
        TrendDirection::Gaining
    };

    #[allow(clippy::cast_possible_truncation)]
    let energy_balance = (change * WeightTrend::KCAL_PER_KG / span).round() as i32;

    Some(WeightTrend {
        rate,
        direction,
        energy_balance,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Freshness {
    Fresh,
    Aging,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightFreshness {
    pub last_date: NaiveDate,
    pub days_since: i64,
    pub freshness: Freshness,
}

impl WeightFreshness {
    pub const AGING_DAYS: i64 = 7;
    pub const STALE_DAYS: i64 = 14;

    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.freshness == Freshness::Stale
    }

    #[must_use]
    pub fn warning(&self) -> Option<String> {
        match self.freshness {
            Freshness::Fresh => None,
            Freshness::Aging => Some(format!(
                "Last weight logged {} days ago, consider updating",
                self.days_since
            )),
            Freshness::Stale => Some(format!(
                "Last weight logged {} days ago, estimates may be inaccurate",
                self.days_since
            )),
        }
    }
}

/// Determine how old the latest weight measurement is on `today`.
#[must_use]
pub fn weight_freshness(body_metrics: &[BodyMetric], today: NaiveDate) -> Option<WeightFreshness> {
    let last_date = body_metrics
        .iter()
        .filter(|m| m.weight.is_some_and(|w| w > 0.0))
        .map(|m| m.date)
        .max()?;
    let days_since = (today - last_date).num_days();
    let freshness = if days_since > WeightFreshness::STALE_DAYS {
        Freshness::Stale
    } else if days_since > WeightFreshness::AGING_DAYS {
        Freshness::Aging
    } else {
        Freshness::Fresh
    };
    Some(WeightFreshness {
        last_date,
        days_since,
        freshness,
    })
}

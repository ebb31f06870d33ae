use crate::BodyMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CompositionTrend {
    Bulking,
    Cutting,
    Recomping,
    Maintaining,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositionAnalysis {
    pub trend: CompositionTrend,
    /// Kilograms, observed over the whole period
    pub weight_change: f32,
    /// Percentage points, observed over the whole period
    pub body_fat_change: f32,
    pub period_days: i64,
}

impl CompositionAnalysis {
    /// Monthly weight change in kg above which a trend is considered significant.
    pub const WEIGHT_RATE: f32 = 0.5;
    /// Monthly body fat change in percentage points above which a trend is considered significant.
    pub const BODY_FAT_RATE: f32 = 0.3;
    pub const NORMALIZATION_DAYS: f32 = 30.0;

    fn insufficient_data() -> Self {
        Self {
            trend: CompositionTrend::InsufficientData,
            weight_change: 0.0,
            body_fat_change: 0.0,
            period_days: 0,
        }
    }
}

/// Classify the change of weight and body fat between the first and the last measurement.
///
/// The classification is based on the changes scaled to a 30 day period. The reported changes
/// are the unscaled ones.
#[must_use]
pub fn analyze_composition(body_metrics: &[BodyMetric]) -> CompositionAnalysis {
    let mut sorted = body_metrics.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|m| m.date);

    if sorted.len() < 2 {
        return CompositionAnalysis::insufficient_data();
    }

    let first = sorted[0];
    let last = sorted[sorted.len() - 1];

    let weight_change = last.weight.unwrap_or_default() - first.weight.unwrap_or_default();
    let body_fat_change = last.body_fat.unwrap_or_default() - first.body_fat.unwrap_or_default();
    let period_days = (last.date - first.date).num_days().max(1);

    #[allow(clippy::cast_precision_loss)]
    let scale = CompositionAnalysis::NORMALIZATION_DAYS / period_days as f32;

    CompositionAnalysis {
        trend: classify(weight_change * scale, body_fat_change * scale),
        weight_change: round_to_tenth(weight_change),
        body_fat_change: round_to_tenth(body_fat_change),
        period_days,
    }
}

fn classify(weight_rate: f32, body_fat_rate: f32) -> CompositionTrend {
    let w = CompositionAnalysis::WEIGHT_RATE;
    let bf = CompositionAnalysis::BODY_FAT_RATE;

    if weight_rate > w && body_fat_rate < bf {
        CompositionTrend::Bulking
    } else if weight_rate < -w && body_fat_rate < -bf {
        CompositionTrend::Cutting
    } else if weight_rate.abs() < w && body_fat_rate < -bf {
        CompositionTrend::Recomping
    } else {
        CompositionTrend::Maintaining
    }
}

fn round_to_tenth(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

use crate::{Activity, ActivityKind, Set};

/// Estimate the one-repetition maximum using the Epley formula.
///
/// The result is not rounded. Zero is returned if either weight or reps is zero,
/// which callers must treat as "no estimate".
#[must_use]
pub fn epley(weight: f32, reps: u32) -> f32 {
    if weight <= 0.0 || reps == 0 {
        return 0.0;
    }
    if reps == 1 {
        return weight;
    }
    // weight * (1 + reps / 30)
    #[allow(clippy::cast_precision_loss)]
    let result = weight * (30 + reps) as f32 / 30.0;
    result
}

/// Estimate the one-repetition maximum, rounded to whole kilograms.
///
/// A single rep is already a true maximum and is returned unchanged.
#[must_use]
pub fn one_rep_max(weight: f32, reps: u32) -> f32 {
    if reps == 1 {
        return weight.max(0.0);
    }
    epley(weight, reps).round()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CalorieMethod {
    CardioSpeedMet,
    CardioTypeFallback,
    StrengthIntensity,
    StrengthDuration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieEstimate {
    pub calories: u32,
    pub met: f32,
    pub method: CalorieMethod,
    /// Minutes
    pub duration: f32,
}

impl CalorieEstimate {
    fn new(met: f32, method: CalorieMethod, duration: f32, body_weight: f32) -> Self {
        Self {
            calories: calories(met, body_weight, duration),
            met,
            method,
            duration,
        }
    }
}

/// Upper speed bound in km/h and the MET of the bracket.
const SPEED_MET: [(f32, f32); 7] = [
    (6.4, 3.5),
    (8.0, 6.0),
    (9.7, 8.3),
    (11.3, 9.8),
    (12.9, 11.0),
    (14.5, 11.8),
    (f32::INFINITY, 14.0),
];

const KEYWORD_MET: [(&str, f32); 9] = [
    ("run", 9.8),
    ("jog", 7.0),
    ("cycl", 7.5),
    ("bike", 7.5),
    ("swim", 8.0),
    ("row", 7.0),
    ("walk", 3.5),
    ("hiit", 8.0),
    ("sport", 7.0),
];

const DEFAULT_CARDIO_MET: f32 = 6.0;

/// Upper relative intensity bound and the MET of the band.
const INTENSITY_MET: [(f32, f32); 4] = [(0.60, 3.0), (0.75, 4.5), (0.85, 6.0), (1.00, 8.0)];

const DEFAULT_STRENGTH_MET: f32 = 5.0;

/// Work and rest per set in seconds, used when a strength session has no duration.
const SECONDS_PER_SET: f32 = 45.0 + 90.0;

/// Estimate the energy spent on a cardio session.
///
/// Speed determines the MET if a positive distance and duration are known.
/// Otherwise the notes are searched for an activity keyword.
#[must_use]
pub fn cardio_calories(
    distance: Option<f32>,
    duration: Option<f32>,
    notes: &str,
    body_weight: f32,
) -> CalorieEstimate {
    let minutes = duration.unwrap_or(0.0);

    if let Some(distance) = distance {
        if distance > 0.0 && minutes > 0.0 {
            let speed = distance / (minutes / 60.0);
            return CalorieEstimate::new(
                speed_met(speed),
                CalorieMethod::CardioSpeedMet,
                minutes,
                body_weight,
            );
        }
    }

    CalorieEstimate::new(
        keyword_met(notes),
        CalorieMethod::CardioTypeFallback,
        minutes,
        body_weight,
    )
}

/// Estimate the energy spent on a strength session from its sets.
///
/// The average relative intensity of all weighted sets selects the MET. Without an
/// explicit duration, the duration is derived from the number of sets.
#[must_use]
pub fn strength_calories(sets: &[Set], duration: Option<f32>, body_weight: f32) -> CalorieEstimate {
    let intensities = sets
        .iter()
        .filter(|s| s.is_weighted())
        .filter_map(|s| {
            let one_rep_max = s.one_rep_max();
            if one_rep_max > 0.0 {
                Some(s.weight.unwrap_or_default() / one_rep_max)
            } else {
                None
            }
        })
        .collect::<Vec<_>>();

    let minutes = match duration {
        Some(minutes) => minutes,
        #[allow(clippy::cast_precision_loss)]
        None => sets.len().max(1) as f32 * SECONDS_PER_SET / 60.0,
    };

    if intensities.is_empty() {
        CalorieEstimate::new(
            DEFAULT_STRENGTH_MET,
            CalorieMethod::StrengthDuration,
            minutes,
            body_weight,
        )
    } else {
        #[allow(clippy::cast_precision_loss)]
        let avg = intensities.iter().sum::<f32>() / intensities.len() as f32;
        CalorieEstimate::new(
            intensity_met(avg),
            CalorieMethod::StrengthIntensity,
            minutes,
            body_weight,
        )
    }
}

/// Estimate the energy spent on an activity.
///
/// Strength activities are estimated from those `sets` that were performed on the day of the
/// activity, all other kinds from distance, duration and notes.
#[must_use]
pub fn activity_calories(activity: &Activity, sets: &[Set], body_weight: f32) -> CalorieEstimate {
    match activity.kind {
        ActivityKind::Strength => {
            let sets = sets
                .iter()
                .filter(|s| s.date == activity.date)
                .cloned()
                .collect::<Vec<_>>();
            strength_calories(&sets, activity.duration, body_weight)
        }
        ActivityKind::Cardio
        | ActivityKind::Sport
        | ActivityKind::Mobility
        | ActivityKind::Custom => cardio_calories(
            activity.distance,
            activity.duration,
            &activity.notes,
            body_weight,
        ),
    }
}

#[must_use]
pub fn speed_met(speed: f32) -> f32 {
    SPEED_MET
        .iter()
        .find(|(limit, _)| speed <= *limit)
        .map_or(SPEED_MET[SPEED_MET.len() - 1].1, |(_, met)| *met)
}

#[must_use]
pub fn keyword_met(notes: &str) -> f32 {
    let notes = notes.to_lowercase();
    KEYWORD_MET
        .iter()
        .find(|(keyword, _)| notes.contains(keyword))
        .map_or(DEFAULT_CARDIO_MET, |(_, met)| *met)
}

#[must_use]
pub fn intensity_met(intensity: f32) -> f32 {
    INTENSITY_MET
        .iter()
        .find(|(limit, _)| intensity <= *limit)
        .map_or(INTENSITY_MET[INTENSITY_MET.len() - 1].1, |(_, met)| *met)
}

/// Energy in kcal for the given MET, body weight in kg and duration in minutes.
#[must_use]
pub fn calories(met: f32, body_weight: f32, duration: f32) -> u32 {
    if duration <= 0.0 || body_weight <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let result = (met * body_weight * duration / 60.0).round().max(0.0) as u32;
    result
}

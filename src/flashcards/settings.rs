//! Review settings and their validation
//!
//! Raw values come from the settings form, the TOML config file or the CLI.
//! [`normalize`] turns them into a [`ReviewSettings`] that the scheduler can
//! always use: out-of-range numbers are clamped and unusable values fall
//! back to the previous configuration. It never fails.

use serde::{Deserialize, Serialize};

pub const MIN_NEW_CARDS_PER_DAY: u32 = 1;
pub const MAX_NEW_CARDS_PER_DAY: u32 = 100;
pub const MIN_MAX_INTERVAL: u32 = 1;
pub const MAX_MAX_INTERVAL: u32 = 365;
pub const MIN_DEFAULT_EASE: f64 = 1.3;
pub const MAX_DEFAULT_EASE: f64 = 3.0;

/// Process-wide scheduling parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSettings {
    /// Cap on fresh cards introduced per session
    pub new_cards_per_day: u32,
    /// Cap on graduated intervals, in days
    pub max_interval: u32,
    /// Ease factor given to newly created cards
    pub default_ease_factor: f64,
    /// Learning delays in minutes, first entry used on every lapse
    pub learning_steps: Vec<u32>,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            new_cards_per_day: 20,
            max_interval: 90,
            default_ease_factor: 2.5,
            learning_steps: vec![10, 1440],
        }
    }
}

/// Unvalidated settings; `None` keeps the previous value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReviewSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_cards_per_day: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_interval: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ease_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_steps: Option<Vec<i64>>,
}

impl From<&ReviewSettings> for RawReviewSettings {
    fn from(settings: &ReviewSettings) -> Self {
        Self {
            new_cards_per_day: Some(settings.new_cards_per_day.into()),
            max_interval: Some(settings.max_interval.into()),
            default_ease_factor: Some(settings.default_ease_factor),
            learning_steps: Some(settings.learning_steps.iter().map(|&s| s.into()).collect()),
        }
    }
}

/// Validate raw settings against the previously configured ones
pub fn normalize(raw: &RawReviewSettings, previous: &ReviewSettings) -> ReviewSettings {
    let new_cards_per_day = raw
        .new_cards_per_day
        .map(|value| clamp_count("new_cards_per_day", value, MIN_NEW_CARDS_PER_DAY, MAX_NEW_CARDS_PER_DAY))
        .unwrap_or(previous.new_cards_per_day);

    let max_interval = raw
        .max_interval
        .map(|value| clamp_count("max_interval", value, MIN_MAX_INTERVAL, MAX_MAX_INTERVAL))
        .unwrap_or(previous.max_interval);

    let default_ease_factor = match raw.default_ease_factor {
        Some(value) if value.is_finite() => {
            let rounded = ((value * 100.0).round() / 100.0).clamp(MIN_DEFAULT_EASE, MAX_DEFAULT_EASE);
            if rounded != value {
                log::warn!("default_ease_factor {} adjusted to {}", value, rounded);
            }
            rounded
        }
        Some(value) => {
            log::warn!(
                "Ignoring non-finite default_ease_factor {}, keeping {}",
                value,
                previous.default_ease_factor
            );
            previous.default_ease_factor
        }
        None => previous.default_ease_factor,
    };

    let learning_steps = match &raw.learning_steps {
        Some(steps) => {
            let valid: Vec<u32> = steps
                .iter()
                .filter_map(|&step| u32::try_from(step).ok())
                .filter(|&step| step > 0)
                .collect();
            if valid.len() != steps.len() {
                log::warn!("Dropped {} invalid learning steps", steps.len() - valid.len());
            }
            if valid.is_empty() {
                log::warn!(
                    "No usable learning steps supplied, keeping {:?}",
                    previous.learning_steps
                );
                previous.learning_steps.clone()
            } else {
                valid
            }
        }
        None => previous.learning_steps.clone(),
    };

    ReviewSettings {
        new_cards_per_day,
        max_interval,
        default_ease_factor,
        learning_steps,
    }
}

fn clamp_count(field: &str, value: i64, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    if clamped != value {
        log::warn!("{} {} clamped to {}", field, value, clamped);
    }
    // In range of u32 after the clamp above
    clamped as u32
}

/// Parse a comma-separated list of minutes such as `"10, 1440"`.
///
/// Entries that are not integers are dropped; sign and range are left to
/// [`normalize`].
pub fn parse_learning_steps(input: &str) -> Vec<i64> {
    input
        .split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ReviewSettings::default();
        assert_eq!(settings.new_cards_per_day, 20);
        assert_eq!(settings.max_interval, 90);
        assert_eq!(settings.default_ease_factor, 2.5);
        assert_eq!(settings.learning_steps, vec![10, 1440]);
    }

    #[test]
    fn test_empty_raw_keeps_previous() {
        let previous = ReviewSettings {
            new_cards_per_day: 7,
            max_interval: 30,
            default_ease_factor: 2.1,
            learning_steps: vec![5],
        };
        assert_eq!(normalize(&RawReviewSettings::default(), &previous), previous);
    }

    #[test]
    fn test_clamps_counts() {
        let raw = RawReviewSettings {
            new_cards_per_day: Some(0),
            max_interval: Some(1000),
            ..Default::default()
        };
        let settings = normalize(&raw, &ReviewSettings::default());
        assert_eq!(settings.new_cards_per_day, 1);
        assert_eq!(settings.max_interval, 365);

        let raw = RawReviewSettings {
            new_cards_per_day: Some(250),
            max_interval: Some(-4),
            ..Default::default()
        };
        let settings = normalize(&raw, &ReviewSettings::default());
        assert_eq!(settings.new_cards_per_day, 100);
        assert_eq!(settings.max_interval, 1);
    }

    #[test]
    fn test_ease_rounded_and_clamped() {
        let previous = ReviewSettings::default();

        let raw = RawReviewSettings {
            default_ease_factor: Some(2.456),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &previous).default_ease_factor, 2.46);

        let raw = RawReviewSettings {
            default_ease_factor: Some(0.5),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &previous).default_ease_factor, 1.3);

        let raw = RawReviewSettings {
            default_ease_factor: Some(4.0),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &previous).default_ease_factor, 3.0);

        let raw = RawReviewSettings {
            default_ease_factor: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &previous).default_ease_factor, 2.5);
    }

    #[test]
    fn test_learning_steps_filtered() {
        let raw = RawReviewSettings {
            learning_steps: Some(vec![-1, 0, 15, 60]),
            ..Default::default()
        };
        let settings = normalize(&raw, &ReviewSettings::default());
        assert_eq!(settings.learning_steps, vec![15, 60]);
    }

    #[test]
    fn test_learning_steps_fall_back_when_empty() {
        let previous = ReviewSettings {
            learning_steps: vec![3, 30],
            ..Default::default()
        };
        let raw = RawReviewSettings {
            learning_steps: Some(vec![0, -10]),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &previous).learning_steps, vec![3, 30]);

        let raw = RawReviewSettings {
            learning_steps: Some(Vec::new()),
            ..Default::default()
        };
        assert_eq!(normalize(&raw, &previous).learning_steps, vec![3, 30]);
    }

    #[test]
    fn test_parse_learning_steps() {
        assert_eq!(parse_learning_steps("10, 1440"), vec![10, 1440]);
        assert_eq!(parse_learning_steps(" 1,abc, ,-5 "), vec![1, -5]);
        assert!(parse_learning_steps("").is_empty());
    }

    #[test]
    fn test_round_trip_through_raw() {
        let settings = ReviewSettings {
            new_cards_per_day: 12,
            max_interval: 200,
            default_ease_factor: 2.2,
            learning_steps: vec![1, 10, 60],
        };
        let raw = RawReviewSettings::from(&settings);
        assert_eq!(normalize(&raw, &ReviewSettings::default()), settings);
    }
}

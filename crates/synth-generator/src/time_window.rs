//! Time window resolution.
//!
//! A profile either lists named periods (one is drawn per generation) or
//! declares fixed offsets from "now". Named periods win when both are set.

use rand::Rng;
use synth_core::{InvalidTimeRange, NamedTimePeriod, ProfileVariant, TimeRange, UserProfile};

const HOUR: u64 = 3600;
const EIGHT_HOURS: u64 = 8 * HOUR;
const DAY: u64 = 24 * HOUR;

/// Upper bound of the `Custom` left offset when the profile sets none.
pub const DEFAULT_MAX_TIME_LEFT: u64 = HOUR;
/// Upper bound of the `Custom` right offset when the profile sets none.
pub const DEFAULT_MAX_TIME_RIGHT: u64 = 0;

/// Label used for windows drawn from the `Custom` period.
pub const CUSTOM_LABEL: &str = "Custom";

/// Errors raised when a profile's time settings cannot produce a window.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeWindowError {
    #[error("Time periods are configured but the list is empty")]
    EmptyTimePeriods,

    #[error("No time periods or fixed time borders configured")]
    NoTimeConfiguration,

    #[error(transparent)]
    InvertedBorders(#[from] InvalidTimeRange),
}

/// Fixed offsets, in seconds before "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBorders {
    pub left: u64,
    pub right: u64,
}

impl FixedBorders {
    /// Borders count as declared when either offset is present; the absent
    /// one takes its default.
    fn declared(
        left: Option<u64>,
        right: Option<u64>,
        default_left: u64,
        default_right: u64,
    ) -> Option<Self> {
        if left.is_none() && right.is_none() {
            return None;
        }
        Some(Self {
            left: left.unwrap_or(default_left),
            right: right.unwrap_or(default_right),
        })
    }
}

/// Time settings of one profile, independent of its variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeSpec<'a> {
    pub periods: Option<&'a [NamedTimePeriod]>,
    pub max_time_left: Option<u64>,
    pub max_time_right: Option<u64>,
    pub fixed: Option<FixedBorders>,
}

impl<'a> TimeSpec<'a> {
    pub fn from_profile(profile: &'a UserProfile) -> Self {
        match &profile.variant {
            ProfileVariant::Static(p) => Self {
                periods: p.times.as_deref(),
                max_time_left: p.max_time_left,
                max_time_right: p.max_time_right,
                fixed: FixedBorders::declared(p.time_left_border, p.time_right_border, 0, 0),
            },
            ProfileVariant::Random(p) => Self {
                periods: p.times.as_deref(),
                max_time_left: p.max_time_left,
                max_time_right: p.max_time_right,
                fixed: FixedBorders::declared(
                    p.time_left_border,
                    p.time_right_border,
                    HOUR,
                    0,
                ),
            },
        }
    }
}

/// A concrete window plus its human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub range: TimeRange,
    pub label: String,
}

/// Resolve a profile's time settings against `now` (epoch seconds).
pub fn resolve<R: Rng>(
    spec: &TimeSpec<'_>,
    now: i64,
    rng: &mut R,
) -> Result<ResolvedWindow, TimeWindowError> {
    if let Some(periods) = spec.periods {
        if periods.is_empty() {
            return Err(TimeWindowError::EmptyTimePeriods);
        }
        let period = periods[rng.random_range(0..periods.len())];
        let range = resolve_period(period, spec, now, rng)?;
        let label = match period {
            NamedTimePeriod::Custom => CUSTOM_LABEL.to_string(),
            _ => format!("Last {}", format_interval(now.abs_diff(range.left()))),
        };
        tracing::debug!("Resolved period {period} to {range} ({label})");
        return Ok(ResolvedWindow { range, label });
    }

    if let Some(fixed) = spec.fixed {
        let range = TimeRange::new(
            now.saturating_sub_unsigned(fixed.left),
            now.saturating_sub_unsigned(fixed.right),
        )?;
        let label = if fixed.right > 0 {
            format!(
                "From now {} - Last {}",
                format_interval(fixed.right),
                format_interval(fixed.left)
            )
        } else {
            format!("Last {}", format_interval(fixed.left))
        };
        return Ok(ResolvedWindow { range, label });
    }

    Err(TimeWindowError::NoTimeConfiguration)
}

/// Window arithmetic for one named period.
pub fn resolve_period<R: Rng>(
    period: NamedTimePeriod,
    spec: &TimeSpec<'_>,
    now: i64,
    rng: &mut R,
) -> Result<TimeRange, TimeWindowError> {
    let range = match period {
        NamedTimePeriod::Last8h => TimeRange::last(now, EIGHT_HOURS),
        NamedTimePeriod::Last24h => TimeRange::last(now, DAY),
        NamedTimePeriod::Custom => {
            let max_left = spec.max_time_left.unwrap_or(DEFAULT_MAX_TIME_LEFT).max(1);
            let max_right = spec.max_time_right.unwrap_or(DEFAULT_MAX_TIME_RIGHT);
            let left_offset = rng.random_range(1..=max_left);
            // A right offset past the left one would invert the window.
            let right_offset = rng.random_range(0..=max_right).min(left_offset);
            TimeRange::new(
                now.saturating_sub_unsigned(left_offset),
                now.saturating_sub_unsigned(right_offset),
            )?
        }
        // TODO: give Last3d, Last7d, Yesterday, BeforeYesterday, SameDayPrevWeek
        // and LastWeek their own windows once their boundaries are agreed on.
        NamedTimePeriod::Last1h
        | NamedTimePeriod::Last3d
        | NamedTimePeriod::Last7d
        | NamedTimePeriod::Yesterday
        | NamedTimePeriod::BeforeYesterday
        | NamedTimePeriod::SameDayPrevWeek
        | NamedTimePeriod::LastWeek => TimeRange::last(now, HOUR),
    };
    Ok(range)
}

/// Format seconds as concatenated non-zero `h`/`m`/`s` components, e.g.
/// `3661` → `1h1m1s`. Zero formats as `0S`.
pub fn format_interval(seconds: u64) -> String {
    if seconds == 0 {
        return "0S".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut result = String::new();
    if hours > 0 {
        result.push_str(&format!("{hours}h"));
    }
    if minutes > 0 {
        result.push_str(&format!("{minutes}m"));
    }
    if secs > 0 {
        result.push_str(&format!("{secs}s"));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use synth_core::{RandomProfile, StaticProfile};

    const NOW: i64 = 1_700_000_000;

    fn spec_with_periods(periods: &[NamedTimePeriod]) -> TimeSpec<'_> {
        TimeSpec {
            periods: Some(periods),
            ..TimeSpec::default()
        }
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0), "0S");
        assert_eq!(format_interval(3661), "1h1m1s");
        assert_eq!(format_interval(90), "1m30s");
        assert_eq!(format_interval(3600), "1h");
        assert_eq!(format_interval(86400), "24h");
        assert_eq!(format_interval(59), "59s");
        assert_eq!(format_interval(7260), "2h1m");
    }

    #[test]
    fn test_fixed_borders() {
        let mut rng = StdRng::seed_from_u64(42);
        let spec = TimeSpec {
            fixed: Some(FixedBorders { left: 3600, right: 0 }),
            ..TimeSpec::default()
        };

        let window = resolve(&spec, NOW, &mut rng).unwrap();
        assert_eq!(window.range, TimeRange::new(NOW - 3600, NOW).unwrap());
        assert_eq!(window.label, "Last 1h");
    }

    #[test]
    fn test_fixed_borders_with_right_offset() {
        let mut rng = StdRng::seed_from_u64(42);
        let spec = TimeSpec {
            fixed: Some(FixedBorders {
                left: 7200,
                right: 1800,
            }),
            ..TimeSpec::default()
        };

        let window = resolve(&spec, NOW, &mut rng).unwrap();
        assert_eq!(window.range.left(), NOW - 7200);
        assert_eq!(window.range.right(), NOW - 1800);
        assert_eq!(window.label, "From now 30m - Last 2h");
    }

    #[test]
    fn test_fixed_borders_inverted() {
        let mut rng = StdRng::seed_from_u64(42);
        let spec = TimeSpec {
            fixed: Some(FixedBorders {
                left: 60,
                right: 120,
            }),
            ..TimeSpec::default()
        };

        let err = resolve(&spec, NOW, &mut rng).unwrap_err();
        assert!(matches!(err, TimeWindowError::InvertedBorders(_)));
    }

    #[test]
    fn test_named_periods() {
        let mut rng = StdRng::seed_from_u64(42);

        let cases = [
            (NamedTimePeriod::Last1h, 3600, "Last 1h"),
            (NamedTimePeriod::Last8h, 28800, "Last 8h"),
            (NamedTimePeriod::Last24h, 86400, "Last 24h"),
        ];
        for (period, width, label) in cases {
            let periods = [period];
            let window = resolve(&spec_with_periods(&periods), NOW, &mut rng).unwrap();
            assert_eq!(window.range, TimeRange::new(NOW - width, NOW).unwrap());
            assert_eq!(window.label, label);
        }
    }

    #[test]
    fn test_unresolved_periods_fall_back_to_one_hour() {
        let mut rng = StdRng::seed_from_u64(42);
        let fallbacks = [
            NamedTimePeriod::Last3d,
            NamedTimePeriod::Last7d,
            NamedTimePeriod::Yesterday,
            NamedTimePeriod::BeforeYesterday,
            NamedTimePeriod::SameDayPrevWeek,
            NamedTimePeriod::LastWeek,
        ];
        for period in fallbacks {
            let periods = [period];
            let window = resolve(&spec_with_periods(&periods), NOW, &mut rng).unwrap();
            assert_eq!(window.range, TimeRange::last(NOW, 3600));
            assert_eq!(window.label, "Last 1h");
        }
    }

    #[test]
    fn test_custom_period_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let periods = [NamedTimePeriod::Custom];
        let spec = TimeSpec {
            periods: Some(&periods),
            max_time_left: Some(600),
            max_time_right: Some(300),
            fixed: None,
        };

        for _ in 0..1000 {
            let window = resolve(&spec, NOW, &mut rng).unwrap();
            let left_offset = NOW - window.range.left();
            let right_offset = NOW - window.range.right();
            assert!((1..=600).contains(&left_offset));
            assert!((0..=300).contains(&right_offset));
            assert!(window.range.left() <= window.range.right());
            assert_eq!(window.label, "Custom");
        }
    }

    #[test]
    fn test_custom_period_defaults() {
        let mut rng = StdRng::seed_from_u64(7);
        let periods = [NamedTimePeriod::Custom];

        for _ in 0..200 {
            let window = resolve(&spec_with_periods(&periods), NOW, &mut rng).unwrap();
            assert_eq!(window.range.right(), NOW);
            assert!((1..=3600).contains(&(NOW - window.range.left())));
        }
    }

    #[test]
    fn test_custom_period_clamps_right_offset() {
        let mut rng = StdRng::seed_from_u64(11);
        let periods = [NamedTimePeriod::Custom];
        let spec = TimeSpec {
            periods: Some(&periods),
            max_time_left: Some(10),
            max_time_right: Some(10_000),
            fixed: None,
        };

        for _ in 0..500 {
            let window = resolve(&spec, NOW, &mut rng).unwrap();
            assert!(window.range.left() <= window.range.right());
        }
    }

    #[test]
    fn test_period_choice_covers_list() {
        let mut rng = StdRng::seed_from_u64(3);
        let periods = [NamedTimePeriod::Last1h, NamedTimePeriod::Last24h];
        let spec = spec_with_periods(&periods);

        let mut widths = std::collections::HashSet::new();
        for _ in 0..200 {
            widths.insert(resolve(&spec, NOW, &mut rng).unwrap().range.width());
        }
        assert_eq!(widths.len(), 2);
    }

    #[test]
    fn test_periods_take_precedence_over_fixed_borders() {
        let mut rng = StdRng::seed_from_u64(42);
        let periods = [NamedTimePeriod::Last8h];
        let spec = TimeSpec {
            periods: Some(&periods),
            fixed: Some(FixedBorders { left: 60, right: 0 }),
            ..TimeSpec::default()
        };

        let window = resolve(&spec, NOW, &mut rng).unwrap();
        assert_eq!(window.range.width(), 28800);
    }

    #[test]
    fn test_configuration_errors() {
        let mut rng = StdRng::seed_from_u64(42);

        let err = resolve(&spec_with_periods(&[]), NOW, &mut rng).unwrap_err();
        assert_eq!(err, TimeWindowError::EmptyTimePeriods);

        let err = resolve(&TimeSpec::default(), NOW, &mut rng).unwrap_err();
        assert_eq!(err, TimeWindowError::NoTimeConfiguration);
    }

    #[test]
    fn test_spec_from_profile_defaults() {
        let random = UserProfile::new(
            "r",
            ProfileVariant::Random(RandomProfile {
                time_right_border: Some(0),
                ..RandomProfile::shared()
            }),
        );
        assert_eq!(
            TimeSpec::from_profile(&random).fixed,
            Some(FixedBorders { left: 3600, right: 0 })
        );

        let fixed_static = UserProfile::new(
            "s",
            ProfileVariant::Static(StaticProfile {
                time_left_border: Some(900),
                ..StaticProfile::default()
            }),
        );
        assert_eq!(
            TimeSpec::from_profile(&fixed_static).fixed,
            Some(FixedBorders { left: 900, right: 0 })
        );

        let bare_static = UserProfile::new("b", ProfileVariant::Static(StaticProfile::default()));
        let spec = TimeSpec::from_profile(&bare_static);
        assert_eq!(spec.fixed, None);
        assert_eq!(spec.periods, None);
    }
}

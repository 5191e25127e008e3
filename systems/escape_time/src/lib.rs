#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Escape-time guardrail applied to every map before any wave is generated.
//!
//! Raid durations are kept in minutes, matching how map settings store them.
//! The guardrail never rejects input: out-of-range durations are clamped and
//! each adjustment is reported as a [`GuardrailWarning`] for the caller to
//! surface.

use std::fmt;

/// Largest accepted ratio between a map's raid duration and its default.
pub const MAX_DURATION_RATIO: u32 = 5;

/// Ratio above which starting mid-raid actors is switched off.
pub const STARTING_ACTORS_MAX_RATIO: f64 = 2.0;

/// Durations known for one map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscapeTimeLimits {
    /// Stock raid duration in minutes.
    pub default_minutes: u32,
    /// Raid duration currently configured, in minutes.
    pub current_minutes: u32,
    /// Explicit duration replacing the current one; zero counts as unset.
    pub override_minutes: Option<u32>,
}

impl EscapeTimeLimits {
    /// Creates limits without an override.
    #[must_use]
    pub const fn new(default_minutes: u32, current_minutes: u32) -> Self {
        Self {
            default_minutes,
            current_minutes,
            override_minutes: None,
        }
    }

    /// Returns the limits with `minutes` as the override.
    #[must_use]
    pub const fn with_override(mut self, minutes: u32) -> Self {
        self.override_minutes = Some(minutes);
        self
    }

    fn active_override(&self) -> Option<u32> {
        self.override_minutes.filter(|minutes| *minutes > 0)
    }
}

/// Adjustment the guardrail made to a map's settings.
#[derive(Clone, Debug, PartialEq)]
pub enum GuardrailWarning {
    /// The raid duration exceeded [`MAX_DURATION_RATIO`] times the default.
    DurationClamped {
        /// Map the adjustment applies to.
        map: String,
        /// Duration before clamping, in minutes.
        from: u32,
        /// Duration after clamping, in minutes.
        to: u32,
    },
    /// Starting mid-raid actors was disabled because the raid is too long.
    StartingActorsDisabled {
        /// Map that triggered the switch.
        map: String,
        /// Observed duration ratio.
        ratio: f64,
    },
}

impl fmt::Display for GuardrailWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DurationClamped { map, from, to } => write!(
                f,
                "escape time on {map} set too high, changed from {from} to {to} minutes"
            ),
            Self::StartingActorsDisabled { map, ratio } => write!(
                f,
                "escape time on {map} is {ratio:.2}x the default, starting actors turned off"
            ),
        }
    }
}

/// Result of running the guardrail over one map.
#[derive(Clone, Debug, PartialEq)]
pub struct GuardrailOutcome {
    /// Raid duration to generate against, in minutes.
    pub escape_minutes: u32,
    /// Whether starting mid-raid actors remains enabled.
    pub starting_actors: bool,
    /// Adjustments made, in the order they were applied.
    pub warnings: Vec<GuardrailWarning>,
}

/// Clamps or overrides a map's raid duration.
///
/// Without an override a duration above [`MAX_DURATION_RATIO`] times the
/// default is clamped to exactly that multiple. A non-zero override replaces
/// the duration as given. Afterwards, when `starting_actors` is requested and
/// the duration exceeds [`STARTING_ACTORS_MAX_RATIO`] times the default, the
/// feature is disabled. A zero default skips the ratio checks.
#[must_use]
pub fn apply_guardrail(
    map: &str,
    limits: EscapeTimeLimits,
    starting_actors: bool,
) -> GuardrailOutcome {
    let mut escape_minutes = limits.current_minutes;
    let mut warnings = Vec::new();
    let default = limits.default_minutes;

    match limits.active_override() {
        None if default > 0 && escape_minutes > default.saturating_mul(MAX_DURATION_RATIO) => {
            let clamped = default.saturating_mul(MAX_DURATION_RATIO);
            warnings.push(GuardrailWarning::DurationClamped {
                map: map.to_owned(),
                from: escape_minutes,
                to: clamped,
            });
            escape_minutes = clamped;
        }
        Some(minutes) if minutes != escape_minutes => {
            tracing::info!(
                target: "raid_spawns::escape_time",
                map,
                from = escape_minutes,
                to = minutes,
                "escape time overridden"
            );
            escape_minutes = minutes;
        }
        _ => {}
    }

    let mut starting_actors = starting_actors;
    if starting_actors && default > 0 {
        let ratio = f64::from(escape_minutes) / f64::from(default);
        if ratio > STARTING_ACTORS_MAX_RATIO {
            warnings.push(GuardrailWarning::StartingActorsDisabled {
                map: map.to_owned(),
                ratio,
            });
            starting_actors = false;
        }
    }

    GuardrailOutcome {
        escape_minutes,
        starting_actors,
        warnings,
    }
}

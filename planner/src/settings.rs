use std::collections::BTreeMap;

use raid_spawns_core::{DifficultyTier, EscortAmount, Zone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seed used when the settings do not name one.
pub const DEFAULT_SEED: u64 = 0x2c1b_3c6d_4e5f_6071;
/// Largest accepted `smoothing_distribution`.
pub const MAX_SMOOTHING_DISTRIBUTION: f64 = 10.0;

/// How population categories are emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// Windowed waves from the linear builder.
    #[default]
    Waves,
    /// Point-in-time escorted spawns from the slot-budget builder.
    BossStyle,
}

/// Settings shared by every map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    /// Base seed every per-map random stream is derived from.
    pub seed: u64,
    /// How population categories are emitted.
    pub spawn_mode: SpawnMode,
    /// Scales each map's rival wave count.
    pub pmc_wave_multiplier: f64,
    /// Pace ratio of the rival schedules.
    pub pmc_wave_start_ratio: f64,
    /// Scales each map's scavenger wave count.
    pub scav_wave_multiplier: f64,
    /// Pace ratio of the scavenger schedules.
    pub scav_wave_start_ratio: f64,
    /// Largest rival group.
    pub group_max_pmc: u32,
    /// Largest scavenger group.
    pub group_max_scav: u32,
    /// Probability that a boss-style rival spawn brings escorts.
    pub pmc_group_chance: f64,
    /// Probability that a boss-style scavenger spawn brings escorts.
    pub scav_group_chance: f64,
    /// Pair every marksman with a second one.
    pub sniper_buddies: bool,
    /// Scales each map's infected population.
    pub infected_wave_quantity: f64,
    /// Distribution factor of the infected schedule.
    pub infected_distribution: f64,
    /// Health scale applied to every infected subtype.
    pub infected_health: f64,
    /// Spawn chance of infected waves in percent; values above 100 are capped.
    pub infected_chance: u32,
    /// Inject a raider encounter on every map.
    pub random_raider_group: bool,
    /// Spawn chance of the raider encounter in percent.
    pub random_raider_group_chance: u32,
    /// Inject a rogue encounter on every map.
    pub random_rogue_group: bool,
    /// Spawn chance of the rogue encounter in percent.
    pub random_rogue_group_chance: u32,
    /// Spawn rivals already in the raid at start.
    pub starting_pmcs: bool,
    /// Drop every boss, configured or invading.
    pub disable_bosses: bool,
    /// Move main bosses to the open zones of their map.
    pub boss_open_zones: bool,
    /// Percentage points added to the chance of main bosses that can spawn.
    pub main_boss_chance_buff: i32,
    /// Bosses excluded from the buff, the open-zone move and the invasion.
    pub secondary_bosses: Vec<String>,
    /// Copy every main boss onto the maps that do not host it.
    pub boss_invasion: bool,
    /// Spawn chance of invading bosses in percent; zero keeps their own.
    pub boss_invasion_spawn_chance: u32,
    /// Stagger invaders of a map twenty seconds apart.
    pub gradual_boss_invasion: bool,
    /// Log per-map population totals.
    pub debug: bool,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            spawn_mode: SpawnMode::Waves,
            pmc_wave_multiplier: 1.0,
            pmc_wave_start_ratio: 0.3,
            scav_wave_multiplier: 1.0,
            scav_wave_start_ratio: 0.3,
            group_max_pmc: 4,
            group_max_scav: 3,
            pmc_group_chance: 0.5,
            scav_group_chance: 0.4,
            sniper_buddies: false,
            infected_wave_quantity: 1.0,
            infected_distribution: 1.0,
            infected_health: 1.0,
            infected_chance: 100,
            random_raider_group: false,
            random_raider_group_chance: 10,
            random_rogue_group: false,
            random_rogue_group_chance: 10,
            starting_pmcs: false,
            disable_bosses: false,
            boss_open_zones: false,
            main_boss_chance_buff: 0,
            secondary_bosses: vec!["bossZryachiy".to_owned(), "bossKnight".to_owned()],
            boss_invasion: false,
            boss_invasion_spawn_chance: 0,
            gradual_boss_invasion: false,
            debug: false,
        }
    }
}

impl GlobalSettings {
    /// Whether `name` takes part in the buff, the open-zone move and the invasion.
    #[must_use]
    pub fn is_main_boss(&self, name: &str) -> bool {
        !self.secondary_bosses.iter().any(|other| other == name)
    }
}

/// A boss already present on a map; it is never re-spaced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BossSettings {
    /// Actor name of the boss.
    pub name: String,
    /// Start in seconds; absent leaves the boss unscheduled.
    #[serde(default)]
    pub time: Option<u32>,
    /// Spawn chance in percent.
    #[serde(default = "default_boss_chance")]
    pub chance: u32,
    /// Zone expression.
    #[serde(default)]
    pub zone: Zone,
    /// Escort count expression.
    #[serde(default = "default_boss_escorts")]
    pub escorts: EscortAmount,
    /// Actor name of the escorts; defaults to the boss name.
    #[serde(default)]
    pub escort_type: Option<String>,
    /// Difficulty of the boss and its escorts.
    #[serde(default = "default_boss_difficulty")]
    pub difficulty: DifficultyTier,
}

fn default_boss_chance() -> u32 {
    100
}

fn default_boss_escorts() -> EscortAmount {
    EscortAmount::Fixed(0)
}

fn default_boss_difficulty() -> DifficultyTier {
    DifficultyTier::Normal
}

/// Settings of a single map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    /// Stock raid duration in minutes.
    pub default_escape_time: u32,
    /// Configured raid duration in minutes.
    pub escape_time: u32,
    /// Explicit raid duration in minutes, bypassing the clamp.
    pub escape_time_override: Option<u32>,
    /// Nominal rival waves across both factions.
    pub pmc_wave_count: u32,
    /// Nominal scavenger waves.
    pub scav_wave_count: u32,
    /// Nominal infected population; zero disables the swarm.
    pub infected_wave_count: u32,
    /// Replaces the global rival multiplier.
    pub pmc_wave_multiplier: Option<f64>,
    /// Replaces the global rival pace ratio.
    pub pmc_wave_start_ratio: Option<f64>,
    /// Replaces the global scavenger multiplier.
    pub scav_wave_multiplier: Option<f64>,
    /// Replaces the global scavenger pace ratio.
    pub scav_wave_start_ratio: Option<f64>,
    /// Scales the ramp of the smoothing pass.
    pub smoothing_distribution: f64,
    /// Start delay in seconds of boss-style population spawns.
    pub initial_spawn_delay: u32,
    /// Zones any population category may use.
    pub open_zones: Vec<Zone>,
    /// Zones every one of which receives a dedicated rival wave.
    pub pmc_hot_zones: Vec<Zone>,
    /// Zones every one of which receives a dedicated scavenger wave.
    pub scav_hot_zones: Vec<Zone>,
    /// Marksman nests; excluded from the shared pool.
    pub sniper_zones: Vec<Zone>,
    /// Bosses already present on the map.
    pub bosses: Vec<BossSettings>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_escape_time: 40,
            escape_time: 40,
            escape_time_override: None,
            pmc_wave_count: 0,
            scav_wave_count: 0,
            infected_wave_count: 0,
            pmc_wave_multiplier: None,
            pmc_wave_start_ratio: None,
            scav_wave_multiplier: None,
            scav_wave_start_ratio: None,
            smoothing_distribution: 1.0,
            initial_spawn_delay: 0,
            open_zones: Vec::new(),
            pmc_hot_zones: Vec::new(),
            scav_hot_zones: Vec::new(),
            sniper_zones: Vec::new(),
            bosses: Vec::new(),
        }
    }
}

impl MapSettings {
    /// Rival multiplier after applying the map override.
    #[must_use]
    pub fn pmc_multiplier(&self, global: &GlobalSettings) -> f64 {
        self.pmc_wave_multiplier.unwrap_or(global.pmc_wave_multiplier)
    }

    /// Rival pace ratio after applying the map override.
    #[must_use]
    pub fn pmc_pace(&self, global: &GlobalSettings) -> f64 {
        self.pmc_wave_start_ratio.unwrap_or(global.pmc_wave_start_ratio)
    }

    /// Scavenger multiplier after applying the map override.
    #[must_use]
    pub fn scav_multiplier(&self, global: &GlobalSettings) -> f64 {
        self.scav_wave_multiplier.unwrap_or(global.scav_wave_multiplier)
    }

    /// Scavenger pace ratio after applying the map override.
    #[must_use]
    pub fn scav_pace(&self, global: &GlobalSettings) -> f64 {
        self.scav_wave_start_ratio.unwrap_or(global.scav_wave_start_ratio)
    }
}

/// Complete input of a planning run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaidSettings {
    /// Settings shared by every map.
    pub global: GlobalSettings,
    /// Per-map settings keyed by map name.
    pub maps: BTreeMap<String, MapSettings>,
}

/// Reasons a settings document is rejected before planning.
#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    /// A tunable is negative, NaN or infinite.
    #[error("{scope}: `{name}` must be a finite non-negative number, got {value}")]
    InvalidTunable {
        /// `global` or the map name.
        scope: String,
        /// Setting name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A pace ratio lies outside `0.0..=1.0`.
    #[error("{scope}: `{name}` must lie within 0..=1, got {value}")]
    PaceRatioOutOfRange {
        /// `global` or the map name.
        scope: String,
        /// Setting name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A tunable exceeds its upper bound.
    #[error("{scope}: `{name}` must not exceed {max}, got {value}")]
    TunableTooLarge {
        /// `global` or the map name.
        scope: String,
        /// Setting name.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// A map declares a zero stock duration.
    #[error("{map}: `default_escape_time` must be greater than zero")]
    ZeroDefaultDuration {
        /// Offending map.
        map: String,
    },
    /// A requested map is not configured.
    #[error("map `{map}` is not configured")]
    UnknownMap {
        /// Requested map.
        map: String,
    },
}

impl RaidSettings {
    /// Checks every tunable the builders rely on.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found, global settings first and
    /// then maps in name order.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let global = &self.global;
        let scope = "global";
        check_tunable(scope, "pmc_wave_multiplier", global.pmc_wave_multiplier)?;
        check_pace(scope, "pmc_wave_start_ratio", global.pmc_wave_start_ratio)?;
        check_tunable(scope, "scav_wave_multiplier", global.scav_wave_multiplier)?;
        check_pace(scope, "scav_wave_start_ratio", global.scav_wave_start_ratio)?;
        check_pace(scope, "pmc_group_chance", global.pmc_group_chance)?;
        check_pace(scope, "scav_group_chance", global.scav_group_chance)?;
        check_tunable(
            scope,
            "infected_wave_quantity",
            global.infected_wave_quantity,
        )?;
        check_tunable(scope, "infected_distribution", global.infected_distribution)?;
        check_tunable(scope, "infected_health", global.infected_health)?;

        for (name, map) in &self.maps {
            if map.default_escape_time == 0 {
                return Err(SettingsError::ZeroDefaultDuration { map: name.clone() });
            }
            check_tunable(name, "smoothing_distribution", map.smoothing_distribution)?;
            if map.smoothing_distribution > MAX_SMOOTHING_DISTRIBUTION {
                return Err(SettingsError::TunableTooLarge {
                    scope: name.clone(),
                    name: "smoothing_distribution",
                    value: map.smoothing_distribution,
                    max: MAX_SMOOTHING_DISTRIBUTION,
                });
            }
            if let Some(value) = map.pmc_wave_multiplier {
                check_tunable(name, "pmc_wave_multiplier", value)?;
            }
            if let Some(value) = map.scav_wave_multiplier {
                check_tunable(name, "scav_wave_multiplier", value)?;
            }
            if let Some(value) = map.pmc_wave_start_ratio {
                check_pace(name, "pmc_wave_start_ratio", value)?;
            }
            if let Some(value) = map.scav_wave_start_ratio {
                check_pace(name, "scav_wave_start_ratio", value)?;
            }
        }

        Ok(())
    }
}

fn check_tunable(scope: &str, name: &'static str, value: f64) -> Result<(), SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidTunable {
            scope: scope.to_owned(),
            name,
            value,
        })
    }
}

fn check_pace(scope: &str, name: &'static str, value: f64) -> Result<(), SettingsError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SettingsError::PaceRatioOutOfRange {
            scope: scope.to_owned(),
            name,
            value,
        })
    }
}

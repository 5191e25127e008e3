#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-map orchestration of the raid spawn builders.
//!
//! The planner owns the settings model, runs the escape-time guardrail over
//! every map, derives one independent random stream per map from the base
//! seed and drives the builders and the smoothing pass in a fixed order. A
//! given seed and settings document always yield the same [`RaidPlan`].
//! Boss invasion needs the bosses of every map and runs after the per-map
//! stage.

mod bosses;
mod plan;
mod seed;
mod settings;

pub use bosses::GRADUAL_INVASION_SPACING_SECS;
pub use plan::{
    plan_map, plan_raid, MapSpawnPlan, RaidPlan, POPULATION_DIFFICULTY_BIAS, RAIDER_NAME,
    ROGUE_NAME, SNIPER_WAVE_SPACING_SECS,
};
pub use seed::{derive_map_seed, invasion_rng, map_rng};
pub use settings::{
    BossSettings, GlobalSettings, MapSettings, RaidSettings, SettingsError, SpawnMode,
    DEFAULT_SEED, MAX_SMOOTHING_DISTRIBUTION,
};

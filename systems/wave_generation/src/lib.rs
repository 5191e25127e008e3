#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised builders that turn population targets into timed spawn events.
//!
//! Every builder is a pure function of its request, the zone pools it is
//! handed and the random source it draws from. Given the same seed and inputs
//! the produced events are identical, which is what the replay tests rely on.
//! Builders never fail: out-of-range rolls are clamped to safe minimums and a
//! missing zone degrades to [`Zone::unassigned`](raid_spawns_core::Zone::unassigned).

mod difficulty;
mod encounters;
mod infected;
mod linear;
mod slot_budget;
mod zones;

pub use difficulty::roll_difficulty;
pub use encounters::{build_encounter, EncounterRequest, ENCOUNTER_TIME_SCALE};
pub use infected::{
    build_infected_waves, swarm_health_profile, InfectedSwarmRequest, SWARM_GROUP_CHANCE,
    SWARM_MAX_ESCORTS,
};
pub use linear::{
    build_linear_waves, LinearVariant, LinearWaveRequest, BUDGETED_WINDOW_SLACK_SECS,
    CAPACITY_HEADROOM, COMPACT_WINDOW_SLACK_SECS,
};
pub use slot_budget::{build_slot_budget_waves, SlotBudgetRequest, MARKSMAN_CHANCE};
pub use zones::select_zone;

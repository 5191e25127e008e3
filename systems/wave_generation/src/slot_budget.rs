use raid_spawns_core::{
    clamp_seconds, round_half_up, Category, EscortAmount, SpawnEvent, SpawnTime, Zone, MAX_CHANCE,
};
use rand::Rng;

use crate::difficulty::roll_difficulty;

/// Spawn chance assigned to marksman-style single-actor categories.
pub const MARKSMAN_CHANCE: u8 = 80;

/// Parameters for a population-budget driven schedule of escorted spawns.
#[derive(Clone, Debug, PartialEq)]
pub struct SlotBudgetRequest {
    /// Category every produced event is tagged with.
    pub category: Category,
    /// Actors to distribute across the raid.
    pub population_total: u32,
    /// Raid length in seconds.
    pub escape_time_limit_secs: u32,
    /// Largest escort roll; values below one are treated as one.
    pub max_escort_size: u32,
    /// Probability in `0.0..=1.0` that a wave carries escorts at all.
    pub group_chance: f64,
    /// Bias added to every difficulty roll.
    pub difficulty_bias: f64,
    /// Whether the host must spawn the events regardless of limits.
    pub force_spawn: bool,
    /// Above one pushes activity later, below one compresses the usable window.
    pub distribution_factor: f64,
    /// Start offset used when the distribution factor does not push later.
    pub start_delay_secs: u32,
}

impl SlotBudgetRequest {
    /// Creates a neutral request: no escorts, no bias, even distribution.
    #[must_use]
    pub fn new(category: Category, population_total: u32, escape_time_limit_secs: u32) -> Self {
        Self {
            category,
            population_total,
            escape_time_limit_secs,
            max_escort_size: 1,
            group_chance: 0.0,
            difficulty_bias: 0.0,
            force_spawn: false,
            distribution_factor: 1.0,
            start_delay_secs: 0,
        }
    }
}

/// Start clock shared by the population-budget builders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SlotSchedule {
    next_start: i64,
    average_interval: i64,
}

impl SlotSchedule {
    /// Anchors the clock; `population_total` must be non-zero.
    pub(crate) fn new(
        population_total: u32,
        escape_time_limit_secs: u32,
        distribution_factor: f64,
        start_delay_secs: u32,
    ) -> Self {
        let limit = f64::from(escape_time_limit_secs);
        let start = if distribution_factor > 1.0 {
            round_half_up((distribution_factor - 1.0) * limit)
        } else {
            i64::from(start_delay_secs)
        };
        let effective = if distribution_factor < 1.0 {
            round_half_up(limit * distribution_factor)
        } else {
            round_half_up(limit - start as f64)
        }
        .max(0);
        let average_interval =
            round_half_up(effective as f64 / f64::from(population_total.max(1)));

        Self {
            next_start: start,
            average_interval,
        }
    }

    /// Returns the start of the current wave and advances past `wave_count` actors.
    pub(crate) fn advance(&mut self, wave_count: u32) -> u32 {
        let at = clamp_seconds(self.next_start);
        self.next_start += round_half_up(f64::from(wave_count) * self.average_interval as f64);
        at
    }
}

/// Builds escorted point-in-time spawns until the population budget is spent.
///
/// Each wave rolls whether it carries escorts, how many, and its difficulty;
/// the zone is picked by mapping the population consumed so far proportionally
/// onto `zone_pool`. Marksman categories count as a single actor when
/// advancing the clock and spawn with [`MARKSMAN_CHANCE`]. The budget counter
/// is decremented by the full group, so the emitted headcount overshoots
/// `population_total` by at most one wave.
pub fn build_slot_budget_waves<R: Rng + ?Sized>(
    request: &SlotBudgetRequest,
    zone_pool: &[Zone],
    rng: &mut R,
) -> Vec<SpawnEvent> {
    let total = request.population_total;
    if total == 0 {
        return Vec::new();
    }

    let marksman = request.category.is_marksman();
    let max_escorts = f64::from(request.max_escort_size.max(1));
    let chance = if marksman { MARKSMAN_CHANCE } else { MAX_CHANCE };
    let mut schedule = SlotSchedule::new(
        total,
        request.escape_time_limit_secs,
        request.distribution_factor,
        request.start_delay_secs,
    );
    let mut remaining = i64::from(total);
    let mut waves = Vec::new();

    while remaining > 0 {
        let allow_group = request.group_chance > rng.gen::<f64>();
        let escorts = if allow_group {
            u32::try_from(round_half_up(max_escorts * rng.gen::<f64>()).max(0)).unwrap_or(0)
        } else {
            0
        };
        let difficulty = roll_difficulty(request.difficulty_bias, rng);
        let consumed = i64::from(total) - remaining;
        let zone = proportional_zone(zone_pool, consumed, total);
        let wave_count = if marksman { 1 } else { escorts + 1 };
        let at = schedule.advance(wave_count);

        waves.push(
            SpawnEvent::escorted(
                request.category.clone(),
                SpawnTime::At(at),
                zone,
                difficulty,
                request.category.actor_name(),
                EscortAmount::Fixed(escorts),
            )
            .with_chance(chance)
            .with_force_spawn(request.force_spawn)
            .with_ignore_max_bots(true),
        );

        remaining -= i64::from(escorts) + 1;
    }

    tracing::debug!(
        target: "raid_spawns::waves",
        category = request.category.actor_name(),
        population = total,
        emitted = waves.len(),
        "slot budget waves built"
    );

    waves
}

/// Zone at `floor(consumed * len / total)`, unassigned when out of range.
fn proportional_zone(zone_pool: &[Zone], consumed: i64, total: u32) -> Zone {
    if consumed < 0 || zone_pool.is_empty() {
        return Zone::unassigned();
    }
    let scaled = consumed as u128 * zone_pool.len() as u128 / u128::from(total.max(1));
    usize::try_from(scaled)
        .ok()
        .and_then(|index| zone_pool.get(index))
        .cloned()
        .unwrap_or_default()
}

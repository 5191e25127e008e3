use raid_spawns_core::{
    round_half_up, Category, DifficultyTier, EscortAmount, HealthProfile, HealthRange,
    InfectedKind, SpawnEvent, SpawnTime, SwarmSupport, Zone, MAX_CHANCE,
};
use rand::Rng;

use crate::slot_budget::SlotSchedule;

/// Probability that a swarm wave brings companions.
pub const SWARM_GROUP_CHANCE: f64 = 0.2;
/// Largest number of companions a swarm wave may roll.
pub const SWARM_MAX_ESCORTS: u32 = 4;

/// Parameters for the infected swarm schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfectedSwarmRequest {
    /// Actors to distribute across the raid.
    pub population_total: u32,
    /// Raid length in seconds.
    pub escape_time_limit_secs: u32,
    /// Above one pushes activity later, below one compresses the usable window.
    pub distribution_factor: f64,
    /// Spawn chance in percent applied to every swarm wave.
    pub chance: u8,
}

impl InfectedSwarmRequest {
    /// Creates a request with an even distribution and a guaranteed spawn chance.
    #[must_use]
    pub const fn new(population_total: u32, escape_time_limit_secs: u32) -> Self {
        Self {
            population_total,
            escape_time_limit_secs,
            distribution_factor: 1.0,
            chance: MAX_CHANCE,
        }
    }
}

/// Builds infected swarm spawns until the population budget is spent.
///
/// Swarms are never zone-targeted; the host resolves their placement. The
/// primary actor and every companion roll their subtype independently.
pub fn build_infected_waves<R: Rng + ?Sized>(
    request: &InfectedSwarmRequest,
    rng: &mut R,
) -> Vec<SpawnEvent> {
    let total = request.population_total;
    if total == 0 {
        return Vec::new();
    }

    let mut schedule = SlotSchedule::new(
        total,
        request.escape_time_limit_secs,
        request.distribution_factor,
        0,
    );
    let mut remaining = i64::from(total);
    let mut waves = Vec::new();

    while remaining > 0 {
        let allow_group = SWARM_GROUP_CHANCE > rng.gen::<f64>();
        let companions = if allow_group {
            let rolled = round_half_up(f64::from(SWARM_MAX_ESCORTS) * rng.gen::<f64>());
            u32::try_from(rolled.max(0)).unwrap_or(0)
        } else {
            0
        };

        let primary = roll_infected_kind(rng);
        let supports = (0..companions)
            .map(|_| SwarmSupport {
                kind: roll_infected_kind(rng),
                difficulty: DifficultyTier::Normal,
                amount: 1,
            })
            .collect();
        let at = schedule.advance(companions + 1);

        waves.push(
            SpawnEvent::escorted(
                Category::Infected(primary),
                SpawnTime::At(at),
                Zone::unassigned(),
                DifficultyTier::Normal,
                primary.actor_name(),
                EscortAmount::Fixed(0),
            )
            .with_supports(supports)
            .with_chance(request.chance),
        );

        remaining -= i64::from(companions) + 1;
    }

    tracing::debug!(
        target: "raid_spawns::waves",
        population = total,
        emitted = waves.len(),
        "infected swarm built"
    );

    waves
}

/// Derives the body-part durability applied to every swarm subtype.
///
/// A scale of `1.0` yields the stock profile; every part scales linearly.
#[must_use]
pub fn swarm_health_profile(health_scale: f64) -> HealthProfile {
    let part = |base: f64| {
        let value = round_half_up(base * health_scale).max(0);
        HealthRange::exact(u32::try_from(value).unwrap_or(u32::MAX))
    };
    let arm = part(70.0);
    let leg = part(80.0);

    HealthProfile {
        head: part(35.0),
        chest: part(100.0),
        stomach: part(100.0),
        left_arm: arm,
        right_arm: arm,
        left_leg: leg,
        right_leg: leg,
    }
}

fn roll_infected_kind<R: Rng + ?Sized>(rng: &mut R) -> InfectedKind {
    InfectedKind::ALL[rng.gen_range(0..InfectedKind::ALL.len())]
}

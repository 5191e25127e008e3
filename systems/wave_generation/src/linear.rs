use raid_spawns_core::{
    clamp_seconds, round_half_up, Category, SpawnEvent, TimeWindow, Zone, ZoneStack,
};
use rand::Rng;

use crate::{difficulty::roll_difficulty, zones::select_zone};

/// Window slack used by [`LinearVariant::Compact`].
pub const COMPACT_WINDOW_SLACK_SECS: u32 = 10;
/// Window slack used by [`LinearVariant::Budgeted`].
pub const BUDGETED_WINDOW_SLACK_SECS: u32 = 60;
/// Multiplier applied to the wave target to seed the budgeted capacity counter.
pub const CAPACITY_HEADROOM: f64 = 1.3;

/// Waves beyond which the first third of the schedule is accelerated.
const ACCELERATION_MIN_WAVES: u32 = 5;
/// Divisor applied to the early interval while accelerating.
const ACCELERATION_DIVISOR: f64 = 3.0;

/// Flavour of the linear builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LinearVariant {
    /// Narrow windows, no population cap, minimum group size of zero.
    Compact,
    /// Wide windows, a capacity counter bounding total population and a rolled
    /// minimum group size.
    #[default]
    Budgeted,
}

impl LinearVariant {
    /// Seconds added to a wave's start to form its window.
    #[must_use]
    pub const fn window_slack(self) -> u32 {
        match self {
            Self::Compact => COMPACT_WINDOW_SLACK_SECS,
            Self::Budgeted => BUDGETED_WINDOW_SLACK_SECS,
        }
    }

    fn capacity(self, total_waves: u32) -> Option<i64> {
        match self {
            Self::Compact => None,
            Self::Budgeted => Some(round_half_up(CAPACITY_HEADROOM * f64::from(total_waves))),
        }
    }
}

/// Parameters for one faction category's linear wave schedule.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearWaveRequest {
    /// Category every produced wave is tagged with.
    pub category: Category,
    /// Nominal number of waves.
    pub total_waves: u32,
    /// Seconds the schedule is spread across.
    pub time_budget_secs: u32,
    /// Spread between early and late intervals, `0.0..=1.0`.
    pub pace_ratio: f64,
    /// Bias added to every difficulty roll.
    pub difficulty_bias: f64,
    /// Whether the waves belong to a player-like faction.
    pub is_player: bool,
    /// Largest group a wave may roll; values below one are treated as one.
    pub max_group_size: u32,
    /// Seconds before the first wave; zero pins the first wave to raid start.
    pub start_offset_secs: u32,
    /// Draw group sizes from `U(0,1)` instead of the small-biased `U(0,1)²`.
    pub richer_groups: bool,
    /// Builder flavour.
    pub variant: LinearVariant,
}

impl LinearWaveRequest {
    /// Creates a request with neutral pacing, no bias and single-actor groups.
    #[must_use]
    pub fn new(category: Category, total_waves: u32, time_budget_secs: u32) -> Self {
        Self {
            category,
            total_waves,
            time_budget_secs,
            pace_ratio: 0.0,
            difficulty_bias: 0.0,
            is_player: false,
            max_group_size: 1,
            start_offset_secs: 0,
            richer_groups: false,
            variant: LinearVariant::default(),
        }
    }
}

/// Lengths of the pacing stages derived from the average interval.
#[derive(Clone, Copy, Debug)]
struct Pacing {
    early: i64,
    late: i64,
    half: f64,
    third: f64,
    accelerates: bool,
}

impl Pacing {
    fn new(request: &LinearWaveRequest) -> Self {
        let total = f64::from(request.total_waves);
        let average = f64::from(request.time_budget_secs) / total;
        Self {
            early: round_half_up(average * (1.0 - request.pace_ratio)),
            late: round_half_up(average * (1.0 + request.pace_ratio)),
            half: round_half_up(total * 0.5) as f64,
            third: total / 3.0,
            accelerates: request.total_waves > ACCELERATION_MIN_WAVES,
        }
    }

    /// Seconds between wave `emitted` and the next one.
    fn stage(&self, emitted: usize) -> i64 {
        let emitted = emitted as f64;
        let stage = if emitted < self.half {
            if self.accelerates && emitted < self.third {
                round_half_up(self.early as f64 / ACCELERATION_DIVISOR)
            } else {
                self.early
            }
        } else {
            self.late
        };
        stage.max(0)
    }
}

/// Builds a fast-then-slow schedule of windowed waves for one category.
///
/// After the nominal count is reached the builder keeps emitting waves forced
/// onto `reserved_zones` until that pool is drained, so every reserved zone
/// receives a dedicated wave. The budgeted variant additionally stops once the
/// rolled group sizes exhaust its capacity counter.
pub fn build_linear_waves<R: Rng + ?Sized>(
    request: &LinearWaveRequest,
    shared_zones: &[Zone],
    reserved_zones: &mut ZoneStack,
    rng: &mut R,
) -> Vec<SpawnEvent> {
    let total = request.total_waves as usize;
    if total == 0 {
        return Vec::new();
    }

    let pacing = Pacing::new(request);
    let slack = request.variant.window_slack();
    let max_group = request.max_group_size.max(1);
    let mut remaining_capacity = request.variant.capacity(request.total_waves);
    let mut clock = i64::from(request.start_offset_secs);
    let mut waves = Vec::with_capacity(total + reserved_zones.len());

    while waves.len() < total || !reserved_zones.is_empty() {
        let emitted = waves.len();
        let window = if emitted == 0 && request.start_offset_secs == 0 {
            TimeWindow::at_start()
        } else {
            let start = clamp_seconds(clock);
            TimeWindow::new(start, start.saturating_add(slack))
        };
        clock += pacing.stage(emitted);

        let difficulty = roll_difficulty(request.difficulty_bias, rng);
        let group_size = roll_group_size(max_group, request.richer_groups, rng);
        let min_group = match request.variant {
            LinearVariant::Compact => 0,
            LinearVariant::Budgeted => {
                roll_min_group(group_size, request.category.is_marksman(), rng)
            }
        };
        let zone = select_zone(shared_zones, reserved_zones, emitted >= total, rng);

        waves.push(
            SpawnEvent::wave(
                request.category.clone(),
                window,
                zone,
                difficulty,
                min_group,
                group_size,
            )
            .with_player(request.is_player),
        );

        if let Some(capacity) = remaining_capacity.as_mut() {
            *capacity -= i64::from(group_size);
            if *capacity <= 0 {
                break;
            }
        }
    }

    tracing::debug!(
        target: "raid_spawns::waves",
        category = request.category.actor_name(),
        requested = request.total_waves,
        emitted = waves.len(),
        reserved_left = reserved_zones.len(),
        "linear waves built"
    );

    waves
}

/// Rolls a group size in `1..=max_group`.
fn roll_group_size<R: Rng + ?Sized>(max_group: u32, richer_groups: bool, rng: &mut R) -> u32 {
    let scale = if richer_groups {
        rng.gen::<f64>()
    } else {
        rng.gen::<f64>() * rng.gen::<f64>()
    };
    let rolled = round_half_up(scale * f64::from(max_group));
    u32::try_from(rolled.max(1)).unwrap_or(max_group)
}

/// Rolls the lower bound the host may spawn for a group of `group_size`.
fn roll_min_group<R: Rng + ?Sized>(group_size: u32, marksman: bool, rng: &mut R) -> u32 {
    let rolled = round_half_up(rng.gen::<f64>() * f64::from(group_size)).max(1) - 1;
    let floor = if marksman { 1 } else { 0 };
    u32::try_from(rolled).unwrap_or(0).max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raid_spawns_core::{Group, SpawnTime};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn group_bounds(event: &SpawnEvent) -> (u32, u32) {
        match event.group() {
            Group::Squad { min, max } => (*min, *max),
            other => panic!("linear waves are squads, got {other:?}"),
        }
    }

    fn window(event: &SpawnEvent) -> TimeWindow {
        match event.time() {
            SpawnTime::Window(window) => window,
            other => panic!("linear waves are windowed, got {other:?}"),
        }
    }

    #[test]
    fn zero_waves_yield_nothing_even_with_reserved_zones() {
        let request = LinearWaveRequest::new(Category::Scavenger, 0, 600);
        let mut reserved = ZoneStack::new(vec![Zone::from("Nest")]);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        assert!(build_linear_waves(&request, &[], &mut reserved, &mut rng).is_empty());
        assert_eq!(reserved.len(), 1);
    }

    #[test]
    fn pacing_accelerates_then_slows() {
        let request = LinearWaveRequest {
            pace_ratio: 0.4,
            ..LinearWaveRequest::new(Category::Scavenger, 10, 600)
        };
        let pacing = Pacing::new(&request);
        assert_eq!(pacing.early, 36);
        assert_eq!(pacing.late, 84);
        let stages: Vec<_> = (0..10).map(|emitted| pacing.stage(emitted)).collect();
        assert_eq!(stages, vec![12, 12, 12, 12, 36, 84, 84, 84, 84, 84]);
    }

    #[test]
    fn small_schedules_do_not_accelerate() {
        let request = LinearWaveRequest::new(Category::Scavenger, 4, 400);
        let pacing = Pacing::new(&request);
        assert_eq!(pacing.stage(0), 100);
    }

    #[test]
    fn offset_schedules_start_at_the_offset() {
        let request = LinearWaveRequest {
            start_offset_secs: 15,
            variant: LinearVariant::Budgeted,
            ..LinearWaveRequest::new(Category::RivalA, 3, 300)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let waves = build_linear_waves(&request, &[], &mut ZoneStack::default(), &mut rng);

        let first = window(&waves[0]);
        assert_eq!(first.min(), 15);
        assert_eq!(first.max(), 15 + BUDGETED_WINDOW_SLACK_SECS);
    }

    #[test]
    fn forced_waves_drain_reserved_zones_in_pop_order() {
        let request = LinearWaveRequest {
            variant: LinearVariant::Compact,
            ..LinearWaveRequest::new(Category::Scavenger, 3, 900)
        };
        let shared = vec![Zone::from("Open")];
        let mut reserved = ZoneStack::new(vec![
            Zone::from("NestA"),
            Zone::from("NestB"),
            Zone::from("NestC"),
            Zone::from("NestD"),
        ]);
        let mut rng = ChaCha8Rng::seed_from_u64(21);

        let waves = build_linear_waves(&request, &shared, &mut reserved, &mut rng);

        assert!(reserved.is_empty());
        let zones: Vec<_> = waves.iter().map(|wave| wave.zone().as_str()).collect();
        assert_eq!(
            zones,
            vec!["Open", "Open", "Open", "NestD", "NestC", "NestB", "NestA"]
        );

        assert_eq!(window(&waves[0]), TimeWindow::at_start());
        for wave in &waves[1..] {
            let span = window(wave);
            assert_eq!(span.max() - span.min(), COMPACT_WINDOW_SLACK_SECS);
        }
    }

    #[test]
    fn marksman_minimum_group_is_at_least_one() {
        let request = LinearWaveRequest {
            max_group_size: 3,
            ..LinearWaveRequest::new(Category::Specialist, 40, 2_400)
        };
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let waves = build_linear_waves(&request, &[], &mut ZoneStack::default(), &mut rng);

        assert!(!waves.is_empty());
        for wave in &waves {
            let (min, max) = group_bounds(wave);
            assert!(min >= 1 && min <= max, "min {min} max {max}");
        }
    }

    #[test]
    fn group_rolls_stay_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..1_000 {
            let small = roll_group_size(6, false, &mut rng);
            let rich = roll_group_size(6, true, &mut rng);
            assert!((1..=6).contains(&small));
            assert!((1..=6).contains(&rich));
            let min = roll_min_group(rich, false, &mut rng);
            assert!(min < rich, "min {min} rich {rich}");
        }
    }
}

use std::collections::BTreeMap;

use raid_spawns_core::{
    assign_ordinals, round_half_up, Category, DifficultyTier, EscortAmount, HealthProfile,
    InfectedKind, SpawnEvent, TimeWindow, Zone, ZoneStack,
};
use raid_spawns_system_escape_time::{apply_guardrail, EscapeTimeLimits};
use raid_spawns_system_smoothing::smooth_timeline;
use raid_spawns_system_wave_generation::{
    build_encounter, build_infected_waves, build_linear_waves, build_slot_budget_waves,
    swarm_health_profile, EncounterRequest, InfectedSwarmRequest, LinearWaveRequest,
    SlotBudgetRequest,
};
use rand::{seq::SliceRandom, Rng};
use serde::Serialize;

use crate::{
    bosses::{boss_event, capped_chance, invade, map_roster},
    seed::map_rng,
    settings::{GlobalSettings, MapSettings, RaidSettings, SettingsError, SpawnMode},
};

/// Difficulty bias of rival and scavenger schedules.
pub const POPULATION_DIFFICULTY_BIAS: f64 = 0.4;
/// Seconds between consecutive marksman waves.
pub const SNIPER_WAVE_SPACING_SECS: u32 = 120;
/// Actor name of the injected raider encounter.
pub const RAIDER_NAME: &str = "pmcBot";
/// Actor name of the injected rogue encounter.
pub const ROGUE_NAME: &str = "exUsec";

const RIVAL_A_START_OFFSET_SECS: u32 = 15;
const RIVAL_B_START_OFFSET_SECS: u32 = 5;
const ENCOUNTER_ESCORT_CHOICES: [u32; 5] = [1, 2, 2, 2, 3];

/// Generated schedule of one map.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct MapSpawnPlan {
    /// Map name.
    pub map: String,
    /// Raid duration the schedule was generated against, in minutes.
    pub escape_minutes: u32,
    /// Windowed waves sorted by start and numbered from one.
    pub waves: Vec<SpawnEvent>,
    /// Point-in-time spawns: fixed encounters first, then the re-spaced ones,
    /// then any invading bosses.
    pub boss_spawns: Vec<SpawnEvent>,
    /// Guardrail adjustments applied to this map.
    pub notices: Vec<String>,
}

impl MapSpawnPlan {
    /// Actors whose count is known up front, summed over every event.
    #[must_use]
    pub fn known_population(&self) -> u32 {
        self.waves
            .iter()
            .chain(&self.boss_spawns)
            .filter_map(|event| event.group().headcount())
            .sum()
    }
}

/// Result of a planning run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RaidPlan {
    /// Base seed the per-map streams were derived from.
    pub seed: u64,
    /// Whether starting mid-raid actors survived the guardrail.
    pub starting_actors: bool,
    /// Body-part durability applied to every infected subtype, keyed by bot type.
    pub infected_health: BTreeMap<String, HealthProfile>,
    /// Per-map schedules in map name order.
    pub maps: Vec<MapSpawnPlan>,
}

/// Validates `settings` and plans every configured map, or only `only_map`.
///
/// The guardrail runs over all maps before anything is generated, so a long
/// raid on any map disables starting actors for the whole run. Boss invasion
/// runs last, once every selected map is planned.
///
/// # Errors
///
/// Returns [`SettingsError`] when validation fails or `only_map` is not
/// configured.
pub fn plan_raid(
    settings: &RaidSettings,
    only_map: Option<&str>,
) -> Result<RaidPlan, SettingsError> {
    settings.validate()?;
    if let Some(map) = only_map {
        if !settings.maps.contains_key(map) {
            return Err(SettingsError::UnknownMap {
                map: map.to_owned(),
            });
        }
    }

    let global = &settings.global;
    let mut starting_actors = global.starting_pmcs;
    let mut guarded = Vec::with_capacity(settings.maps.len());
    for (name, map) in &settings.maps {
        let mut limits = EscapeTimeLimits::new(map.default_escape_time, map.escape_time);
        if let Some(minutes) = map.escape_time_override {
            limits = limits.with_override(minutes);
        }
        let outcome = apply_guardrail(name, limits, starting_actors);
        starting_actors = outcome.starting_actors;
        for warning in &outcome.warnings {
            tracing::warn!(target: "raid_spawns::planner", map = name.as_str(), "{warning}");
        }
        guarded.push((name, map, outcome));
    }

    let mut maps: Vec<MapSpawnPlan> = guarded
        .into_iter()
        .filter(|(name, ..)| only_map.map_or(true, |only| only == name.as_str()))
        .map(|(name, map, outcome)| {
            let mut rng = map_rng(global.seed, name);
            let mut plan = plan_map(name, map, global, outcome.escape_minutes, &mut rng);
            plan.notices = outcome.warnings.iter().map(ToString::to_string).collect();
            plan
        })
        .collect();
    invade(&mut maps, settings);

    Ok(RaidPlan {
        seed: global.seed,
        starting_actors,
        infected_health: infected_health_overrides(global.infected_health),
        maps,
    })
}

/// Generates the schedule of one map whose duration already passed the guardrail.
pub fn plan_map<R: Rng + ?Sized>(
    name: &str,
    map: &MapSettings,
    global: &GlobalSettings,
    escape_minutes: u32,
    rng: &mut R,
) -> MapSpawnPlan {
    let time_budget = escape_minutes.saturating_mul(60);
    let shared = shared_zone_pool(map, rng);
    let (first_half, second_half) = split_hot_zones(&map.pmc_hot_zones);
    let rival_hot = if rng.gen::<f64>() > 0.5 {
        [first_half, second_half]
    } else {
        [second_half, first_half]
    };
    let population = PopulationPlan {
        map,
        global,
        time_budget,
        pmc_per_side: scaled_count(map.pmc_wave_count, map.pmc_multiplier(global) / 2.0),
        scav_total: scaled_count(map.scav_wave_count, map.scav_multiplier(global)),
        shared: &shared,
        rival_hot,
    };

    let mut waves = Vec::new();
    let mut boss_spawns: Vec<SpawnEvent> =
        map_roster(map, global).iter().map(boss_event).collect();
    match global.spawn_mode {
        SpawnMode::Waves => waves = population.linear_waves(rng),
        SpawnMode::BossStyle => boss_spawns.extend(population.slot_budget_spawns(rng)),
    }
    boss_spawns.extend(infected_waves(map, global, escape_minutes, rng));

    let encounter_zone = Zone::new(
        shared
            .iter()
            .map(Zone::as_str)
            .collect::<Vec<_>>()
            .join(","),
    );
    if global.random_raider_group {
        boss_spawns.push(encounter(
            RAIDER_NAME,
            global.random_raider_group_chance,
            &encounter_zone,
            escape_minutes,
            rng,
        ));
    }
    if global.random_rogue_group {
        boss_spawns.push(encounter(
            ROGUE_NAME,
            global.random_rogue_group_chance,
            &encounter_zone,
            escape_minutes,
            rng,
        ));
    }
    let boss_spawns = smooth_timeline(boss_spawns, map.smoothing_distribution);

    if global.debug {
        let all = || waves.iter().chain(&boss_spawns);
        let rivals = headcount(all(), |category| {
            matches!(category, Category::RivalA | Category::RivalB)
        });
        let scavs = headcount(all(), |category| category == &Category::Scavenger);
        let infected = headcount(all(), |category| matches!(category, Category::Infected(_)));
        tracing::info!(
            target: "raid_spawns::planner",
            map = name,
            rivals,
            scavs,
            infected,
            "population totals"
        );
    }
    tracing::debug!(
        target: "raid_spawns::planner",
        map = name,
        escape_minutes,
        waves = waves.len(),
        boss_spawns = boss_spawns.len(),
        "map planned"
    );

    MapSpawnPlan {
        map: name.to_owned(),
        escape_minutes,
        waves,
        boss_spawns,
        notices: Vec::new(),
    }
}

/// Inputs shared by the population builders of one map.
struct PopulationPlan<'a> {
    map: &'a MapSettings,
    global: &'a GlobalSettings,
    time_budget: u32,
    pmc_per_side: u32,
    scav_total: u32,
    shared: &'a [Zone],
    rival_hot: [Vec<Zone>; 2],
}

impl PopulationPlan<'_> {
    fn linear_waves<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SpawnEvent> {
        let (map, global) = (self.map, self.global);
        let mut waves = sniper_waves(&map.sniper_zones, global.sniper_buddies, rng);

        let scavs = LinearWaveRequest {
            pace_ratio: map.scav_pace(global),
            difficulty_bias: POPULATION_DIFFICULTY_BIAS,
            max_group_size: global.group_max_scav,
            ..LinearWaveRequest::new(Category::Scavenger, self.scav_total, self.time_budget)
        };
        let mut scav_hot = ZoneStack::new(map.scav_hot_zones.clone());
        waves.extend(build_linear_waves(&scavs, self.shared, &mut scav_hot, rng));

        let rivals = [
            (Category::RivalA, RIVAL_A_START_OFFSET_SECS),
            (Category::RivalB, RIVAL_B_START_OFFSET_SECS),
        ];
        for ((category, offset), hot) in rivals.into_iter().zip(&self.rival_hot) {
            let request = LinearWaveRequest {
                pace_ratio: map.pmc_pace(global),
                difficulty_bias: POPULATION_DIFFICULTY_BIAS,
                is_player: true,
                max_group_size: global.group_max_pmc,
                start_offset_secs: offset,
                richer_groups: true,
                ..LinearWaveRequest::new(category, self.pmc_per_side, self.time_budget)
            };
            let mut reserved = ZoneStack::new(hot.clone());
            waves.extend(build_linear_waves(&request, self.shared, &mut reserved, rng));
        }

        assign_ordinals(&mut waves);
        waves
    }

    fn slot_budget_spawns<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<SpawnEvent> {
        let (map, global) = (self.map, self.global);
        let request = |category: Category, population: u32| SlotBudgetRequest {
            start_delay_secs: map.initial_spawn_delay,
            ..SlotBudgetRequest::new(category, population, self.time_budget)
        };

        let snipers = SlotBudgetRequest {
            force_spawn: true,
            group_chance: if global.sniper_buddies { 1.0 } else { 0.0 },
            ..request(Category::Specialist, count_of(&map.sniper_zones))
        };
        let mut spawns = build_slot_budget_waves(&snipers, &map.sniper_zones, rng);

        let scavs = SlotBudgetRequest {
            max_escort_size: global.group_max_scav.saturating_sub(1),
            group_chance: global.scav_group_chance,
            difficulty_bias: POPULATION_DIFFICULTY_BIAS,
            ..request(Category::Scavenger, self.scav_total)
        };
        let scav_pool = [map.scav_hot_zones.as_slice(), self.shared].concat();
        spawns.extend(build_slot_budget_waves(&scavs, &scav_pool, rng));

        let sides = [Category::RivalA, Category::RivalB];
        for (category, hot) in sides.into_iter().zip(&self.rival_hot) {
            let rivals = SlotBudgetRequest {
                max_escort_size: global.group_max_pmc.saturating_sub(1),
                group_chance: global.pmc_group_chance,
                difficulty_bias: POPULATION_DIFFICULTY_BIAS,
                ..request(category, self.pmc_per_side)
            };
            let pool = [hot.as_slice(), self.shared].concat();
            spawns.extend(
                build_slot_budget_waves(&rivals, &pool, rng)
                    .into_iter()
                    .map(|spawn| spawn.with_player(true)),
            );
        }

        spawns
    }
}

/// Open zones without duplicates or marksman nests, in shuffled order.
fn shared_zone_pool<R: Rng + ?Sized>(map: &MapSettings, rng: &mut R) -> Vec<Zone> {
    let mut shared: Vec<Zone> = Vec::with_capacity(map.open_zones.len());
    for zone in &map.open_zones {
        if !shared.contains(zone) && !map.sniper_zones.contains(zone) && !zone.is_unassigned() {
            shared.push(zone.clone());
        }
    }
    shared.shuffle(rng);
    shared
}

/// Splits hot zones after `ceil(len / 2)` entries.
fn split_hot_zones(hot: &[Zone]) -> (Vec<Zone>, Vec<Zone>) {
    let (first, second) = hot.split_at(hot.len().div_ceil(2));
    (first.to_vec(), second.to_vec())
}

/// One marksman wave per nest, staggered by [`SNIPER_WAVE_SPACING_SECS`].
fn sniper_waves<R: Rng + ?Sized>(nests: &[Zone], buddies: bool, rng: &mut R) -> Vec<SpawnEvent> {
    let mut nests = nests.to_vec();
    nests.shuffle(rng);
    let group_size = if buddies { 2 } else { 1 };

    nests
        .into_iter()
        .zip(0_u32..)
        .map(|(zone, slot)| {
            let start = slot.saturating_mul(SNIPER_WAVE_SPACING_SECS);
            let window = TimeWindow::new(start, start.saturating_add(SNIPER_WAVE_SPACING_SECS));
            SpawnEvent::wave(
                Category::Specialist,
                window,
                zone,
                DifficultyTier::Normal,
                0,
                group_size,
            )
        })
        .collect()
}

fn infected_waves<R: Rng + ?Sized>(
    map: &MapSettings,
    global: &GlobalSettings,
    escape_minutes: u32,
    rng: &mut R,
) -> Vec<SpawnEvent> {
    if map.infected_wave_count == 0 {
        return Vec::new();
    }
    let default = f64::from(map.default_escape_time.max(1));
    let duration_ratio = round_half_up(f64::from(escape_minutes) / default) as f64;
    let population = scaled_count(
        map.infected_wave_count,
        global.infected_wave_quantity * duration_ratio,
    );
    let request = InfectedSwarmRequest {
        distribution_factor: global.infected_distribution,
        chance: capped_chance(global.infected_chance),
        ..InfectedSwarmRequest::new(population, escape_minutes.saturating_mul(60))
    };
    build_infected_waves(&request, rng)
}

fn encounter<R: Rng + ?Sized>(
    name: &str,
    chance: u32,
    zone: &Zone,
    escape_minutes: u32,
    rng: &mut R,
) -> SpawnEvent {
    let request = EncounterRequest {
        chance: capped_chance(chance),
        escorts: EscortAmount::Choices(ENCOUNTER_ESCORT_CHOICES.to_vec()),
        escort_type: name.to_owned(),
        name: name.to_owned(),
        zone: zone.clone(),
        raid_duration: Some(escape_minutes),
    };
    build_encounter(request, rng)
}

fn infected_health_overrides(health_scale: f64) -> BTreeMap<String, HealthProfile> {
    let profile = swarm_health_profile(health_scale);
    InfectedKind::ALL
        .into_iter()
        .map(|kind| (kind.bot_type_key().to_owned(), profile))
        .collect()
}

fn headcount<'a>(
    events: impl Iterator<Item = &'a SpawnEvent>,
    selects: impl Fn(&Category) -> bool,
) -> u32 {
    events
        .filter(|event| selects(event.category()))
        .filter_map(|event| event.group().headcount())
        .sum()
}

fn scaled_count(count: u32, factor: f64) -> u32 {
    let scaled = round_half_up(f64::from(count) * factor).max(0);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn count_of(zones: &[Zone]) -> u32 {
    u32::try_from(zones.len()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BossSettings;
    use raid_spawns_core::{Group, SpawnTime, MAX_CHANCE};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn zones(names: &[&str]) -> Vec<Zone> {
        names.iter().copied().map(Zone::from).collect()
    }

    fn customs() -> MapSettings {
        MapSettings {
            default_escape_time: 40,
            escape_time: 40,
            pmc_wave_count: 8,
            scav_wave_count: 10,
            open_zones: zones(&["Dorms", "Gas", "Crossroads", "Tower", "Dorms"]),
            pmc_hot_zones: zones(&["HotA", "HotB", "HotC"]),
            scav_hot_zones: zones(&["Stronghold"]),
            sniper_zones: zones(&["Tower", "Nest"]),
            bosses: vec![BossSettings {
                name: "bossBully".to_owned(),
                time: Some(90),
                chance: 35,
                zone: Zone::from("Dorms"),
                escorts: EscortAmount::Fixed(4),
                escort_type: Some("followerBully".to_owned()),
                difficulty: DifficultyTier::Hard,
            }],
            ..MapSettings::default()
        }
    }

    #[test]
    fn hot_zones_split_after_the_rounded_up_middle() {
        let (first, second) = split_hot_zones(&zones(&["A", "B", "C"]));
        assert_eq!(first, zones(&["A", "B"]));
        assert_eq!(second, zones(&["C"]));

        let (first, second) = split_hot_zones(&[]);
        assert!(first.is_empty() && second.is_empty());
    }

    #[test]
    fn shared_pool_drops_duplicates_and_nests() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut shared = shared_zone_pool(&customs(), &mut rng);
        shared.sort();
        assert_eq!(shared, zones(&["Crossroads", "Dorms", "Gas"]));
    }

    #[test]
    fn sniper_waves_are_staggered_per_nest() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let waves = sniper_waves(&zones(&["N1", "N2", "N3"]), true, &mut rng);

        let windows: Vec<_> = waves
            .iter()
            .map(|wave| match wave.time() {
                SpawnTime::Window(window) => (window.min(), window.max()),
                other => panic!("unexpected schedule {other:?}"),
            })
            .collect();
        assert_eq!(windows, vec![(0, 120), (120, 240), (240, 360)]);
        assert!(waves
            .iter()
            .all(|wave| wave.group() == &Group::Squad { min: 0, max: 2 }));
        let mut used: Vec<_> = waves.iter().map(|wave| wave.zone().clone()).collect();
        used.sort();
        assert_eq!(used, zones(&["N1", "N2", "N3"]));
    }

    #[test]
    fn wave_mode_covers_every_hot_zone_and_numbers_waves() {
        let global = GlobalSettings {
            group_max_pmc: 1,
            group_max_scav: 1,
            ..GlobalSettings::default()
        };
        let map = MapSettings {
            pmc_wave_count: 20,
            ..customs()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let plan = plan_map("customs", &map, &global, 40, &mut rng);

        for hot in ["HotA", "HotB", "HotC"] {
            assert!(
                plan.waves.iter().any(|wave| wave.zone().as_str() == hot
                    && matches!(wave.category(), Category::RivalA | Category::RivalB)),
                "hot zone {hot} has a rival wave"
            );
        }
        assert!(plan.waves.iter().any(|wave| wave.zone().as_str() == "Stronghold"
            && wave.category() == &Category::Scavenger));

        let ordinals: Vec<_> = plan.waves.iter().map(SpawnEvent::ordinal).collect();
        let expected: Vec<_> = (1..=plan.waves.len() as u32).map(Some).collect();
        assert_eq!(ordinals, expected);
        let starts: Vec<_> = plan.waves.iter().map(|wave| wave.time().start()).collect();
        assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(plan
            .waves
            .iter()
            .filter(|wave| matches!(wave.category(), Category::RivalA | Category::RivalB))
            .all(SpawnEvent::is_player));

        assert_eq!(plan.boss_spawns.len(), 1);
        assert_eq!(plan.boss_spawns[0].time(), SpawnTime::At(90));
        assert_eq!(plan.boss_spawns[0].chance(), 35);
    }

    #[test]
    fn infected_population_scales_with_duration_ratio() {
        let global = GlobalSettings::default();
        let map = MapSettings {
            infected_wave_count: 10,
            ..MapSettings::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(23);

        let waves = infected_waves(&map, &global, 80, &mut rng);

        let headcount: u32 = waves
            .iter()
            .filter_map(|wave| wave.group().headcount())
            .sum();
        assert!((20..=24).contains(&headcount), "headcount {headcount}");
        assert!(waves
            .iter()
            .all(|wave| matches!(wave.category(), Category::Infected(_))));
    }

    #[test]
    fn encounters_use_the_open_zone_expression() {
        let global = GlobalSettings {
            random_raider_group: true,
            random_raider_group_chance: 250,
            random_rogue_group: true,
            ..GlobalSettings::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(29);
        let plan = plan_map("customs", &customs(), &global, 40, &mut rng);

        let raider = plan
            .boss_spawns
            .iter()
            .find(|spawn| spawn.category() == &Category::AdHoc(RAIDER_NAME.to_owned()))
            .expect("raider injected");
        assert_eq!(raider.chance(), MAX_CHANCE);
        let mut parts: Vec<_> = raider.zone().as_str().split(',').collect();
        parts.sort_unstable();
        assert_eq!(parts, vec!["Crossroads", "Dorms", "Gas"]);
        assert!(raider.time().start().is_some_and(|at| at <= 200));
        assert!(plan
            .boss_spawns
            .iter()
            .any(|spawn| spawn.category() == &Category::AdHoc(ROGUE_NAME.to_owned())));
    }

    #[test]
    fn boss_style_mode_emits_smoothed_point_spawns() {
        let global = GlobalSettings {
            spawn_mode: SpawnMode::BossStyle,
            ..GlobalSettings::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let plan = plan_map("customs", &customs(), &global, 40, &mut rng);

        assert!(plan.waves.is_empty());
        assert_eq!(
            plan.boss_spawns[0].category(),
            &Category::Boss("bossBully".to_owned())
        );
        let repaced: Vec<_> = plan.boss_spawns[1..]
            .iter()
            .map(|spawn| spawn.time().start().expect("scheduled"))
            .collect();
        assert!(!repaced.is_empty());
        assert!(repaced.windows(2).all(|pair| pair[1] >= pair[0] + 5));
        assert!(plan.boss_spawns[1..]
            .iter()
            .all(|spawn| spawn.category().is_population_driven()));
        assert!(plan
            .boss_spawns
            .iter()
            .any(|spawn| spawn.category() == &Category::Specialist && spawn.force_spawn()));
    }

    #[test]
    fn unknown_map_is_rejected() {
        let settings = RaidSettings::default();
        assert_eq!(
            plan_raid(&settings, Some("atlantis")),
            Err(SettingsError::UnknownMap {
                map: "atlantis".to_owned()
            })
        );
    }

    #[test]
    fn guardrail_runs_before_generation() {
        let mut settings = RaidSettings::default();
        settings.global.starting_pmcs = true;
        let _ = settings.maps.insert(
            "factory".to_owned(),
            MapSettings {
                default_escape_time: 20,
                escape_time: 500,
                ..MapSettings::default()
            },
        );
        let _ = settings.maps.insert(
            "woods".to_owned(),
            MapSettings {
                escape_time: 45,
                escape_time_override: Some(60),
                ..MapSettings::default()
            },
        );

        let plan = plan_raid(&settings, None).expect("valid settings");

        assert!(!plan.starting_actors);
        let factory = &plan.maps[0];
        assert_eq!(factory.map, "factory");
        assert_eq!(factory.escape_minutes, 100);
        assert_eq!(factory.notices.len(), 2);
        let woods = &plan.maps[1];
        assert_eq!(woods.escape_minutes, 60);
        assert!(woods.notices.is_empty());
        assert_eq!(plan.infected_health.len(), InfectedKind::ALL.len());
        assert!(plan.infected_health.contains_key("infectedpmc"));
    }

    #[test]
    fn single_map_requests_plan_only_that_map() {
        let mut settings = RaidSettings::default();
        for name in ["lab", "shoreline"] {
            let _ = settings.maps.insert(name.to_owned(), customs());
        }

        let plan = plan_raid(&settings, Some("shoreline")).expect("valid settings");

        assert_eq!(plan.maps.len(), 1);
        assert_eq!(plan.maps[0].map, "shoreline");
    }

    #[test]
    fn huge_smoothing_factor_is_rejected_and_never_overflows() {
        let mut settings = RaidSettings::default();
        settings.global.spawn_mode = SpawnMode::BossStyle;
        let map = MapSettings {
            scav_wave_count: 10,
            smoothing_distribution: 1e17,
            ..MapSettings::default()
        };
        let _ = settings.maps.insert("customs".to_owned(), map.clone());

        assert!(matches!(
            plan_raid(&settings, None),
            Err(SettingsError::TunableTooLarge { .. })
        ));

        let mut rng = ChaCha8Rng::seed_from_u64(37);
        let plan = plan_map("customs", &map, &settings.global, 40, &mut rng);
        let starts: Vec<_> = plan
            .boss_spawns
            .iter()
            .map(|spawn| spawn.time().start())
            .collect();
        assert!(!starts.is_empty());
        assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn disabled_bosses_drop_configured_and_invading_bosses() {
        let mut settings = RaidSettings::default();
        settings.global.disable_bosses = true;
        settings.global.boss_invasion = true;
        for name in ["customs", "woods"] {
            let _ = settings.maps.insert(name.to_owned(), customs());
        }

        let plan = plan_raid(&settings, None).expect("valid settings");

        assert!(plan
            .maps
            .iter()
            .flat_map(|map| &map.boss_spawns)
            .all(|spawn| !matches!(spawn.category(), Category::Boss(_))));
    }

    #[test]
    fn single_map_plans_receive_invaders_from_other_maps() {
        let mut settings = RaidSettings::default();
        settings.global.boss_invasion = true;
        settings.global.gradual_boss_invasion = true;
        let _ = settings.maps.insert("customs".to_owned(), customs());
        let _ = settings.maps.insert(
            "factory".to_owned(),
            MapSettings {
                open_zones: zones(&["Hall", "Gate"]),
                ..MapSettings::default()
            },
        );

        let plan = plan_raid(&settings, Some("factory")).expect("valid settings");

        let invaders = &plan.maps[0].boss_spawns;
        assert_eq!(invaders.len(), 1);
        assert_eq!(
            invaders[0].category(),
            &Category::Boss("bossBully".to_owned())
        );
        assert_eq!(invaders[0].time(), SpawnTime::At(1));
        assert_eq!(invaders[0].zone(), &Zone::from("Hall,Gate"));
        assert_eq!(invaders[0].chance(), 35);
    }

    #[test]
    fn chances_are_capped() {
        assert_eq!(capped_chance(0), 0);
        assert_eq!(capped_chance(64), 64);
        assert_eq!(capped_chance(9_999), MAX_CHANCE);
        assert_eq!(scaled_count(7, 0.5), 4);
        assert_eq!(scaled_count(7, 0.0), 0);
    }
}

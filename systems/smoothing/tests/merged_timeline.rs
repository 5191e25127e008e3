use raid_spawns_core::{Category, EscortAmount, SpawnEvent, Zone};
use raid_spawns_system_smoothing::{smooth_timeline, MIN_STEP_SECS};
use raid_spawns_system_wave_generation::{
    build_encounter, build_infected_waves, build_slot_budget_waves, EncounterRequest,
    InfectedSwarmRequest, SlotBudgetRequest,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn merged_timeline(seed: u64) -> Vec<SpawnEvent> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let pool: Vec<Zone> = ["Gate", "Cabins", "Pier"].into_iter().map(Zone::from).collect();

    let mut events = build_slot_budget_waves(
        &SlotBudgetRequest {
            max_escort_size: 3,
            group_chance: 0.4,
            ..SlotBudgetRequest::new(Category::Scavenger, 18, 2_400)
        },
        &pool,
        &mut rng,
    );
    events.extend(build_infected_waves(&InfectedSwarmRequest::new(12, 2_400), &mut rng));
    events.push(build_encounter(
        EncounterRequest {
            chance: 25,
            escorts: EscortAmount::Choices(vec![1, 2, 2, 2, 3]),
            escort_type: "exUsec".to_owned(),
            name: "exUsec".to_owned(),
            zone: Zone::from("Gate,Cabins,Pier"),
            raid_duration: Some(40),
        },
        &mut rng,
    ));
    events
}

#[test]
fn smoothing_preserves_encounters_and_spreads_population() {
    for seed in 0..10 {
        let events = merged_timeline(seed);
        let encounter = events
            .iter()
            .find(|event| matches!(event.category(), Category::AdHoc(_)))
            .cloned()
            .expect("encounter present");
        let earliest = events
            .iter()
            .filter(|event| event.category().is_population_driven())
            .filter_map(|event| event.time().start())
            .min()
            .expect("population waves present");
        let total = events.len();

        let smoothed = smooth_timeline(events, 0.8);

        assert_eq!(smoothed.len(), total, "seed {seed}: no event dropped");
        assert_eq!(smoothed[0], encounter, "seed {seed}: encounter untouched");

        let starts: Vec<i64> = smoothed[1..]
            .iter()
            .map(|event| i64::from(event.time().start().expect("scheduled")))
            .collect();
        assert_eq!(starts[0], i64::from(earliest), "seed {seed}: ramp anchored");
        assert!(
            starts.windows(2).all(|pair| pair[1] - pair[0] >= MIN_STEP_SECS),
            "seed {seed}: starts {starts:?}"
        );
    }
}

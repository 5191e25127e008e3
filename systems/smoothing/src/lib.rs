#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Post-processing pass that re-spaces clustered point-in-time spawns.
//!
//! Population-driven events rolled by independent builders tend to clump at
//! similar instants. The pass keeps their earliest start, then walks them in
//! time order along a ramp whose steps grow with the position in the list.
//! Encounters that are not population driven keep their rolled times.

use raid_spawns_core::{round_half_up, SpawnEvent, SpawnTime};

/// Smallest gap the pass leaves between two consecutive re-spaced events.
pub const MIN_STEP_SECS: i64 = 5;

/// Re-spaces the population-driven point-in-time events of one map.
///
/// Returns the untouched events first, in their original order, followed by
/// the re-spaced events sorted by their new start. `smoothing_factor` scales
/// the ramp; zero or negative factors collapse it to [`MIN_STEP_SECS`] steps.
#[must_use]
pub fn smooth_timeline(events: Vec<SpawnEvent>, smoothing_factor: f64) -> Vec<SpawnEvent> {
    let (mut repaceable, mut fixed): (Vec<_>, Vec<_>) =
        events.into_iter().partition(is_repaceable);

    let starts = repaceable.iter().filter_map(|event| event.time().start());
    let (Some(first), Some(last)) = (starts.clone().min(), starts.max()) else {
        return fixed;
    };

    repaceable.sort_by_key(|event| event.time().start());
    let count = repaceable.len() as f64;
    let span = f64::from(last) - f64::from(first);
    let increment = (round_half_up(span / count) as f64 * 2.0 * smoothing_factor).max(0.0);

    let mut start = first;
    for (index, event) in repaceable.iter_mut().enumerate() {
        let _ = event.reschedule(start);
        let ratio = (index + 1) as f64 / count;
        let step = round_half_up(increment * ratio).max(MIN_STEP_SECS);
        start = start.saturating_add(u32::try_from(step).unwrap_or(u32::MAX));
    }

    tracing::debug!(
        target: "raid_spawns::smoothing",
        repaced = repaceable.len(),
        fixed = fixed.len(),
        first,
        last,
        increment,
        "timeline smoothed"
    );

    fixed.append(&mut repaceable);
    fixed
}

fn is_repaceable(event: &SpawnEvent) -> bool {
    event.category().is_population_driven() && matches!(event.time(), SpawnTime::At(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use raid_spawns_core::{Category, DifficultyTier, EscortAmount, InfectedKind, TimeWindow, Zone};

    fn at(category: Category, time: u32) -> SpawnEvent {
        SpawnEvent::escorted(
            category,
            SpawnTime::At(time),
            Zone::unassigned(),
            DifficultyTier::Normal,
            "assault",
            EscortAmount::Fixed(0),
        )
    }

    fn starts(events: &[SpawnEvent]) -> Vec<u32> {
        events
            .iter()
            .map(|event| event.time().start().expect("scheduled"))
            .collect()
    }

    #[test]
    fn empty_input_stays_empty() {
        assert!(smooth_timeline(Vec::new(), 1.0).is_empty());
    }

    #[test]
    fn bosses_keep_their_rolled_times_and_lead_the_output() {
        let events = vec![
            at(Category::Scavenger, 300),
            at(Category::Boss("bossKilla".to_owned()), 42),
            at(Category::Scavenger, 100),
            at(Category::AdHoc("pmcBot".to_owned()), 900),
        ];

        let smoothed = smooth_timeline(events, 1.0);

        assert_eq!(smoothed.len(), 4);
        assert_eq!(
            smoothed[0].category(),
            &Category::Boss("bossKilla".to_owned())
        );
        assert_eq!(smoothed[0].time(), SpawnTime::At(42));
        assert_eq!(
            smoothed[1].category(),
            &Category::AdHoc("pmcBot".to_owned())
        );
        assert_eq!(smoothed[1].time(), SpawnTime::At(900));
        assert_eq!(starts(&smoothed[2..]), vec![100, 200]);
    }

    #[test]
    fn ramp_is_anchored_at_first_and_grows_with_position() {
        let events = vec![
            at(Category::Infected(InfectedKind::Civil), 400),
            at(Category::Scavenger, 0),
            at(Category::Specialist, 0),
            at(Category::Scavenger, 400),
        ];

        let smoothed = smooth_timeline(events, 1.0);

        // increment = round(400 / 4) * 2 = 200; steps 50, 100, 150.
        assert_eq!(starts(&smoothed), vec![0, 50, 150, 300]);
    }

    #[test]
    fn clustered_events_are_spread_by_the_minimum_step() {
        let events = (0..4).map(|_| at(Category::Scavenger, 600)).collect();

        let smoothed = smooth_timeline(events, 1.0);

        assert_eq!(starts(&smoothed), vec![600, 605, 610, 615]);
    }

    #[test]
    fn negative_factor_does_not_run_backwards() {
        let events = vec![at(Category::Scavenger, 10), at(Category::Scavenger, 1_010)];

        let smoothed = smooth_timeline(events, -3.0);

        assert_eq!(starts(&smoothed), vec![10, 15]);
    }

    #[test]
    fn huge_factor_saturates_at_the_end_of_the_clock() {
        let events = [0, 200, 400, 600]
            .into_iter()
            .map(|time| at(Category::Scavenger, time))
            .collect();

        let smoothed = smooth_timeline(events, 1e17);

        let starts = starts(&smoothed);
        assert_eq!(starts[0], 0);
        assert!(starts.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(starts[3], u32::MAX);
    }

    #[test]
    fn windowed_waves_are_left_alone() {
        let wave = SpawnEvent::wave(
            Category::RivalA,
            TimeWindow::new(30, 90),
            Zone::from("Dorms"),
            DifficultyTier::Hard,
            1,
            3,
        );

        let smoothed = smooth_timeline(vec![wave.clone()], 1.0);

        assert_eq!(smoothed, vec![wave]);
    }

    #[test]
    fn evenly_spaced_input_is_a_fixed_point_below_the_floor() {
        let events = [100, 105, 110, 115, 120]
            .into_iter()
            .map(|time| at(Category::Scavenger, time))
            .collect();

        let once = smooth_timeline(events, 0.1);
        let twice = smooth_timeline(once.clone(), 0.1);

        assert_eq!(starts(&once), vec![100, 105, 110, 115, 120]);
        assert_eq!(once, twice);
    }
}

use std::fmt::Write as _;

use raid_spawns_core::{Category, SpawnEvent};
use raid_spawns_planner::{MapSpawnPlan, RaidPlan};

/// Renders one header line for the run and a block per map.
pub(crate) fn render_summary(plan: &RaidPlan) -> String {
    let mut out = String::new();
    let starting = if plan.starting_actors {
        "enabled"
    } else {
        "disabled"
    };
    let _ = writeln!(out, "seed {}, starting actors {starting}", plan.seed);
    for map in &plan.maps {
        render_map(&mut out, map);
    }
    out
}

fn render_map(out: &mut String, map: &MapSpawnPlan) {
    let _ = writeln!(
        out,
        "{}: {} min, {} waves, {} boss spawns, {} known actors",
        map.map,
        map.escape_minutes,
        map.waves.len(),
        map.boss_spawns.len(),
        map.known_population()
    );
    let events = || map.waves.iter().chain(&map.boss_spawns);
    let _ = writeln!(
        out,
        "  rivals {}, scavs {}, marksmen {}, infected {}, encounters {}",
        count(events(), |category| matches!(category, Category::RivalA | Category::RivalB)),
        count(events(), |category| category == &Category::Scavenger),
        count(events(), |category| category == &Category::Specialist),
        count(events(), |category| matches!(category, Category::Infected(_))),
        count(events(), |category| matches!(category, Category::Boss(_) | Category::AdHoc(_))),
    );
    for notice in &map.notices {
        let _ = writeln!(out, "  notice: {notice}");
    }
}

fn count<'a>(
    events: impl Iterator<Item = &'a SpawnEvent>,
    selects: impl Fn(&Category) -> bool,
) -> usize {
    events.filter(|event| selects(event.category())).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use raid_spawns_core::{DifficultyTier, TimeWindow, Zone};
    use std::collections::BTreeMap;

    #[test]
    fn summary_lists_counts_and_notices() {
        let wave = SpawnEvent::wave(
            Category::RivalA,
            TimeWindow::new(15, 75),
            Zone::from("Dorms"),
            DifficultyTier::Hard,
            1,
            3,
        );
        let plan = RaidPlan {
            seed: 9,
            starting_actors: false,
            infected_health: BTreeMap::new(),
            maps: vec![MapSpawnPlan {
                map: "customs".to_owned(),
                escape_minutes: 45,
                waves: vec![wave],
                boss_spawns: Vec::new(),
                notices: vec!["escape time clamped".to_owned()],
            }],
        };

        let rendered = render_summary(&plan);

        assert_eq!(
            rendered,
            "seed 9, starting actors disabled\n\
             customs: 45 min, 1 waves, 0 boss spawns, 3 known actors\n  \
             rivals 1, scavs 0, marksmen 0, infected 0, encounters 0\n  \
             notice: escape time clamped\n"
        );
    }
}

//! Boss rosters and the invasion stage.
//!
//! Main bosses are every configured boss not listed as secondary. They can be
//! moved to their map's open zones, receive a chance buff and, once every map
//! is planned, invade the maps that do not host them.

use std::collections::BTreeMap;

use raid_spawns_core::{Category, SpawnEvent, SpawnTime, Zone, MAX_CHANCE};
use rand::seq::SliceRandom;

use crate::{
    plan::MapSpawnPlan,
    seed::invasion_rng,
    settings::{BossSettings, GlobalSettings, MapSettings, RaidSettings},
};

/// Seconds between consecutive invaders of a map when the invasion is gradual.
pub const GRADUAL_INVASION_SPACING_SECS: u32 = 20;

/// Bosses of `map` after the open-zone move and the chance buff.
pub(crate) fn map_roster(map: &MapSettings, global: &GlobalSettings) -> Vec<BossSettings> {
    if global.disable_bosses {
        return Vec::new();
    }
    let open_zones = open_zone_expression(map);
    map.bosses
        .iter()
        .map(|boss| {
            let mut boss = boss.clone();
            if global.is_main_boss(&boss.name) {
                if global.boss_open_zones && !open_zones.is_unassigned() {
                    boss.zone = open_zones.clone();
                }
                if boss.chance != 0 {
                    boss.chance = buffed_chance(boss.chance, global.main_boss_chance_buff);
                }
            }
            boss
        })
        .collect()
}

/// Point-in-time event of a configured or invading boss.
pub(crate) fn boss_event(boss: &BossSettings) -> SpawnEvent {
    let time = boss.time.map_or(SpawnTime::Disabled, SpawnTime::At);
    let escort_type = boss.escort_type.as_ref().unwrap_or(&boss.name);
    SpawnEvent::escorted(
        Category::Boss(boss.name.clone()),
        time,
        boss.zone.clone(),
        boss.difficulty,
        escort_type.as_str(),
        boss.escorts.clone(),
    )
    .with_chance(capped_chance(boss.chance))
}

/// Appends the invading main bosses to every plan in `plans`.
///
/// The invader pool is built from every configured map, so planning a single
/// map still sees the bosses of the others.
pub(crate) fn invade(plans: &mut [MapSpawnPlan], settings: &RaidSettings) {
    let global = &settings.global;
    if !global.boss_invasion || global.disable_bosses {
        return;
    }
    let pool = invasion_pool(settings);

    for plan in plans {
        let Some(map) = settings.maps.get(&plan.map) else {
            continue;
        };
        let hosted: Vec<String> = map_roster(map, global)
            .into_iter()
            .map(|boss| boss.name)
            .collect();
        let mut candidates: Vec<&BossSettings> = pool
            .values()
            .filter(|boss| !hosted.contains(&boss.name))
            .collect();
        candidates.shuffle(&mut invasion_rng(global.seed, &plan.map));

        let zone = open_zone_expression(map);
        let invaders: Vec<SpawnEvent> = candidates
            .into_iter()
            .zip(0_u32..)
            .map(|(boss, slot)| invader(boss, &zone, slot, global))
            .collect();
        tracing::debug!(
            target: "raid_spawns::planner",
            map = plan.map.as_str(),
            invaders = invaders.len(),
            "bosses invaded"
        );
        plan.boss_spawns.extend(invaders);
    }
}

/// Highest-chance roster entry of every main boss across all maps.
fn invasion_pool(settings: &RaidSettings) -> BTreeMap<String, BossSettings> {
    let global = &settings.global;
    let mut pool: BTreeMap<String, BossSettings> = BTreeMap::new();
    for map in settings.maps.values() {
        for boss in map_roster(map, global) {
            if !global.is_main_boss(&boss.name) {
                continue;
            }
            match pool.get(&boss.name) {
                Some(kept) if kept.chance >= boss.chance => {}
                _ => {
                    let _ = pool.insert(boss.name.clone(), boss);
                }
            }
        }
    }
    pool
}

fn invader(boss: &BossSettings, zone: &Zone, slot: u32, global: &GlobalSettings) -> SpawnEvent {
    let mut boss = BossSettings {
        zone: zone.clone(),
        ..boss.clone()
    };
    if global.gradual_boss_invasion {
        let offset = slot.saturating_mul(GRADUAL_INVASION_SPACING_SECS);
        boss.time = Some(offset.saturating_add(1));
    }
    if global.boss_invasion_spawn_chance == 0 {
        return boss_event(&boss);
    }
    boss.chance = global.boss_invasion_spawn_chance;
    boss_event(&boss).with_ignore_max_bots(true)
}

/// Open zones of `map` joined with commas, without duplicates or marksman nests.
fn open_zone_expression(map: &MapSettings) -> Zone {
    let mut names: Vec<&str> = Vec::with_capacity(map.open_zones.len());
    for zone in &map.open_zones {
        let name = zone.as_str();
        if !zone.is_unassigned() && !names.contains(&name) && !map.sniper_zones.contains(zone) {
            names.push(name);
        }
    }
    Zone::new(names.join(","))
}

fn buffed_chance(chance: u32, buff: i32) -> u32 {
    let buffed = (i64::from(chance) + i64::from(buff)).clamp(0, i64::from(MAX_CHANCE));
    u32::try_from(buffed).unwrap_or(0)
}

pub(crate) fn capped_chance(chance: u32) -> u8 {
    u8::try_from(chance.min(u32::from(MAX_CHANCE))).unwrap_or(MAX_CHANCE)
}

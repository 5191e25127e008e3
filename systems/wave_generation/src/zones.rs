use raid_spawns_core::{Zone, ZoneStack};
use rand::Rng;

/// Picks the zone for a single wave.
///
/// Unless `force_reserved` is set, a non-empty shared pool is sampled
/// uniformly with replacement and never mutated. Otherwise the reserved stack
/// is popped, so each reserved zone is handed out exactly once. When both
/// pools are exhausted the wave is left unassigned.
pub fn select_zone<R: Rng + ?Sized>(
    shared: &[Zone],
    reserved: &mut ZoneStack,
    force_reserved: bool,
    rng: &mut R,
) -> Zone {
    if !force_reserved && !shared.is_empty() {
        let index = rng.gen_range(0..shared.len());
        return shared[index].clone();
    }

    reserved.pop().unwrap_or_default()
}

use raid_spawns_core::{
    clamp_seconds, round_half_up, Category, DifficultyTier, EscortAmount, SpawnEvent, SpawnTime,
    Zone,
};
use rand::Rng;

/// Multiple of the raid duration the encounter start roll spans.
pub const ENCOUNTER_TIME_SCALE: f64 = 5.0;

/// Description of an opportunistic encounter injected outside the population budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterRequest {
    /// Spawn chance in percent.
    pub chance: u8,
    /// Escort count expression handed to the host.
    pub escorts: EscortAmount,
    /// Actor name of the escorts.
    pub escort_type: String,
    /// Actor name of the primary.
    pub name: String,
    /// Zone expression the encounter may use.
    pub zone: Zone,
    /// Raid duration as stored on the map; `None` leaves the encounter unscheduled.
    pub raid_duration: Option<u32>,
}

/// Builds one ad-hoc encounter at normal difficulty that ignores the bot cap.
///
/// With a raid duration the start is rolled in
/// `0..=raid_duration * ENCOUNTER_TIME_SCALE`; without one the record is
/// [`SpawnTime::Disabled`].
pub fn build_encounter<R: Rng + ?Sized>(request: EncounterRequest, rng: &mut R) -> SpawnEvent {
    let time = match request.raid_duration.filter(|duration| *duration > 0) {
        Some(duration) => {
            let roll = rng.gen::<f64>() * f64::from(duration) * ENCOUNTER_TIME_SCALE;
            SpawnTime::At(clamp_seconds(round_half_up(roll)))
        }
        None => SpawnTime::Disabled,
    };

    SpawnEvent::escorted(
        Category::AdHoc(request.name),
        time,
        request.zone,
        DifficultyTier::Normal,
        request.escort_type,
        request.escorts,
    )
    .with_chance(request.chance)
    .with_ignore_max_bots(true)
}

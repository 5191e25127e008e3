use raid_spawns_core::DifficultyTier;
use rand::Rng;

/// Rolls `U(0,1) + bias` and maps the result onto a difficulty tier.
///
/// Higher biases push the roll toward the harder tiers; a bias of two or more
/// always yields [`DifficultyTier::Impossible`].
pub fn roll_difficulty<R: Rng + ?Sized>(bias: f64, rng: &mut R) -> DifficultyTier {
    let roll: f64 = rng.gen();
    DifficultyTier::from_roll(roll + bias)
}

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const RNG_STREAM_MAP_PREFIX: &str = "map:";
const RNG_STREAM_INVASION_PREFIX: &str = "invasion:";

/// Derives the seed of the random stream dedicated to `map`.
///
/// Streams of different maps are independent, so adding or removing a map
/// leaves the plans of the others untouched.
#[must_use]
pub fn derive_map_seed(base: u64, map: &str) -> u64 {
    derive_labeled_seed(base, RNG_STREAM_MAP_PREFIX, map)
}

/// Random stream dedicated to `map`.
#[must_use]
pub fn map_rng(base: u64, map: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_map_seed(base, map))
}

/// Random stream that orders the bosses invading `map`.
///
/// It is separate from [`map_rng`], so toggling the invasion leaves the
/// generated population of every map unchanged.
#[must_use]
pub fn invasion_rng(base: u64, map: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_labeled_seed(base, RNG_STREAM_INVASION_PREFIX, map))
}

fn derive_labeled_seed(base: u64, prefix: &str, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(prefix.as_bytes());
    hasher.update(label.as_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

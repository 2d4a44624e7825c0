//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each `(threshold, index)`
//! pair of a run. Sub-seeds are derived via BLAKE3 hashing, independently of
//! the order in which thresholds are processed, so anchor sampling gives
//! identical results whether thresholds are built sequentially or in parallel.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG hierarchy.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for the threshold at position `index`
    /// of the run's threshold list.
    pub fn sub_seed(&self, threshold: i64, index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(b"anchors");
        hasher.update(&threshold.to_le_bytes());
        hasher.update(&index.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(bytes)
    }

    /// Create a seeded StdRng for one threshold's anchor stream.
    pub fn rng_for(&self, threshold: i64, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(threshold, index))
    }
}

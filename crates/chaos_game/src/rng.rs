//! Random sources and small sampling helpers for generation sessions.
//!
//! Sessions prefer a generator seeded from operating-system entropy. When the OS
//! source is unavailable the session still runs, seeded from a mix of clock and
//! thread identity, and a warning is logged.
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, warn};

/// Builds the generator for one session: deterministic when `seed` is given,
/// otherwise seeded from OS entropy.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            debug!("Using fixed seed {seed:#x}");
            StdRng::seed_from_u64(seed)
        }
        None => entropy_rng(),
    }
}

/// A ChaCha-based generator seeded from OS entropy, falling back to a
/// clock-derived seed when the OS source fails.
pub fn entropy_rng() -> StdRng {
    let mut seed = [0u8; 32];
    rng_from_entropy(getrandom::getrandom(&mut seed).map(|()| seed))
}

/// Seeds from `entropy`, or from the clock when the OS source reported an error.
fn rng_from_entropy(entropy: Result<[u8; 32], getrandom::Error>) -> StdRng {
    match entropy {
        Ok(seed) => StdRng::from_seed(seed),
        Err(err) => {
            warn!("Unable to get OS entropy ({err}); falling back to a clock-derived seed");
            StdRng::seed_from_u64(fallback_seed())
        }
    }
}

fn fallback_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    mix_u64(nanos ^ hasher.finish().wrapping_mul(0x9E3779B97F4A7C15))
}

#[inline]
fn mix_u64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 random mantissa bits.
    (rng.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
}

/// Uniform index in `0..len`. `len` must be non-zero.
#[inline]
pub(crate) fn index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0, "len must be > 0");
    ((rand01(rng) * len as f64) as usize).min(len - 1)
}

//! Deterministic randomness for combat rolls.
//!
//! Rolls are pure functions of a seed. The engine derives each seed from the
//! game seed, the command nonce, the acting entity and a [`RollContext`], so
//! replaying the same commands on the same save reproduces every outcome.

/// Source of pseudo-random numbers keyed by seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// Percentage roll in `[0, 100)` with two decimal places of resolution.
    fn roll_percent(&self, seed: u64) -> f32 {
        (self.next_u32(seed) % 10_000) as f32 / 100.0
    }

    /// Value in `[min, max]` inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG-XSH-RR: 64-bit LCG state, 32-bit permuted output.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    #[inline]
    fn output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::output(Self::step(seed))
    }
}

/// Returns the same value for every roll. Used to script outcomes.
#[derive(Clone, Copy, Debug)]
pub struct FixedRng(pub u32);

impl FixedRng {
    /// Every percentage roll lands on `percent` (clamped below 100).
    pub fn percent(percent: f32) -> Self {
        Self(((percent.clamp(0.0, 99.99)) * 100.0).round() as u32)
    }
}

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Independent rolls made while resolving one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollContext {
    Evasion = 0,
    Miss = 1,
    Critical = 2,
}

/// Mixes the roll inputs into a seed with a SplitMix-style avalanche.
pub fn compute_seed(game_seed: u64, nonce: u64, actor_id: u32, context: RollContext) -> u64 {
    let mut hash = game_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor_id as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;
    hash
}

//! Stateless integer hashing for lattice noise.
//!
//! Maps an integer lattice coordinate plus a seed to a pseudo-random value.
//! Built on the Xorshift64 step (shifts 13, 7, 17) with a multiplicative
//! finalizer, so the same `(ix, iy, seed)` produces the same bits on every
//! platform. No state, no allocation.

/// Substituted when the mixed input is 0, which is a fixed point of xorshift.
const FALLBACK_STATE: u64 = 0x5EED_DEAD_BEEF_CAFE;

/// Odd multipliers that decorrelate the x, y and seed lanes before mixing.
const X_LANE: u64 = 0x9E37_79B9_7F4A_7C15;
const Y_LANE: u64 = 0xC2B2_AE3D_27D4_EB4F;
const SEED_LANE: u64 = 0x1656_67B1_9E37_79F9;
const FINALIZER: u64 = 0x2545_F491_4F6C_DD1D;

/// One xorshift64 step with shifts (13, 7, 17).
#[inline]
fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

/// Hashes a lattice coordinate and seed to 64 pseudo-random bits.
#[inline]
pub fn hash2(ix: i64, iy: i64, seed: u32) -> u64 {
    let mixed = (ix as u64).wrapping_mul(X_LANE)
        ^ (iy as u64).wrapping_mul(Y_LANE)
        ^ u64::from(seed).wrapping_mul(SEED_LANE);
    let state = if mixed == 0 { FALLBACK_STATE } else { mixed };
    xorshift64(xorshift64(state)).wrapping_mul(FINALIZER)
}

/// Maps 64 hash bits to a uniformly distributed f64 in [0, 1).
///
/// Uses the upper 53 bits for full mantissa precision.
#[inline]
pub fn unit_f64(bits: u64) -> f64 {
    (bits >> 11) as f64 / (1u64 << 53) as f64
}

/// Pseudo-random value in [0, 1) attached to lattice corner `(ix, iy)`.
#[inline]
pub fn lattice_value(ix: i64, iy: i64, seed: u32) -> f64 {
    unit_f64(hash2(ix, iy, seed))
}

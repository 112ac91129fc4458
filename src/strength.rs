//! Mapping between base password length and bit strength.

use crate::Error;

// "Only" accurate to 15 sig figs.
const BIT_STRENGTHS: [f64; 29] = [
    39.1200670699161,
    43.9960948472761,
    48.7440594403916,
    53.4676318261445,
    58.1764480484353,
    62.7665238278741,
    67.2404445074635,
    71.7042336853753,
    76.1312709240191,
    80.4365604507374,
    84.6200519662894,
    88.8587015762423,
    92.9647168662745,
    96.9323853082289,
    100.856654071890,
    104.721219076432,
    108.426520544345,
    111.970933247131,
    115.534965175914,
    118.907050614862,
    122.065883975916,
    125.129460745934,
    128.052654673660,
    130.687036809517,
    132.984838512222,
    135.221877995274,
    136.987412956791,
    138.094328330543,
    138.094328478112,
];

/// Returns the bit strength of a password generated at `base_length`.
///
/// Bit strength is the log2 of the key space: the number of distinct
/// passwords the builder can produce at that length. The table is
/// monotonically non-decreasing, from 39.12 bits at length 8 up to 138.09
/// bits at length 36.
pub fn bit_strength(base_length: u32) -> Result<f64, Error> {
    if !(8..=36).contains(&base_length) {
        return Err(Error::BaseLengthOutOfRange(base_length));
    }
    Ok(BIT_STRENGTHS[base_length as usize - 8])
}

/// Returns the base password length for a desired bit strength of at most 128
/// bits.
///
/// There are 8 targets: 48, 58, 67, 76, 80, 96, 100, and 128 bits, mapping to
/// lengths 10, 12, 14, 16, 17, 21, 22, and 30. Any strength at or below 128
/// selects the smallest target that meets it, so callers can present the
/// targets as a small curated menu (display "96" or "96+", not the exact
/// 96.9324 the length actually yields). Compile with the
/// `full-range-bit-strength` feature for one target per base length instead.
#[cfg(not(feature = "full-range-bit-strength"))]
pub fn base_length(bit_strength: u32) -> Result<u32, Error> {
    const TARGETS: [u32; 8] = [48, 58, 67, 76, 80, 96, 100, 128];
    const LENGTHS: [u32; 8] = [10, 12, 14, 16, 17, 21, 22, 30];

    if bit_strength > TARGETS[TARGETS.len() - 1] {
        return Err(Error::BitStrengthOutOfRange(bit_strength));
    }

    // Lower bound over all but the last target, so anything above 100 lands
    // on the final entry.
    let idx = TARGETS[..TARGETS.len() - 1].partition_point(|&target| target < bit_strength);
    Ok(LENGTHS[idx])
}

/// Returns the smallest base password length whose bit strength meets the
/// desired one, with one target per base length 8 to 35.
#[cfg(feature = "full-range-bit-strength")]
pub fn base_length(bit_strength: u32) -> Result<u32, Error> {
    const TARGETS: [u32; 28] = [
        39, 43, 48, 53, 58, 62, 67, 71, 76, 80, 84, 88, 92, 96, 100, 104, 108, 111, 115, 118,
        122, 125, 128, 130, 132, 135, 136, 138,
    ];

    if bit_strength > TARGETS[TARGETS.len() - 1] {
        return Err(Error::BitStrengthOutOfRange(bit_strength));
    }

    let idx = TARGETS[..TARGETS.len() - 1].partition_point(|&target| target < bit_strength);
    Ok(idx as u32 + 8)
}

//! Modifier transforms shared by every family.
//!
//! Both functions are pure and total: out-of-range modifier values produce a
//! meaningless but finite result. Range checks live in
//! [`ModifierSet::validate`](crate::ModifierSet::validate).

/// Lanes in a full CDNA wavefront, the domain of [`lane_swizzle`].
pub const SWIZZLE_LANES: u32 = 64;

/// Source block of the A operand after CBSZ/ABID broadcast.
///
/// CBSZ broadcasts one block to its `2^cbsz` aligned neighbors; ABID picks
/// which block of that aligned group is the source.
#[must_use]
pub fn block_broadcast(block: u32, cbsz: u32, abid: u32) -> u32 {
    let group = 1u32.checked_shl(cbsz).unwrap_or(0).max(1);
    (block / group * group).saturating_add(abid)
}

/// Source lane of the B operand after the BLGP lane swizzle.
///
/// | blgp | pattern |
/// |---|---|
/// | 0 | identity |
/// | 1 | broadcast lanes 0-31 |
/// | 2 | broadcast lanes 32-63 |
/// | 3 | rotate down by 16 |
/// | 4-7 | broadcast 16-lane quadrant 0-3 |
#[must_use]
pub fn lane_swizzle(lane: u32, blgp: u32) -> u32 {
    match blgp {
        1 => lane % 32,
        2 if lane < 32 => lane + 32,
        3 => (lane + 16) % SWIZZLE_LANES,
        4 => lane % 16,
        5 => match lane {
            0..=15 => lane + 16,
            48.. => lane - 32,
            32.. => lane - 16,
            _ => lane,
        },
        6 => match lane {
            48.. => lane - 16,
            0..=15 => lane + 32,
            16..=31 => lane + 16,
            _ => lane,
        },
        7 => lane + (3 - (lane / 16).min(3)) * 16,
        _ => lane,
    }
}

/// Whether any lane of a `wave_width` wavefront swizzles onto `lane`.
#[must_use]
pub fn lane_in_swizzle_image(lane: u32, blgp: u32, wave_width: u32) -> bool {
    (0..wave_width).any(|source| lane_swizzle(source, blgp) == lane)
}

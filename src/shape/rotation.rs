//! Which layer rotations keep every corner whole
//!
//! A rotation amount is measured in twelfths of a turn, in `-5..=6`. Positive
//! amounts rotate the layer string left.

use super::slot::{Layer, Occupancy, SlotKind, LAYER_SLOTS};

/// Rotation amounts considered for each layer
pub const ROTATIONS: std::ops::RangeInclusive<i8> = -5..=6;

/// Admissible amounts for a layer made only of corners
const SOLID_LAYER_ROTATIONS: [i8; 6] = [-4, -2, 0, 2, 4, 6];

/// Admissible rotation amounts for one layer of a shape, in ascending order
pub fn admissible_rotations(occupancy: &Occupancy, layer: Layer) -> Vec<i8> {
    let corners: Vec<bool> = occupancy
        .layer(layer)
        .iter()
        .map(|kind| *kind == SlotKind::CornerHalf)
        .collect();

    if corners.iter().all(|c| *c) {
        return SOLID_LAYER_ROTATIONS.to_vec();
    }

    ROTATIONS
        .filter(|r| is_admissible(&rotate_left(&corners, *r)))
        .collect()
}

/// Rotate left by `amount` (negative rotates right)
fn rotate_left(layer: &[bool], amount: i8) -> Vec<bool> {
    (0..LAYER_SLOTS)
        .map(|i| layer[(i as i32 + amount as i32).rem_euclid(LAYER_SLOTS as i32) as usize])
        .collect()
}

fn is_admissible(rotated: &[bool]) -> bool {
    let leading = rotated.iter().take_while(|c| **c).count();
    let trailing = rotated.iter().rev().take_while(|c| **c).count();
    if leading % 2 != 0 || trailing % 2 != 0 {
        return false;
    }
    // a corner at slot 5 must not be split from its partner across the seam
    !rotated[5] || rotated[6..].iter().filter(|c| **c).count() % 2 == 0
}

/// Normalize a rotation amount into `0..12`
pub fn normalize_rotation(amount: i8) -> usize {
    (amount as i32).rem_euclid(LAYER_SLOTS as i32) as usize
}

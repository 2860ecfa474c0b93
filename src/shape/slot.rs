//! Slot occupancy for the 24 puzzle slots
//!
//! Slots `0..12` are the top layer and `12..24` the bottom layer. Each slot
//! is either half of a corner, an edge, or not yet known.

use std::fmt;

pub const SLOT_COUNT: usize = 24;
pub const LAYER_SLOTS: usize = 12;

/// One of the two puzzle layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Top,
    Bottom,
}

impl Layer {
    /// Layer that owns the given slot
    pub fn of_slot(slot: usize) -> Self {
        if slot < LAYER_SLOTS {
            Layer::Top
        } else {
            Layer::Bottom
        }
    }

    /// Slot range covered by this layer
    pub fn slots(self) -> std::ops::Range<usize> {
        match self {
            Layer::Top => 0..LAYER_SLOTS,
            Layer::Bottom => LAYER_SLOTS..SLOT_COUNT,
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Top => write!(f, "top"),
            Layer::Bottom => write!(f, "bottom"),
        }
    }
}

/// What a single slot holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Unknown,
    Edge,
    CornerHalf,
}

impl SlotKind {
    fn as_char(self) -> char {
        match self {
            SlotKind::Unknown => '?',
            SlotKind::Edge => '0',
            SlotKind::CornerHalf => '1',
        }
    }
}

/// Letter naming a slot: `A`-`L` on top, `M`-`X` on the bottom
pub fn slot_letter(slot: usize) -> char {
    (b'A' + slot as u8) as char
}

/// Slot named by a letter, if it is one of `A`-`X`
pub fn letter_slot(letter: char) -> Option<usize> {
    let slot = (letter as u32).checked_sub('A' as u32)? as usize;
    (slot < SLOT_COUNT).then_some(slot)
}

/// Occupancy of all 24 slots
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occupancy([SlotKind; SLOT_COUNT]);

impl Occupancy {
    /// All slots unknown
    pub fn unknown() -> Self {
        Self([SlotKind::Unknown; SLOT_COUNT])
    }

    /// Expand a 24-bit shape; slot 0 is the most significant bit
    pub fn from_bits(bits: u32) -> Self {
        let mut slots = [SlotKind::Edge; SLOT_COUNT];
        for (slot, kind) in slots.iter_mut().enumerate() {
            if bits >> (SLOT_COUNT - 1 - slot) & 1 == 1 {
                *kind = SlotKind::CornerHalf;
            }
        }
        Self(slots)
    }

    /// Collapse to a 24-bit shape, or `None` while any slot is unknown
    pub fn to_bits(&self) -> Option<u32> {
        self.0.iter().try_fold(0u32, |bits, kind| match kind {
            SlotKind::Unknown => None,
            SlotKind::Edge => Some(bits << 1),
            SlotKind::CornerHalf => Some(bits << 1 | 1),
        })
    }

    /// Mask of known slots and the corner bits among them
    pub fn known_bits(&self) -> (u32, u32) {
        let mut mask = 0;
        let mut bits = 0;
        for (slot, kind) in self.0.iter().enumerate() {
            let bit = 1 << (SLOT_COUNT - 1 - slot);
            match kind {
                SlotKind::Unknown => {}
                SlotKind::Edge => mask |= bit,
                SlotKind::CornerHalf => {
                    mask |= bit;
                    bits |= bit;
                }
            }
        }
        (mask, bits)
    }

    pub fn get(&self, slot: usize) -> SlotKind {
        self.0[slot]
    }

    pub fn set(&mut self, slot: usize, kind: SlotKind) {
        self.0[slot] = kind;
    }

    pub fn slots(&self) -> &[SlotKind; SLOT_COUNT] {
        &self.0
    }

    /// The 12 slots of one layer
    pub fn layer(&self, layer: Layer) -> &[SlotKind] {
        &self.0[layer.slots()]
    }

    pub fn count(&self, kind: SlotKind) -> usize {
        self.0.iter().filter(|k| **k == kind).count()
    }

    /// Exactly 16 corner halves and 8 edges, nothing unknown
    pub fn is_fully_specified(&self) -> bool {
        self.count(SlotKind::CornerHalf) == 16 && self.count(SlotKind::Edge) == 8
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (slot, kind) in self.0.iter().enumerate() {
            if slot == LAYER_SLOTS {
                write!(f, "/")?;
            }
            write!(f, "{}", kind.as_char())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Occupancy({})", self)
    }
}

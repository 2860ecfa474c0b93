//! Precomputed table of every valid layer shape

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::slot::Occupancy;

/// Occupancy values for one six-slot half layer. Each keeps corners whole.
pub const HALF_LAYER_VALUES: [u32; 13] = [0, 3, 6, 12, 15, 24, 27, 30, 48, 51, 54, 60, 63];

/// Corner halves in a full shape (8 corners)
pub const CORNER_BITS: u32 = 16;

static SHAPE_TABLE: Lazy<ShapeTable> = Lazy::new(ShapeTable::build);

/// Ordered list of all shapes. Table indices are stable for the process.
#[derive(Debug)]
pub struct ShapeTable {
    shapes: Vec<u32>,
    index: HashMap<u32, usize>,
}

impl ShapeTable {
    /// The process-wide table, built on first use
    pub fn global() -> &'static ShapeTable {
        &SHAPE_TABLE
    }

    fn build() -> Self {
        let mut shapes = Vec::new();
        for ul in HALF_LAYER_VALUES {
            for ur in HALF_LAYER_VALUES {
                for dl in HALF_LAYER_VALUES {
                    for dr in HALF_LAYER_VALUES {
                        let shape = ul << 18 | ur << 12 | dl << 6 | dr;
                        if shape.count_ones() == CORNER_BITS {
                            shapes.push(shape);
                        }
                    }
                }
            }
        }
        let index = shapes
            .iter()
            .enumerate()
            .map(|(i, shape)| (*shape, i))
            .collect();
        log::debug!("shape table built with {} shapes", shapes.len());
        Self { shapes, index }
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shape bits at a table index
    pub fn get(&self, index: usize) -> Option<u32> {
        self.shapes.get(index).copied()
    }

    /// Table index of a shape
    pub fn index_of(&self, shape: u32) -> Option<usize> {
        self.index.get(&shape).copied()
    }

    /// Shapes in table order with their indices
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.shapes.iter().copied().enumerate()
    }

    /// Occupancy for a table index
    pub fn occupancy(&self, index: usize) -> Option<Occupancy> {
        self.get(index).map(Occupancy::from_bits)
    }
}

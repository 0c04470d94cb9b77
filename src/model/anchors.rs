//! SSD anchor grid of the short-range face detector (128x128 input).
//!
//! Layers sharing a stride are merged into one grid with two anchors per
//! layer per cell: stride 8 gives 16x16x2, the three stride-16 layers give
//! 8x8x6, 896 anchors in total. Anchor sizes are fixed, so only centers matter.

const STRIDES: [u32; 4] = [8, 16, 16, 16];
const ANCHORS_PER_LAYER: usize = 2;

pub const INPUT_SIZE: u32 = 128;
pub const NUM_ANCHORS: usize = 896;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

pub fn generate() -> Vec<Anchor> {
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);
    let mut layer = 0;

    while layer < STRIDES.len() {
        let stride = STRIDES[layer];
        let mut last = layer;
        while last < STRIDES.len() && STRIDES[last] == stride {
            last += 1;
        }
        let per_cell = (last - layer) * ANCHORS_PER_LAYER;
        let grid = INPUT_SIZE.div_ceil(stride);

        for y in 0..grid {
            for x in 0..grid {
                let anchor = Anchor {
                    x: (x as f32 + 0.5) / grid as f32,
                    y: (y as f32 + 0.5) / grid as f32,
                };
                anchors.extend(std::iter::repeat(anchor).take(per_cell));
            }
        }

        layer = last;
    }

    anchors
}

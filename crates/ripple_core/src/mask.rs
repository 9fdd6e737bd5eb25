//! Boundary-condition mask data
//!
//! One intensity byte per grid texel, rows stored top-down like image rows.
//! Bright texels are rigid walls: the wave height there is held at zero.

/// Intensity at or above which a texel blocks propagation.
pub const WALL_THRESHOLD: u8 = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskImage {
    resolution: u32,
    texels: Vec<u8>,
}

impl MaskImage {
    /// Returns `None` when `texels` is not `resolution * resolution` long.
    pub fn new(resolution: u32, texels: Vec<u8>) -> Option<Self> {
        let expected = (resolution as usize).checked_mul(resolution as usize)?;
        (texels.len() == expected).then_some(Self { resolution, texels })
    }

    /// A mask with no walls.
    pub fn open(resolution: u32) -> Self {
        let n = resolution as usize;
        Self {
            resolution,
            texels: vec![0; n * n],
        }
    }

    /// Build a mask from a predicate over `(column, row)`, row 0 at the top.
    pub fn from_fn(resolution: u32, mut wall: impl FnMut(u32, u32) -> bool) -> Self {
        let mut texels = Vec::with_capacity((resolution as usize).pow(2));
        for row in 0..resolution {
            for col in 0..resolution {
                texels.push(if wall(col, row) { u8::MAX } else { 0 });
            }
        }
        Self { resolution, texels }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn texels(&self) -> &[u8] {
        &self.texels
    }

    #[inline]
    pub fn is_wall(&self, col: u32, row: u32) -> bool {
        self.texels[(row * self.resolution + col) as usize] >= WALL_THRESHOLD
    }

    pub fn wall_count(&self) -> usize {
        self.texels.iter().filter(|&&t| t >= WALL_THRESHOLD).count()
    }
}

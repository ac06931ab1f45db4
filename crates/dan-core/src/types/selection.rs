//! Selection bounds of an exported region.
//!
//! A selection is an inclusive box of blocks in a named world. Exports split
//! it into a grid of 16x16 chunk columns, each cut into 16-block tall sections.

use crate::error::{DanError, DanResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Edge length of a chunk section in blocks
pub const SECTION_SIZE: i32 = 16;

/// Integer block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.x, self.y, self.z)
    }
}

impl FromStr for BlockPos {
    type Err = DanError;

    /// Parse `x:y:z`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        if parts.len() != 3 {
            return Err(DanError::InvalidSelection {
                reason: format!("'{}' must have exactly three components x:y:z", s),
            });
        }

        let mut coords = [0i32; 3];
        for (slot, part) in coords.iter_mut().zip(&parts) {
            *slot = part.trim().parse().map_err(|_| DanError::InvalidSelection {
                reason: format!("'{}' is not an integer coordinate in '{}'", part, s),
            })?;
        }

        Ok(Self::new(coords[0], coords[1], coords[2]))
    }
}

/// Inclusive box of blocks in a named world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub world: String,
    pub min: BlockPos,
    pub max: BlockPos,
}

impl Selection {
    /// Create a selection from any two opposite corners
    pub fn new(world: impl Into<String>, a: BlockPos, b: BlockPos) -> Self {
        Self {
            world: world.into(),
            min: BlockPos::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: BlockPos::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Parse a world name and two `x:y:z` corners
    pub fn from_strings(world: &str, min: &str, max: &str) -> DanResult<Self> {
        if world.trim().is_empty() {
            return Err(DanError::InvalidSelection {
                reason: "world name cannot be blank".to_string(),
            });
        }
        Ok(Self::new(world.trim(), min.parse()?, max.parse()?))
    }

    /// Inverse of [`Selection::from_strings`]
    pub fn to_strings(&self) -> [String; 3] {
        [self.world.clone(), self.min.to_string(), self.max.to_string()]
    }

    /// Whether a point lies inside the selection, bounds inclusive
    pub fn contains(&self, x: f64, y: f64, z: f64) -> bool {
        x >= self.min.x as f64
            && x <= self.max.x as f64
            && y >= self.min.y as f64
            && y <= self.max.y as f64
            && z >= self.min.z as f64
            && z <= self.max.z as f64
    }

    /// Whether a block lies inside the selection
    pub fn contains_block(&self, pos: BlockPos) -> bool {
        (self.min.x..=self.max.x).contains(&pos.x)
            && (self.min.y..=self.max.y).contains(&pos.y)
            && (self.min.z..=self.max.z).contains(&pos.z)
    }

    /// Size in blocks along each axis
    ///
    /// A selection spanning the whole `i32` range is 2^32 blocks wide, so
    /// extents are counted in `u64`.
    pub fn block_extent(&self) -> (u64, u64, u64) {
        (
            u64::from(self.max.x.abs_diff(self.min.x)) + 1,
            u64::from(self.max.y.abs_diff(self.min.y)) + 1,
            u64::from(self.max.z.abs_diff(self.min.z)) + 1,
        )
    }

    /// Number of chunk columns along X
    pub fn chunk_width(&self) -> u64 {
        self.block_extent().0.div_ceil(SECTION_SIZE as u64)
    }

    /// Number of chunk columns along Z
    pub fn chunk_depth(&self) -> u64 {
        self.block_extent().2.div_ceil(SECTION_SIZE as u64)
    }

    /// Number of sections stacked in each chunk
    pub fn section_count(&self) -> u64 {
        self.block_extent().1.div_ceil(SECTION_SIZE as u64)
    }

    /// Check that the chunk grid fits the file format's counters
    pub fn validate(&self) -> DanResult<()> {
        if self.world.trim().is_empty() {
            return Err(DanError::InvalidSelection {
                reason: "world name cannot be blank".to_string(),
            });
        }
        if self.chunk_width() > u64::from(u16::MAX) || self.chunk_depth() > u64::from(u16::MAX) {
            return Err(DanError::InvalidSelection {
                reason: format!(
                    "{}x{} chunks exceeds the maximum of {} per axis",
                    self.chunk_width(),
                    self.chunk_depth(),
                    u16::MAX
                ),
            });
        }
        if self.section_count() > u64::from(u8::MAX) {
            return Err(DanError::InvalidSelection {
                reason: format!(
                    "{} sections exceeds the maximum of {}",
                    self.section_count(),
                    u8::MAX
                ),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} -> {}]", self.world, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_block_pos() {
        assert_eq!(
            "10:-64:3".parse::<BlockPos>().unwrap(),
            BlockPos::new(10, -64, 3)
        );
        assert!("1:2".parse::<BlockPos>().is_err());
        assert!("1:2:3:4".parse::<BlockPos>().is_err());
        assert!("1:two:3".parse::<BlockPos>().is_err());
    }

    #[test]
    fn test_from_strings_round_trip() {
        let sel = Selection::from_strings("world", "0:60:0", "31:75:31").unwrap();
        let [world, min, max] = sel.to_strings();
        assert_eq!(world, "world");
        assert_eq!(min, "0:60:0");
        assert_eq!(max, "31:75:31");
        assert!(Selection::from_strings(" ", "0:0:0", "1:1:1").is_err());
    }

    #[test]
    fn test_corners_are_normalized() {
        let sel = Selection::new("w", BlockPos::new(10, 5, -3), BlockPos::new(-2, 20, 7));
        assert_eq!(sel.min, BlockPos::new(-2, 5, -3));
        assert_eq!(sel.max, BlockPos::new(10, 20, 7));
    }

    #[test]
    fn test_chunk_grid_uses_inclusive_extent() {
        let sel = Selection::from_strings("w", "0:0:0", "15:15:15").unwrap();
        assert_eq!(sel.block_extent(), (16, 16, 16));
        assert_eq!((sel.chunk_width(), sel.chunk_depth(), sel.section_count()), (1, 1, 1));

        let sel = Selection::from_strings("w", "0:0:0", "16:31:40").unwrap();
        assert_eq!(sel.chunk_width(), 2);
        assert_eq!(sel.section_count(), 2);
        assert_eq!(sel.chunk_depth(), 3);

        let single = Selection::from_strings("w", "5:5:5", "5:5:5").unwrap();
        assert_eq!((single.chunk_width(), single.chunk_depth(), single.section_count()), (1, 1, 1));
    }

    #[test]
    fn test_contains() {
        let sel = Selection::from_strings("w", "0:0:0", "10:10:10").unwrap();
        assert!(sel.contains(0.0, 0.0, 0.0));
        assert!(sel.contains(10.0, 10.0, 10.0));
        assert!(sel.contains(4.5, 64.0 - 60.0, 9.99));
        assert!(!sel.contains(10.5, 0.0, 0.0));
        assert!(!sel.contains(-0.1, 0.0, 0.0));
        assert!(sel.contains_block(BlockPos::new(10, 0, 3)));
        assert!(!sel.contains_block(BlockPos::new(11, 0, 3)));
    }

    #[test]
    fn test_validate_limits() {
        let tall = Selection::from_strings("w", "0:0:0", "0:5000:0").unwrap();
        assert!(tall.validate().is_err());
        let ok = Selection::from_strings("w", "0:-64:0", "100:319:100").unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_full_i32_span() {
        let sel = Selection::from_strings("w", "-2147483648:0:0", "2147483647:0:0").unwrap();
        assert_eq!(sel.block_extent(), (1 << 32, 1, 1));
        assert_eq!(sel.chunk_width(), 1 << 28);
        assert!(matches!(
            sel.validate(),
            Err(DanError::InvalidSelection { .. })
        ));

        let tall = Selection::from_strings("w", "0:-2147483648:0", "0:2147483647:0").unwrap();
        assert_eq!(tall.section_count(), 1 << 28);
        assert!(tall.validate().is_err());
    }
}

use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, crate::error::SculkError>;

/// An absolute block cell in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The cell one step along a block face normal.
    pub fn offset(&self, face: BlockFace) -> BlockPos {
        let (dx, dy, dz) = face.normal();
        BlockPos::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The six orthogonal neighbors, bottom first.
    pub fn neighbors(&self) -> [BlockPos; 6] {
        [
            self.offset(BlockFace::Bottom),
            self.offset(BlockFace::Top),
            self.offset(BlockFace::North),
            self.offset(BlockFace::South),
            self.offset(BlockFace::West),
            self.offset(BlockFace::East),
        ]
    }
}

/// A block face as carried by dig and placement packets (VarInt on the
/// wire, 0..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockFace {
    Bottom,
    Top,
    North,
    South,
    West,
    East,
}

impl BlockFace {
    pub fn from_id(id: i32) -> Option<BlockFace> {
        match id {
            0 => Some(BlockFace::Bottom),
            1 => Some(BlockFace::Top),
            2 => Some(BlockFace::North),
            3 => Some(BlockFace::South),
            4 => Some(BlockFace::West),
            5 => Some(BlockFace::East),
            _ => None,
        }
    }

    pub fn normal(&self) -> (i32, i32, i32) {
        match self {
            BlockFace::Bottom => (0, -1, 0),
            BlockFace::Top => (0, 1, 0),
            BlockFace::North => (0, 0, -1),
            BlockFace::South => (0, 0, 1),
            BlockFace::West => (-1, 0, 0),
            BlockFace::East => (1, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_offsets() {
        let origin = BlockPos::new(0, 64, 0);
        assert_eq!(origin.offset(BlockFace::Top), BlockPos::new(0, 65, 0));
        assert_eq!(origin.offset(BlockFace::Bottom), BlockPos::new(0, 63, 0));
        assert_eq!(origin.offset(BlockFace::North), BlockPos::new(0, 64, -1));
        assert_eq!(origin.offset(BlockFace::East), BlockPos::new(1, 64, 0));
    }

    #[test]
    fn face_ids_round_trip() {
        for id in 0..6 {
            let face = BlockFace::from_id(id).unwrap();
            let (dx, dy, dz) = face.normal();
            assert_eq!(dx.abs() + dy.abs() + dz.abs(), 1);
        }
        assert!(BlockFace::from_id(6).is_none());
        assert!(BlockFace::from_id(-1).is_none());
    }
}

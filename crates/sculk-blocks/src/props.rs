//! Property value spaces shared by block kinds.
//!
//! Value ordering matters: the linear state numbering multiplies property
//! value counts together, so every enum here lists its variants in the
//! order the vanilla data reports enumerate them (booleans are
//! `true` before `false`).

/// Log / pillar orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub(crate) const NAMES: &'static [&'static str] = &["x", "y", "z"];

    pub(crate) fn from_index(index: u16) -> Axis {
        match index {
            0 => Axis::X,
            1 => Axis::Y,
            2 => Axis::Z,
            _ => panic!("axis index out of range: {}", index),
        }
    }

    pub(crate) fn index(self) -> u16 {
        self as u16
    }
}

/// Horizontal facing, in data-report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    West,
    East,
}

impl Direction {
    pub(crate) const NAMES: &'static [&'static str] = &["north", "south", "west", "east"];

    pub(crate) fn from_index(index: u16) -> Direction {
        match index {
            0 => Direction::North,
            1 => Direction::South,
            2 => Direction::West,
            3 => Direction::East,
            _ => panic!("direction index out of range: {}", index),
        }
    }

    pub(crate) fn index(self) -> u16 {
        self as u16
    }
}

/// Upper or lower half of stairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Half {
    Top,
    Bottom,
}

impl Half {
    pub(crate) const NAMES: &'static [&'static str] = &["top", "bottom"];

    pub(crate) fn from_index(index: u16) -> Half {
        match index {
            0 => Half::Top,
            1 => Half::Bottom,
            _ => panic!("half index out of range: {}", index),
        }
    }

    pub(crate) fn index(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StairShape {
    Straight,
    InnerLeft,
    InnerRight,
    OuterLeft,
    OuterRight,
}

impl StairShape {
    pub(crate) const NAMES: &'static [&'static str] = &[
        "straight",
        "inner_left",
        "inner_right",
        "outer_left",
        "outer_right",
    ];

    pub(crate) fn from_index(index: u16) -> StairShape {
        match index {
            0 => StairShape::Straight,
            1 => StairShape::InnerLeft,
            2 => StairShape::InnerRight,
            3 => StairShape::OuterLeft,
            4 => StairShape::OuterRight,
            _ => panic!("stair shape index out of range: {}", index),
        }
    }

    pub(crate) fn index(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlabType {
    Top,
    Bottom,
    Double,
}

impl SlabType {
    pub(crate) const NAMES: &'static [&'static str] = &["top", "bottom", "double"];

    pub(crate) fn from_index(index: u16) -> SlabType {
        match index {
            0 => SlabType::Top,
            1 => SlabType::Bottom,
            2 => SlabType::Double,
            _ => panic!("slab type index out of range: {}", index),
        }
    }

    pub(crate) fn index(self) -> u16 {
        self as u16
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChestType {
    Single,
    Left,
    Right,
}

impl ChestType {
    pub(crate) const NAMES: &'static [&'static str] = &["single", "left", "right"];

    pub(crate) fn from_index(index: u16) -> ChestType {
        match index {
            0 => ChestType::Single,
            1 => ChestType::Left,
            2 => ChestType::Right,
            _ => panic!("chest type index out of range: {}", index),
        }
    }

    pub(crate) fn index(self) -> u16 {
        self as u16
    }
}

/// What a lever or button is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachFace {
    Floor,
    Wall,
    Ceiling,
}

impl AttachFace {
    pub(crate) const NAMES: &'static [&'static str] = &["floor", "wall", "ceiling"];

    pub(crate) fn from_index(index: u16) -> AttachFace {
        match index {
            0 => AttachFace::Floor,
            1 => AttachFace::Wall,
            2 => AttachFace::Ceiling,
            _ => panic!("attach face index out of range: {}", index),
        }
    }

    pub(crate) fn index(self) -> u16 {
        self as u16
    }
}

/// The value space of one block property. Booleans enumerate as
/// [true, false]; integers as min..=max; enums by their name table.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PropertyValues {
    Bool,
    Int { min: u8, max: u8 },
    Enum(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Property {
    pub name: &'static str,
    pub values: PropertyValues,
}

impl Property {
    pub(crate) fn count(&self) -> u16 {
        match self.values {
            PropertyValues::Bool => 2,
            PropertyValues::Int { min, max } => (max - min + 1) as u16,
            PropertyValues::Enum(names) => names.len() as u16,
        }
    }

    /// Parses a textual property value into its value index, honoring the
    /// property's stored typing. A value that does not belong to the
    /// property's space is a catalog contract violation.
    pub(crate) fn parse(&self, value: &str) -> u16 {
        match self.values {
            PropertyValues::Bool => match value {
                "true" => 0,
                "false" => 1,
                _ => panic!("property {}: invalid boolean value {:?}", self.name, value),
            },
            PropertyValues::Int { min, max } => {
                let parsed: u8 = value
                    .parse()
                    .unwrap_or_else(|_| panic!("property {}: invalid integer {:?}", self.name, value));
                if parsed < min || parsed > max {
                    panic!(
                        "property {}: value {} outside {}..={}",
                        self.name, parsed, min, max
                    );
                }
                (parsed - min) as u16
            }
            PropertyValues::Enum(names) => names
                .iter()
                .position(|&n| n == value)
                .unwrap_or_else(|| panic!("property {}: unknown variant {:?}", self.name, value))
                as u16,
        }
    }
}

pub(crate) fn bool_from_index(index: u16) -> bool {
    match index {
        0 => true,
        1 => false,
        _ => panic!("bool index out of range: {}", index),
    }
}

pub(crate) fn bool_index(v: bool) -> u16 {
    if v {
        0
    } else {
        1
    }
}

//! The id-space tables and lookups.
//!
//! State ids are assigned per kind in `Block::ALL` order, each kind owning
//! the contiguous range `[start, end)`. Within a kind, states enumerate in
//! mixed radix over the property list, the last property varying fastest,
//! matching the numbering of the vanilla data reports.

use crate::props::{self, bool_from_index, bool_index, Property, PropertyValues};
use crate::{Block, BlockState};
use once_cell::sync::Lazy;

/// Id range and default id of one block kind.
#[derive(Debug, Clone, Copy)]
pub struct BlockInfo {
    pub start: u16,
    pub end: u16,
    pub default: u16,
}

/// The property list of a kind, in state-numbering order.
pub(crate) fn properties(block: Block) -> &'static [Property] {
    const SNOWY: &[Property] = &[Property {
        name: "snowy",
        values: PropertyValues::Bool,
    }];
    const LEVEL: &[Property] = &[Property {
        name: "level",
        values: PropertyValues::Int { min: 0, max: 15 },
    }];

    match block {
        Block::GrassBlock | Block::Podzol => SNOWY,
        Block::Water | Block::Lava => LEVEL,
        Block::OakLog => &[Property {
            name: "axis",
            values: PropertyValues::Enum(props::Axis::NAMES),
        }],
        Block::OakLeaves => &[
            Property {
                name: "distance",
                values: PropertyValues::Int { min: 1, max: 7 },
            },
            Property {
                name: "persistent",
                values: PropertyValues::Bool,
            },
        ],
        Block::OakStairs => &[
            Property {
                name: "facing",
                values: PropertyValues::Enum(props::Direction::NAMES),
            },
            Property {
                name: "half",
                values: PropertyValues::Enum(props::Half::NAMES),
            },
            Property {
                name: "shape",
                values: PropertyValues::Enum(props::StairShape::NAMES),
            },
            Property {
                name: "waterlogged",
                values: PropertyValues::Bool,
            },
        ],
        Block::OakSlab => &[
            Property {
                name: "type",
                values: PropertyValues::Enum(props::SlabType::NAMES),
            },
            Property {
                name: "waterlogged",
                values: PropertyValues::Bool,
            },
        ],
        Block::WallTorch => &[Property {
            name: "facing",
            values: PropertyValues::Enum(props::Direction::NAMES),
        }],
        Block::Chest => &[
            Property {
                name: "facing",
                values: PropertyValues::Enum(props::Direction::NAMES),
            },
            Property {
                name: "type",
                values: PropertyValues::Enum(props::ChestType::NAMES),
            },
            Property {
                name: "waterlogged",
                values: PropertyValues::Bool,
            },
        ],
        Block::Furnace => &[
            Property {
                name: "facing",
                values: PropertyValues::Enum(props::Direction::NAMES),
            },
            Property {
                name: "lit",
                values: PropertyValues::Bool,
            },
        ],
        Block::Lever => &[
            Property {
                name: "face",
                values: PropertyValues::Enum(props::AttachFace::NAMES),
            },
            Property {
                name: "facing",
                values: PropertyValues::Enum(props::Direction::NAMES),
            },
            Property {
                name: "powered",
                values: PropertyValues::Bool,
            },
        ],
        Block::Snow => &[Property {
            name: "layers",
            values: PropertyValues::Int { min: 1, max: 8 },
        }],
        _ => &[],
    }
}

/// The state every kind starts as, matching the vanilla defaults.
pub fn default_state(block: Block) -> BlockState {
    use crate::props::*;

    match block {
        Block::Air => BlockState::Air,
        Block::Stone => BlockState::Stone,
        Block::Granite => BlockState::Granite,
        Block::PolishedGranite => BlockState::PolishedGranite,
        Block::Diorite => BlockState::Diorite,
        Block::PolishedDiorite => BlockState::PolishedDiorite,
        Block::Andesite => BlockState::Andesite,
        Block::PolishedAndesite => BlockState::PolishedAndesite,
        Block::GrassBlock => BlockState::GrassBlock { snowy: false },
        Block::Dirt => BlockState::Dirt,
        Block::CoarseDirt => BlockState::CoarseDirt,
        Block::Podzol => BlockState::Podzol { snowy: false },
        Block::Bedrock => BlockState::Bedrock,
        Block::Water => BlockState::Water { level: 0 },
        Block::Lava => BlockState::Lava { level: 0 },
        Block::Sand => BlockState::Sand,
        Block::Gravel => BlockState::Gravel,
        Block::OakLog => BlockState::OakLog { axis: Axis::Y },
        Block::OakPlanks => BlockState::OakPlanks,
        Block::OakLeaves => BlockState::OakLeaves {
            distance: 7,
            persistent: false,
        },
        Block::OakStairs => BlockState::OakStairs {
            facing: Direction::North,
            half: Half::Bottom,
            shape: StairShape::Straight,
            waterlogged: false,
        },
        Block::OakSlab => BlockState::OakSlab {
            kind: SlabType::Bottom,
            waterlogged: false,
        },
        Block::Cobblestone => BlockState::Cobblestone,
        Block::Glass => BlockState::Glass,
        Block::Torch => BlockState::Torch,
        Block::WallTorch => BlockState::WallTorch {
            facing: Direction::North,
        },
        Block::Chest => BlockState::Chest {
            facing: Direction::North,
            kind: ChestType::Single,
            waterlogged: false,
        },
        Block::Furnace => BlockState::Furnace {
            facing: Direction::North,
            lit: false,
        },
        Block::CraftingTable => BlockState::CraftingTable,
        Block::Lever => BlockState::Lever {
            face: AttachFace::Wall,
            facing: Direction::North,
            powered: false,
        },
        Block::Snow => BlockState::Snow { layers: 1 },
    }
}

fn state_count(block: Block) -> u16 {
    properties(block).iter().map(|p| p.count()).product()
}

static INFO: Lazy<Vec<BlockInfo>> = Lazy::new(|| {
    let mut table = Vec::with_capacity(Block::ALL.len());
    let mut next = 0u16;
    for &block in Block::ALL {
        let count = state_count(block);
        let start = next;
        next = next
            .checked_add(count)
            .expect("block state id space overflowed u16");
        let default = start + offset_of(&default_state(block));
        table.push(BlockInfo {
            start,
            end: next,
            default,
        });
    }
    table
});

/// Range and default of a kind. O(1).
pub fn info(block: Block) -> BlockInfo {
    INFO[block as usize]
}

/// Total number of state ids; ids are valid in `[0, total_states())`.
pub fn total_states() -> u16 {
    INFO.last().expect("catalog is not empty").end
}

/// The default state id of a kind. O(1).
pub fn default_id(block: Block) -> u16 {
    info(block).default
}

/// Mixed-radix offset of a state inside its kind's range.
fn offset_of(state: &BlockState) -> u16 {
    let props = properties(state.block());
    let indexes = property_indexes(state);
    debug_assert_eq!(props.len(), indexes.len());

    let mut offset = 0u16;
    for (property, index) in props.iter().zip(indexes) {
        offset = offset * property.count() + index;
    }
    offset
}

/// Typed state for a global id. Panics outside `[0, total_states())`;
/// ids come from the catalog or from validated wire data, never from
/// untrusted input directly.
pub fn state_from_id(id: u16) -> BlockState {
    let kind_index = match INFO.binary_search_by(|entry| {
        if id < entry.start {
            std::cmp::Ordering::Greater
        } else if id >= entry.end {
            std::cmp::Ordering::Less
        } else {
            std::cmp::Ordering::Equal
        }
    }) {
        Ok(index) => index,
        Err(_) => panic!("block state id {} outside catalog", id),
    };

    let block = Block::ALL[kind_index];
    let props = properties(block);

    // Peel value indexes off the offset, last property first.
    let mut offset = id - INFO[kind_index].start;
    let mut indexes = vec![0u16; props.len()];
    for (slot, property) in indexes.iter_mut().zip(props.iter()).rev() {
        let count = property.count();
        *slot = offset % count;
        offset /= count;
    }

    state_from_indexes(block, &indexes)
}

/// Global id of a typed state: the kind's range is scanned for an equal
/// state. Ranges top out at 1296 entries, so the scan stays cheap.
pub fn id_from_state(state: &BlockState) -> u16 {
    let info = info(state.block());
    for id in info.start..info.end {
        if state_from_id(id) == *state {
            return id;
        }
    }
    panic!("block state not present in catalog: {:?}", state);
}

/// Builds a state from the default of `block` with the given textual
/// property overrides applied, as region-file `Properties` compounds
/// spell them. An unknown property name on a kind that has properties is
/// a catalog contract violation; kinds without properties ignore the
/// list entirely.
pub fn state_from_properties(block: Block, overrides: &[(&str, &str)]) -> BlockState {
    let props = properties(block);
    if props.is_empty() {
        return default_state(block);
    }

    let mut indexes = property_indexes(&default_state(block));
    for &(name, value) in overrides {
        let position = props
            .iter()
            .position(|p| p.name == name)
            .unwrap_or_else(|| panic!("block {:?} has no property {:?}", block, name));
        indexes[position] = props[position].parse(value);
    }
    state_from_indexes(block, &indexes)
}

/// Kind for a resource-location path with the namespace already removed.
pub fn block_from_name(name: &str) -> Option<Block> {
    Block::ALL.iter().copied().find(|b| b.name() == name)
}

/// Per-property value indexes of a typed state, in numbering order.
fn property_indexes(state: &BlockState) -> Vec<u16> {
    match *state {
        BlockState::GrassBlock { snowy } | BlockState::Podzol { snowy } => {
            vec![bool_index(snowy)]
        }
        BlockState::Water { level } | BlockState::Lava { level } => vec![level as u16],
        BlockState::OakLog { axis } => vec![axis.index()],
        BlockState::OakLeaves {
            distance,
            persistent,
        } => vec![(distance - 1) as u16, bool_index(persistent)],
        BlockState::OakStairs {
            facing,
            half,
            shape,
            waterlogged,
        } => vec![
            facing.index(),
            half.index(),
            shape.index(),
            bool_index(waterlogged),
        ],
        BlockState::OakSlab { kind, waterlogged } => {
            vec![kind.index(), bool_index(waterlogged)]
        }
        BlockState::WallTorch { facing } => vec![facing.index()],
        BlockState::Chest {
            facing,
            kind,
            waterlogged,
        } => vec![facing.index(), kind.index(), bool_index(waterlogged)],
        BlockState::Furnace { facing, lit } => vec![facing.index(), bool_index(lit)],
        BlockState::Lever {
            face,
            facing,
            powered,
        } => vec![face.index(), facing.index(), bool_index(powered)],
        BlockState::Snow { layers } => vec![(layers - 1) as u16],
        _ => Vec::new(),
    }
}

/// Typed state from per-property value indexes.
fn state_from_indexes(block: Block, indexes: &[u16]) -> BlockState {
    use crate::props::*;

    match block {
        Block::GrassBlock => BlockState::GrassBlock {
            snowy: bool_from_index(indexes[0]),
        },
        Block::Podzol => BlockState::Podzol {
            snowy: bool_from_index(indexes[0]),
        },
        Block::Water => BlockState::Water {
            level: indexes[0] as u8,
        },
        Block::Lava => BlockState::Lava {
            level: indexes[0] as u8,
        },
        Block::OakLog => BlockState::OakLog {
            axis: Axis::from_index(indexes[0]),
        },
        Block::OakLeaves => BlockState::OakLeaves {
            distance: indexes[0] as u8 + 1,
            persistent: bool_from_index(indexes[1]),
        },
        Block::OakStairs => BlockState::OakStairs {
            facing: Direction::from_index(indexes[0]),
            half: Half::from_index(indexes[1]),
            shape: StairShape::from_index(indexes[2]),
            waterlogged: bool_from_index(indexes[3]),
        },
        Block::OakSlab => BlockState::OakSlab {
            kind: SlabType::from_index(indexes[0]),
            waterlogged: bool_from_index(indexes[1]),
        },
        Block::WallTorch => BlockState::WallTorch {
            facing: Direction::from_index(indexes[0]),
        },
        Block::Chest => BlockState::Chest {
            facing: Direction::from_index(indexes[0]),
            kind: ChestType::from_index(indexes[1]),
            waterlogged: bool_from_index(indexes[2]),
        },
        Block::Furnace => BlockState::Furnace {
            facing: Direction::from_index(indexes[0]),
            lit: bool_from_index(indexes[1]),
        },
        Block::Lever => BlockState::Lever {
            face: AttachFace::from_index(indexes[0]),
            facing: Direction::from_index(indexes[1]),
            powered: bool_from_index(indexes[2]),
        },
        Block::Snow => BlockState::Snow {
            layers: indexes[0] as u8 + 1,
        },
        other => default_state(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::*;
    use crate::AIR;

    #[test]
    fn ranges_are_contiguous_and_cover_the_space() {
        let mut expected_start = 0;
        for &block in Block::ALL {
            let info = info(block);
            assert_eq!(info.start, expected_start, "gap before {:?}", block);
            assert!(info.end > info.start, "{:?} has an empty range", block);
            assert!(
                (info.start..info.end).contains(&info.default),
                "{:?} default outside its range",
                block
            );
            expected_start = info.end;
        }
        assert_eq!(expected_start, total_states());
    }

    #[test]
    fn every_id_round_trips() {
        for id in 0..total_states() {
            let state = state_from_id(id);
            assert_eq!(id_from_state(&state), id, "id {} did not round trip", id);
        }
    }

    #[test]
    fn defaults_resolve_to_their_own_kind() {
        for &block in Block::ALL {
            let id = default_id(block);
            assert_eq!(state_from_id(id).block(), block);
            assert_eq!(state_from_id(id), default_state(block));
        }
    }

    #[test]
    fn air_is_id_zero() {
        assert_eq!(AIR, 0);
        assert_eq!(state_from_id(0), BlockState::Air);
        assert_eq!(default_id(Block::Air), 0);
    }

    #[test]
    fn last_property_varies_fastest() {
        // Furnace enumerates facing(4) x lit(2): consecutive ids toggle
        // lit before facing moves.
        let start = info(Block::Furnace).start;
        assert_eq!(
            state_from_id(start),
            BlockState::Furnace {
                facing: Direction::North,
                lit: true
            }
        );
        assert_eq!(
            state_from_id(start + 1),
            BlockState::Furnace {
                facing: Direction::North,
                lit: false
            }
        );
        assert_eq!(
            state_from_id(start + 2),
            BlockState::Furnace {
                facing: Direction::South,
                lit: true
            }
        );
    }

    #[test]
    fn property_overrides_apply_over_the_default() {
        let state = state_from_properties(
            Block::OakStairs,
            &[("facing", "east"), ("waterlogged", "true")],
        );
        assert_eq!(
            state,
            BlockState::OakStairs {
                facing: Direction::East,
                half: Half::Bottom,
                shape: StairShape::Straight,
                waterlogged: true,
            }
        );
    }

    #[test]
    fn integer_properties_parse_with_their_offset() {
        assert_eq!(
            state_from_properties(Block::Snow, &[("layers", "8")]),
            BlockState::Snow { layers: 8 }
        );
        assert_eq!(
            state_from_properties(Block::OakLeaves, &[("distance", "1")]),
            BlockState::OakLeaves {
                distance: 1,
                persistent: false
            }
        );
    }

    #[test]
    #[should_panic(expected = "has no property")]
    fn unknown_property_name_panics() {
        state_from_properties(Block::Furnace, &[("axis", "y")]);
    }

    #[test]
    fn fieldless_kinds_ignore_property_lists() {
        assert_eq!(
            state_from_properties(Block::Stone, &[("anything", "goes")]),
            BlockState::Stone
        );
    }

    #[test]
    fn names_resolve_back_to_kinds() {
        assert_eq!(block_from_name("stone"), Some(Block::Stone));
        assert_eq!(block_from_name("oak_stairs"), Some(Block::OakStairs));
        assert_eq!(block_from_name("command_block"), None);
    }
}

//! Block-state catalog.
//!
//! Every placeable block state in the server's id space, as a typed
//! variant, together with the tables the runtime needs: kind → id range and
//! default, id → state, item id → kind. The tables follow the numbering
//! convention of the vanilla data reports (properties enumerate in report
//! order, the last property varying fastest), so the ids stay stable under
//! regeneration from a wider block set.

pub mod catalog;
pub mod items;
pub mod props;

pub use catalog::{
    block_from_name, default_id, default_state, id_from_state, info, state_from_id,
    state_from_properties, total_states, BlockInfo,
};
pub use items::block_from_item;
pub use props::{Axis, AttachFace, ChestType, Direction, Half, SlabType, StairShape};

/// The global id of `BlockState::Air`.
pub const AIR: u16 = 0;

/// A block kind: the family of states sharing a base block. The
/// discriminant doubles as the index into the catalog tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Block {
    Air,
    Stone,
    Granite,
    PolishedGranite,
    Diorite,
    PolishedDiorite,
    Andesite,
    PolishedAndesite,
    GrassBlock,
    Dirt,
    CoarseDirt,
    Podzol,
    Bedrock,
    Water,
    Lava,
    Sand,
    Gravel,
    OakLog,
    OakPlanks,
    OakLeaves,
    OakStairs,
    OakSlab,
    Cobblestone,
    Glass,
    Torch,
    WallTorch,
    Chest,
    Furnace,
    CraftingTable,
    Lever,
    Snow,
}

impl Block {
    /// All kinds in catalog order. Ranges in the id space follow this
    /// ordering contiguously.
    pub const ALL: &'static [Block] = &[
        Block::Air,
        Block::Stone,
        Block::Granite,
        Block::PolishedGranite,
        Block::Diorite,
        Block::PolishedDiorite,
        Block::Andesite,
        Block::PolishedAndesite,
        Block::GrassBlock,
        Block::Dirt,
        Block::CoarseDirt,
        Block::Podzol,
        Block::Bedrock,
        Block::Water,
        Block::Lava,
        Block::Sand,
        Block::Gravel,
        Block::OakLog,
        Block::OakPlanks,
        Block::OakLeaves,
        Block::OakStairs,
        Block::OakSlab,
        Block::Cobblestone,
        Block::Glass,
        Block::Torch,
        Block::WallTorch,
        Block::Chest,
        Block::Furnace,
        Block::CraftingTable,
        Block::Lever,
        Block::Snow,
    ];

    /// The resource-location path, without the `minecraft:` namespace.
    pub fn name(self) -> &'static str {
        match self {
            Block::Air => "air",
            Block::Stone => "stone",
            Block::Granite => "granite",
            Block::PolishedGranite => "polished_granite",
            Block::Diorite => "diorite",
            Block::PolishedDiorite => "polished_diorite",
            Block::Andesite => "andesite",
            Block::PolishedAndesite => "polished_andesite",
            Block::GrassBlock => "grass_block",
            Block::Dirt => "dirt",
            Block::CoarseDirt => "coarse_dirt",
            Block::Podzol => "podzol",
            Block::Bedrock => "bedrock",
            Block::Water => "water",
            Block::Lava => "lava",
            Block::Sand => "sand",
            Block::Gravel => "gravel",
            Block::OakLog => "oak_log",
            Block::OakPlanks => "oak_planks",
            Block::OakLeaves => "oak_leaves",
            Block::OakStairs => "oak_stairs",
            Block::OakSlab => "oak_slab",
            Block::Cobblestone => "cobblestone",
            Block::Glass => "glass",
            Block::Torch => "torch",
            Block::WallTorch => "wall_torch",
            Block::Chest => "chest",
            Block::Furnace => "furnace",
            Block::CraftingTable => "crafting_table",
            Block::Lever => "lever",
            Block::Snow => "snow",
        }
    }
}

/// One concrete block state, typed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockState {
    Air,
    Stone,
    Granite,
    PolishedGranite,
    Diorite,
    PolishedDiorite,
    Andesite,
    PolishedAndesite,
    GrassBlock { snowy: bool },
    Dirt,
    CoarseDirt,
    Podzol { snowy: bool },
    Bedrock,
    Water { level: u8 },
    Lava { level: u8 },
    Sand,
    Gravel,
    OakLog { axis: Axis },
    OakPlanks,
    OakLeaves { distance: u8, persistent: bool },
    OakStairs {
        facing: Direction,
        half: Half,
        shape: StairShape,
        waterlogged: bool,
    },
    OakSlab { kind: SlabType, waterlogged: bool },
    Cobblestone,
    Glass,
    Torch,
    WallTorch { facing: Direction },
    Chest {
        facing: Direction,
        kind: ChestType,
        waterlogged: bool,
    },
    Furnace { facing: Direction, lit: bool },
    CraftingTable,
    Lever {
        face: AttachFace,
        facing: Direction,
        powered: bool,
    },
    Snow { layers: u8 },
}

impl BlockState {
    /// The kind this state belongs to.
    pub fn block(&self) -> Block {
        match self {
            BlockState::Air => Block::Air,
            BlockState::Stone => Block::Stone,
            BlockState::Granite => Block::Granite,
            BlockState::PolishedGranite => Block::PolishedGranite,
            BlockState::Diorite => Block::Diorite,
            BlockState::PolishedDiorite => Block::PolishedDiorite,
            BlockState::Andesite => Block::Andesite,
            BlockState::PolishedAndesite => Block::PolishedAndesite,
            BlockState::GrassBlock { .. } => Block::GrassBlock,
            BlockState::Dirt => Block::Dirt,
            BlockState::CoarseDirt => Block::CoarseDirt,
            BlockState::Podzol { .. } => Block::Podzol,
            BlockState::Bedrock => Block::Bedrock,
            BlockState::Water { .. } => Block::Water,
            BlockState::Lava { .. } => Block::Lava,
            BlockState::Sand => Block::Sand,
            BlockState::Gravel => Block::Gravel,
            BlockState::OakLog { .. } => Block::OakLog,
            BlockState::OakPlanks => Block::OakPlanks,
            BlockState::OakLeaves { .. } => Block::OakLeaves,
            BlockState::OakStairs { .. } => Block::OakStairs,
            BlockState::OakSlab { .. } => Block::OakSlab,
            BlockState::Cobblestone => Block::Cobblestone,
            BlockState::Glass => Block::Glass,
            BlockState::Torch => Block::Torch,
            BlockState::WallTorch { .. } => Block::WallTorch,
            BlockState::Chest { .. } => Block::Chest,
            BlockState::Furnace { .. } => Block::Furnace,
            BlockState::CraftingTable => Block::CraftingTable,
            BlockState::Lever { .. } => Block::Lever,
            BlockState::Snow { .. } => Block::Snow,
        }
    }

    pub fn is_air(&self) -> bool {
        matches!(self, BlockState::Air)
    }
}

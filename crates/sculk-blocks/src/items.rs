//! Item registry → block kind table.
//!
//! Item ids live in their own numbering, in registry-report order. Most
//! placeable items map onto a block kind; tools and materials map to
//! `None`. Lookup is a straight vector index.

use crate::Block;

static ITEM_BLOCKS: &[Option<Block>] = &[
    Some(Block::Air),              // 0 air
    Some(Block::Stone),            // 1 stone
    Some(Block::Granite),          // 2 granite
    Some(Block::PolishedGranite),  // 3 polished_granite
    Some(Block::Diorite),          // 4 diorite
    Some(Block::PolishedDiorite),  // 5 polished_diorite
    Some(Block::Andesite),         // 6 andesite
    Some(Block::PolishedAndesite), // 7 polished_andesite
    Some(Block::GrassBlock),       // 8 grass_block
    Some(Block::Dirt),             // 9 dirt
    Some(Block::CoarseDirt),       // 10 coarse_dirt
    Some(Block::Podzol),           // 11 podzol
    Some(Block::Bedrock),          // 12 bedrock
    Some(Block::Sand),             // 13 sand
    Some(Block::Gravel),           // 14 gravel
    Some(Block::OakLog),           // 15 oak_log
    Some(Block::OakPlanks),        // 16 oak_planks
    Some(Block::OakLeaves),        // 17 oak_leaves
    Some(Block::OakStairs),        // 18 oak_stairs
    Some(Block::OakSlab),          // 19 oak_slab
    Some(Block::Cobblestone),      // 20 cobblestone
    Some(Block::Glass),            // 21 glass
    Some(Block::Torch),            // 22 torch
    Some(Block::Chest),            // 23 chest
    Some(Block::Furnace),          // 24 furnace
    Some(Block::CraftingTable),    // 25 crafting_table
    Some(Block::Lever),            // 26 lever
    Some(Block::Snow),             // 27 snow
    None,                          // 28 water_bucket
    None,                          // 29 lava_bucket
    None,                          // 30 stick
    None,                          // 31 diamond
    None,                          // 32 iron_pickaxe
];

/// Block kind a held item places, if any. Out-of-range ids resolve to
/// `None` like non-placeable items.
pub fn block_from_item(item_id: u32) -> Option<Block> {
    ITEM_BLOCKS.get(item_id as usize).copied().flatten()
}

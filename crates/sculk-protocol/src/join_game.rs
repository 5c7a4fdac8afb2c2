use crate::packet::{Packet, PacketBuffer};
use once_cell::sync::Lazy;
use sculk_common::Result;
use sculk_nbt::NbtWriter;

/// World floor and height of the 1.18 overworld.
const MIN_Y: i32 = -64;
const WORLD_HEIGHT: i32 = 384;

/// The login (join game) packet: everything the client needs before it
/// can hold a world, most of it the two embedded NBT registry blobs.
pub struct JoinGamePacket {
    pub entity_id: i32,
    pub is_hardcore: bool,
    pub gamemode: u8,
    pub previous_gamemode: i8,
    pub world_names: Vec<String>,
    pub world_name: String,
    pub hashed_seed: i64,
    pub max_players: i32,
    pub view_distance: i32,
    pub simulation_distance: i32,
    pub reduced_debug_info: bool,
    pub enable_respawn_screen: bool,
    pub is_debug: bool,
    pub is_flat: bool,
}

impl JoinGamePacket {
    pub fn new(entity_id: i32, max_players: i32) -> Self {
        Self {
            entity_id,
            is_hardcore: false,
            gamemode: 1, // creative
            previous_gamemode: -1,
            world_names: vec!["minecraft:overworld".to_owned()],
            world_name: "minecraft:overworld".to_owned(),
            hashed_seed: 0,
            max_players,
            view_distance: 10,
            simulation_distance: 10,
            reduced_debug_info: false,
            enable_respawn_screen: false,
            is_debug: false,
            is_flat: true,
        }
    }
}

impl Packet for JoinGamePacket {
    fn packet_id() -> i32 {
        0x26
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i32(self.entity_id);
        buffer.write_bool(self.is_hardcore);
        buffer.write_u8(self.gamemode);
        buffer.write_i8(self.previous_gamemode);

        buffer.write_varint(self.world_names.len() as i32);
        for world_name in &self.world_names {
            buffer.write_string(world_name);
        }

        buffer.write_bytes_raw(&DIMENSION_CODEC);
        buffer.write_bytes_raw(&DIMENSION);

        buffer.write_string(&self.world_name);
        buffer.write_i64(self.hashed_seed);
        buffer.write_varint(self.max_players);
        buffer.write_varint(self.view_distance);
        buffer.write_varint(self.simulation_distance);
        buffer.write_bool(self.reduced_debug_info);
        buffer.write_bool(self.enable_respawn_screen);
        buffer.write_bool(self.is_debug);
        buffer.write_bool(self.is_flat);

        Ok(())
    }
}

/// The overworld dimension-type element shared by both registry blobs.
fn write_overworld_element(w: &mut NbtWriter<&mut Vec<u8>>, name: Option<&str>) {
    w.begin_compound(name).expect("dimension nbt");
    w.byte(Some("piglin_safe"), 0).unwrap();
    w.byte(Some("natural"), 1).unwrap();
    w.float(Some("ambient_light"), 0.0).unwrap();
    w.string(Some("infiniburn"), "#minecraft:infiniburn_overworld")
        .unwrap();
    w.byte(Some("respawn_anchor_works"), 0).unwrap();
    w.byte(Some("has_skylight"), 1).unwrap();
    w.byte(Some("bed_works"), 1).unwrap();
    w.string(Some("effects"), "minecraft:overworld").unwrap();
    w.byte(Some("has_raids"), 1).unwrap();
    w.int(Some("min_y"), MIN_Y).unwrap();
    w.int(Some("height"), WORLD_HEIGHT).unwrap();
    w.int(Some("logical_height"), WORLD_HEIGHT).unwrap();
    w.double(Some("coordinate_scale"), 1.0).unwrap();
    w.byte(Some("ultrawarm"), 0).unwrap();
    w.byte(Some("has_ceiling"), 0).unwrap();
    w.end_compound().unwrap();
}

/// The registry codec: dimension types and worldgen biomes, one entry
/// each. Built once and spliced into every join packet.
pub static DIMENSION_CODEC: Lazy<Vec<u8>> = Lazy::new(|| {
    use sculk_nbt::TagType;

    let mut raw = Vec::new();
    let mut w = NbtWriter::new(&mut raw);
    w.begin_compound(Some("")).expect("dimension codec nbt");

    w.begin_compound(Some("minecraft:dimension_type")).unwrap();
    w.string(Some("type"), "minecraft:dimension_type").unwrap();
    w.begin_list(Some("value"), TagType::Compound, 1).unwrap();
    {
        w.begin_compound(None).unwrap();
        w.string(Some("name"), "minecraft:overworld").unwrap();
        w.int(Some("id"), 0).unwrap();
        write_overworld_element(&mut w, Some("element"));
        w.end_compound().unwrap();
    }
    w.end_compound().unwrap();

    w.begin_compound(Some("minecraft:worldgen/biome")).unwrap();
    w.string(Some("type"), "minecraft:worldgen/biome").unwrap();
    w.begin_list(Some("value"), TagType::Compound, 1).unwrap();
    {
        w.begin_compound(None).unwrap();
        w.string(Some("name"), "minecraft:plains").unwrap();
        w.int(Some("id"), 1).unwrap();
        w.begin_compound(Some("element")).unwrap();
        w.string(Some("precipitation"), "rain").unwrap();
        w.float(Some("temperature"), 0.8).unwrap();
        w.float(Some("downfall"), 0.4).unwrap();
        w.string(Some("category"), "plains").unwrap();
        w.begin_compound(Some("effects")).unwrap();
        w.int(Some("sky_color"), 7907327).unwrap();
        w.int(Some("water_fog_color"), 329011).unwrap();
        w.int(Some("fog_color"), 12638463).unwrap();
        w.int(Some("water_color"), 4159204).unwrap();
        w.begin_compound(Some("mood_sound")).unwrap();
        w.int(Some("tick_delay"), 6000).unwrap();
        w.double(Some("offset"), 2.0).unwrap();
        w.string(Some("sound"), "minecraft:ambient.cave").unwrap();
        w.int(Some("block_search_extent"), 8).unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();
        w.end_compound().unwrap();
    }
    w.end_compound().unwrap();

    w.end_compound().unwrap();
    raw
});

/// The dimension the player joins into: a bare overworld element.
pub static DIMENSION: Lazy<Vec<u8>> = Lazy::new(|| {
    let mut raw = Vec::new();
    let mut w = NbtWriter::new(&mut raw);
    write_overworld_element(&mut w, Some(""));
    raw
});

#[cfg(test)]
mod tests {
    use super::*;
    use sculk_nbt::{NbtReader, Tag};

    #[test]
    fn dimension_blob_is_a_named_root_compound() {
        let mut reader = NbtReader::new(&DIMENSION);
        let root = reader.next().unwrap();
        assert_eq!(root.name, "");
        assert_eq!(root.tag, Tag::Compound);
        reader.skip(&root.tag).unwrap();
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn codec_blob_holds_both_registries() {
        let mut reader = NbtReader::new(&DIMENSION_CODEC);
        let root = reader.next().unwrap();
        assert_eq!(root.tag, Tag::Compound);

        let mut registries = Vec::new();
        loop {
            let token = reader.next().unwrap();
            if token.tag == Tag::End {
                break;
            }
            registries.push(token.name.to_owned());
            reader.skip(&token.tag).unwrap();
        }
        assert_eq!(
            registries,
            vec!["minecraft:dimension_type", "minecraft:worldgen/biome"]
        );
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn join_game_field_order() {
        let packet = JoinGamePacket::new(7, 20);
        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();

        assert_eq!(buffer.read_i32().unwrap(), 7);
        assert!(!buffer.read_bool().unwrap());
        assert_eq!(buffer.read_u8().unwrap(), 1);
        assert_eq!(buffer.read_i8().unwrap(), -1);
        assert_eq!(buffer.read_varint().unwrap(), 1);
        assert_eq!(buffer.read_string().unwrap(), "minecraft:overworld");
    }
}

use crate::packet::{Packet, PacketBuffer};
use sculk_common::Result;

/// Light sections of a full-height chunk: 24 world sections plus one
/// padding section below and above.
const LIGHT_SECTIONS: usize = 26;
/// Nibble array covering one section.
const LIGHT_ARRAY_BYTES: usize = 2048;

/// Chunk Data and Update Light.
///
/// Carries the heightmap NBT, the concatenated paletted containers of
/// every section, and a full set of light arrays. Lighting is not
/// simulated; every section ships fully lit so clients render the world.
pub struct ChunkDataPacket {
    pub chunk_x: i32,
    pub chunk_z: i32,
    /// Pre-serialized heightmaps compound.
    pub heightmaps: Vec<u8>,
    /// Concatenated section encodings.
    pub data: Vec<u8>,
}

impl ChunkDataPacket {
    pub fn new(chunk_x: i32, chunk_z: i32, heightmaps: Vec<u8>, data: Vec<u8>) -> Self {
        Self {
            chunk_x,
            chunk_z,
            heightmaps,
            data,
        }
    }
}

impl Packet for ChunkDataPacket {
    fn packet_id() -> i32 {
        0x22
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i32(self.chunk_x);
        buffer.write_i32(self.chunk_z);

        buffer.write_bytes_raw(&self.heightmaps);

        buffer.write_varint(self.data.len() as i32);
        buffer.write_bytes_raw(&self.data);

        // No block entities.
        buffer.write_varint(0);

        // Light: trust edges, then the four section bitsets. All 26 light
        // sections are present and none are empty.
        buffer.write_bool(true);
        let full_mask = (1u64 << LIGHT_SECTIONS) - 1;
        write_bitset(buffer, full_mask); // sky light mask
        write_bitset(buffer, full_mask); // block light mask
        write_bitset(buffer, 0); // empty sky light mask
        write_bitset(buffer, 0); // empty block light mask

        write_light_arrays(buffer); // sky
        write_light_arrays(buffer); // block

        Ok(())
    }
}

fn write_bitset(buffer: &mut PacketBuffer, mask: u64) {
    if mask == 0 {
        buffer.write_varint(0);
    } else {
        buffer.write_varint(1);
        buffer.write_i64(mask as i64);
    }
}

fn write_light_arrays(buffer: &mut PacketBuffer) {
    buffer.write_varint(LIGHT_SECTIONS as i32);
    for _ in 0..LIGHT_SECTIONS {
        buffer.write_varint(LIGHT_ARRAY_BYTES as i32);
        // Both nibbles at full brightness.
        buffer.write_bytes_raw(&[0xff; LIGHT_ARRAY_BYTES]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let packet = ChunkDataPacket::new(3, -7, vec![0x0a, 0x00, 0x00, 0x00], vec![1, 2, 3]);
        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();

        assert_eq!(buffer.read_i32().unwrap(), 3);
        assert_eq!(buffer.read_i32().unwrap(), -7);
        // Heightmap compound: tag byte, empty name, end.
        assert_eq!(buffer.read_u8().unwrap(), 0x0a);
        assert_eq!(buffer.read_u16().unwrap(), 0);
        assert_eq!(buffer.read_u8().unwrap(), 0x00);
        // Section data, length-prefixed.
        assert_eq!(buffer.read_varint().unwrap(), 3);
        assert_eq!(buffer.read_u8().unwrap(), 1);
        assert_eq!(buffer.read_u8().unwrap(), 2);
        assert_eq!(buffer.read_u8().unwrap(), 3);
        // Block entity count.
        assert_eq!(buffer.read_varint().unwrap(), 0);
        // Light prologue.
        assert!(buffer.read_bool().unwrap());
        assert_eq!(buffer.read_varint().unwrap(), 1);
        assert_eq!(
            buffer.read_i64().unwrap() as u64,
            (1u64 << LIGHT_SECTIONS) - 1
        );
    }

    #[test]
    fn light_arrays_cover_every_section() {
        let packet = ChunkDataPacket::new(0, 0, Vec::new(), Vec::new());
        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();

        // Two array blocks of 26 sections, each 2048 bytes plus its
        // VarInt length prefix and count header.
        let light_bytes = 2 * (3 + LIGHT_SECTIONS * (2 + LIGHT_ARRAY_BYTES));
        assert!(buffer.get_buffer().len() > light_bytes);
    }
}

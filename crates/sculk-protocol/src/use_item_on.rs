use crate::packet::{Packet, PacketBuffer};
use sculk_common::types::BlockPos;
use sculk_common::Result;

/// Use Item On (serverbound): the block-placement gesture. The clicked
/// face's normal points at the cell the new block lands in.
#[derive(Debug, Clone, Copy)]
pub struct UseItemOnPacket {
    pub hand: i32,
    pub location: BlockPos,
    pub face: i32,
    pub cursor_x: f32,
    pub cursor_y: f32,
    pub cursor_z: f32,
    pub inside_block: bool,
}

impl Packet for UseItemOnPacket {
    fn packet_id() -> i32 {
        0x2e
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(UseItemOnPacket {
            hand: buffer.read_varint()?,
            location: buffer.read_position()?,
            face: buffer.read_varint()?,
            cursor_x: buffer.read_f32()?,
            cursor_y: buffer.read_f32()?,
            cursor_z: buffer.read_f32()?,
            inside_block: buffer.read_bool()?,
        })
    }
}

use crate::packet::{Packet, PacketBuffer};
use sculk_common::types::BlockPos;
use sculk_common::Result;

/// Digging statuses; the rest of the action space (item drops, arrow
/// release) shares this packet but does not touch blocks.
pub const STATUS_STARTED_DIGGING: i32 = 0;
pub const STATUS_CANCELLED_DIGGING: i32 = 1;
pub const STATUS_FINISHED_DIGGING: i32 = 2;

/// Player Action (serverbound): digging and its relatives.
#[derive(Debug, Clone, Copy)]
pub struct PlayerActionPacket {
    pub status: i32,
    pub location: BlockPos,
    pub face: i8,
}

impl Packet for PlayerActionPacket {
    fn packet_id() -> i32 {
        0x1a
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(PlayerActionPacket {
            status: buffer.read_varint()?,
            location: buffer.read_position()?,
            face: buffer.read_i8()?,
        })
    }
}

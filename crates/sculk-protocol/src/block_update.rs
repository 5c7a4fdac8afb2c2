use crate::packet::{Packet, PacketBuffer};
use sculk_common::types::BlockPos;
use sculk_common::Result;

/// One block cell changed.
#[derive(Debug, Clone, Copy)]
pub struct BlockUpdatePacket {
    pub location: BlockPos,
    pub block_state: u16,
}

impl Packet for BlockUpdatePacket {
    fn packet_id() -> i32 {
        0x0c
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_position(self.location);
        buffer.write_varint(self.block_state as i32);
        Ok(())
    }
}

impl BlockUpdatePacket {
    pub fn new(location: BlockPos, block_state: u16) -> Self {
        Self {
            location,
            block_state,
        }
    }
}

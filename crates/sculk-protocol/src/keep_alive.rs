use crate::packet::{Packet, PacketBuffer};
use sculk_common::Result;

/// Liveness probe. The id is the issue timestamp in milliseconds; the
/// client echoes it verbatim through its own 0x0F keep-alive.
#[derive(Debug, Clone, Copy)]
pub struct KeepAlivePacket {
    pub keep_alive_id: i64,
}

impl Packet for KeepAlivePacket {
    fn packet_id() -> i32 {
        0x21
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(KeepAlivePacket {
            keep_alive_id: buffer.read_i64()?,
        })
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i64(self.keep_alive_id);
        Ok(())
    }
}

impl KeepAlivePacket {
    pub fn new(keep_alive_id: i64) -> Self {
        Self { keep_alive_id }
    }
}

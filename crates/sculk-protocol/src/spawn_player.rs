use crate::packet::{Packet, PacketBuffer};
use sculk_common::types::Position;
use sculk_common::Result;
use uuid::Uuid;

/// Makes another player's avatar appear. Angles travel as 1/256ths of a
/// turn.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPlayerPacket {
    pub entity_id: i32,
    pub uuid: Uuid,
    pub position: Position,
    pub yaw: f32,
    pub pitch: f32,
}

impl Packet for SpawnPlayerPacket {
    fn packet_id() -> i32 {
        0x04
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.entity_id);
        buffer.write_uuid(self.uuid);
        buffer.write_f64(self.position.x);
        buffer.write_f64(self.position.y);
        buffer.write_f64(self.position.z);
        buffer.write_u8(angle_to_byte(self.yaw));
        buffer.write_u8(angle_to_byte(self.pitch));
        Ok(())
    }
}

fn angle_to_byte(degrees: f32) -> u8 {
    ((degrees / 360.0) * 256.0) as i32 as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angles_quantize_to_256ths() {
        assert_eq!(angle_to_byte(0.0), 0);
        assert_eq!(angle_to_byte(90.0), 64);
        assert_eq!(angle_to_byte(180.0), 128);
        assert_eq!(angle_to_byte(-90.0), 192);
    }
}

use crate::packet::{Packet, PacketBuffer};
use sculk_common::types::{Position, Rotation};
use sculk_common::Result;

/// Synchronize Player Position (clientbound). Closes the downloading-
/// terrain screen; the client must answer with a teleport confirm
/// carrying the same id.
#[derive(Debug, Clone, Copy)]
pub struct SynchronizePlayerPositionPacket {
    pub position: Position,
    pub rotation: Rotation,
    /// Bit field marking fields as relative; zero means absolute.
    pub flags: u8,
    pub teleport_id: i32,
    pub dismount_vehicle: bool,
}

impl SynchronizePlayerPositionPacket {
    pub fn absolute(position: Position, teleport_id: i32) -> Self {
        Self {
            position,
            rotation: Rotation {
                yaw: 0.0,
                pitch: 0.0,
            },
            flags: 0,
            teleport_id,
            dismount_vehicle: false,
        }
    }

    pub const RELATIVE_X: u8 = 0x01;
    pub const RELATIVE_Y: u8 = 0x02;
    pub const RELATIVE_Z: u8 = 0x04;
    pub const RELATIVE_Y_ROT: u8 = 0x08;
    pub const RELATIVE_X_ROT: u8 = 0x10;
}

impl Packet for SynchronizePlayerPositionPacket {
    fn packet_id() -> i32 {
        0x38
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_f64(self.position.x);
        buffer.write_f64(self.position.y);
        buffer.write_f64(self.position.z);
        buffer.write_f32(self.rotation.yaw);
        buffer.write_f32(self.rotation.pitch);
        buffer.write_u8(self.flags);
        buffer.write_varint(self.teleport_id);
        buffer.write_bool(self.dismount_vehicle);
        Ok(())
    }
}

use crate::packet::{Packet, PacketBuffer};
use sculk_common::types::Position;
use sculk_common::Result;

/// Relative entity motion, bounded to eight blocks per packet by the
/// fixed-point encoding.
#[derive(Debug, Clone, Copy)]
pub struct UpdateEntityPositionPacket {
    pub entity_id: i32,
    pub delta_x: i16,
    pub delta_y: i16,
    pub delta_z: i16,
    pub on_ground: bool,
}

impl UpdateEntityPositionPacket {
    /// Deltas are `(current * 32 - previous * 32) * 128`, truncated into
    /// sixteen bits.
    pub fn from_movement(entity_id: i32, previous: Position, current: Position) -> Self {
        Self {
            entity_id,
            delta_x: fixed_point_delta(previous.x, current.x),
            delta_y: fixed_point_delta(previous.y, current.y),
            delta_z: fixed_point_delta(previous.z, current.z),
            on_ground: true,
        }
    }
}

fn fixed_point_delta(previous: f64, current: f64) -> i16 {
    ((current * 32.0 - previous * 32.0) * 128.0) as i16
}

impl Packet for UpdateEntityPositionPacket {
    fn packet_id() -> i32 {
        0x29
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.entity_id);
        buffer.write_i16(self.delta_x);
        buffer.write_i16(self.delta_y);
        buffer.write_i16(self.delta_z);
        buffer.write_bool(self.on_ground);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_block_east_is_4096() {
        let packet = UpdateEntityPositionPacket::from_movement(
            1,
            Position::new(0.0, 64.0, 0.0),
            Position::new(1.0, 64.0, 0.0),
        );
        assert_eq!(packet.delta_x, 4096);
        assert_eq!(packet.delta_y, 0);
        assert_eq!(packet.delta_z, 0);
    }

    #[test]
    fn negative_motion_stays_signed() {
        let packet = UpdateEntityPositionPacket::from_movement(
            1,
            Position::new(0.0, 64.0, 0.0),
            Position::new(-0.5, 63.0, 0.25),
        );
        assert_eq!(packet.delta_x, -2048);
        assert_eq!(packet.delta_y, -4096);
        assert_eq!(packet.delta_z, 1024);
    }
}

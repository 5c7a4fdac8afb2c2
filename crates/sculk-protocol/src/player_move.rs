use crate::packet::{Packet, PacketBuffer};
use sculk_common::Result;

/// Set Player Position (serverbound).
#[derive(Debug, Clone, Copy)]
pub struct SetPlayerPositionPacket {
    pub x: f64,
    pub feet_y: f64,
    pub z: f64,
    pub on_ground: bool,
}

impl Packet for SetPlayerPositionPacket {
    fn packet_id() -> i32 {
        0x11
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(SetPlayerPositionPacket {
            x: buffer.read_f64()?,
            feet_y: buffer.read_f64()?,
            z: buffer.read_f64()?,
            on_ground: buffer.read_bool()?,
        })
    }
}

/// Set Player Position and Rotation (serverbound).
#[derive(Debug, Clone, Copy)]
pub struct SetPlayerPositionAndRotationPacket {
    pub x: f64,
    pub feet_y: f64,
    pub z: f64,
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl Packet for SetPlayerPositionAndRotationPacket {
    fn packet_id() -> i32 {
        0x12
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(SetPlayerPositionAndRotationPacket {
            x: buffer.read_f64()?,
            feet_y: buffer.read_f64()?,
            z: buffer.read_f64()?,
            yaw: buffer.read_f32()?,
            pitch: buffer.read_f32()?,
            on_ground: buffer.read_bool()?,
        })
    }
}

/// Set Player Rotation (serverbound).
#[derive(Debug, Clone, Copy)]
pub struct SetPlayerRotationPacket {
    pub yaw: f32,
    pub pitch: f32,
    pub on_ground: bool,
}

impl Packet for SetPlayerRotationPacket {
    fn packet_id() -> i32 {
        0x13
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(SetPlayerRotationPacket {
            yaw: buffer.read_f32()?,
            pitch: buffer.read_f32()?,
            on_ground: buffer.read_bool()?,
        })
    }
}

/// Set Player On Ground (serverbound): the bare movement heartbeat.
#[derive(Debug, Clone, Copy)]
pub struct SetPlayerOnGroundPacket {
    pub on_ground: bool,
}

impl Packet for SetPlayerOnGroundPacket {
    fn packet_id() -> i32 {
        0x14
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(SetPlayerOnGroundPacket {
            on_ground: buffer.read_bool()?,
        })
    }
}

//! Per-phase serverbound packet sets, keyed by wire id.
//!
//! Each decoder consumes the id VarInt then the payload. An id the phase
//! does not know yields `UnknownPacketId` after the rest of the frame is
//! dropped, so the caller can log it and keep reading.

use crate::client_information::ClientInformationPacket;
use crate::handshake::HandshakePacket;
use crate::inventory::{SetCreativeModeSlotPacket, SetHeldItemPacket};
use crate::keep_alive::KeepAlivePacket;
use crate::login::LoginStartPacket;
use crate::packet::{Packet, PacketBuffer};
use crate::player_action::PlayerActionPacket;
use crate::player_move::{
    SetPlayerOnGroundPacket, SetPlayerPositionAndRotationPacket, SetPlayerPositionPacket,
    SetPlayerRotationPacket,
};
use crate::status::{PingRequestPacket, StatusRequestPacket};
use crate::use_item_on::UseItemOnPacket;
use sculk_common::error::ProtocolState;
use sculk_common::{Result, SculkError};

fn unknown(state: ProtocolState, id: i32, buffer: &mut PacketBuffer) -> SculkError {
    buffer.skip_remaining();
    SculkError::UnknownPacketId { state, id }
}

#[derive(Debug)]
pub enum ServerboundHandshakePacket {
    Handshake(HandshakePacket),
}

impl ServerboundHandshakePacket {
    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self> {
        let id = buffer.read_varint()?;
        match id {
            0x00 => Ok(ServerboundHandshakePacket::Handshake(
                HandshakePacket::read_from_buffer(buffer)?,
            )),
            other => Err(unknown(ProtocolState::Handshaking, other, buffer)),
        }
    }
}

pub enum ServerboundStatusPacket {
    StatusRequest(StatusRequestPacket),
    PingRequest(PingRequestPacket),
}

impl ServerboundStatusPacket {
    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self> {
        let id = buffer.read_varint()?;
        match id {
            0x00 => Ok(ServerboundStatusPacket::StatusRequest(
                StatusRequestPacket::read_from_buffer(buffer)?,
            )),
            0x01 => Ok(ServerboundStatusPacket::PingRequest(
                PingRequestPacket::read_from_buffer(buffer)?,
            )),
            other => Err(unknown(ProtocolState::Status, other, buffer)),
        }
    }
}

pub enum ServerboundLoginPacket {
    LoginStart(LoginStartPacket),
}

impl ServerboundLoginPacket {
    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self> {
        let id = buffer.read_varint()?;
        match id {
            0x00 => Ok(ServerboundLoginPacket::LoginStart(
                LoginStartPacket::read_from_buffer(buffer)?,
            )),
            other => Err(unknown(ProtocolState::Login, other, buffer)),
        }
    }
}

/// Confirm Teleportation (serverbound).
#[derive(Debug, Clone, Copy)]
pub struct ConfirmTeleportationPacket {
    pub teleport_id: i32,
}

impl Packet for ConfirmTeleportationPacket {
    fn packet_id() -> i32 {
        0x00
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(ConfirmTeleportationPacket {
            teleport_id: buffer.read_varint()?,
        })
    }
}

/// Player Abilities (serverbound): only the flying bit ever changes.
#[derive(Debug, Clone, Copy)]
pub struct PlayerAbilitiesPacket {
    pub flags: u8,
}

impl Packet for PlayerAbilitiesPacket {
    fn packet_id() -> i32 {
        0x19
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(PlayerAbilitiesPacket {
            flags: buffer.read_u8()?,
        })
    }
}

/// Player Command (serverbound): sneak, sprint and friends.
#[derive(Debug, Clone, Copy)]
pub struct PlayerCommandPacket {
    pub entity_id: i32,
    pub action_id: i32,
    pub jump_boost: i32,
}

impl Packet for PlayerCommandPacket {
    fn packet_id() -> i32 {
        0x1b
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(PlayerCommandPacket {
            entity_id: buffer.read_varint()?,
            action_id: buffer.read_varint()?,
            jump_boost: buffer.read_varint()?,
        })
    }
}

/// Swing Arm (serverbound).
#[derive(Debug, Clone, Copy)]
pub struct SwingArmPacket {
    pub hand: i32,
}

impl Packet for SwingArmPacket {
    fn packet_id() -> i32 {
        0x2c
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(SwingArmPacket {
            hand: buffer.read_varint()?,
        })
    }
}

/// Everything a playing client may send that this server understands.
#[derive(Debug)]
pub enum ServerboundPlayPacket {
    ConfirmTeleportation(ConfirmTeleportationPacket),
    ClientInformation(ClientInformationPacket),
    KeepAlive(KeepAlivePacket),
    SetPlayerPosition(SetPlayerPositionPacket),
    SetPlayerPositionAndRotation(SetPlayerPositionAndRotationPacket),
    SetPlayerRotation(SetPlayerRotationPacket),
    SetPlayerOnGround(SetPlayerOnGroundPacket),
    PlayerAbilities(PlayerAbilitiesPacket),
    PlayerAction(PlayerActionPacket),
    PlayerCommand(PlayerCommandPacket),
    SetHeldItem(SetHeldItemPacket),
    SetCreativeModeSlot(SetCreativeModeSlotPacket),
    SwingArm(SwingArmPacket),
    UseItemOn(UseItemOnPacket),
}

impl ServerboundPlayPacket {
    pub fn decode(buffer: &mut PacketBuffer) -> Result<Self> {
        let id = buffer.read_varint()?;
        match id {
            0x00 => Ok(ServerboundPlayPacket::ConfirmTeleportation(
                ConfirmTeleportationPacket::read_from_buffer(buffer)?,
            )),
            0x05 => Ok(ServerboundPlayPacket::ClientInformation(
                ClientInformationPacket::read_from_buffer(buffer)?,
            )),
            0x0f => Ok(ServerboundPlayPacket::KeepAlive(
                KeepAlivePacket::read_from_buffer(buffer)?,
            )),
            0x11 => Ok(ServerboundPlayPacket::SetPlayerPosition(
                SetPlayerPositionPacket::read_from_buffer(buffer)?,
            )),
            0x12 => Ok(ServerboundPlayPacket::SetPlayerPositionAndRotation(
                SetPlayerPositionAndRotationPacket::read_from_buffer(buffer)?,
            )),
            0x13 => Ok(ServerboundPlayPacket::SetPlayerRotation(
                SetPlayerRotationPacket::read_from_buffer(buffer)?,
            )),
            0x14 => Ok(ServerboundPlayPacket::SetPlayerOnGround(
                SetPlayerOnGroundPacket::read_from_buffer(buffer)?,
            )),
            0x19 => Ok(ServerboundPlayPacket::PlayerAbilities(
                PlayerAbilitiesPacket::read_from_buffer(buffer)?,
            )),
            0x1a => Ok(ServerboundPlayPacket::PlayerAction(
                PlayerActionPacket::read_from_buffer(buffer)?,
            )),
            0x1b => Ok(ServerboundPlayPacket::PlayerCommand(
                PlayerCommandPacket::read_from_buffer(buffer)?,
            )),
            0x25 => Ok(ServerboundPlayPacket::SetHeldItem(
                SetHeldItemPacket::read_from_buffer(buffer)?,
            )),
            0x28 => Ok(ServerboundPlayPacket::SetCreativeModeSlot(
                SetCreativeModeSlotPacket::read_from_buffer(buffer)?,
            )),
            0x2c => Ok(ServerboundPlayPacket::SwingArm(
                SwingArmPacket::read_from_buffer(buffer)?,
            )),
            0x2e => Ok(ServerboundPlayPacket::UseItemOn(
                UseItemOnPacket::read_from_buffer(buffer)?,
            )),
            other => Err(unknown(ProtocolState::Play, other, buffer)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sculk_common::types::BlockPos;

    #[test]
    fn unknown_play_id_is_recoverable_and_drains_the_frame() {
        let mut buffer = PacketBuffer::new();
        buffer.write_varint(0x7b);
        buffer.write_i64(0xdead);

        match ServerboundPlayPacket::decode(&mut buffer) {
            Err(err @ SculkError::UnknownPacketId { .. }) => {
                assert!(err.is_recoverable());
            }
            other => panic!("expected UnknownPacketId, got {:?}", other.map(|_| ())),
        }
        assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn dig_packet_decodes() {
        let mut buffer = PacketBuffer::new();
        buffer.write_varint(0x1a);
        buffer.write_varint(0);
        buffer.write_position(BlockPos::new(0, 65, 0));
        buffer.write_i8(1);

        match ServerboundPlayPacket::decode(&mut buffer).unwrap() {
            ServerboundPlayPacket::PlayerAction(action) => {
                assert_eq!(action.status, 0);
                assert_eq!(action.location, BlockPos::new(0, 65, 0));
                assert_eq!(action.face, 1);
            }
            other => panic!("expected PlayerAction, got {:?}", other),
        }
    }

    #[test]
    fn use_item_on_decodes() {
        let mut buffer = PacketBuffer::new();
        buffer.write_varint(0x2e);
        buffer.write_varint(0);
        buffer.write_position(BlockPos::new(0, 64, 0));
        buffer.write_varint(1);
        buffer.write_f32(0.5);
        buffer.write_f32(1.0);
        buffer.write_f32(0.5);
        buffer.write_bool(false);

        match ServerboundPlayPacket::decode(&mut buffer).unwrap() {
            ServerboundPlayPacket::UseItemOn(place) => {
                assert_eq!(place.location, BlockPos::new(0, 64, 0));
                assert_eq!(place.face, 1);
                assert!(!place.inside_block);
            }
            other => panic!("expected UseItemOn, got {:?}", other),
        }
    }
}

use crate::packet::{Packet, PacketBuffer};
use sculk_common::Result;
use uuid::Uuid;

pub struct LoginStartPacket {
    pub username: String,
}

impl Packet for LoginStartPacket {
    fn packet_id() -> i32 {
        0x00
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(LoginStartPacket {
            username: buffer.read_string()?,
        })
    }
}

pub struct LoginSuccessPacket {
    pub uuid: Uuid,
    pub username: String,
}

impl LoginSuccessPacket {
    /// In offline mode the identity is derived from the username the way
    /// vanilla derives it, so the same name always yields the same UUID.
    /// Online mode hands out a random identity; real authentication is a
    /// different server's job.
    pub fn new(username: String, offline_mode: bool) -> Self {
        let uuid = if offline_mode {
            Uuid::new_v3(
                &Uuid::NAMESPACE_DNS,
                format!("OfflinePlayer:{}", username).as_bytes(),
            )
        } else {
            Uuid::new_v4()
        };

        LoginSuccessPacket { uuid, username }
    }
}

impl Packet for LoginSuccessPacket {
    fn packet_id() -> i32 {
        0x02
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_uuid(self.uuid);
        buffer.write_string(&self.username);
        Ok(())
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(LoginSuccessPacket {
            uuid: buffer.read_uuid()?,
            username: buffer.read_string()?,
        })
    }
}

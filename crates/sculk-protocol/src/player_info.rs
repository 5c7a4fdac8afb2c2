use crate::packet::{Packet, PacketBuffer};
use sculk_common::Result;
use uuid::Uuid;

/// One tab-list entry being added.
#[derive(Debug, Clone)]
pub struct PlayerInfoEntry {
    pub uuid: Uuid,
    pub name: String,
    pub gamemode: i32,
    pub ping_millis: i32,
}

/// Player Info, add-player action only: enough to populate the tab list
/// when someone joins.
#[derive(Debug, Clone)]
pub struct PlayerInfoPacket {
    pub entries: Vec<PlayerInfoEntry>,
}

impl PlayerInfoPacket {
    pub fn add_player(uuid: Uuid, name: String) -> Self {
        Self {
            entries: vec![PlayerInfoEntry {
                uuid,
                name,
                gamemode: 1,
                ping_millis: 0,
            }],
        }
    }
}

impl Packet for PlayerInfoPacket {
    fn packet_id() -> i32 {
        0x36
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(0); // action: add player
        buffer.write_varint(self.entries.len() as i32);
        for entry in &self.entries {
            buffer.write_uuid(entry.uuid);
            buffer.write_string(&entry.name);
            buffer.write_varint(0); // no profile properties
            buffer.write_varint(entry.gamemode);
            buffer.write_varint(entry.ping_millis);
            buffer.write_bool(false); // no display name
        }
        Ok(())
    }
}

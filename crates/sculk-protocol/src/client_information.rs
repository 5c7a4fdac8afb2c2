use crate::packet::{Packet, PacketBuffer};
use sculk_common::Result;

/// Client Information (serverbound): locale and rendering preferences.
#[derive(Debug, Clone)]
pub struct ClientInformationPacket {
    pub locale: String,
    pub view_distance: i8,
    pub chat_mode: i32,
    pub chat_colors: bool,
    pub displayed_skin_parts: u8,
    pub main_hand: i32,
    pub enable_text_filtering: bool,
    pub allow_server_listings: bool,
}

impl Packet for ClientInformationPacket {
    fn packet_id() -> i32 {
        0x05
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(ClientInformationPacket {
            locale: buffer.read_string()?,
            view_distance: buffer.read_i8()?,
            chat_mode: buffer.read_varint()?,
            chat_colors: buffer.read_bool()?,
            displayed_skin_parts: buffer.read_u8()?,
            main_hand: buffer.read_varint()?,
            enable_text_filtering: buffer.read_bool()?,
            allow_server_listings: buffer.read_bool()?,
        })
    }
}

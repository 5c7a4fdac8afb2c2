use crate::packet::{Packet, PacketBuffer};
use sculk_common::Result;

/// First packet of every modern connection; `next_state` routes the
/// session to status or login.
#[derive(Debug)]
pub struct HandshakePacket {
    pub protocol_version: i32,
    pub server_address: String,
    pub server_port: u16,
    pub next_state: i32,
}

impl Packet for HandshakePacket {
    fn packet_id() -> i32 {
        0x00
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_varint(self.protocol_version);
        buffer.write_string(&self.server_address);
        buffer.write_u16(self.server_port);
        buffer.write_varint(self.next_state);
        Ok(())
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(HandshakePacket {
            protocol_version: buffer.read_varint()?,
            server_address: buffer.read_string()?,
            server_port: buffer.read_u16()?,
            next_state: buffer.read_varint()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_round_trips() {
        let packet = HandshakePacket {
            protocol_version: 758,
            server_address: "localhost".to_owned(),
            server_port: 25565,
            next_state: 2,
        };

        let mut buffer = PacketBuffer::new();
        packet.write_to_buffer(&mut buffer).unwrap();
        let read = HandshakePacket::read_from_buffer(&mut buffer).unwrap();

        assert_eq!(read.protocol_version, 758);
        assert_eq!(read.server_address, "localhost");
        assert_eq!(read.server_port, 25565);
        assert_eq!(read.next_state, 2);
    }
}

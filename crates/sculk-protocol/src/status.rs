use crate::packet::{Packet, PacketBuffer};
use sculk_common::config::ServerConfig;
use sculk_common::Result;
use serde::Serialize;

pub struct StatusRequestPacket;

impl Packet for StatusRequestPacket {
    fn packet_id() -> i32 {
        0x00
    }

    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(StatusRequestPacket)
    }
}

/// Client-chosen probe value; echoed verbatim in the pong.
#[derive(Debug, Clone, Copy)]
pub struct PingRequestPacket {
    pub payload: i64,
}

impl Packet for PingRequestPacket {
    fn packet_id() -> i32 {
        0x01
    }

    fn read_from_buffer(buffer: &mut PacketBuffer) -> Result<Self> {
        Ok(PingRequestPacket {
            payload: buffer.read_i64()?,
        })
    }
}

/// The server-list JSON document.
#[derive(Debug, Serialize)]
pub struct ServerStatus {
    pub version: StatusVersion,
    pub players: StatusPlayers,
    pub description: StatusDescription,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusVersion {
    pub name: String,
    pub protocol: i32,
}

#[derive(Debug, Serialize)]
pub struct StatusPlayers {
    pub max: i32,
    pub online: i32,
}

#[derive(Debug, Serialize)]
pub struct StatusDescription {
    pub text: String,
}

impl ServerStatus {
    pub fn from_config(config: &ServerConfig, online: i32) -> Self {
        ServerStatus {
            version: StatusVersion {
                name: config.version_name.clone(),
                protocol: config.protocol_version,
            },
            players: StatusPlayers {
                max: config.max_players,
                online,
            },
            description: StatusDescription {
                text: config.motd.clone(),
            },
            favicon: config
                .favicon
                .as_ref()
                .map(|png| format!("data:image/png;base64,{}", png)),
        }
    }
}

pub struct StatusResponsePacket {
    pub response: String,
}

impl StatusResponsePacket {
    pub fn new(status: &ServerStatus) -> Self {
        StatusResponsePacket {
            response: serde_json::to_string(status).expect("status JSON serialization"),
        }
    }
}

impl Packet for StatusResponsePacket {
    fn packet_id() -> i32 {
        0x00
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_string(&self.response);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PingResponsePacket {
    pub payload: i64,
}

impl Packet for PingResponsePacket {
    fn packet_id() -> i32 {
        0x01
    }

    fn write_to_buffer(&self, buffer: &mut PacketBuffer) -> Result<()> {
        buffer.write_i64(self.payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_json_shape() {
        let config = ServerConfig::default();
        let status = ServerStatus::from_config(&config, 3);
        let json: serde_json::Value =
            serde_json::from_str(&StatusResponsePacket::new(&status).response).unwrap();

        assert_eq!(json["version"]["name"], "1.18.2");
        assert_eq!(json["version"]["protocol"], 758);
        assert_eq!(json["players"]["online"], 3);
        assert_eq!(json["players"]["max"], 20);
        assert_eq!(json["description"]["text"], "A sculk server");
        assert!(json.get("favicon").is_none());
    }

    #[test]
    fn favicon_becomes_a_data_url() {
        let config = ServerConfig {
            favicon: Some("AAAA".to_owned()),
            ..Default::default()
        };
        let status = ServerStatus::from_config(&config, 0);
        assert_eq!(
            status.favicon.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }
}

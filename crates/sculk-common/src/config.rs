use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Server configuration, loadable from a JSON file. Every field has a
/// default so a missing or partial file still yields a runnable server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Endpoint the listener binds to.
    pub bind_address: String,
    pub max_players: i32,
    /// Description shown in the server list.
    pub motd: String,
    pub version_name: String,
    pub protocol_version: i32,
    /// Base64-encoded 64x64 PNG, sent as a data URL in the status JSON.
    pub favicon: Option<String>,
    /// Offline mode derives UUIDs from usernames instead of Mojang auth.
    pub offline_mode: bool,
    /// Optional Anvil region file the spawn chunk is bootstrapped from.
    pub region_file: Option<String>,
    /// World height the synthesized spawn heightmap reports.
    pub spawn_height: i32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:25565".to_owned(),
            max_players: 20,
            motd: "A sculk server".to_owned(),
            version_name: "1.18.2".to_owned(),
            protocol_version: 758,
            favicon: None,
            offline_mode: true,
            region_file: None,
            spawn_height: 70,
        }
    }
}

impl ServerConfig {
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let raw = fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

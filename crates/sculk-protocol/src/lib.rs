pub mod block_update;
pub mod chunk_data;
pub mod client_information;
pub mod entity_position;
pub mod handshake;
pub mod inventory;
pub mod join_game;
pub mod keep_alive;
pub mod legacy_ping;
pub mod login;
pub mod packet;
pub mod player_action;
pub mod player_info;
pub mod player_move;
pub mod serverbound;
pub mod session;
pub mod spawn_player;
pub mod status;
pub mod synchronize_position;
pub mod use_item_on;

pub use packet::{Packet, PacketBuffer};
pub use session::{ProtocolPhase, Session};

//! Listener and per-connection protocol drivers.
//!
//! Each accepted socket gets its own task running the phase machine:
//! handshaking routes to status or login, and a session that reaches play
//! gains a keep-alive task and a roster entry. The driver owns the read
//! half; everything that writes goes through the shared session.

use crate::world::{self, SharedWorld, WorldManager};
use sculk_blocks::{block_from_item, default_id, AIR};
use sculk_common::config::ServerConfig;
use sculk_common::{Result, SculkError};
use sculk_logger::log;
use sculk_logger::systime;
use sculk_logger::LogSeverity::{Debug, Error, Info};
use sculk_protocol::keep_alive::KeepAlivePacket;
use sculk_protocol::legacy_ping;
use sculk_protocol::login::LoginSuccessPacket;
use sculk_protocol::packet::read_frame;
use sculk_protocol::serverbound::{
    ServerboundHandshakePacket, ServerboundLoginPacket, ServerboundPlayPacket,
    ServerboundStatusPacket,
};
use sculk_protocol::session::{KEEP_ALIVE_INTERVAL, KEEP_ALIVE_TIMEOUT};
use sculk_protocol::status::{PingResponsePacket, ServerStatus, StatusResponsePacket};
use sculk_protocol::{PacketBuffer, ProtocolPhase, Session};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::ReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio::time::interval;

pub struct Server {
    listener: TcpListener,
    world: SharedWorld,
}

impl Server {
    /// Binds the listener and builds the world. `serve` starts accepting.
    pub async fn bind(config: ServerConfig) -> io::Result<Server> {
        let listener = TcpListener::bind(&config.bind_address).await?;
        let world = Arc::new(Mutex::new(WorldManager::new(config)));
        Ok(Server { listener, world })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn serve(self) {
        if let Ok(addr) = self.local_addr() {
            log(format!("Listening on {}", addr), Info);
        }

        tokio::spawn(world::tick_loop(self.world.clone()));

        loop {
            match self.listener.accept().await {
                Ok((socket, addr)) => {
                    log(format!("New connection from {}", addr), Debug);
                    tokio::spawn(handle_connection(self.world.clone(), socket));
                }
                Err(e) => log(format!("Failed to accept connection: {}", e), Error),
            }
        }
    }
}

/// Binds and serves forever with the given configuration.
pub async fn run(config: ServerConfig) {
    match Server::bind(config).await {
        Ok(server) => server.serve().await,
        Err(e) => log(format!("Failed to bind listener: {}", e), Error),
    }
}

async fn handle_connection(world: SharedWorld, socket: TcpStream) {
    // The pre-Netty server list ping is a bare 0xFE ahead of any framed
    // packet; answer it and hang up before the packet machinery starts.
    let mut probe = [0u8; 1];
    match socket.peek(&mut probe).await {
        Ok(0) => return,
        Ok(_) if probe[0] == legacy_ping::LEGACY_PING => {
            let mut socket = socket;
            if let Err(e) = legacy_ping::write_legacy_kick(&mut socket).await {
                log(format!("Failed to answer legacy ping: {}", e), Debug);
            }
            return;
        }
        Ok(_) => {}
        Err(e) => {
            log(format!("Failed to read from socket: {}", e), Debug);
            return;
        }
    }

    let (session, reader) = Session::new(socket);
    let session = Arc::new(Mutex::new(session));
    let close_signal = Arc::new(Notify::new());

    drive_session(world, session, reader, close_signal).await;
}

/// Runs one connection's phase machine until the session closes.
async fn drive_session(
    world: SharedWorld,
    session: Arc<Mutex<Session>>,
    mut reader: ReadHalf<TcpStream>,
    close_signal: Arc<Notify>,
) {
    let mut player_id: Option<u32> = None;
    let mut keep_alive_task: Option<JoinHandle<()>> = None;

    loop {
        let (phase, compression) = {
            let guard = session.lock().await;
            (guard.phase, guard.compression)
        };
        if phase == ProtocolPhase::CloseConnection {
            break;
        }

        let frame = tokio::select! {
            frame = read_frame(&mut reader, compression) => frame,
            _ = close_signal.notified() => break,
        };

        let mut buffer = match frame {
            Ok(buffer) => buffer,
            Err(SculkError::IoError(ref e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                log("Peer disconnected".to_owned(), Debug);
                break;
            }
            Err(e) => {
                log(format!("Failed to read frame: {}", e), Debug);
                break;
            }
        };

        let outcome = match phase {
            ProtocolPhase::Handshaking => handle_handshake(&session, &mut buffer).await,
            ProtocolPhase::Status => handle_status(&world, &session, &mut buffer).await,
            ProtocolPhase::Login => {
                handle_login(
                    &world,
                    &session,
                    &mut buffer,
                    &close_signal,
                    &mut player_id,
                    &mut keep_alive_task,
                )
                .await
            }
            ProtocolPhase::Play => handle_play(&world, &session, &mut buffer, player_id).await,
            ProtocolPhase::CloseConnection => break,
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_recoverable() => {
                log(format!("Skipping packet: {}", e), Debug);
            }
            Err(e) => {
                log(format!("Session error: {}", e), Debug);
                break;
            }
        }
    }

    if let Some(task) = keep_alive_task {
        task.abort();
    }
    if let Some(id) = player_id {
        world.lock().await.remove_player(id);
    }
    session.lock().await.close();
}

async fn handle_handshake(
    session: &Arc<Mutex<Session>>,
    buffer: &mut PacketBuffer,
) -> Result<()> {
    let ServerboundHandshakePacket::Handshake(handshake) =
        ServerboundHandshakePacket::decode(buffer)?;
    log(
        format!(
            "Handshake: protocol {}, {}:{}, next state {}",
            handshake.protocol_version,
            handshake.server_address,
            handshake.server_port,
            handshake.next_state
        ),
        Debug,
    );

    let mut guard = session.lock().await;
    guard.phase = match handshake.next_state {
        1 => ProtocolPhase::Status,
        2 => ProtocolPhase::Login,
        other => {
            return Err(SculkError::malformed(format!(
                "invalid handshake next state {}",
                other
            )))
        }
    };
    Ok(())
}

async fn handle_status(
    world: &SharedWorld,
    session: &Arc<Mutex<Session>>,
    buffer: &mut PacketBuffer,
) -> Result<()> {
    match ServerboundStatusPacket::decode(buffer)? {
        ServerboundStatusPacket::StatusRequest(_) => {
            let status = {
                let guard = world.lock().await;
                ServerStatus::from_config(&guard.config, guard.online_count())
            };
            session
                .lock()
                .await
                .send_packet(StatusResponsePacket::new(&status))
                .await
        }
        ServerboundStatusPacket::PingRequest(ping) => {
            let mut guard = session.lock().await;
            guard
                .send_packet(PingResponsePacket {
                    payload: ping.payload,
                })
                .await?;
            guard.close();
            Ok(())
        }
    }
}

async fn handle_login(
    world: &SharedWorld,
    session: &Arc<Mutex<Session>>,
    buffer: &mut PacketBuffer,
    close_signal: &Arc<Notify>,
    player_id: &mut Option<u32>,
    keep_alive_task: &mut Option<JoinHandle<()>>,
) -> Result<()> {
    let ServerboundLoginPacket::LoginStart(login_start) = ServerboundLoginPacket::decode(buffer)?;
    log(
        format!("Player {} logging in", login_start.username),
        Debug,
    );

    let offline_mode = world.lock().await.config.offline_mode;
    let success = LoginSuccessPacket::new(login_start.username.clone(), offline_mode);
    let uuid = success.uuid;

    {
        let mut guard = session.lock().await;
        guard.username = success.username.clone();
        guard.uuid = uuid;
        guard.send_packet(success).await?;
        guard.phase = ProtocolPhase::Play;
    }

    let id = world
        .lock()
        .await
        .add_player(session.clone(), uuid, login_start.username)
        .await?;
    *player_id = Some(id);

    // The first probe goes out once the join sequence has flushed.
    *keep_alive_task = Some(tokio::spawn(keep_alive_loop(
        session.clone(),
        close_signal.clone(),
    )));
    Ok(())
}

async fn handle_play(
    world: &SharedWorld,
    session: &Arc<Mutex<Session>>,
    buffer: &mut PacketBuffer,
    player_id: Option<u32>,
) -> Result<()> {
    let player_id = player_id.expect("play phase without a roster entry");

    match ServerboundPlayPacket::decode(buffer)? {
        ServerboundPlayPacket::KeepAlive(echo) => {
            let mut guard = session.lock().await;
            if guard.keep_alives.acknowledge(echo.keep_alive_id) {
                log(
                    format!("Keep-alive echo from {}", guard.username),
                    Debug,
                );
            }
            Ok(())
        }
        ServerboundPlayPacket::ConfirmTeleportation(confirm) => {
            log(
                format!("Teleport {} confirmed", confirm.teleport_id),
                Debug,
            );
            Ok(())
        }
        ServerboundPlayPacket::ClientInformation(info) => {
            log(
                format!(
                    "Client information: locale {}, view distance {}, main hand {}",
                    info.locale, info.view_distance, info.main_hand
                ),
                Debug,
            );
            Ok(())
        }
        ServerboundPlayPacket::SetHeldItem(held) => {
            if !(0..9).contains(&held.slot) {
                return Err(SculkError::malformed(format!(
                    "held item slot {} out of range",
                    held.slot
                )));
            }
            if let Some(player) = world.lock().await.player_mut(player_id) {
                player.held_slot = held.slot as usize;
            }
            Ok(())
        }
        ServerboundPlayPacket::SetCreativeModeSlot(slot) => {
            if let Some(index) = slot.hotbar_index() {
                let state = slot
                    .clicked_item
                    .and_then(|item| block_from_item(item.item_id as u32))
                    .map(default_id)
                    .unwrap_or(AIR);
                if let Some(player) = world.lock().await.player_mut(player_id) {
                    player.hotbar[index] = state;
                }
            }
            Ok(())
        }
        other => {
            world.lock().await.enqueue(other, player_id);
            Ok(())
        }
    }
}

/// Per-session liveness: a fresh keep-alive every 20 seconds, and a
/// close when an outstanding one passes 30 seconds unanswered. The first
/// interval tick fires immediately, so a new player gets probed right
/// after joining.
async fn keep_alive_loop(session: Arc<Mutex<Session>>, close_signal: Arc<Notify>) {
    let mut ticker = interval(KEEP_ALIVE_INTERVAL);
    loop {
        ticker.tick().await;

        let mut guard = session.lock().await;
        if guard.is_closed() {
            return;
        }
        if guard.keep_alives.has_expired(KEEP_ALIVE_TIMEOUT) {
            guard.timed_out = true;
            guard.close();
            log(format!("Player {} timed out", guard.username), Info);
            drop(guard);
            close_signal.notify_one();
            return;
        }

        let id = systime::unix_timestamp_millis();
        guard.keep_alives.issue(id);
        if guard.send_packet(KeepAlivePacket::new(id)).await.is_err() {
            guard.close();
            drop(guard);
            close_signal.notify_one();
            return;
        }
    }
}

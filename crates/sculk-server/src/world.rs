//! The world manager: dimension state, player roster, ingress queue and
//! the fixed-rate tick that stitches them together.
//!
//! Everything lives behind one manager lock. Connection drivers take it
//! briefly to enqueue packets or admit players; the tick task takes it
//! once per tick. Lock order is always manager first, then a session.

use sculk_blocks::{state_from_id, Block, AIR};
use sculk_common::config::ServerConfig;
use sculk_common::types::{BlockFace, BlockPos, Position};
use sculk_logger::log;
use sculk_logger::LogSeverity::{Debug, Info, Warning};
use sculk_protocol::block_update::BlockUpdatePacket;
use sculk_protocol::chunk_data::ChunkDataPacket;
use sculk_protocol::entity_position::UpdateEntityPositionPacket;
use sculk_protocol::join_game::JoinGamePacket;
use sculk_protocol::player_action::{STATUS_CANCELLED_DIGGING, STATUS_STARTED_DIGGING};
use sculk_protocol::player_info::PlayerInfoPacket;
use sculk_protocol::serverbound::ServerboundPlayPacket;
use sculk_protocol::session::Session;
use sculk_protocol::spawn_player::SpawnPlayerPacket;
use sculk_protocol::synchronize_position::SynchronizePlayerPositionPacket;
use sculk_protocol::Packet;
use sculk_world::{heightmap, region, Chunk};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{interval, Duration, Instant};
use uuid::Uuid;

/// One simulation step.
pub const TICK: Duration = Duration::from_millis(50);

/// A player in the roster. The session back-pointer is how tick fan-out
/// reaches the connection; everything else is world-side state.
pub struct Player {
    pub id: u32,
    pub session: Arc<Mutex<Session>>,
    pub uuid: Uuid,
    pub name: String,
    pub pos: Position,
    pub last_sent_pos: Position,
    pub dimension: String,
    pub held_slot: usize,
    /// Block-state id each hotbar slot would place.
    pub hotbar: [u16; 9],
}

/// A world change noted during a tick, fanned out to clients at the end
/// of that same tick.
enum WorldUpdate {
    BlockChange { pos: BlockPos, state: u16 },
    PlayerJoin { source: u32 },
    PlayerVisible { source: u32 },
    PlayerMove { source: u32 },
}

/// Per-dimension state: its loaded chunks and the queue of block cells
/// whose neighbors still need a look.
pub struct Dimension {
    pub name: String,
    pub chunks: Vec<Chunk>,
    scheduled_ticks: VecDeque<BlockPos>,
}

impl Dimension {
    fn new(name: &str, chunks: Vec<Chunk>) -> Self {
        Self {
            name: name.to_owned(),
            chunks,
            scheduled_ticks: VecDeque::new(),
        }
    }

    fn chunk_containing(&self, x: i32, z: i32) -> Option<&Chunk> {
        let (cx, cz) = (x.div_euclid(16), z.div_euclid(16));
        self.chunks.iter().find(|c| c.x == cx && c.z == cz)
    }

    fn chunk_containing_mut(&mut self, x: i32, z: i32) -> Option<&mut Chunk> {
        let (cx, cz) = (x.div_euclid(16), z.div_euclid(16));
        self.chunks.iter_mut().find(|c| c.x == cx && c.z == cz)
    }

    /// Block state at a world position, air outside loaded space.
    pub fn get_block(&self, pos: BlockPos) -> u16 {
        match self.chunk_containing(pos.x, pos.z) {
            Some(chunk) => chunk.get_block(
                pos.x.rem_euclid(16) as usize,
                pos.y,
                pos.z.rem_euclid(16) as usize,
            ),
            None => AIR,
        }
    }

    /// Writes a block if the cell is inside loaded space; reports whether
    /// anything was written.
    pub fn set_block(&mut self, pos: BlockPos, state: u16) -> bool {
        match self.chunk_containing_mut(pos.x, pos.z) {
            Some(chunk) if chunk.contains_y(pos.y) => {
                chunk
                    .change_block(
                        pos.x.rem_euclid(16) as usize,
                        pos.y,
                        pos.z.rem_euclid(16) as usize,
                        state,
                    )
                    .expect("in-bounds block write");
                true
            }
            _ => false,
        }
    }

    fn schedule_tick(&mut self, pos: BlockPos) {
        self.scheduled_ticks.push_back(pos);
    }
}

pub struct WorldManager {
    pub config: ServerConfig,
    overworld: Dimension,
    players: Vec<Player>,
    next_player_id: u32,
    ingress: VecDeque<(ServerboundPlayPacket, u32)>,
    updates: Vec<WorldUpdate>,
}

pub type SharedWorld = Arc<Mutex<WorldManager>>;

impl WorldManager {
    /// Builds the world, bootstrapping the spawn chunk from the
    /// configured region file when there is one.
    pub fn new(config: ServerConfig) -> Self {
        let spawn = match &config.region_file {
            Some(path) => match region::load_chunk(Path::new(path), 0, 0) {
                Ok(chunk) => {
                    log(format!("Loaded spawn chunk from {}", path), Info);
                    chunk
                }
                Err(e) => {
                    log(
                        format!("Failed to load region file {}: {}, using flat spawn", path, e),
                        Warning,
                    );
                    Chunk::flat(0, 0)
                }
            },
            None => Chunk::flat(0, 0),
        };

        WorldManager {
            config,
            overworld: Dimension::new("minecraft:overworld", vec![spawn]),
            players: Vec::new(),
            next_player_id: 0,
            ingress: VecDeque::new(),
            updates: Vec::new(),
        }
    }

    pub fn online_count(&self) -> i32 {
        self.players.len() as i32
    }

    pub fn overworld(&self) -> &Dimension {
        &self.overworld
    }

    /// Queues a play-phase packet for the next tick.
    pub fn enqueue(&mut self, packet: ServerboundPlayPacket, player_id: u32) {
        self.ingress.push_back((packet, player_id));
    }

    fn player_index(&self, id: u32) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Admits a freshly logged-in player: join packet, the spawn chunk,
    /// a position sync, then join/visible updates for everyone else.
    pub async fn add_player(
        &mut self,
        session: Arc<Mutex<Session>>,
        uuid: Uuid,
        name: String,
    ) -> sculk_common::Result<u32> {
        let id = self.next_player_id;
        self.next_player_id += 1;

        let spawn_height = self.config.spawn_height as f64;
        let spawn = Position::new(0.0, spawn_height, 0.0);
        let entity_id = self.players.len() as i32;

        {
            let mut guard = session.lock().await;
            guard
                .send_packet(JoinGamePacket::new(entity_id, self.config.max_players))
                .await?;

            let chunk = &self.overworld.chunks[0];
            let mut data = Vec::new();
            chunk.encode(&mut data);
            let heightmaps = heightmap::motion_blocking_nbt(
                (self.config.spawn_height - chunk.min_y()) as u64,
            );
            guard
                .send_packet(ChunkDataPacket::new(chunk.x, chunk.z, heightmaps, data))
                .await?;

            guard
                .send_packet(SynchronizePlayerPositionPacket::absolute(spawn, 0))
                .await?;
        }

        self.players.push(Player {
            id,
            session,
            uuid,
            name: name.clone(),
            pos: spawn,
            last_sent_pos: spawn,
            dimension: self.overworld.name.clone(),
            held_slot: 0,
            hotbar: [AIR; 9],
        });

        self.updates.push(WorldUpdate::PlayerJoin { source: id });
        self.updates.push(WorldUpdate::PlayerVisible { source: id });

        log(format!("Player {} joined the world", name), Info);
        Ok(id)
    }

    /// Drops a player from the roster; fan-out simply stops reaching it.
    pub fn remove_player(&mut self, id: u32) {
        if let Some(index) = self.player_index(id) {
            let player = self.players.remove(index);
            log(format!("Player {} left the world", player.name), Info);
        }
    }

    /// One simulation step: dimension tick, ingress drain, fan-out.
    async fn tick(&mut self) {
        self.tick_dimension();

        let ingress: Vec<_> = self.ingress.drain(..).collect();
        for (packet, player_id) in ingress {
            self.apply_packet(packet, player_id);
        }

        self.fan_out().await;
    }

    /// Per-chunk simulation (nothing yet) plus the scheduled neighbor
    /// updates from last tick's block changes.
    fn tick_dimension(&mut self) {
        for _chunk in &mut self.overworld.chunks {
            // Chunk-local simulation (crops, fluids) hangs off here.
        }

        let scheduled: Vec<_> = self.overworld.scheduled_ticks.drain(..).collect();
        for origin in scheduled {
            for neighbor in origin.neighbors() {
                self.update_neighbor(neighbor);
            }
        }
    }

    /// The one structural rule this core carries: support-needing blocks
    /// pop off when the cell under them empties.
    fn update_neighbor(&mut self, pos: BlockPos) {
        let state = self.overworld.get_block(pos);
        if state == AIR {
            return;
        }
        let needs_support = matches!(
            state_from_id(state).block(),
            Block::Torch | Block::Snow
        );
        if needs_support && self.overworld.get_block(pos.offset(BlockFace::Bottom)) == AIR {
            if self.overworld.set_block(pos, AIR) {
                self.updates.push(WorldUpdate::BlockChange { pos, state: AIR });
            }
        }
    }

    fn apply_packet(&mut self, packet: ServerboundPlayPacket, player_id: u32) {
        match packet {
            ServerboundPlayPacket::SetPlayerPosition(movement) => {
                self.move_player(player_id, movement.x, movement.feet_y, movement.z);
            }
            ServerboundPlayPacket::SetPlayerPositionAndRotation(movement) => {
                self.move_player(player_id, movement.x, movement.feet_y, movement.z);
            }
            ServerboundPlayPacket::PlayerAction(action) => {
                if action.status == STATUS_STARTED_DIGGING
                    || action.status == STATUS_CANCELLED_DIGGING
                {
                    self.break_block(action.location);
                }
            }
            ServerboundPlayPacket::UseItemOn(place) => {
                self.place_block(player_id, place.location, place.face);
            }
            // Rotation-only and on-ground movement, sneaking, sprinting,
            // arm swings: accepted, nothing in this core reacts to them.
            _ => {}
        }
    }

    fn move_player(&mut self, player_id: u32, x: f64, y: f64, z: f64) {
        let moved = match self.player_mut(player_id) {
            Some(player) => {
                player.last_sent_pos = player.pos;
                player.pos = Position::new(x, y, z);
                true
            }
            None => false,
        };
        if moved {
            self.updates
                .push(WorldUpdate::PlayerMove { source: player_id });
        }
    }

    fn break_block(&mut self, pos: BlockPos) {
        if self.overworld.set_block(pos, AIR) {
            self.overworld.schedule_tick(pos);
            self.updates.push(WorldUpdate::BlockChange { pos, state: AIR });
        }
    }

    fn place_block(&mut self, player_id: u32, clicked: BlockPos, face: i32) {
        let face = match BlockFace::from_id(face) {
            Some(face) => face,
            None => {
                log(format!("Ignoring placement with bad face {}", face), Debug);
                return;
            }
        };
        let target = clicked.offset(face);

        let state = match self.player_mut(player_id) {
            Some(player) => player.hotbar[player.held_slot],
            None => return,
        };
        if state == AIR {
            return;
        }

        if self.overworld.set_block(target, state) {
            self.overworld.schedule_tick(target);
            self.updates.push(WorldUpdate::BlockChange { pos: target, state });
        }
    }

    /// Pushes this tick's updates to every connected player, suppressing
    /// echoes of a player's own movement and visibility.
    async fn fan_out(&mut self) {
        let updates = std::mem::take(&mut self.updates);

        for update in updates {
            match update {
                WorldUpdate::BlockChange { pos, state } => {
                    let packet = BlockUpdatePacket::new(pos, state);
                    self.broadcast(packet, None).await;
                }
                WorldUpdate::PlayerJoin { source } => {
                    let packet = match self.player_index(source) {
                        Some(index) => {
                            let player = &self.players[index];
                            PlayerInfoPacket::add_player(player.uuid, player.name.clone())
                        }
                        None => continue,
                    };
                    self.broadcast(packet, Some(source)).await;
                }
                WorldUpdate::PlayerVisible { source } => {
                    let packet = match self.player_index(source) {
                        Some(index) => {
                            let player = &self.players[index];
                            SpawnPlayerPacket {
                                entity_id: index as i32,
                                uuid: player.uuid,
                                position: player.pos,
                                yaw: 0.0,
                                pitch: 0.0,
                            }
                        }
                        None => continue,
                    };
                    self.broadcast(packet, Some(source)).await;
                }
                WorldUpdate::PlayerMove { source } => {
                    let packet = match self.player_index(source) {
                        Some(index) => {
                            let player = &self.players[index];
                            UpdateEntityPositionPacket::from_movement(
                                index as i32,
                                player.last_sent_pos,
                                player.pos,
                            )
                        }
                        None => continue,
                    };
                    self.broadcast(packet, Some(source)).await;
                }
            }
        }
    }

    /// Sends one packet to everyone, minus an optional excluded player.
    /// A dead connection only loses its own packets; its session driver
    /// notices the error separately and unwinds.
    async fn broadcast<T: Packet + Clone>(&self, packet: T, except: Option<u32>) {
        for player in &self.players {
            if Some(player.id) == except {
                continue;
            }
            let session = player.session.clone();
            let mut guard = session.lock().await;
            if guard.is_closed() {
                continue;
            }
            if let Err(e) = guard.send_packet(packet.clone()).await {
                log(
                    format!("Dropping update for {}: {}", player.name, e),
                    Debug,
                );
            }
        }
    }
}

/// The fixed-cadence world task. Overruns skip their sleep (the interval
/// bursts to catch up) and get logged rather than dropping work.
pub async fn tick_loop(world: SharedWorld) {
    let mut ticker = interval(TICK);
    loop {
        ticker.tick().await;
        let started = Instant::now();
        world.lock().await.tick().await;
        let elapsed = started.elapsed();
        if elapsed > TICK {
            log(
                format!("Tick overran its budget: {}ms", elapsed.as_millis()),
                Debug,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sculk_blocks::default_id;
    use tokio::net::{TcpListener, TcpStream};

    fn test_world() -> WorldManager {
        WorldManager::new(ServerConfig::default())
    }

    /// A roster entry backed by a loopback socket pair; the far end is
    /// dropped, which is fine for tests that never fan out.
    async fn fake_player(id: u32, held_state: u16) -> Player {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (_far, accepted) = tokio::join!(TcpStream::connect(addr), listener.accept());
        let (session, _read) = Session::new(accepted.unwrap().0);

        Player {
            id,
            session: Arc::new(Mutex::new(session)),
            uuid: Uuid::nil(),
            name: format!("player-{}", id),
            pos: Position::new(0.0, 70.0, 0.0),
            last_sent_pos: Position::new(0.0, 70.0, 0.0),
            dimension: "minecraft:overworld".to_owned(),
            held_slot: 0,
            hotbar: [held_state; 9],
        }
    }

    #[test]
    fn spawn_chunk_is_loaded() {
        let world = test_world();
        let grass = default_id(Block::GrassBlock);
        assert_eq!(world.overworld().get_block(BlockPos::new(0, 64, 0)), grass);
        assert_eq!(world.overworld().get_block(BlockPos::new(0, 65, 0)), AIR);
        // Outside the loaded chunk everything reads as air.
        assert_eq!(world.overworld().get_block(BlockPos::new(40, 64, 0)), AIR);
    }

    #[test]
    fn break_block_clears_and_schedules() {
        let mut world = test_world();
        let pos = BlockPos::new(3, 64, 3);
        world.break_block(pos);

        assert_eq!(world.overworld().get_block(pos), AIR);
        assert_eq!(world.overworld.scheduled_ticks.len(), 1);
        assert!(matches!(
            world.updates.as_slice(),
            [WorldUpdate::BlockChange { state: AIR, .. }]
        ));
    }

    #[tokio::test]
    async fn placement_offsets_along_the_face() {
        let mut world = test_world();
        let stone = default_id(Block::Stone);

        world.players.push(fake_player(7, stone).await);

        world.place_block(7, BlockPos::new(0, 64, 0), 1);
        assert_eq!(world.overworld().get_block(BlockPos::new(0, 65, 0)), stone);
    }

    #[tokio::test]
    async fn empty_hand_places_nothing() {
        let mut world = test_world();
        world.players.push(fake_player(7, AIR).await);
        world.place_block(7, BlockPos::new(0, 64, 0), 1);
        assert_eq!(world.overworld().get_block(BlockPos::new(0, 65, 0)), AIR);
        assert!(world.updates.is_empty());
    }

    #[test]
    fn torch_pops_when_support_breaks() {
        let mut world = test_world();
        let torch = default_id(Block::Torch);

        world.overworld.set_block(BlockPos::new(5, 65, 5), torch);
        world.break_block(BlockPos::new(5, 64, 5));
        world.updates.clear();

        world.tick_dimension();
        assert_eq!(world.overworld().get_block(BlockPos::new(5, 65, 5)), AIR);
        assert!(matches!(
            world.updates.as_slice(),
            [WorldUpdate::BlockChange { state: AIR, .. }]
        ));
    }

    #[test]
    fn stone_does_not_pop() {
        let mut world = test_world();
        world.break_block(BlockPos::new(5, 63, 5));
        world.updates.clear();

        world.tick_dimension();
        assert_ne!(world.overworld().get_block(BlockPos::new(5, 64, 5)), AIR);
        assert!(world.updates.is_empty());
    }
}

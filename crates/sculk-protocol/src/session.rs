use crate::packet::{send_packet, Packet};
use sculk_common::Result;
use tokio::io::{BufWriter, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::time::{Duration, Instant};
use uuid::Uuid;

/// Where a connection is in the protocol. `CloseConnection` is terminal;
/// every driver loop exits when it observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolPhase {
    Handshaking,
    Status,
    Login,
    Play,
    CloseConnection,
}

/// How long a keep-alive may stay unanswered before the session is
/// considered dead.
pub const KEEP_ALIVE_TIMEOUT: Duration = Duration::from_secs(30);
/// How often a fresh keep-alive goes out.
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy)]
struct PendingKeepAlive {
    id: i64,
    issued: Instant,
}

/// Outstanding keep-alive bookkeeping: at most two ids in flight, each
/// stamped with its issue time.
#[derive(Debug, Default)]
pub struct KeepAliveTracker {
    slots: [Option<PendingKeepAlive>; 2],
}

impl KeepAliveTracker {
    pub fn new() -> Self {
        Self { slots: [None, None] }
    }

    /// Records a freshly issued id, reusing a free slot or evicting the
    /// older entry when both are taken.
    pub fn issue(&mut self, id: i64) {
        let slot = match self.slots.iter().position(|s| s.is_none()) {
            Some(free) => free,
            None => {
                let first = self.slots[0].unwrap().issued;
                let second = self.slots[1].unwrap().issued;
                if first <= second {
                    0
                } else {
                    1
                }
            }
        };
        self.slots[slot] = Some(PendingKeepAlive {
            id,
            issued: Instant::now(),
        });
    }

    /// Whether any outstanding id has gone unanswered past the timeout.
    pub fn has_expired(&self, timeout: Duration) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|pending| pending.issued.elapsed() >= timeout)
    }

    /// Clears the slot matching an echoed id exactly. An echo that
    /// matches nothing (including when nothing is outstanding) is benign
    /// and simply reports not-matched.
    pub fn acknowledge(&mut self, id: i64) -> bool {
        for slot in self.slots.iter_mut() {
            if slot.map(|pending| pending.id) == Some(id) {
                *slot = None;
                return true;
            }
        }
        false
    }

    pub fn outstanding(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

/// One client connection's server-side state: the write half of its
/// socket plus everything the protocol machine needs between packets.
/// The read half stays with the connection driver.
pub struct Session {
    pub writer: BufWriter<WriteHalf<TcpStream>>,
    pub phase: ProtocolPhase,
    /// Whether the peer negotiated the compressed frame layout.
    pub compression: bool,
    pub keep_alives: KeepAliveTracker,
    pub timed_out: bool,
    /// Identity; meaningful once the session reaches `Play`.
    pub username: String,
    pub uuid: Uuid,
}

impl Session {
    pub fn new(socket: TcpStream) -> (Self, ReadHalf<TcpStream>) {
        let (read, write) = tokio::io::split(socket);
        (
            Self {
                writer: BufWriter::new(write),
                phase: ProtocolPhase::Handshaking,
                compression: false,
                keep_alives: KeepAliveTracker::new(),
                timed_out: false,
                username: String::new(),
                uuid: Uuid::nil(),
            },
            read,
        )
    }

    pub async fn send_packet<T: Packet>(&mut self, packet: T) -> Result<()> {
        send_packet(packet, &mut self.writer, self.compression).await
    }

    pub fn close(&mut self) {
        self.phase = ProtocolPhase::CloseConnection;
    }

    pub fn is_closed(&self) -> bool {
        self.phase == ProtocolPhase::CloseConnection
    }
}

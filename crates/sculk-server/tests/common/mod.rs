use sculk_common::config::ServerConfig;
use sculk_common::types::BlockPos;
use sculk_protocol::packet::{read_frame, PacketBuffer};
use sculk_server::Server;
use std::net::SocketAddr;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

/// Boots a server on an ephemeral loopback port and returns its address.
pub async fn start_server() -> SocketAddr {
    let config = ServerConfig {
        bind_address: "127.0.0.1:0".to_owned(),
        ..Default::default()
    };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.serve());
    addr
}

pub async fn connect(addr: SocketAddr) -> TcpStream {
    TcpStream::connect(addr).await.unwrap()
}

/// Builds and sends one uncompressed frame; the closure writes the id
/// and payload.
pub async fn send_frame<F>(client: &mut TcpStream, build: F)
where
    F: FnOnce(&mut PacketBuffer),
{
    let mut body = PacketBuffer::new();
    build(&mut body);

    let mut framed = PacketBuffer::new();
    framed.write_varint(body.get_buffer().len() as i32);
    framed.write_bytes_raw(body.get_buffer());

    client.write_all(framed.get_buffer()).await.unwrap();
    client.flush().await.unwrap();
}

pub async fn send_handshake(client: &mut TcpStream, next_state: i32) {
    send_frame(client, |body| {
        body.write_varint(0x00);
        body.write_varint(758);
        body.write_string("localhost");
        body.write_u16(25565);
        body.write_varint(next_state);
    })
    .await;
}

pub async fn send_login_start(client: &mut TcpStream, name: &str) {
    send_frame(client, |body| {
        body.write_varint(0x00);
        body.write_string(name);
    })
    .await;
}

/// Reads one clientbound frame, returning the packet id and the body
/// positioned after it.
pub async fn read_packet(client: &mut TcpStream) -> (i32, PacketBuffer) {
    let mut buffer = timeout(Duration::from_secs(5), read_frame(client, false))
        .await
        .expect("timed out waiting for a packet")
        .expect("failed to read frame");
    let id = buffer.read_varint().unwrap();
    (id, buffer)
}

/// Reads frames until one with the wanted id shows up, skipping others
/// (keep-alives interleave freely with the join sequence).
pub async fn read_until(client: &mut TcpStream, wanted: i32) -> PacketBuffer {
    for _ in 0..64 {
        let (id, buffer) = read_packet(client).await;
        if id == wanted {
            return buffer;
        }
    }
    panic!("packet 0x{:02x} never arrived", wanted);
}

/// Handshakes and logs in, consuming the whole join sequence.
pub async fn join_world(addr: SocketAddr, name: &str) -> TcpStream {
    let mut client = connect(addr).await;
    send_handshake(&mut client, 2).await;
    send_login_start(&mut client, name).await;

    let mut login_success = read_until(&mut client, 0x02).await;
    login_success.read_uuid().unwrap();
    assert_eq!(login_success.read_string().unwrap(), name);

    read_until(&mut client, 0x26).await; // join game
    read_until(&mut client, 0x22).await; // spawn chunk
    let mut sync = read_until(&mut client, 0x38).await;
    assert_eq!(sync.read_f64().unwrap(), 0.0);
    assert_eq!(sync.read_f64().unwrap(), 70.0);
    assert_eq!(sync.read_f64().unwrap(), 0.0);

    client
}

/// Puts a block in creative hotbar slot 0 and selects it.
pub async fn hold_block(client: &mut TcpStream, item_id: i32) {
    send_frame(client, |body| {
        body.write_varint(0x28);
        body.write_i16(36); // first hotbar slot
        body.write_bool(true);
        body.write_varint(item_id);
        body.write_i8(1);
        body.write_u8(0x00);
    })
    .await;
    send_frame(client, |body| {
        body.write_varint(0x25);
        body.write_i16(0);
    })
    .await;
}

pub async fn send_use_item_on(client: &mut TcpStream, location: BlockPos, face: i32) {
    send_frame(client, |body| {
        body.write_varint(0x2e);
        body.write_varint(0); // main hand
        body.write_position(location);
        body.write_varint(face);
        body.write_f32(0.5);
        body.write_f32(1.0);
        body.write_f32(0.5);
        body.write_bool(false);
    })
    .await;
}

pub async fn send_player_action(client: &mut TcpStream, status: i32, location: BlockPos) {
    send_frame(client, |body| {
        body.write_varint(0x1a);
        body.write_varint(status);
        body.write_position(location);
        body.write_i8(1);
    })
    .await;
}

use flate2::read::ZlibDecoder;
use sculk_common::types::BlockPos;
use sculk_common::{Result, SculkError};
use std::io::{self, Read};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// Longest string the protocol allows, in characters.
const STRING_CAP: i32 = 32767;
/// Largest frame either direction will accept.
const FRAME_CAP: usize = 0x1f_ffff;

pub trait Packet {
    fn packet_id() -> i32
    where
        Self: Sized;

    fn write_to_buffer(&self, _buffer: &mut PacketBuffer) -> Result<()> {
        unimplemented!("Server-bound packets don't need write")
    }

    fn read_from_buffer(_buffer: &mut PacketBuffer) -> Result<Self>
    where
        Self: Sized,
    {
        unimplemented!("Client-bound packets don't need read")
    }
}

/// A cursor over one packet body. Multi-byte reads and writes are
/// big-endian, as everything on the wire is.
#[derive(Debug, Default)]
pub struct PacketBuffer {
    buffer: Vec<u8>,
    cursor: usize,
}

/// Contents of a non-empty item slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotData {
    pub item_id: i32,
    pub count: i8,
}

impl PacketBuffer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            buffer: bytes,
            cursor: 0,
        }
    }

    pub fn get_buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    /// Drops whatever is left unread, as the unknown-packet path does.
    pub fn skip_remaining(&mut self) {
        self.cursor = self.buffer.len();
    }

    fn take(&mut self, n: usize) -> Result<&[u8]> {
        if self.cursor + n > self.buffer.len() {
            return Err(SculkError::IoError(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "packet body truncated",
            )));
        }
        let slice = &self.buffer[self.cursor..self.cursor + n];
        self.cursor += n;
        Ok(slice)
    }

    /// Bytes a VarInt occupies on the wire, 1 through 5.
    pub fn varint_size(value: i32) -> usize {
        let mut value = value as u32;
        let mut size = 1;
        while value >= 0x80 {
            value >>= 7;
            size += 1;
        }
        size
    }

    pub fn write_varint(&mut self, mut value: i32) {
        loop {
            let mut temp = (value & 0b0111_1111) as u8;
            value = ((value as u32) >> 7) as i32;
            if value != 0 {
                temp |= 0b1000_0000;
            }
            self.buffer.push(temp);
            if value == 0 {
                break;
            }
        }
    }

    pub fn read_varint(&mut self) -> Result<i32> {
        let mut result: i32 = 0;
        let mut shift = 0;

        loop {
            let byte = self.take(1)?[0];
            result |= ((byte & 0b0111_1111) as i32).wrapping_shl(shift);
            if byte & 0b1000_0000 == 0 {
                return Ok(result);
            }
            shift += 7;
            if shift >= 35 {
                return Err(SculkError::VarIntTooBig);
            }
        }
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as i32);
        self.buffer.extend_from_slice(value.as_bytes());
    }

    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_varint()?;
        if length < 0 || length > STRING_CAP {
            return Err(SculkError::StringTooLong(length));
        }
        let raw = self.take(length as usize)?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| SculkError::MalformedPacket(format!("invalid UTF-8 in string: {}", e)))
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.take(1)?[0] != 0)
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buffer.push(value as u8);
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.take(1)?[0] as i8)
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let raw = self.take(2)?;
        Ok(u16::from_be_bytes([raw[0], raw[1]]))
    }

    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let raw = self.take(2)?;
        Ok(i16::from_be_bytes([raw[0], raw[1]]))
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let raw = self.take(4)?;
        Ok(i32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        let raw = self.take(8)?;
        Ok(i64::from_be_bytes([
            raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
        ]))
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buffer.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_bits().to_be_bytes());
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_i32()? as u32))
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_bits().to_be_bytes());
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_i64()? as u64))
    }

    pub fn write_uuid(&mut self, value: Uuid) {
        self.buffer.extend_from_slice(&value.as_u128().to_be_bytes());
    }

    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let raw = self.take(16)?;
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(raw);
        Ok(Uuid::from_u128(u128::from_be_bytes(bytes)))
    }

    /// Packs a block position into the X(26) | Z(26) | Y(12) layout. The
    /// fields are two's-complement; unpack sign-extends with arithmetic
    /// shifts rather than trusting integer conversions.
    pub fn write_position(&mut self, pos: BlockPos) {
        let raw = (((pos.x as i64) & 0x3ff_ffff) << 38)
            | (((pos.z as i64) & 0x3ff_ffff) << 12)
            | ((pos.y as i64) & 0xfff);
        self.write_i64(raw);
    }

    pub fn read_position(&mut self) -> Result<BlockPos> {
        let raw = self.read_i64()?;
        let x = (raw >> 38) as i32;
        let z = ((raw << 26) >> 38) as i32;
        let y = ((raw << 52) >> 52) as i32;
        Ok(BlockPos::new(x, y, z))
    }

    /// A slot is one presence byte, then item id, count and an empty NBT
    /// tag when present.
    pub fn write_slot(&mut self, slot: Option<SlotData>) {
        match slot {
            Some(slot) => {
                self.write_bool(true);
                self.write_varint(slot.item_id);
                self.write_i8(slot.count);
                self.write_u8(0x00);
            }
            None => self.write_bool(false),
        }
    }

    pub fn read_slot(&mut self) -> Result<Option<SlotData>> {
        if !self.read_bool()? {
            return Ok(None);
        }
        let item_id = self.read_varint()?;
        let count = self.read_i8()?;
        // Item NBT: anything other than the empty tag is skipped whole.
        let tag = self.read_u8()?;
        if tag != 0x00 {
            let rest = self.buffer[self.cursor - 1..].to_vec();
            let mut reader = sculk_nbt::NbtReader::new(&rest);
            let token = reader.next()?;
            reader.skip(&token.tag)?;
            let consumed = rest.len() - reader.remaining();
            self.cursor += consumed - 1;
        }
        Ok(Some(SlotData { item_id, count }))
    }

    pub fn write_bytes_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }
}

impl Read for PacketBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let to_read = buf.len().min(self.remaining());
        buf[..to_read].copy_from_slice(&self.buffer[self.cursor..self.cursor + to_read]);
        self.cursor += to_read;
        Ok(to_read)
    }
}

impl io::Write for PacketBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Frames a packet (id and body come from the packet itself) and writes
/// it out. With compression negotiated the post-threshold layout is used
/// with a zero uncompressed-length marker: this server never deflates
/// outgoing bodies, which the protocol permits below the threshold.
pub async fn send_packet<T: Packet, W: AsyncWrite + Unpin>(
    packet: T,
    writer: &mut W,
    compressed: bool,
) -> Result<()> {
    let mut body = PacketBuffer::new();
    body.write_varint(T::packet_id());
    packet.write_to_buffer(&mut body)?;

    let mut framed = PacketBuffer::new();
    if compressed {
        let data_len = PacketBuffer::varint_size(0) + body.get_buffer().len();
        framed.write_varint(data_len as i32);
        framed.write_varint(0);
    } else {
        framed.write_varint(body.get_buffer().len() as i32);
    }
    framed.write_bytes_raw(body.get_buffer());

    writer.write_all(framed.get_buffer()).await?;
    writer.flush().await?;
    Ok(())
}

async fn read_varint_from<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32> {
    let mut result: i32 = 0;
    let mut shift = 0;
    loop {
        let byte = reader.read_u8().await?;
        result |= ((byte & 0b0111_1111) as i32).wrapping_shl(shift);
        if byte & 0b1000_0000 == 0 {
            return Ok(result);
        }
        shift += 7;
        if shift >= 35 {
            return Err(SculkError::VarIntTooBig);
        }
    }
}

/// Reads one complete frame off the socket and yields its body,
/// inflating it first when the peer sent the compressed layout with a
/// positive uncompressed length.
pub async fn read_frame<R: AsyncRead + Unpin>(
    reader: &mut R,
    compressed: bool,
) -> Result<PacketBuffer> {
    let length = read_varint_from(reader).await?;
    if length <= 0 || length as usize > FRAME_CAP {
        return Err(SculkError::MalformedPacket(format!(
            "frame length {} out of range",
            length
        )));
    }

    let mut body = vec![0u8; length as usize];
    reader.read_exact(&mut body).await?;

    if !compressed {
        return Ok(PacketBuffer::from_bytes(body));
    }

    let mut framed = PacketBuffer::from_bytes(body);
    let uncompressed_len = framed.read_varint()?;
    if uncompressed_len == 0 {
        let rest = framed.get_buffer()[framed.cursor..].to_vec();
        return Ok(PacketBuffer::from_bytes(rest));
    }
    if uncompressed_len < 0 || uncompressed_len as usize > FRAME_CAP {
        return Err(SculkError::MalformedPacket(format!(
            "uncompressed length {} out of range",
            uncompressed_len
        )));
    }

    let mut inflated = Vec::with_capacity(uncompressed_len as usize);
    ZlibDecoder::new(&framed.get_buffer()[framed.cursor..]).read_to_end(&mut inflated)?;
    if inflated.len() != uncompressed_len as usize {
        return Err(SculkError::MalformedPacket(format!(
            "uncompressed length mismatch: declared {}, inflated {}",
            uncompressed_len,
            inflated.len()
        )));
    }
    Ok(PacketBuffer::from_bytes(inflated))
}

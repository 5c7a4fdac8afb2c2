use std::error::Error;
use std::fmt;

/// Connection state a packet was received in, used for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    Handshaking,
    Status,
    Login,
    Play,
}

impl fmt::Display for ProtocolState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolState::Handshaking => write!(f, "handshaking"),
            ProtocolState::Status => write!(f, "status"),
            ProtocolState::Login => write!(f, "login"),
            ProtocolState::Play => write!(f, "play"),
        }
    }
}

#[derive(Debug)]
pub enum SculkError {
    IoError(std::io::Error),
    /// A VarInt ran past its five-byte limit.
    VarIntTooBig,
    /// A string length prefix exceeded the protocol cap of 32767.
    StringTooLong(i32),
    /// An NBT tag byte outside 0..=12.
    InvalidNbtTag(u8),
    /// A well-framed packet with an id this server does not know. Callers
    /// skip the frame and keep reading; every other variant is fatal to
    /// the session.
    UnknownPacketId { state: ProtocolState, id: i32 },
    /// A region chunk blob with a compression scheme other than zlib.
    UnsupportedCompression(u8),
    MalformedPacket(String),
    RegionError(String),
}

impl fmt::Display for SculkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SculkError::IoError(err) => write!(f, "IO error: {}", err),
            SculkError::VarIntTooBig => write!(f, "VarInt too big"),
            SculkError::StringTooLong(len) => {
                write!(f, "String length {} exceeds protocol maximum", len)
            }
            SculkError::InvalidNbtTag(id) => write!(f, "Invalid NBT tag type: {}", id),
            SculkError::UnknownPacketId { state, id } => {
                write!(f, "Unknown packet id 0x{:02x} in {} state", id, state)
            }
            SculkError::UnsupportedCompression(scheme) => {
                write!(f, "Unsupported chunk compression scheme: {}", scheme)
            }
            SculkError::MalformedPacket(msg) => write!(f, "Malformed packet: {}", msg),
            SculkError::RegionError(msg) => write!(f, "Region file error: {}", msg),
        }
    }
}

impl Error for SculkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SculkError::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SculkError {
    fn from(err: std::io::Error) -> Self {
        SculkError::IoError(err)
    }
}

impl SculkError {
    /// Whether a session can keep reading after hitting this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SculkError::UnknownPacketId { .. })
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        SculkError::MalformedPacket(msg.into())
    }
}

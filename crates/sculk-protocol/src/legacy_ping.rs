//! The pre-Netty server-list ping.
//!
//! A 1.6-and-older client opens a connection and sends a bare `0xFE`
//! before any framed packet. The reply is a `0xFF` kick whose payload is
//! a UCS-2 big-endian string; a `§1`-prefixed payload carries protocol
//! and version fields the old client renders in its server list.

use once_cell::sync::Lazy;
use sculk_common::Result;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// First byte of a legacy ping.
pub const LEGACY_PING: u8 = 0xfe;

/// The fixed kick buffer: packet id `0xFF`, a big-endian character
/// count, then `§1\0127\01.18.2` in UCS-2. 29 bytes in total.
pub static LEGACY_KICK: Lazy<Vec<u8>> = Lazy::new(|| {
    let payload = "\u{a7}1\0127\01.18.2";
    let mut raw = vec![0xff];
    raw.extend_from_slice(&(payload.chars().count() as u16).to_be_bytes());
    raw.extend(payload.encode_utf16().flat_map(|c| c.to_be_bytes()));
    raw
});

/// Answers a legacy ping and leaves the connection ready to close.
pub async fn write_legacy_kick<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<()> {
    writer.write_all(&LEGACY_KICK).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kick_buffer_layout() {
        assert_eq!(LEGACY_KICK.len(), 29);
        assert_eq!(LEGACY_KICK[0], 0xff);
        // 13 UCS-2 characters follow the header.
        assert_eq!(LEGACY_KICK[1], 0x00);
        assert_eq!(LEGACY_KICK[2], 0x0d);
        // The payload opens with the legacy color code marker.
        assert_eq!(&LEGACY_KICK[3..9], &[0x00, 0xa7, 0x00, 0x31, 0x00, 0x00]);
    }

    #[tokio::test]
    async fn kick_writes_verbatim() {
        let mut wire = Vec::new();
        write_legacy_kick(&mut wire).await.unwrap();
        assert_eq!(wire, *LEGACY_KICK);
    }
}

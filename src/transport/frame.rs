//! Frame codec, blocking and async.

use std::io::{Read, Write};

use crate::error::{TransportError, TransportResult};

/// Largest frame accepted when no limit is configured (16 MiB).
pub const DEFAULT_MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

const HEADER_LEN: usize = 4;

fn check_length(length: usize, limit: usize) -> TransportResult<()> {
    if length > limit {
        return Err(TransportError::FrameTooLarge { length, limit });
    }
    Ok(())
}

fn encode_header(payload: &str) -> TransportResult<[u8; HEADER_LEN]> {
    let length = u32::try_from(payload.len()).map_err(|_| TransportError::FrameTooLarge {
        length: payload.len(),
        limit: u32::MAX as usize,
    })?;
    Ok(length.to_le_bytes())
}

fn decode_payload(bytes: Vec<u8>) -> TransportResult<String> {
    String::from_utf8(bytes).map_err(|_| TransportError::InvalidUtf8)
}

/// Read one frame. Frames longer than `limit` are rejected before the
/// payload is allocated.
pub fn read_frame<R: Read>(reader: &mut R, limit: usize) -> TransportResult<String> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header)?;
    let length = u32::from_le_bytes(header) as usize;
    check_length(length, limit)?;

    let mut payload = vec![0u8; length];
    reader.read_exact(&mut payload)?;
    decode_payload(payload)
}

/// Write one frame and flush.
pub fn write_frame<W: Write>(writer: &mut W, payload: &str) -> TransportResult<()> {
    writer.write_all(&encode_header(payload)?)?;
    writer.write_all(payload.as_bytes())?;
    writer.flush()?;
    Ok(())
}

#[cfg(feature = "server")]
pub async fn read_frame_async<R>(reader: &mut R, limit: usize) -> TransportResult<String>
where
    R: tokio::io::AsyncRead + Unpin,
{
    use tokio::io::AsyncReadExt;

    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await?;
    let length = u32::from_le_bytes(header) as usize;
    check_length(length, limit)?;

    let mut payload = vec![0u8; length];
    reader.read_exact(&mut payload).await?;
    decode_payload(payload)
}

#[cfg(feature = "server")]
pub async fn write_frame_async<W>(writer: &mut W, payload: &str) -> TransportResult<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::AsyncWriteExt;

    writer.write_all(&encode_header(payload)?).await?;
    writer.write_all(payload.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_is_little_endian() {
        let mut buf = Vec::new();
        write_frame(&mut buf, "{}").unwrap();
        assert_eq!(buf, vec![2, 0, 0, 0, b'{', b'}']);
    }

    #[test]
    fn reads_back_unicode() {
        let mut buf = Vec::new();
        write_frame(&mut buf, r#"{"Keywords":"Hà Nội"}"#).unwrap();
        let text = read_frame(&mut Cursor::new(buf), DEFAULT_MAX_FRAME_BYTES).unwrap();
        assert_eq!(text, r#"{"Keywords":"Hà Nội"}"#);
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut buf = 1000u32.to_le_bytes().to_vec();
        buf.extend(std::iter::repeat_n(b'x', 1000));
        let err = read_frame(&mut Cursor::new(buf), 10).unwrap_err();
        assert!(matches!(
            err,
            TransportError::FrameTooLarge {
                length: 1000,
                limit: 10
            }
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut buf = 2u32.to_le_bytes().to_vec();
        buf.extend([0xff, 0xfe]);
        let err = read_frame(&mut Cursor::new(buf), 16).unwrap_err();
        assert!(matches!(err, TransportError::InvalidUtf8));
    }

    #[test]
    fn truncated_frame_is_io_error() {
        let mut buf = 8u32.to_le_bytes().to_vec();
        buf.extend(b"abc");
        let err = read_frame(&mut Cursor::new(buf), 16).unwrap_err();
        assert!(matches!(err, TransportError::Io { .. }));
    }

    #[cfg(feature = "server")]
    #[tokio::test]
    async fn async_codec_matches_blocking() {
        let mut buf = Vec::new();
        write_frame_async(&mut buf, "ping").await.unwrap();
        let mut blocking = Vec::new();
        write_frame(&mut blocking, "ping").unwrap();
        assert_eq!(buf, blocking);

        let text = read_frame_async(&mut buf.as_slice(), 16).await.unwrap();
        assert_eq!(text, "ping");
    }
}

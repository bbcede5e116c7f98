//! Encodes and decodes a [`Command`] into the padded, optionally
//! Snappy-compressed byte buffer that the session protocol's record layer
//! encrypts and authenticates.
//!
//! Wire shape of the plaintext this module produces/consumes:
//! `flag(1) ‖ [compressed] payload ‖ padding`, total length a multiple of
//! [`BLK_LEN`]. `payload` starts with a 4-byte `meta` header (`type`,
//! `numParams`, `numHeaders`), followed by NUL-terminated params, then
//! NUL-terminated `(key, value)` header pairs, then the raw body.

mod error;

use common_types::{Command, Message};
pub use error::CodecError;

/// AES block size; every encoded frame is padded to a multiple of this.
pub const BLK_LEN: usize = 16;

/// Bit 0 of the flag byte: the payload following it is Snappy-compressed.
pub const CMDFLAG_COMPRESS: u8 = 0x01;

/// Encode `cmd` into a block-aligned plaintext buffer, optionally
/// compressing everything after the flag byte (including the `meta`
/// header) with Snappy.
pub fn encode(cmd: &Command, compress: bool) -> Result<Vec<u8>, CodecError> {
    let mut payload = build_plaintext(cmd);

    let mut flag = 0u8;
    if compress {
        payload = snap::raw::Encoder::new()
            .compress_vec(&payload)
            .map_err(|_| CodecError::DecompressError)?;
        flag |= CMDFLAG_COMPRESS;
    }

    let unpadded_len = 1 + payload.len();
    let num_padding = (BLK_LEN - (unpadded_len % BLK_LEN)) % BLK_LEN;
    flag |= (num_padding as u8) << 3;

    let mut out = Vec::with_capacity(unpadded_len + num_padding);
    out.push(flag);
    out.extend_from_slice(&payload);
    out.resize(out.len() + num_padding, 0u8);

    if out.is_empty() {
        return Err(CodecError::EmptyFrame);
    }
    Ok(out)
}

fn build_plaintext(cmd: &Command) -> Vec<u8> {
    let params = cmd.params();
    let headers = cmd.message().headers();

    let mut buf = Vec::new();
    buf.push(cmd.kind());
    buf.push(((params.len() as u8) & 0x0F) << 4);
    buf.extend_from_slice(&(headers.len() as u16).to_be_bytes());

    for param in params {
        buf.extend_from_slice(param);
        buf.push(0);
    }
    for (key, value) in headers {
        buf.extend_from_slice(key);
        buf.push(0);
        buf.extend_from_slice(value);
        buf.push(0);
    }
    buf.extend_from_slice(cmd.body());
    buf
}

/// Decode a block-aligned plaintext buffer back into a [`Command`].
pub fn decode(bytes: &[u8]) -> Result<Command, CodecError> {
    let flag = *bytes.first().ok_or(CodecError::MalformedFrame("empty buffer"))?;
    let num_padding = (flag >> 3) as usize;
    let compressed = flag & CMDFLAG_COMPRESS != 0;

    if 1 + num_padding > bytes.len() {
        return Err(CodecError::MalformedFrame("padding exceeds buffer length"));
    }
    let payload_bytes = &bytes[1..bytes.len() - num_padding];

    let owned;
    let payload: &[u8] = if compressed {
        owned = snap::raw::Decoder::new()
            .decompress_vec(payload_bytes)
            .map_err(|_| CodecError::DecompressError)?;
        &owned
    } else {
        payload_bytes
    };

    if payload.len() < 4 {
        return Err(CodecError::MalformedFrame("payload shorter than the meta header"));
    }
    let kind = payload[0];
    let num_params = (payload[1] >> 4) as usize;
    let num_headers = u16::from_be_bytes([payload[2], payload[3]]) as usize;

    let mut cursor = 4usize;
    let mut params = Vec::with_capacity(num_params);
    for _ in 0..num_params {
        let (value, next) = read_nul_terminated(payload, cursor)?;
        params.push(value);
        cursor = next;
    }

    let mut headers = Vec::with_capacity(num_headers);
    for _ in 0..num_headers {
        let (key, next) = read_nul_terminated(payload, cursor)?;
        cursor = next;
        let (value, next) = read_nul_terminated(payload, cursor)?;
        cursor = next;
        headers.push((key, value));
    }

    let body = payload[cursor..].to_vec();
    let message = Message::new(headers).map_err(|_| CodecError::MalformedFrame("too many headers"))?;

    Command::new(kind, params, message, body).map_err(|_| CodecError::MalformedFrame("too many params"))
}

fn read_nul_terminated(buf: &[u8], start: usize) -> Result<(Vec<u8>, usize), CodecError> {
    let rest = buf.get(start..).ok_or(CodecError::MalformedFrame("field starts past end of buffer"))?;
    let nul_at = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(CodecError::MalformedFrame("missing NUL terminator"))?;
    Ok((rest[..nul_at].to_vec(), start + nul_at + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_types::Message;

    fn sample_command() -> Command {
        Command::new(
            0x01,
            vec![b"hello".to_vec()],
            Message::new(vec![(b"k".to_vec(), b"v".to_vec())]).unwrap(),
            b"X".to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn round_trips_uncompressed() {
        let cmd = sample_command();
        let encoded = encode(&cmd, false).unwrap();
        assert_eq!(encoded.len() % BLK_LEN, 0);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn round_trips_compressed() {
        let cmd = sample_command();
        let encoded = encode(&cmd, true).unwrap();
        assert_eq!(encoded.len() % BLK_LEN, 0);
        assert_ne!(encoded[0] & CMDFLAG_COMPRESS, 0);
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded, cmd);
    }

    #[test]
    fn compression_shrinks_repetitive_bodies() {
        let cmd = Command::new(
            0x02,
            Vec::new(),
            Message::empty(),
            vec![b'a'; 10_000],
        )
        .unwrap();

        let plain = encode(&cmd, false).unwrap();
        let compressed = encode(&cmd, true).unwrap();
        assert!(compressed.len() < plain.len());
        assert_eq!(decode(&compressed).unwrap(), cmd);
    }

    #[test]
    fn empty_command_is_still_block_aligned_and_non_empty() {
        let cmd = Command::new(0, Vec::new(), Message::empty(), Vec::new()).unwrap();
        let encoded = encode(&cmd, false).unwrap();
        assert!(!encoded.is_empty());
        assert_eq!(encoded.len() % BLK_LEN, 0);
    }

    #[test]
    fn rejects_missing_nul_terminator() {
        // flag=0 (no compression, no padding), meta claims one param but the
        // buffer ends before any NUL byte appears.
        let bytes = [0u8, 0x01, 0x10, 0x00, b'x'];
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn rejects_padding_longer_than_buffer() {
        let bytes = [0xF8u8]; // num_padding = 31, buffer is 1 byte long
        assert!(decode(&bytes).is_err());
    }
}

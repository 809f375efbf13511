//! Frame codec: length-prefix framing plus optional zlib compression.
//!
//! See spec.md §4.1. The on-wire unit is `length: VarInt` followed by
//! `length` bytes of packet data; packet data is either `id, payload`
//! directly (compression disabled) or `uncompressed_len, then payload`
//! (compression enabled), per the rules below.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use super::session::Session;
use super::varint::{read_var_int, write_var_int};

/// A frame's packet data, decoded down to an ID and raw payload bytes.
///
/// This is the boundary between the frame codec and the typed packet
/// catalog: [`crate::proto::packet::Packet::decode`] takes the `id`/`data`
/// pair produced here.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub id: i32,
    pub data: Vec<u8>,
}

/// Result of feeding more bytes into the streaming frame parser.
///
/// This realizes the "give me N more bytes" generator contract from
/// spec.md §4.1 as an explicit state object rather than a coroutine,
/// per the REDESIGN FLAGS in spec.md §9.
pub enum ParseOutcome {
    /// Need at least this many additional bytes before progress can
    /// continue; the caller must read more and retry.
    NeedMore(usize),
    /// A complete frame was parsed. Carries the number of bytes of the
    /// input buffer that belong to this frame plus the decoded frame.
    Done { consumed: usize, frame: RawFrame },
}

/// Attempt to parse one frame from the front of `buf` without compression.
fn decode_packet_data(data: &[u8]) -> io::Result<RawFrame> {
    let (read, id) = read_var_int(data)?;
    Ok(RawFrame {
        id,
        data: data[read..].to_vec(),
    })
}

/// Decode a length-prefixed frame's packet-data section, honouring the
/// session's compression threshold. `data` is the `length`-byte payload
/// that followed the length VarInt (the length prefix itself is not
/// included).
fn decode_frame_data(session: &Session, data: &[u8]) -> io::Result<RawFrame> {
    if !session.is_compressed() {
        return decode_packet_data(data);
    }

    let (read, uncompressed_len) = read_var_int(data)?;
    let rest = &data[read..];

    if uncompressed_len == 0 {
        return decode_packet_data(rest);
    }

    let mut decompressed = Vec::with_capacity(uncompressed_len as usize);
    ZlibDecoder::new(rest).read_to_end(&mut decompressed)?;

    if decompressed.len() != uncompressed_len as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "decompressed packet has different length than expected ({}b != {}b)",
                decompressed.len(),
                uncompressed_len
            ),
        ));
    }

    decode_packet_data(&decompressed)
}

/// Step the streaming frame parser over `buf`.
///
/// Never consumes bytes belonging to the next frame: on `NeedMore`, `buf`
/// should be left untouched and grown before calling again. On `Done`, the
/// caller must drop exactly `consumed` bytes from the front of its buffer.
pub fn step(session: &Session, buf: &[u8]) -> io::Result<ParseOutcome> {
    // We need at least one byte to know how many more the VarInt length
    // prefix might need; read_var_int reports the precise deficit itself
    // only indirectly (as UnexpectedEof), so probe incrementally.
    let (len_size, len) = match read_var_int(buf) {
        Ok(result) => result,
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
            return Ok(ParseOutcome::NeedMore(1));
        }
        Err(err) => return Err(err),
    };

    if len <= 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "frame length must be positive",
        ));
    }

    let total = len_size + len as usize;
    if buf.len() < total {
        return Ok(ParseOutcome::NeedMore(total - buf.len()));
    }

    let frame_data = &buf[len_size..total];
    let frame = decode_frame_data(session, frame_data)?;

    Ok(ParseOutcome::Done {
        consumed: total,
        frame,
    })
}

/// Render a packet ID and field bytes into a complete wire frame, honouring
/// the session's compression threshold.
pub fn encode(session: &Session, id: i32, payload: &[u8]) -> io::Result<Vec<u8>> {
    let mut packet_data = write_var_int(id);
    packet_data.extend_from_slice(payload);

    let threshold = session.compression_threshold();
    let body = if threshold < 0 {
        packet_data
    } else {
        encode_compressed(&packet_data, threshold)?
    };

    let mut frame = write_var_int(body.len() as i32);
    frame.extend(body);
    Ok(frame)
}

fn encode_compressed(packet_data: &[u8], threshold: i32) -> io::Result<Vec<u8>> {
    let mut body = Vec::new();
    if (packet_data.len() as i32) < threshold {
        body.extend(write_var_int(0));
        body.extend_from_slice(packet_data);
    } else {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(1));
        encoder.write_all(packet_data)?;
        let compressed = encoder.finish()?;

        body.extend(write_var_int(packet_data.len() as i32));
        body.extend(compressed);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uncompressed_session() -> Session {
        Session::new()
    }

    #[test]
    fn uncompressed_round_trip() {
        let session = uncompressed_session();
        let wire = encode(&session, 0x00, &[1, 2, 3]).unwrap();

        match step(&session, &wire).unwrap() {
            ParseOutcome::Done { consumed, frame } => {
                assert_eq!(consumed, wire.len());
                assert_eq!(frame.id, 0x00);
                assert_eq!(frame.data, vec![1, 2, 3]);
            }
            _ => panic!("expected Done"),
        }
    }

    #[test]
    fn needs_more_on_partial_length() {
        let session = uncompressed_session();
        // A single 0x80 byte signals "more VarInt bytes follow".
        let outcome = step(&session, &[0x80]).unwrap();
        assert!(matches!(outcome, ParseOutcome::NeedMore(_)));
    }

    #[test]
    fn needs_more_on_partial_body() {
        let session = uncompressed_session();
        let frame = encode(&session, 0x00, &[1, 2, 3, 4, 5]).unwrap();
        let outcome = step(&session, &frame[..frame.len() - 1]).unwrap();
        assert!(matches!(outcome, ParseOutcome::NeedMore(1)));
    }

    #[test]
    fn zero_length_is_error() {
        let session = uncompressed_session();
        assert!(step(&session, &[0x00]).is_err());
    }

    #[test]
    fn compression_below_threshold_is_uncompressed_marker() {
        let session = Session::new();
        session.set_compression_threshold(256);

        let payload = vec![0xAB; 10];
        let frame = encode(&session, 0x01, &payload).unwrap();

        // VarInt(len) || VarInt(packet_len) || 0x00 || id || payload, roughly;
        // check round trip instead of exact bytes since VarInt widths vary.
        match step(&session, &frame).unwrap() {
            ParseOutcome::Done { frame, .. } => {
                assert_eq!(frame.id, 0x01);
                assert_eq!(frame.data, payload);
            }
            _ => panic!("expected Done"),
        }
    }

    #[test]
    fn compression_above_threshold_round_trips() {
        let session = Session::new();
        session.set_compression_threshold(256);

        let payload = vec![0xCD; 300];
        let frame = encode(&session, 0x02, &payload).unwrap();

        match step(&session, &frame).unwrap() {
            ParseOutcome::Done { frame, .. } => {
                assert_eq!(frame.id, 0x02);
                assert_eq!(frame.data, payload);
            }
            _ => panic!("expected Done"),
        }
    }
}

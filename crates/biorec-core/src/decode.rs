use byteorder::{ByteOrder, LittleEndian};
use heapless::Vec;

use crate::config::{BIOAMP_CHANNELS, CONVERSIONS_PER_BATCH};
use crate::error::DecodeError;
use crate::packet::{PacketLayout, SAMPLE_LEN, START_MARKER, STOP_MARKER};

const MAX_SAMPLES: usize = CONVERSIONS_PER_BATCH as usize;

/// A packet read back into its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPacket {
    pub sequence: u16,
    /// Decimated samples per bioamp channel, sign-extended from 24 bits.
    pub channels: [Vec<i32, MAX_SAMPLES>; BIOAMP_CHANNELS],
    /// The auxiliary slot as three little-endian words.
    pub tail: [u16; 3],
    pub battery: u16,
}

/// Parses one packet produced with `layout`.
pub fn decode(bytes: &[u8], layout: &PacketLayout) -> Result<DecodedPacket, DecodeError> {
    if bytes.len() != layout.len() {
        return Err(DecodeError::Length { expected: layout.len(), actual: bytes.len() });
    }
    if bytes[0] != START_MARKER || bytes[1] != START_MARKER {
        return Err(DecodeError::StartMarker);
    }
    if bytes[layout.stop_index()] != STOP_MARKER {
        return Err(DecodeError::StopMarker);
    }

    let mut channels: [Vec<i32, MAX_SAMPLES>; BIOAMP_CHANNELS] = Default::default();
    for (ch, samples) in channels.iter_mut().enumerate() {
        for chunk in bytes[layout.channel_range(ch)].chunks_exact(SAMPLE_LEN) {
            // A layout never holds more than a batch of samples per channel.
            let _ = samples.push(LittleEndian::read_i24(chunk));
        }
    }

    let mut tail = [0u16; 3];
    LittleEndian::read_u16_into(&bytes[layout.tail_range()], &mut tail);

    Ok(DecodedPacket {
        sequence: LittleEndian::read_u16(&bytes[2..4]),
        channels,
        tail,
        battery: LittleEndian::read_u16(&bytes[layout.battery_range()]),
    })
}

//! Wire layout of one batch packet.
//!
//! ```text
//! [AA][AA][seq lo][seq hi][ch0 samples..][ch1 samples..][tail x6][batt lo][batt hi][55]
//! ```

use core::ops::Range;

use crate::config::{BatchConfig, BIOAMP_CHANNELS, CONVERSIONS_PER_BATCH};

pub const START_MARKER: u8 = 0xAA;
pub const STOP_MARKER: u8 = 0x55;

pub const HEADER_LEN: usize = 4;
/// One decimated bioamp sample, low byte first.
pub const SAMPLE_LEN: usize = 3;
pub const TAIL_LEN: usize = 6;
pub const BATTERY_LEN: usize = 2;
const TRAILER_LEN: usize = TAIL_LEN + BATTERY_LEN + 1;

/// Largest packet any configuration produces (every channel undecimated).
pub const MAX_PACKET_LEN: usize =
    HEADER_LEN + BIOAMP_CHANNELS * CONVERSIONS_PER_BATCH as usize * SAMPLE_LEN + TRAILER_LEN;

/// Byte offsets of every field for one decimation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketLayout {
    channel_starts: [usize; BIOAMP_CHANNELS],
    channel_samples: [usize; BIOAMP_CHANNELS],
    tail_start: usize,
}

impl PacketLayout {
    pub const fn new(config: &BatchConfig) -> Self {
        let mut channel_starts = [0; BIOAMP_CHANNELS];
        let mut channel_samples = [0; BIOAMP_CHANNELS];
        let mut offset = HEADER_LEN;
        let mut ch = 0;
        while ch < BIOAMP_CHANNELS {
            channel_starts[ch] = offset;
            channel_samples[ch] = config.divisors[ch].samples_per_batch();
            offset += channel_samples[ch] * SAMPLE_LEN;
            ch += 1;
        }
        Self { channel_starts, channel_samples, tail_start: offset }
    }

    /// Total packet length in bytes.
    pub const fn len(&self) -> usize {
        self.tail_start + TRAILER_LEN
    }

    pub const fn channel_start(&self, ch: usize) -> usize {
        self.channel_starts[ch]
    }

    pub const fn channel_samples(&self, ch: usize) -> usize {
        self.channel_samples[ch]
    }

    pub const fn channel_range(&self, ch: usize) -> Range<usize> {
        let start = self.channel_starts[ch];
        start..start + self.channel_samples[ch] * SAMPLE_LEN
    }

    pub const fn tail_range(&self) -> Range<usize> {
        self.tail_start..self.tail_start + TAIL_LEN
    }

    pub const fn battery_range(&self) -> Range<usize> {
        let start = self.tail_start + TAIL_LEN;
        start..start + BATTERY_LEN
    }

    pub const fn stop_index(&self) -> usize {
        self.len() - 1
    }
}

/// Packet length for `config`, fixed for the whole session.
pub const fn packet_size(config: &BatchConfig) -> usize {
    PacketLayout::new(config).len()
}

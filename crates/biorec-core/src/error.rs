/// Rejected batch configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A divisor other than 1, 2, 5 or 10 was requested for `channel`.
    InvalidDivisor { channel: usize, divisor: u8 },
    /// The number of divisors does not match the bioamp channel count.
    ChannelCount(usize),
    /// The layout cannot change while a recording is running.
    Recording,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidDivisor { channel, divisor } => write!(
                f,
                "divisor {} on channel {} does not split a batch evenly",
                divisor, channel
            ),
            ConfigError::ChannelCount(n) => {
                write!(f, "expected one divisor per channel, got {}", n)
            }
            ConfigError::Recording => {
                write!(f, "cannot reconfigure while recording")
            }
        }
    }
}

/// Misuse of the recording lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordingError {
    /// `start` before any successful `configure`.
    NotConfigured,
    AlreadyRecording,
    NotRecording,
}

impl core::fmt::Display for RecordingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RecordingError::NotConfigured => write!(f, "no batch layout configured"),
            RecordingError::AlreadyRecording => write!(f, "already recording"),
            RecordingError::NotRecording => write!(f, "not recording"),
        }
    }
}

/// Reasons a received packet cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Expected and actual packet length.
    Length { expected: usize, actual: usize },
    StartMarker,
    StopMarker,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::Length { expected, actual } => {
                write!(f, "packet is {} bytes, layout needs {}", actual, expected)
            }
            DecodeError::StartMarker => write!(f, "missing start marker"),
            DecodeError::StopMarker => write!(f, "missing stop marker"),
        }
    }
}

use crate::error::ConfigError;

/// Bioamp conversions merged into one packet.
pub const CONVERSIONS_PER_BATCH: u8 = 10;
/// Channels delivered by the bioamp on every frame.
pub const BIOAMP_CHANNELS: usize = ads1292::CHANNELS;

/// How many raw conversions one channel averages into an output sample.
///
/// Averaging is a right shift, never a division. Five and ten shift by 3 and
/// 4, so their outputs are scaled by 5/8 and 10/16; receivers expect this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Divisor {
    #[default]
    One,
    Two,
    Five,
    Ten,
}

impl Divisor {
    pub const fn get(self) -> u8 {
        match self {
            Divisor::One => 1,
            Divisor::Two => 2,
            Divisor::Five => 5,
            Divisor::Ten => 10,
        }
    }

    pub const fn shift(self) -> u32 {
        match self {
            Divisor::One => 0,
            Divisor::Two => 1,
            Divisor::Five => 3,
            Divisor::Ten => 4,
        }
    }

    /// Output samples this channel contributes to one packet.
    pub const fn samples_per_batch(self) -> usize {
        (CONVERSIONS_PER_BATCH / self.get()) as usize
    }
}

impl TryFrom<u8> for Divisor {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Divisor::One),
            2 => Ok(Divisor::Two),
            5 => Ok(Divisor::Five),
            10 => Ok(Divisor::Ten),
            other => Err(other),
        }
    }
}

/// What fills the six-byte auxiliary slot of every packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TailLayout {
    /// ADC channel 0, then motion X and Y.
    AdcAndMotion,
    /// Motion X, Y and Z.
    MotionOnly,
    /// ADC channel 0, then four zero bytes.
    AdcOnly,
    /// Six zero bytes.
    Empty,
}

impl TailLayout {
    pub const fn from_sources(adc: bool, motion: bool) -> Self {
        match (adc, motion) {
            (true, true) => TailLayout::AdcAndMotion,
            (false, true) => TailLayout::MotionOnly,
            (true, false) => TailLayout::AdcOnly,
            (false, false) => TailLayout::Empty,
        }
    }
}

/// Validated per-channel decimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatchConfig {
    pub divisors: [Divisor; BIOAMP_CHANNELS],
}

impl BatchConfig {
    pub const fn new(divisors: [Divisor; BIOAMP_CHANNELS]) -> Self {
        Self { divisors }
    }

    /// Validates raw divisor values, one per bioamp channel.
    pub fn from_raw(raw: &[u8]) -> Result<Self, ConfigError> {
        if raw.len() != BIOAMP_CHANNELS {
            return Err(ConfigError::ChannelCount(raw.len()));
        }
        let mut divisors = [Divisor::One; BIOAMP_CHANNELS];
        for (channel, (slot, &value)) in divisors.iter_mut().zip(raw).enumerate() {
            *slot = Divisor::try_from(value)
                .map_err(|divisor| ConfigError::InvalidDivisor { channel, divisor })?;
        }
        Ok(Self { divisors })
    }
}

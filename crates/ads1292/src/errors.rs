use core;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiE> {
    SpiError(SpiE),
    RegisterError(ADS1292RegisterError),
}

impl<E: core::fmt::Display> core::fmt::Display for Error<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::SpiError(err) => {
                write!(f, "SPI communication error: {}", err)
            }
            Error::RegisterError(value) => {
                write!(f, "Register Error: {}", value)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ADS1292RegisterError {
    AdsNotDetected(u8),
}

impl core::fmt::Display for ADS1292RegisterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ADS1292RegisterError::AdsNotDetected(id) => {
                write!(f, "Ads not detected! (ID register {:#04x})", id)
            }
        }
    }
}

impl<SpiE> From<ADS1292RegisterError> for Error<SpiE> {
    fn from(e: ADS1292RegisterError) -> Self {
        Error::RegisterError(e)
    }
}

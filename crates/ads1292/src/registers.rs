use super::errors::ADS1292RegisterError;
use bitflags::bitflags;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    WAKEUP,
    STANDBY,
    RESET,
    START,
    STOP,
    OFFSETCAL,
    RDATAC,
    SDATAC,
    RDATA,
    RREG(u8, u8),
    WREG(u8, u8),
}

impl From<Command> for ([u8; 2], usize) {
    fn from(val: Command) -> Self {
        match val {
            Command::WAKEUP => ([0x02, 0], 1),
            Command::STANDBY => ([0x04, 0], 1),
            Command::RESET => ([0x06, 0], 1),
            Command::START => ([0x08, 0], 1),
            Command::STOP => ([0x0A, 0], 1),
            Command::OFFSETCAL => ([0x1A, 0], 1),
            Command::RDATAC => ([0x10, 0], 1),
            Command::SDATAC => ([0x11, 0], 1),
            Command::RDATA => ([0x12, 0], 1),
            Command::RREG(reg, len) => ([0x20 | reg, len - 1], 2),
            Command::WREG(reg, len) => ([0x40 | reg, len - 1], 2),
        }
    }
}

///
/// Read / write-able registers
///
#[allow(non_camel_case_types)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// ID Control Register (Factory-Programmed, Read-Only)
    ID = 0x00,
    /// Configuration Register 1
    CONFIG1 = 0x01,
    /// Configuration Register 2
    CONFIG2 = 0x02,
    /// Lead-Off Control Register
    LOFF = 0x03,
    /// Channel 1 Settings
    CH1SET = 0x04,
    /// Channel 2 Settings
    CH2SET = 0x05,
    /// Right Leg Drive Sense Selection
    RLD_SENS = 0x06,
    /// Lead-Off Sense Selection
    LOFF_SENS = 0x07,
    /// Lead-Off Status
    LOFF_STAT = 0x08,
    /// Respiration Control Register 1
    RESP1 = 0x09,
    /// Respiration Control Register 2
    RESP2 = 0x0A,
    /// General-Purpose I/O Register
    GPIO = 0x0B,
}

bitflags! {
    /// ID
    #[derive(Debug, Copy, Clone)]
    pub struct Id: u8 {
        const REV_ID2 = 0b1000_0000;
        const REV_ID1 = 0b0100_0000;
        const REV_ID0 = 0b0010_0000;
        const ALWAYS1 = 0b0001_0000;
        const ZERO1   = 0b0000_1000;
        const ZERO0   = 0b0000_0100;
        const DEV_ID1 = 0b0000_0010;
        const DEV_ID0 = 0b0000_0001;

        const REV_ID = Self::REV_ID2.bits() | Self::REV_ID1.bits() | Self::REV_ID0.bits();
        const DEV_ID = Self::DEV_ID1.bits() | Self::DEV_ID0.bits();
        const ZERO = Self::ZERO1.bits() | Self::ZERO0.bits();
    }
}

impl Id {
    /// Two-channel parts report `0b11` in the device bits. Bit 4 reads as one
    /// and bits 3:2 as zero, which rules out a floating bus.
    pub const fn smell(&self) -> Result<(), ADS1292RegisterError> {
        if !self.contains(Self::ALWAYS1) || self.intersects(Self::ZERO) {
            return Err(ADS1292RegisterError::AdsNotDetected(self.bits()));
        }
        match self.intersection(Self::DEV_ID).bits() {
            0b11 => Ok(()),
            _ => Err(ADS1292RegisterError::AdsNotDetected(self.bits())),
        }
    }

    /// The respiration variant sets the low revision bit.
    pub const fn has_respiration(&self) -> bool {
        self.contains(Self::REV_ID0)
    }
}

bitflags! {
    /// LOFF_STAT, also carried in bits 19..15 of every status word
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct LoffStat: u8 {
        const CLK_DIV  = 0b0100_0000;
        const RLD_STAT = 0b0001_0000;
        const IN2N_OFF = 0b0000_1000;
        const IN2P_OFF = 0b0000_0100;
        const IN1N_OFF = 0b0000_0010;
        const IN1P_OFF = 0b0000_0001;
    }
}

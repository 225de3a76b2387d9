#![no_std]

//! Driver for the three-axis SPI accelerometer used as the motion source.
//!
//! Bit 7 of the address byte selects a read. Burst reads rely on the part's
//! own address auto-increment, so multi-byte reads use the plain address.

use byteorder::{ByteOrder, LittleEndian};
use embedded_hal::spi::Operation;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiDevice;

const READ: u8 = 0x80;

/// Reboot time after the soft reset; register writes before it may be lost.
pub const RESET_DELAY_US: u32 = 1_000;

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    WhoAmI = 0x0F,
    Ctrl1 = 0x20,
    Ctrl2 = 0x21,
    Ctrl5 = 0x24,
    OutXL = 0x28,
}

/// Soft reset, written first by [`SpiAccel::init`].
pub const SOFT_RESET: (Register, u8) = (Register::Ctrl1, 0x04);

/// Register writes applied in order by [`SpiAccel::init`] once the part has
/// come back from [`SOFT_RESET`].
pub const STARTUP_SEQUENCE: [(Register, u8); 3] = [
    // high-speed SPI interface
    (Register::Ctrl5, 0x01),
    // data-ready routed to INT1
    (Register::Ctrl2, 0x80),
    // all axes on, block data update
    (Register::Ctrl1, 0xC3),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<SpiError> {
    Spi(SpiError),
    /// Nothing answered on the bus: identity read back as all zeros or all ones.
    NotDetected(u8),
}

pub struct SpiAccel<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> SpiAccel<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    /// Resets the part, runs the startup sequence and confirms a device is
    /// present.
    pub async fn init(
        &mut self,
        delay: &mut impl DelayNs,
    ) -> Result<u8, Error<SPI::Error>> {
        let (reg, value) = SOFT_RESET;
        self.write_register(reg, value).await?;
        delay.delay_us(RESET_DELAY_US).await;

        for (reg, value) in STARTUP_SEQUENCE {
            self.write_register(reg, value).await?;
        }

        // First read after power-up can return stale data.
        let _ = self.who_am_i().await?;
        let id = self.who_am_i().await?;
        match id {
            0x00 | 0xFF => Err(Error::NotDetected(id)),
            id => Ok(id),
        }
    }

    pub async fn who_am_i(&mut self) -> Result<u8, Error<SPI::Error>> {
        let mut buf = [0u8; 1];
        self.read_registers(Register::WhoAmI, &mut buf).await?;
        Ok(buf[0])
    }

    pub async fn write_register(
        &mut self,
        reg: Register,
        value: u8,
    ) -> Result<(), Error<SPI::Error>> {
        self.spi.write(&[reg as u8, value]).await.map_err(Error::Spi)
    }

    pub async fn read_registers(
        &mut self,
        reg: Register,
        buf: &mut [u8],
    ) -> Result<(), Error<SPI::Error>> {
        let addr = READ | reg as u8;
        self.spi
            .transaction(&mut [Operation::Write(&[addr]), Operation::Read(buf)])
            .await
            .map_err(Error::Spi)
    }

    /// Reads one sample of all three axes, two's complement, X first.
    pub async fn read_axes(&mut self) -> Result<[i16; 3], Error<SPI::Error>> {
        let mut buf = [0u8; 6];
        self.read_registers(Register::OutXL, &mut buf).await?;

        let mut axes = [0i16; 3];
        LittleEndian::read_i16_into(&buf, &mut axes);
        Ok(axes)
    }
}

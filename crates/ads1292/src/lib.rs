#![no_std]

use byteorder::{BigEndian, ByteOrder};
use embedded_hal::{digital::OutputPin, spi::Operation};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiDevice;

pub use crate::errors::{ADS1292RegisterError, Error};
pub use crate::registers::*;
use core::result::Result;

pub mod errors;
pub mod registers;

// Maximum ADS clock period (512 kHz internal oscillator).
const MAX_ADS_CLK_PER_NS: u32 = 1954;
// Clock calculations
pub const MIN_T_POR: u32 = MAX_ADS_CLK_PER_NS << 18;
pub const MIN_T_RST: u32 = MAX_ADS_CLK_PER_NS << 1;
pub const MIN_RST_WAIT: u32 = 18 * MAX_ADS_CLK_PER_NS;

/// Input channels on the two-channel parts.
pub const CHANNELS: usize = 2;
/// Status word leading every conversion frame.
pub const STATUS_LEN: usize = 3;
/// One channel sample, 24-bit two's complement, MSB first.
pub const SAMPLE_LEN: usize = 3;
/// Channel payload of one frame.
pub const SAMPLES_LEN: usize = CHANNELS * SAMPLE_LEN;
/// Full frame clocked out after DRDY in continuous mode.
pub const FRAME_LEN: usize = STATUS_LEN + SAMPLES_LEN;

/// Register block written on startup, addressed from CONFIG1 through RESP2.
pub type RegisterTable = [u8; 10];

pub struct Ads1292<SPI> {
    spi: SPI,
}

impl<E, SPI> Ads1292<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn release(self) -> SPI {
        self.spi
    }

    /// Pulses RESET with the power-on and reset timings, then leaves the
    /// device out of continuous read mode so registers can be accessed.
    pub async fn reset<RESET: OutputPin>(
        &mut self,
        reset: &mut RESET,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error<E>> {
        reset.set_high().ok();
        delay.delay_ns(MIN_T_POR).await;
        reset.set_low().ok();
        delay.delay_ns(MIN_T_RST).await;
        reset.set_high().ok();
        delay.delay_ns(MIN_RST_WAIT).await;

        self.cmd(Command::SDATAC).await
    }

    pub async fn smell(&mut self) -> Result<Id, Error<E>> {
        let _ = self.cmd(Command::SDATAC).await;
        let reg_value = self.read_register(registers::Register::ID).await?;
        let id = registers::Id::from_bits_retain(reg_value);
        id.smell()?;
        Ok(id)
    }

    pub async fn cmd(&mut self, command: Command) -> Result<(), Error<E>> {
        let (buf, len) = command.into();
        self.spi.write(&buf[0..len]).await.map_err(Error::SpiError)
    }

    pub async fn read_register_sequential(
        &mut self,
        reg: Register,
        buffer: &mut [u8],
    ) -> Result<(), Error<E>> {
        let (bytes, len) = Command::RREG(reg as u8, buffer.len() as u8).into();

        self.spi
            .transaction(&mut [
                Operation::Write(&bytes[0..len]),
                Operation::Read(buffer),
            ])
            .await
            .map_err(Error::SpiError)
    }

    pub async fn write_register_sequential(
        &mut self,
        reg: Register,
        values: &[u8],
    ) -> Result<(), Error<E>> {
        let (bytes, len) = Command::WREG(reg as u8, values.len() as u8).into();

        self.spi
            .transaction(&mut [
                Operation::Write(&bytes[0..len]),
                Operation::Write(values),
            ])
            .await
            .map_err(Error::SpiError)
    }

    pub async fn read_register(
        &mut self,
        reg: Register,
    ) -> Result<u8, Error<E>> {
        let mut buffer = [0];
        self.read_register_sequential(reg, &mut buffer).await?;
        Ok(buffer[0])
    }

    /// Writes the whole configuration block in one burst.
    pub async fn configure(
        &mut self,
        table: &RegisterTable,
    ) -> Result<(), Error<E>> {
        self.cmd(Command::SDATAC).await?;
        self.write_register_sequential(Register::CONFIG1, table).await
    }

    /// Enters continuous read mode and starts conversions.
    pub async fn start_continuous(&mut self) -> Result<(), Error<E>> {
        self.cmd(Command::RDATAC).await?;
        self.cmd(Command::START).await
    }

    /// Leaves continuous read mode and stops conversions.
    pub async fn stop_continuous(&mut self) -> Result<(), Error<E>> {
        self.cmd(Command::SDATAC).await?;
        self.cmd(Command::STOP).await
    }

    /// Clocks out one frame while in continuous read mode.
    pub async fn read_frame(
        &mut self,
        frame: &mut [u8; FRAME_LEN],
    ) -> Result<(), Error<E>> {
        self.spi.read(frame).await.map_err(Error::SpiError)
    }
}

/// Lead-off flags carried in the status word of a frame.
pub fn lead_off_status(status: &[u8; STATUS_LEN]) -> LoffStat {
    LoffStat::from_bits_truncate(((status[0] & 0x0F) << 1) | (status[1] >> 7))
}

/// Sign-extends both channel samples of a frame payload.
pub fn read_channels(samples: &[u8; SAMPLES_LEN]) -> [i32; CHANNELS] {
    let mut channels = [0; CHANNELS];
    for (value, bytes) in channels.iter_mut().zip(samples.chunks(SAMPLE_LEN)) {
        *value = BigEndian::read_i24(bytes);
    }
    channels
}

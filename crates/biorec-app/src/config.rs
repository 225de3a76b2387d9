//! Compile-time settings for the recorder.

use ads1292::RegisterTable;
use biorec_core::config::BIOAMP_CHANNELS;
use embassy_nrf::uarte::Baudrate;
use embassy_time::Duration;

/// Decimation divisor per bioamp channel.
pub const DIVISORS: [u8; BIOAMP_CHANNELS] = [2, 5];

/// Host stream line rate, 8N1.
pub const BAUDRATE: Baudrate = Baudrate::BAUD460800;

/// One ADC scan per tick. Ten bioamp conversions at 500 SPS span 20 ms,
/// which fits the sixteen passes a batch collects.
pub const ADC_TICK: Duration = Duration::from_micros(1_250);

/// Start recording as soon as the board is up instead of waiting for the
/// button.
pub const RECORD_ON_BOOT: bool = false;

/// ADS1292 registers CONFIG1 through RESP2.
pub const ADS_REGISTERS: RegisterTable = [
    // CONFIG1: continuous conversion, 500 SPS
    0x02,
    // CONFIG2: reference buffer on, internal test signal on
    0xA3,
    // LOFF
    0x10,
    // CH1SET, CH2SET: normal input, gain 1
    0x10,
    0x10,
    // RLD_SENS, LOFF_SENS
    0x00,
    0x00,
    // LOFF_STAT: clock divider for a 2.048 MHz clock
    0x40,
    // RESP1: respiration demodulation and modulation on
    0xDE,
    // RESP2: 64 kHz respiration clock, internal RLD reference
    0x07,
];

/// Watchdog pet period. The hardware timeout is the HAL default.
pub const WATCHDOG_PET: Duration = Duration::from_secs(2);

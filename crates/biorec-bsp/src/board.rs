use embassy_nrf::interrupt::Priority;
use embassy_nrf::peripherals::{self, P1_04, P1_10, WDT};
use embassy_nrf::Peri;

pub struct AdsResources {
    pub spim: Peri<'static, peripherals::SPI3>,
    pub sclk: Peri<'static, peripherals::P0_15>,
    pub mosi: Peri<'static, peripherals::P0_14>,
    pub miso: Peri<'static, peripherals::P0_16>,
    pub cs: Peri<'static, peripherals::P0_17>,
    pub reset: Peri<'static, peripherals::P1_03>,
    pub drdy: Peri<'static, peripherals::P0_13>,
}

pub struct AccelResources {
    pub spim: Peri<'static, peripherals::SPI2>,
    pub sclk: Peri<'static, peripherals::P1_15>,
    pub mosi: Peri<'static, peripherals::P1_13>,
    pub miso: Peri<'static, peripherals::P1_14>,
    pub cs: Peri<'static, peripherals::P1_12>,
    pub int1: Peri<'static, peripherals::P0_01>,
}

/// Auxiliary analog inputs, sampled as one scan per tick.
pub struct AdcResources {
    pub saadc: Peri<'static, peripherals::SAADC>,
    pub ain4: Peri<'static, peripherals::P0_28>,
    pub ain5: Peri<'static, peripherals::P0_29>,
    pub ain6: Peri<'static, peripherals::P0_30>,
    pub ain7: Peri<'static, peripherals::P0_31>,
}

/// Buffered UART towards the host. The timer and PPI resources count
/// received bytes in hardware.
pub struct SerialResources {
    pub uarte: Peri<'static, peripherals::UARTE0>,
    pub timer: Peri<'static, peripherals::TIMER1>,
    pub ppi_ch1: Peri<'static, peripherals::PPI_CH1>,
    pub ppi_ch2: Peri<'static, peripherals::PPI_CH2>,
    pub ppi_group: Peri<'static, peripherals::PPI_GROUP1>,
    pub rx: Peri<'static, peripherals::P0_08>,
    pub tx: Peri<'static, peripherals::P0_06>,
}

/// Represents all the peripherals and pins available for the recorder.
pub struct Biorec {
    /// Pin for the user button.
    pub pwrbtn: Peri<'static, P1_04>,
    /// Recording indicator LED.
    pub led: Peri<'static, P1_10>,
    /// Peripherals for the ADS1292.
    pub ads_resources: AdsResources,
    /// Peripherals for the accelerometer.
    pub accel_resources: AccelResources,
    /// Peripherals for the auxiliary ADC.
    pub adc_resources: AdcResources,
    /// Peripherals for the host stream.
    pub serial_resources: SerialResources,
    /// Watchdog Timer.
    pub wdt: Peri<'static, WDT>,
}

impl Default for Biorec {
    fn default() -> Self {
        let mut config = embassy_nrf::config::Config::default();
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;
        Self::new(config)
    }
}

impl Biorec {
    /// Create a new instance based on HAL configuration
    pub fn new(config: embassy_nrf::config::Config) -> Self {
        let p = embassy_nrf::init(config);

        Self {
            pwrbtn: p.P1_04,
            led: p.P1_10,
            wdt: p.WDT,
            ads_resources: AdsResources {
                spim: p.SPI3,
                sclk: p.P0_15,
                mosi: p.P0_14,
                miso: p.P0_16,
                cs: p.P0_17,
                reset: p.P1_03,
                drdy: p.P0_13,
            },
            accel_resources: AccelResources {
                spim: p.SPI2,
                sclk: p.P1_15,
                mosi: p.P1_13,
                miso: p.P1_14,
                cs: p.P1_12,
                int1: p.P0_01,
            },
            adc_resources: AdcResources {
                saadc: p.SAADC,
                ain4: p.P0_28,
                ain5: p.P0_29,
                ain6: p.P0_30,
                ain7: p.P0_31,
            },
            serial_resources: SerialResources {
                uarte: p.UARTE0,
                timer: p.TIMER1,
                ppi_ch1: p.PPI_CH1,
                ppi_ch2: p.PPI_CH2,
                ppi_group: p.PPI_GROUP1,
                rx: p.P0_08,
                tx: p.P0_06,
            },
        }
    }
}

use crate::board::{
    AccelResources, AdcResources, AdsResources, SerialResources,
};
use ads1292::Ads1292;
use embassy_nrf::{
    bind_interrupts, buffered_uarte,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    interrupt::{self, InterruptExt},
    peripherals,
    saadc::{self, ChannelConfig, Input as _, Saadc},
    spim, uarte,
};
use embassy_time::Delay;
use embedded_hal_bus::spi::ExclusiveDevice;
use spi_accel::SpiAccel;

/// Analog inputs scanned per ADC tick.
pub const ADC_INPUTS: usize = 4;

pub type ExclusiveSpi<'a> = ExclusiveDevice<spim::Spim<'a>, Output<'a>, Delay>;
pub type Ads<'a> = Ads1292<ExclusiveSpi<'a>>;
pub type Accel<'a> = SpiAccel<ExclusiveSpi<'a>>;
pub type AuxAdc<'a> = Saadc<'a, ADC_INPUTS>;
pub type SerialStream<'a> = buffered_uarte::BufferedUarte<'a>;

bind_interrupts!(struct SpiIrqs {
    SPIM3 => spim::InterruptHandler<peripherals::SPI3>;
    SPI2 => spim::InterruptHandler<peripherals::SPI2>;
});

bind_interrupts!(struct SaadcIrqs {
    SAADC => saadc::InterruptHandler;
});

bind_interrupts!(struct SerialIrqs {
    UARTE0 => buffered_uarte::InterruptHandler<peripherals::UARTE0>;
});

/// Bioamp driver plus the pins that stay with it for its whole life.
pub struct AdsFrontend<'a> {
    pub ads: Ads<'a>,
    pub drdy: Input<'a>,
    /// Held high; dropping it would float the reset line.
    pub reset: Output<'a>,
}

impl AdsResources {
    /// Brings up the bus, runs the power-on reset sequence and checks that
    /// the ADS answers. A missing device is reported but not fatal.
    pub async fn configure<'a>(&'a mut self) -> AdsFrontend<'a> {
        let mut config = spim::Config::default();
        config.mode = spim::MODE_1;
        config.frequency = spim::Frequency::M2;
        config.mosi_drive = OutputDrive::HighDrive;
        config.sck_drive = OutputDrive::HighDrive;
        interrupt::SPIM3.set_priority(interrupt::Priority::P3);

        let spi = spim::Spim::new(
            self.spim.reborrow(),
            SpiIrqs,
            self.sclk.reborrow(),
            self.miso.reborrow(),
            self.mosi.reborrow(),
            config,
        );
        let cs =
            Output::new(self.cs.reborrow(), Level::High, OutputDrive::Standard);
        let mut reset = Output::new(
            self.reset.reborrow(),
            Level::High,
            OutputDrive::Standard,
        );
        let drdy = Input::new(self.drdy.reborrow(), Pull::None);

        let spi = ExclusiveDevice::new(spi, cs, Delay)
            .expect("Failed to create ADS spi device.");
        let mut ads = Ads1292::new(spi);

        if let Err(_e) = ads.reset(&mut reset, &mut Delay).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("ADS reset failed! {:?}", defmt::Debug2Format(&_e));
        }
        match ads.smell().await {
            Ok(_id) => {
                #[cfg(feature = "defmt")]
                defmt::info!("ADS detected, id {=u8:#x}", _id.bits());
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("ADS not detected! {:?}", defmt::Debug2Format(&_e));
            }
        }

        AdsFrontend { ads, drdy, reset }
    }
}

impl AccelResources {
    /// Returns the accelerometer driver and its data-ready input. The
    /// startup sequence is left to the caller.
    pub fn configure<'a>(&'a mut self) -> (Accel<'a>, Input<'a>) {
        let mut config = spim::Config::default();
        config.mode = spim::MODE_3;
        config.frequency = spim::Frequency::M8;
        interrupt::SPI2.set_priority(interrupt::Priority::P3);

        let spi = spim::Spim::new(
            self.spim.reborrow(),
            SpiIrqs,
            self.sclk.reborrow(),
            self.miso.reborrow(),
            self.mosi.reborrow(),
            config,
        );
        let cs =
            Output::new(self.cs.reborrow(), Level::High, OutputDrive::Standard);
        let int1 = Input::new(self.int1.reborrow(), Pull::None);

        let spi = ExclusiveDevice::new(spi, cs, Delay)
            .expect("Failed to create accelerometer spi device.");
        (SpiAccel::new(spi), int1)
    }
}

impl AdcResources {
    /// Single-ended 12-bit scan over AIN4..AIN7, in that order.
    pub fn configure<'a>(&'a mut self) -> AuxAdc<'a> {
        let mut config = saadc::Config::default();
        config.resolution = saadc::Resolution::_12BIT;
        interrupt::SAADC.set_priority(interrupt::Priority::P3);

        let channels = [
            ChannelConfig::single_ended(self.ain4.reborrow().degrade_saadc()),
            ChannelConfig::single_ended(self.ain5.reborrow().degrade_saadc()),
            ChannelConfig::single_ended(self.ain6.reborrow().degrade_saadc()),
            ChannelConfig::single_ended(self.ain7.reborrow().degrade_saadc()),
        ];
        Saadc::new(self.saadc.reborrow(), SaadcIrqs, config, channels)
    }
}

impl SerialResources {
    /// 8N1 buffered UART. Writes return once queued; `flush` waits for the
    /// transmit buffer to drain.
    pub fn configure<'a>(
        &'a mut self,
        baudrate: uarte::Baudrate,
    ) -> SerialStream<'a> {
        static RX_BUFFER: static_cell::ConstStaticCell<[u8; 32]> =
            static_cell::ConstStaticCell::new([0; 32]);
        static TX_BUFFER: static_cell::ConstStaticCell<[u8; 1024]> =
            static_cell::ConstStaticCell::new([0; 1024]);

        let mut config = uarte::Config::default();
        config.parity = uarte::Parity::EXCLUDED;
        config.baudrate = baudrate;
        interrupt::UARTE0.set_priority(interrupt::Priority::P3);

        buffered_uarte::BufferedUarte::new(
            self.uarte.reborrow(),
            self.timer.reborrow(),
            self.ppi_ch1.reborrow(),
            self.ppi_ch2.reborrow(),
            self.ppi_group.reborrow(),
            self.rx.reborrow(),
            self.tx.reborrow(),
            SerialIrqs,
            config,
            RX_BUFFER.take(),
            TX_BUFFER.take(),
        )
    }
}

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Level, Output, OutputDrive};
use static_cell::StaticCell;

#[cfg(feature = "defmt")]
use defmt_rtt as _;
#[cfg(feature = "defmt")]
use panic_probe as _;
#[cfg(not(feature = "defmt"))]
use panic_reset as _;

use biorec_app::prelude::*;

static ADS_RESOURCES: StaticCell<AdsResources> = StaticCell::new();
static ADS_RESET: StaticCell<Output<'static>> = StaticCell::new();
static SERIAL_RESOURCES: StaticCell<SerialResources> = StaticCell::new();
#[cfg(feature = "motion")]
static ACCEL_RESOURCES: StaticCell<AccelResources> = StaticCell::new();
#[cfg(feature = "adc")]
static ADC_RESOURCES: StaticCell<AdcResources> = StaticCell::new();

// Application main entry point. The spawner can be used to start async tasks.
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("biorec {}", FW_VERSION);
    // First we initialize our board.
    let board = Biorec::default();

    // Initialize the global event channel.
    let (sender, receiver) = init_event_channel();

    let (_medium_prio_spawner, high_prio_spawner) = init_executors();

    spawner.must_spawn(watchdog_task(board.wdt));

    // Bioamp: reset, identity check, register table.
    let ads_resources = ADS_RESOURCES.init(board.ads_resources);
    let AdsFrontend { mut ads, drdy, reset } = ads_resources.configure().await;
    ADS_RESET.init(reset);
    if ads.configure(&config::ADS_REGISTERS).await.is_err() {
        error!("ADS register setup failed");
    }

    let stream = SERIAL_RESOURCES
        .init(board.serial_resources)
        .configure(config::BAUDRATE);

    let mut assembler =
        Assembler::new(Bioamp::new(ads), adc_source(), motion_source(), stream);
    let _layout = unwrap!(assembler.configure(&config::DIVISORS));
    info!(
        "{} byte packets, tail {:?}",
        _layout.len(),
        assembler.tail_layout()
    );

    high_prio_spawner.must_spawn(drdy_task(drdy));

    #[cfg(feature = "motion")]
    {
        let (mut accel, int1) =
            ACCEL_RESOURCES.init(board.accel_resources).configure();
        match accel.init(&mut embassy_time::Delay).await {
            Ok(_id) => {
                info!("Accelerometer detected, id {=u8:#x}", _id);
                high_prio_spawner.must_spawn(motion_task(accel, int1));
            }
            Err(_) => {
                // The tail keeps reporting the midpoint for every axis.
                error!("Accelerometer not detected");
            }
        }
    }

    #[cfg(feature = "adc")]
    {
        let saadc = ADC_RESOURCES.init(board.adc_resources).configure();
        _medium_prio_spawner.must_spawn(adc_task(saadc));
    }

    let led = Output::new(board.led, Level::Low, OutputDrive::Standard);
    spawner.must_spawn(button_task(board.pwrbtn.into(), sender));
    spawner.must_spawn(dispatch_task(assembler, receiver, led));

    if config::RECORD_ON_BOOT {
        sender.send(RecordingEvent::Start.into()).await;
    }
}

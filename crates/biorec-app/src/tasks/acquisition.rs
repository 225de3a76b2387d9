//! Producer tasks. Each one only touches its own acquisition state and
//! posts to [`WORK`]; packet assembly stays in the dispatch loop.

use crate::prelude::*;
use embassy_nrf::gpio::Input;
use embassy_time::Ticker;

/// Bus errors back off this long so a dead sensor cannot spin the executor.
const FAULT_BACKOFF: Duration = Duration::from_millis(10);

/// Posts bioamp work on every DRDY falling edge. The frame itself is read
/// from the dispatch loop.
#[embassy_executor::task]
pub async fn drdy_task(mut drdy: Input<'static>) {
    loop {
        drdy.wait_for_falling_edge().await;
        WORK.post(Work::BIOAMP);
    }
}

/// Reads the accelerometer whenever INT1 is asserted. Reading the output
/// registers clears INT1, so a sample is read even when the accumulator
/// is full or disarmed.
#[embassy_executor::task]
pub async fn motion_task(mut accel: Accel<'static>, mut int1: Input<'static>) {
    loop {
        int1.wait_for_high().await;
        match accel.read_axes().await {
            Ok(axes) => {
                let accepted =
                    MOTION.lock(|motion| motion.borrow_mut().on_sample(axes));
                if accepted {
                    WORK.post(Work::MOTION);
                }
            }
            Err(_e) => {
                error!("[motion] axis read failed");
                Timer::after(FAULT_BACKOFF).await;
            }
        }
    }
}

/// Scans every auxiliary input once per tick while the accumulator takes
/// conversions.
#[embassy_executor::task]
pub async fn adc_task(mut saadc: AuxAdc<'static>) {
    saadc.calibrate().await;

    let mut ticker = Ticker::every(config::ADC_TICK);
    let mut raw = [0i16; ADC_INPUTS];
    loop {
        ticker.next().await;
        if ADC.lock(|adc| adc.borrow_mut().on_tick()).is_none() {
            continue;
        }

        saadc.sample(&mut raw).await;
        let last = ADC.lock(|adc| {
            let mut adc = adc.borrow_mut();
            raw.iter().fold(Conversion::Discarded, |_, &value| {
                // Single-ended inputs can read slightly below ground.
                adc.on_conversion(value.max(0) as u16)
            })
        });
        if last == Conversion::PassComplete {
            WORK.post(Work::ADC);
        }
    }
}

use crate::prelude::*;
use embassy_nrf::gpio::{AnyPin, Input, Pull};
use embassy_nrf::peripherals::WDT;
use embassy_nrf::wdt;
use embassy_nrf::wdt::Watchdog;
use embassy_nrf::Peri;
use embassy_time::with_timeout;

pub mod acquisition;
pub mod dispatch;

// Re-exports
pub use acquisition::*;
pub use dispatch::*;

// Keeps our system alive
#[embassy_executor::task]
pub async fn watchdog_task(wdt: Peri<'static, WDT>) {
    let wdt_config = wdt::Config::try_new(&wdt).unwrap_or_default();
    let (_wdt, [mut handle]) = match Watchdog::try_new(wdt, wdt_config) {
        Ok(x) => x,
        Err(_) => {
            // Watchdog already active with the wrong number of handles, waiting for it to timeout...
            warn!("[watchdog] already running, waiting for reset");
            loop {
                cortex_m::asm::wfe();
            }
        }
    };
    info!("[watchdog] started");
    loop {
        handle.pet();
        Timer::after(config::WATCHDOG_PET).await;
    }
}

/// Double press toggles recording. Single presses are ignored.
#[embassy_executor::task]
pub async fn button_task(btn_pin: Peri<'static, AnyPin>, sender: EventSender) {
    const DOUBLE_CLICK_DELAY: u64 = 250;

    let mut button = Input::new(btn_pin, Pull::Up);

    loop {
        button.wait_for_falling_edge().await;
        button.wait_for_rising_edge().await;
        if with_timeout(
            Duration::from_millis(DOUBLE_CLICK_DELAY),
            button.wait_for_falling_edge(),
        )
        .await
        .is_ok()
        {
            debug!("Double click detected");
            sender.send(RecordingEvent::Toggle.into()).await;
            button.wait_for_rising_edge().await;
        }
    }
}

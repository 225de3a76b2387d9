use crate::events::{Event, RecordingEvent};
use crate::prelude::*;
use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::Output;

/// The single consumer: waits on posted work and recording events, drives
/// the assembler, and mirrors the recording state on the LED.
#[embassy_executor::task]
pub async fn dispatch_task(
    mut assembler: Assembler,
    receiver: EventReceiver,
    mut led: Output<'static>,
) {
    loop {
        match select(WORK.wait(), receiver.receive()).await {
            Either::First(work) => {
                assembler.on_work(work);
                if let Some(_sequence) = assembler.process().await {
                    trace!("[dispatch] sent packet {}", _sequence);
                }
            }
            Either::Second(Event::Recording(event)) => {
                handle_recording(&mut assembler, &mut led, event).await;
            }
        }
    }
}

async fn handle_recording(
    assembler: &mut Assembler,
    led: &mut Output<'static>,
    event: RecordingEvent,
) {
    let event = match (event, assembler.state()) {
        (RecordingEvent::Toggle, RecordingState::Idle) => RecordingEvent::Start,
        (RecordingEvent::Toggle, RecordingState::Recording) => {
            RecordingEvent::Stop
        }
        (event, _) => event,
    };

    let result = match event {
        RecordingEvent::Start => assembler.start().await,
        RecordingEvent::Stop | RecordingEvent::Toggle => assembler.stop().await,
    };
    match result {
        Ok(()) if assembler.state() == RecordingState::Recording => {
            led.set_high()
        }
        Ok(()) => led.set_low(),
        Err(_e) => warn!("[dispatch] {:?} ignored: {:?}", event, _e),
    }
}

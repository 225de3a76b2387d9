#![no_std]

mod fmt;

pub mod config;
pub mod events;
pub mod tasks;

use biorec_bsp::{ExclusiveSpi, SerialStream, ADC_INPUTS};
use biorec_core::adc::{ADC_CHANNELS, ADC_PASSES_PER_BATCH};
use biorec_core::{
    shared, AdcAcquisition, BatchAssembler, MotionAcquisition, SharedAdc,
    SharedMotion, WorkPending,
};
use embassy_executor::{InterruptExecutor, SendSpawner};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use static_cell::StaticCell;

pub const FW_VERSION: &str = env!("FW_VERSION");

const _: () = assert!(ADC_INPUTS == ADC_CHANNELS);

pub type MutexType = CriticalSectionRawMutex;

// Acquisition state shared between the producer tasks and the dispatch loop.
pub static WORK: WorkPending<MutexType> = WorkPending::new();
pub static ADC: SharedAdc<MutexType> =
    shared(AdcAcquisition::new(ADC_PASSES_PER_BATCH));
pub static MOTION: SharedMotion<MutexType> = shared(MotionAcquisition::new());

pub type Assembler = BatchAssembler<
    'static,
    MutexType,
    ExclusiveSpi<'static>,
    SerialStream<'static>,
>;

/// The ADC accumulator, if the `adc` source is built in.
pub fn adc_source() -> Option<&'static SharedAdc<MutexType>> {
    cfg!(feature = "adc").then_some(&ADC)
}

/// The motion accumulator, if the `motion` source is built in.
pub fn motion_source() -> Option<&'static SharedMotion<MutexType>> {
    cfg!(feature = "motion").then_some(&MOTION)
}

// Statics
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_MED: InterruptExecutor = InterruptExecutor::new();

const EVENT_CAPACITY: usize = 10;
pub type EventMutexType = CriticalSectionRawMutex;
pub type EventChannel = Channel<EventMutexType, events::Event, EVENT_CAPACITY>;
pub type EventSender =
    Sender<'static, EventMutexType, events::Event, EVENT_CAPACITY>;
pub type EventReceiver =
    Receiver<'static, EventMutexType, events::Event, EVENT_CAPACITY>;
static EVENT_CHANNEL: StaticCell<EventChannel> = StaticCell::new();
pub fn init_event_channel() -> (EventSender, EventReceiver) {
    let channel = EVENT_CHANNEL.init(Channel::new());
    (channel.sender(), channel.receiver())
}

// Interrupt executors
#[interrupt]
unsafe fn EGU0_SWI0() {
    EXECUTOR_MED.on_interrupt()
}

#[interrupt]
unsafe fn EGU1_SWI1() {
    EXECUTOR_HIGH.on_interrupt()
}

pub fn init_executors() -> (SendSpawner, SendSpawner) {
    // Medium-priority executor: EGU0_SWI0, priority level 7
    interrupt::EGU0_SWI0.set_priority(Priority::P7);
    let medium_prio_spawner = EXECUTOR_MED.start(interrupt::EGU0_SWI0);

    // High-priority executor: EGU1_SWI1, priority level 6
    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let high_prio_spawner = EXECUTOR_HIGH.start(interrupt::EGU1_SWI1);
    (medium_prio_spawner, high_prio_spawner)
}

pub mod prelude {
    pub use super::{
        adc_source, config, debug, error, events::*, info, init_event_channel,
        init_executors, motion_source, tasks::*, trace, unwrap, warn,
        Assembler, EventReceiver, EventSender, MutexType, ADC, FW_VERSION,
        MOTION, WORK,
    };
    pub use embassy_executor::Spawner;
    pub use embassy_nrf::interrupt;
    pub use embassy_nrf::interrupt::{InterruptExt, Priority};
    pub use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    pub use embassy_time::{Duration, Timer};

    pub use biorec_bsp::{
        Accel, AccelResources, AdcResources, AdsFrontend, AdsResources,
        AuxAdc, Biorec, SerialResources, ADC_INPUTS,
    };
    pub use biorec_core::{Bioamp, Conversion, RecordingState, Work};
}

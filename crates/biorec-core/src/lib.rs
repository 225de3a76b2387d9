#![no_std]
//! Multi-source acquisition and packet assembly for the biosignal recorder.
//!
//! Producers running at interrupt priority (bioamp data-ready, accelerometer
//! INT1, the ADC tick) touch only their own acquisition state and post to a
//! [`WorkPending`]. A single dispatch loop waits on it and drives the
//! [`BatchAssembler`], which decimates bioamp frames, drains the ADC and
//! motion accumulators into the packet tail, and streams finished packets.

mod fmt;

pub mod adc;
pub mod batch;
pub mod bioamp;
pub mod buffer;
pub mod config;
pub mod decode;
mod error;
pub mod motion;
pub mod packet;
pub mod pair;
pub mod work;

pub use adc::{AdcAcquisition, Conversion};
pub use batch::{shared, BatchAssembler, RecordingState, Shared, SharedAdc, SharedMotion};
pub use bioamp::Bioamp;
pub use buffer::DoubleBuffer;
pub use config::{BatchConfig, Divisor, TailLayout};
pub use decode::{decode, DecodedPacket};
pub use error::{ConfigError, DecodeError, RecordingError};
pub use motion::MotionAcquisition;
pub use packet::{packet_size, PacketLayout};
pub use pair::{Slot, SwapPair};
pub use work::{Work, WorkPending};

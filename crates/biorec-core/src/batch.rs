use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal_async::spi::SpiDevice;
use embedded_io_async::Write;

use crate::adc::{AdcAcquisition, ADC_CHANNELS};
use crate::bioamp::Bioamp;
use crate::buffer::DoubleBuffer;
use crate::config::{BatchConfig, TailLayout, BIOAMP_CHANNELS, CONVERSIONS_PER_BATCH};
use crate::error::{ConfigError, RecordingError};
use crate::motion::{MotionAcquisition, AXES};
use crate::packet::{
    PacketLayout, HEADER_LEN, MAX_PACKET_LEN, SAMPLE_LEN, START_MARKER, STOP_MARKER,
    TAIL_LEN,
};
use crate::work::Work;

/// Acquisition state reachable from interrupt-priority producers.
pub type Shared<M, T> = Mutex<M, RefCell<T>>;
pub type SharedAdc<M> = Shared<M, AdcAcquisition<ADC_CHANNELS>>;
pub type SharedMotion<M> = Shared<M, MotionAcquisition>;

pub const fn shared<M: RawMutex, T>(value: T) -> Shared<M, T> {
    Mutex::new(RefCell::new(value))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RecordingState {
    Idle,
    Recording,
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    config: BatchConfig,
    layout: PacketLayout,
    tail: TailLayout,
}

/// Per-channel running sums and write offsets into the fill buffer.
#[derive(Debug, Default)]
struct Decimator {
    sums: [i32; BIOAMP_CHANNELS],
    counts: [u8; BIOAMP_CHANNELS],
    cursors: [usize; BIOAMP_CHANNELS],
    conversions: u8,
}

impl Decimator {
    fn reset(&mut self, layout: &PacketLayout) {
        self.sums = [0; BIOAMP_CHANNELS];
        self.counts = [0; BIOAMP_CHANNELS];
        self.rewind(layout);
    }

    fn rewind(&mut self, layout: &PacketLayout) {
        for (ch, cursor) in self.cursors.iter_mut().enumerate() {
            *cursor = layout.channel_start(ch);
        }
        self.conversions = 0;
    }
}

/// Merges bioamp frames, ADC sums and motion samples into packets.
///
/// The bioamp is owned outright and read from the dispatch context. ADC and
/// motion state is shared with their producers and only ever drained here.
/// Passing `None` for either leaves it out of the tail.
pub struct BatchAssembler<'a, M: RawMutex, SPI, W> {
    bioamp: Bioamp<SPI>,
    adc: Option<&'a SharedAdc<M>>,
    motion: Option<&'a SharedMotion<M>>,
    stream: W,
    plan: Option<Plan>,
    state: RecordingState,
    sequence: u16,
    decimator: Decimator,
    buffers: DoubleBuffer<MAX_PACKET_LEN>,
}

impl<'a, M, SPI, W> BatchAssembler<'a, M, SPI, W>
where
    M: RawMutex,
    SPI: SpiDevice,
    W: Write,
{
    pub fn new(
        bioamp: Bioamp<SPI>,
        adc: Option<&'a SharedAdc<M>>,
        motion: Option<&'a SharedMotion<M>>,
        stream: W,
    ) -> Self {
        Self {
            bioamp,
            adc,
            motion,
            stream,
            plan: None,
            state: RecordingState::Idle,
            sequence: 0,
            decimator: Decimator::default(),
            buffers: DoubleBuffer::new(),
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Sequence number the next packet will carry.
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    pub fn layout(&self) -> Option<PacketLayout> {
        self.plan.map(|plan| plan.layout)
    }

    pub fn tail_layout(&self) -> TailLayout {
        TailLayout::from_sources(self.adc.is_some(), self.motion.is_some())
    }

    pub fn stream(&self) -> &W {
        &self.stream
    }

    /// Validates one divisor per bioamp channel and fixes the packet layout.
    pub fn configure(&mut self, divisors: &[u8]) -> Result<PacketLayout, ConfigError> {
        if self.state == RecordingState::Recording {
            return Err(ConfigError::Recording);
        }
        let config = BatchConfig::from_raw(divisors).inspect_err(|_e| {
            warn!("[batch] rejected divisors: {:?}", _e);
        })?;
        let layout = PacketLayout::new(&config);
        let tail = self.tail_layout();
        self.plan = Some(Plan { config, layout, tail });
        debug!("[batch] configured {} byte packets", layout.len());
        Ok(layout)
    }

    /// Resets sequence and offsets, then starts every available source.
    pub async fn start(&mut self) -> Result<(), RecordingError> {
        let Some(plan) = self.plan else {
            return Err(RecordingError::NotConfigured);
        };
        if self.state == RecordingState::Recording {
            return Err(RecordingError::AlreadyRecording);
        }

        self.sequence = 0;
        self.decimator.reset(&plan.layout);
        if self.bioamp.start().await.is_err() {
            error!("[batch] bioamp failed to enter continuous mode");
        }
        if let Some(adc) = self.adc {
            adc.lock(|adc| adc.borrow_mut().start());
        }
        if let Some(motion) = self.motion {
            motion.lock(|motion| motion.borrow_mut().arm());
        }
        self.state = RecordingState::Recording;

        info!(
            "[batch] recording: {} byte packets, tail {:?}",
            plan.layout.len(),
            plan.tail
        );
        Ok(())
    }

    /// Stops every source. Sums already collected stay until the next start.
    pub async fn stop(&mut self) -> Result<(), RecordingError> {
        if self.state != RecordingState::Recording {
            return Err(RecordingError::NotRecording);
        }
        self.state = RecordingState::Idle;

        if self.bioamp.stop().await.is_err() {
            error!("[batch] bioamp failed to leave continuous mode");
        }
        if let Some(adc) = self.adc {
            adc.lock(|adc| adc.borrow_mut().stop());
        }
        if let Some(motion) = self.motion {
            motion.lock(|motion| motion.borrow_mut().disarm());
        }

        info!("[batch] stopped at sequence {}", self.sequence);
        Ok(())
    }

    /// Routes posted work to the sources owned here.
    pub fn on_work(&mut self, work: Work) {
        if work.contains(Work::BIOAMP) {
            self.bioamp.on_data_ready();
        }
    }

    /// One dispatch step: consume a bioamp frame if one is ready and emit a
    /// packet when the batch fills. Returns the sequence number of a packet
    /// assembled during this call.
    pub async fn process(&mut self) -> Option<u16> {
        match self.bioamp.poll_ready().await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(_) => {
                error!("[batch] bioamp frame read failed");
                return None;
            }
        }
        let samples = ads1292::read_channels(self.bioamp.take_frame()?);
        let plan = self.plan?;

        self.accumulate(&plan, samples);
        if self.decimator.conversions >= CONVERSIONS_PER_BATCH {
            self.assemble_and_send().await
        } else {
            None
        }
    }

    fn accumulate(&mut self, plan: &Plan, samples: [i32; BIOAMP_CHANNELS]) {
        let fill = self.buffers.fill_mut();
        let d = &mut self.decimator;

        for (ch, value) in samples.into_iter().enumerate() {
            let divisor = plan.config.divisors[ch];
            d.sums[ch] = d.sums[ch].wrapping_add(value);
            d.counts[ch] += 1;
            if d.counts[ch] < divisor.get() {
                continue;
            }

            let average = d.sums[ch] >> divisor.shift();
            d.sums[ch] = 0;
            d.counts[ch] = 0;

            let at = d.cursors[ch];
            if at + SAMPLE_LEN <= plan.layout.channel_range(ch).end {
                fill[at..at + SAMPLE_LEN]
                    .copy_from_slice(&average.to_le_bytes()[..SAMPLE_LEN]);
                d.cursors[ch] = at + SAMPLE_LEN;
            }
        }
        d.conversions += 1;
    }

    /// Completes the fill buffer with tail, battery and framing, swaps it to
    /// display and sends it if recording. Returns the packet's sequence number.
    pub async fn assemble_and_send(&mut self) -> Option<u16> {
        let plan = self.plan?;
        let layout = plan.layout;
        let tail = self.drain_tail(plan.tail);
        let sequence = self.sequence;

        let fill = self.buffers.fill_mut();
        fill[layout.tail_range()].copy_from_slice(&tail);
        fill[layout.battery_range()].fill(0);
        fill[layout.stop_index()] = STOP_MARKER;
        fill[0] = START_MARKER;
        fill[1] = START_MARKER;
        fill[2..HEADER_LEN].copy_from_slice(&sequence.to_le_bytes());

        self.sequence = sequence.wrapping_add(1);
        self.buffers.swap();
        self.decimator.rewind(&layout);

        if self.stream.flush().await.is_err() {
            error!("[batch] stream flush failed");
        }
        if self.state == RecordingState::Recording
            && self
                .stream
                .write_all(&self.buffers.display()[..layout.len()])
                .await
                .is_err()
        {
            error!("[batch] stream write failed for packet {}", sequence);
        }

        trace!("[batch] packet {}", sequence);
        Some(sequence)
    }

    fn drain_tail(&self, tail: TailLayout) -> [u8; TAIL_LEN] {
        let words: [u16; 3] = match tail {
            TailLayout::AdcAndMotion => {
                let adc = self.drain_adc();
                let motion = self.drain_motion();
                [adc[0], motion[0], motion[1]]
            }
            TailLayout::MotionOnly => self.drain_motion(),
            TailLayout::AdcOnly => [self.drain_adc()[0], 0, 0],
            TailLayout::Empty => [0; 3],
        };

        let mut bytes = [0u8; TAIL_LEN];
        for (slot, word) in bytes.chunks_exact_mut(2).zip(words) {
            slot.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }

    fn drain_adc(&self) -> [u16; ADC_CHANNELS] {
        self.adc
            .map(|adc| {
                adc.lock(|adc| {
                    let mut adc = adc.borrow_mut();
                    if adc.discarded() > 0 {
                        trace!("[batch] adc discarded {} conversions", adc.discarded());
                    }
                    *adc.drain()
                })
            })
            .unwrap_or_default()
    }

    fn drain_motion(&self) -> [u16; AXES] {
        self.motion
            .map(|motion| {
                motion.lock(|motion| {
                    let mut motion = motion.borrow_mut();
                    if motion.dropped() > 0 {
                        trace!("[batch] motion dropped {} samples", motion.dropped());
                    }
                    *motion.drain()
                })
            })
            .unwrap_or_default()
    }
}

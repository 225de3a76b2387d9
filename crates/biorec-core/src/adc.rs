use crate::pair::SwapPair;

/// Channels sampled round-robin on every tick.
pub const ADC_CHANNELS: usize = 4;
/// Full passes over all channels summed before conversions pause.
pub const ADC_PASSES_PER_BATCH: u16 = 16;

/// What the conversion-complete handler should do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Conversion {
    /// Start converting this channel index.
    Next(usize),
    /// A pass over every channel finished. Wait for the next tick.
    PassComplete,
    /// The result was read and thrown away.
    Discarded,
}

/// Timer-driven round-robin accumulation of the auxiliary ADC channels.
pub struct AdcAcquisition<const N: usize = ADC_CHANNELS> {
    pair: SwapPair<[u32; N]>,
    cursor: usize,
    passes: u16,
    passes_per_batch: u16,
    running: bool,
    discarded: u32,
    output: [u16; N],
}

impl<const N: usize> AdcAcquisition<N> {
    pub const fn new(passes_per_batch: u16) -> Self {
        Self {
            pair: SwapPair::new([0; N], [0; N]),
            cursor: 0,
            passes: 0,
            passes_per_batch,
            running: false,
            discarded: 0,
            output: [0; N],
        }
    }

    /// Clears both accumulators and begins accepting conversions.
    pub fn start(&mut self) {
        self.pair.for_each_mut(|acc| acc.fill(0));
        self.cursor = 0;
        self.passes = 0;
        self.discarded = 0;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// True once the configured passes are summed and conversions pause.
    pub fn is_saturated(&self) -> bool {
        self.passes >= self.passes_per_batch
    }

    /// Timer tick. Returns the channel whose conversion should start.
    pub fn on_tick(&mut self) -> Option<usize> {
        if self.running && !self.is_saturated() {
            Some(self.cursor)
        } else {
            None
        }
    }

    /// Conversion-complete with the raw result of the channel at the cursor.
    pub fn on_conversion(&mut self, raw: u16) -> Conversion {
        if !self.running || self.is_saturated() {
            self.discarded += 1;
            return Conversion::Discarded;
        }
        let acc = self.pair.active_mut();
        acc[self.cursor] += u32::from(raw);
        self.cursor += 1;
        if self.cursor == N {
            self.cursor = 0;
            self.passes += 1;
            Conversion::PassComplete
        } else {
            Conversion::Next(self.cursor)
        }
    }

    /// Conversions thrown away since [`start`](Self::start).
    pub fn discarded(&self) -> u32 {
        self.discarded
    }

    /// Returns the sums saturated to 16 bits, then resumes accumulating into
    /// a zeroed accumulator.
    pub fn drain(&mut self) -> &[u16; N] {
        let (detached, active) = self.pair.swap();
        for (out, &sum) in self.output.iter_mut().zip(detached.iter()) {
            *out = sum.min(u32::from(u16::MAX)) as u16;
        }
        active.fill(0);
        self.passes = 0;
        &self.output
    }
}

impl Default for AdcAcquisition<ADC_CHANNELS> {
    fn default() -> Self {
        Self::new(ADC_PASSES_PER_BATCH)
    }
}

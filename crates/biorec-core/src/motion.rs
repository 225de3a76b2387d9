use crate::pair::SwapPair;

pub const AXES: usize = 3;
/// Samples summed per drain. Later samples are dropped until the next drain.
pub const MOTION_SAMPLE_CAP: u32 = 16;
const MIDPOINT: i32 = 32768;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisSums {
    sums: [i32; AXES],
    // Starts at 1: a sample is summed while counter <= cap.
    counter: u32,
}

impl AxisSums {
    const fn fresh() -> Self {
        Self { sums: [0; AXES], counter: 1 }
    }
}

/// Accumulates accelerometer samples between batches.
///
/// [`on_sample`](Self::on_sample) runs in the data-ready handler and only
/// touches the active accumulator. [`drain`](Self::drain) retargets the
/// handler to the other accumulator before converting the detached one.
pub struct MotionAcquisition {
    pair: SwapPair<AxisSums>,
    armed: bool,
    output: [u16; AXES],
    dropped: u32,
}

impl MotionAcquisition {
    pub const fn new() -> Self {
        Self {
            pair: SwapPair::new(AxisSums::fresh(), AxisSums::fresh()),
            armed: false,
            output: [MIDPOINT as u16; AXES],
            dropped: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Starts accepting samples. Anything left over from before is discarded.
    pub fn arm(&mut self) {
        self.pair.for_each_mut(|acc| *acc = AxisSums::fresh());
        self.dropped = 0;
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Adds one sample to the active accumulator. Returns `false` when the
    /// sample was ignored, either because acquisition is disarmed or the
    /// accumulator already holds its cap.
    pub fn on_sample(&mut self, axes: [i16; AXES]) -> bool {
        if !self.armed {
            return false;
        }
        let acc = self.pair.active_mut();
        let summed = acc.counter <= MOTION_SAMPLE_CAP;
        if summed {
            for (sum, value) in acc.sums.iter_mut().zip(axes) {
                *sum += i32::from(value);
            }
        } else {
            self.dropped += 1;
        }
        acc.counter = acc.counter.saturating_add(1);
        summed
    }

    /// Samples ignored for the cap since [`arm`](Self::arm).
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Hands the active accumulator over and returns its axes as
    /// `sum / 16 + 32768`.
    ///
    /// The divisor is the cap regardless of how many samples arrived, so a
    /// short window reads closer to the midpoint.
    pub fn drain(&mut self) -> &[u16; AXES] {
        let (detached, active) = self.pair.swap();
        active.counter = 1;
        for (out, sum) in self.output.iter_mut().zip(detached.sums) {
            *out = (sum / MOTION_SAMPLE_CAP as i32 + MIDPOINT) as u16;
        }
        *detached = AxisSums::fresh();
        &self.output
    }
}

impl Default for MotionAcquisition {
    fn default() -> Self {
        Self::new()
    }
}

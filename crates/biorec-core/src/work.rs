use bitflags::bitflags;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use portable_atomic::{AtomicU8, Ordering};

bitflags! {
    /// Sources that raised work since the dispatch loop last looked.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Work: u8 {
        const BIOAMP = 0b0000_0001;
        const MOTION = 0b0000_0010;
        const ADC    = 0b0000_0100;
    }
}

/// Level-triggered wake for the dispatch loop.
///
/// Producers OR their bit in and signal; the consumer takes every pending
/// bit at once, so several sources firing before it runs cost one wake and
/// none of them is lost.
pub struct WorkPending<M: RawMutex> {
    bits: AtomicU8,
    wake: Signal<M, ()>,
}

impl<M: RawMutex> WorkPending<M> {
    pub const fn new() -> Self {
        Self { bits: AtomicU8::new(0), wake: Signal::new() }
    }

    /// Callable from any priority.
    pub fn post(&self, work: Work) {
        self.bits.fetch_or(work.bits(), Ordering::Release);
        self.wake.signal(());
    }

    /// Takes whatever is pending without waiting.
    pub fn take(&self) -> Work {
        Work::from_bits_truncate(self.bits.swap(0, Ordering::Acquire))
    }

    /// Waits until at least one source has posted, then takes everything.
    pub async fn wait(&self) -> Work {
        loop {
            let work = self.take();
            if !work.is_empty() {
                return work;
            }
            self.wake.wait().await;
        }
    }
}

impl<M: RawMutex> Default for WorkPending<M> {
    fn default() -> Self {
        Self::new()
    }
}

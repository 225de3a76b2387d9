use ads1292::{Ads1292, Error, LoffStat, FRAME_LEN, SAMPLES_LEN, STATUS_LEN};
use embedded_hal_async::spi::SpiDevice;

/// Continuous-mode acquisition from the two-channel bioamp.
///
/// The data-ready edge only sets a flag. The frame is clocked in by the next
/// [`poll_ready`](Self::poll_ready), and a newer edge before that simply
/// replaces the older frame: the most recent conversion wins and nothing
/// queues.
pub struct Bioamp<SPI> {
    ads: Ads1292<SPI>,
    frame: [u8; FRAME_LEN],
    armed: bool,
    data_ready: bool,
    received: bool,
}

impl<E, SPI> Bioamp<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    pub fn new(ads: Ads1292<SPI>) -> Self {
        Self {
            ads,
            frame: [0; FRAME_LEN],
            armed: false,
            data_ready: false,
            received: false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Enters continuous conversion and accepts data-ready edges.
    pub async fn start(&mut self) -> Result<(), Error<E>> {
        self.data_ready = false;
        self.received = false;
        self.ads.start_continuous().await?;
        self.armed = true;
        Ok(())
    }

    /// Ignores data-ready from here on and stops conversions.
    pub async fn stop(&mut self) -> Result<(), Error<E>> {
        self.armed = false;
        self.data_ready = false;
        self.ads.stop_continuous().await
    }

    /// Data-ready edge. Edges while stopped are dropped.
    pub fn on_data_ready(&mut self) {
        if self.armed {
            self.data_ready = true;
        }
    }

    /// Reads the pending frame, if any. `true` means a frame is waiting in
    /// [`take_frame`](Self::take_frame).
    pub async fn poll_ready(&mut self) -> Result<bool, Error<E>> {
        if self.data_ready {
            self.data_ready = false;
            self.ads.read_frame(&mut self.frame).await?;
            self.received = true;
        }
        Ok(self.received)
    }

    /// Both channel samples of the last frame, big-endian per channel.
    /// Returns `None` once the frame has been taken.
    pub fn take_frame(&mut self) -> Option<&[u8; SAMPLES_LEN]> {
        if !self.received {
            return None;
        }
        self.received = false;
        self.frame.last_chunk::<SAMPLES_LEN>()
    }

    /// Lead-off flags from the status word of the last frame read.
    pub fn lead_off(&self) -> LoffStat {
        let status = self.frame.first_chunk::<STATUS_LEN>().copied().unwrap_or_default();
        ads1292::lead_off_status(&status)
    }
}

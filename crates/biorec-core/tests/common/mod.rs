#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use ads1292::{Ads1292, FRAME_LEN};
use biorec_core::Bioamp;
use embedded_hal::spi::{ErrorType, Operation};
use embedded_hal_async::spi::SpiDevice;

// ---------------------------------------------------------------------------
// Mock bioamp bus
// ---------------------------------------------------------------------------

/// Serves queued frames to continuous-mode reads and records commands.
#[derive(Clone, Default)]
pub struct MockSpi {
    pub frames: Rc<RefCell<VecDeque<[u8; FRAME_LEN]>>>,
    pub commands: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl MockSpi {
    pub fn queue(&self, channels: [i32; 2]) {
        self.frames.borrow_mut().push_back(frame(channels));
    }

    pub fn frames_left(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl ErrorType for MockSpi {
    type Error = Infallible;
}

impl SpiDevice for MockSpi {
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    self.commands.borrow_mut().push(bytes.to_vec())
                }
                Operation::Read(buf) => {
                    let frame = self
                        .frames
                        .borrow_mut()
                        .pop_front()
                        .expect("read with no frame queued");
                    buf.copy_from_slice(&frame[..buf.len()]);
                }
                _ => unimplemented!(),
            }
        }
        Ok(())
    }
}

/// A continuous-mode frame: status word, then both channels MSB first.
pub fn frame(channels: [i32; 2]) -> [u8; FRAME_LEN] {
    let mut f = [0u8; FRAME_LEN];
    f[0] = 0xC0;
    for (ch, value) in channels.iter().enumerate() {
        let be = value.to_be_bytes();
        f[3 + ch * 3..6 + ch * 3].copy_from_slice(&be[1..]);
    }
    f
}

pub fn bioamp() -> (Bioamp<MockSpi>, MockSpi) {
    let spi = MockSpi::default();
    (Bioamp::new(Ads1292::new(spi.clone())), spi)
}

// ---------------------------------------------------------------------------
// Mock stream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Flush,
    Write(Vec<u8>),
}

#[derive(Default)]
pub struct MockStream {
    pub events: Vec<StreamEvent>,
}

impl MockStream {
    pub fn packets(&self) -> Vec<Vec<u8>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Write(bytes) => Some(bytes.clone()),
                StreamEvent::Flush => None,
            })
            .collect()
    }
}

impl embedded_io_async::ErrorType for MockStream {
    type Error = Infallible;
}

impl embedded_io_async::Write for MockStream {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.events.push(StreamEvent::Write(buf.to_vec()));
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        self.events.push(StreamEvent::Flush);
        Ok(())
    }
}

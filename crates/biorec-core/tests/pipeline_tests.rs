mod common;

use biorec_core::{
    decode, shared, AdcAcquisition, BatchAssembler, ConfigError, MotionAcquisition,
    RecordingError, RecordingState, SharedAdc, SharedMotion, TailLayout, Work,
};
use common::{bioamp, MockSpi, MockStream, StreamEvent};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

type Assembler<'a> = BatchAssembler<'a, NoopRawMutex, MockSpi, MockStream>;

/// Delivers each frame the way the dispatch loop does: post, then process.
async fn feed(
    asm: &mut Assembler<'_>,
    spi: &MockSpi,
    frames: impl IntoIterator<Item = [i32; 2]>,
) -> Vec<u16> {
    let mut sent = Vec::new();
    for channels in frames {
        spi.queue(channels);
        asm.on_work(Work::BIOAMP);
        if let Some(seq) = asm.process().await {
            sent.push(seq);
        }
    }
    sent
}

// ---------------------------------------------------------------------------
// End to end
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn two_and_five_with_bioamp_only() {
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    let layout = asm.configure(&[2, 5]).unwrap();
    assert_eq!(layout.len(), 34);
    asm.start().await.unwrap();

    let frames: Vec<[i32; 2]> = (1..=10).map(|i| [i * 100, -i * 1000]).collect();
    assert_eq!(feed(&mut asm, &spi, frames).await, vec![0]);
    assert_eq!(spi.frames_left(), 0);

    let events = &asm.stream().events;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], StreamEvent::Flush);

    let packets = asm.stream().packets();
    let packet = &packets[0];
    assert_eq!(packet.len(), 34);
    assert_eq!(&packet[..4], &[0xAA, 0xAA, 0x00, 0x00]);
    // (100 + 200) >> 1, low byte first
    assert_eq!(&packet[4..7], &[150, 0, 0]);
    assert_eq!(&packet[25..33], &[0; 8]);
    assert_eq!(packet[33], 0x55);

    let decoded = decode(packet, &layout).unwrap();
    assert_eq!(decoded.sequence, 0);
    assert_eq!(decoded.channels[0].as_slice(), &[150, 350, 550, 750, 950]);
    // -15000 >> 3 and -40000 >> 3
    assert_eq!(decoded.channels[1].as_slice(), &[-1875, -5000]);
    assert_eq!(decoded.tail, [0; 3]);
    assert_eq!(decoded.battery, 0);
}

#[futures_test::test]
async fn decimated_value_is_sum_shifted_then_reset() {
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    let layout = asm.configure(&[1, 10]).unwrap();
    asm.start().await.unwrap();

    let ch1 = [-3, -3, -3, -3, -3, -2, -2, -2, -2, -2];
    let frames: Vec<[i32; 2]> = (1..=10).zip(ch1).map(|(a, b)| [a, b]).collect();
    feed(&mut asm, &spi, frames).await;

    // Second batch: the sums restarted from zero.
    let frames: Vec<[i32; 2]> = (0..10).map(|_| [7, 32]).collect();
    feed(&mut asm, &spi, frames).await;

    let packets = asm.stream().packets();
    let first = decode(&packets[0], &layout).unwrap();
    assert_eq!(first.channels[0].as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    // -25 >> 4 rounds toward negative infinity
    assert_eq!(first.channels[1].as_slice(), &[-2]);

    let second = decode(&packets[1], &layout).unwrap();
    assert_eq!(second.channels[0].as_slice(), &[7; 10]);
    assert_eq!(second.channels[1].as_slice(), &[20]);
}

#[futures_test::test]
async fn extreme_samples_survive_the_round_trip() {
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    let layout = asm.configure(&[1, 2]).unwrap();
    asm.start().await.unwrap();

    let frames: Vec<[i32; 2]> = (0..10)
        .map(|i| if i % 2 == 0 { [8_388_607, -8_388_608] } else { [-8_388_608, -8_388_608] })
        .collect();
    feed(&mut asm, &spi, frames).await;

    let decoded = decode(&asm.stream().packets()[0], &layout).unwrap();
    assert_eq!(decoded.channels[0][0], 8_388_607);
    assert_eq!(decoded.channels[0][1], -8_388_608);
    assert_eq!(decoded.channels[1].as_slice(), &[-8_388_608; 5]);
}

#[futures_test::test]
async fn sequence_numbers_have_no_gaps() {
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    let layout = asm.configure(&[10, 10]).unwrap();
    asm.start().await.unwrap();

    let frames: Vec<[i32; 2]> = (0..50).map(|i| [i, -i]).collect();
    assert_eq!(feed(&mut asm, &spi, frames).await, vec![0, 1, 2, 3, 4]);
    assert_eq!(asm.sequence(), 5);

    for (expected, packet) in asm.stream().packets().iter().enumerate() {
        assert_eq!(decode(packet, &layout).unwrap().sequence, expected as u16);
    }
}

#[futures_test::test]
async fn sequence_wraps_after_65535_on_the_wire() {
    let (bioamp, _spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    let layout = asm.configure(&[10, 10]).unwrap();
    asm.start().await.unwrap();

    for expected in 0..u16::MAX {
        assert_eq!(asm.assemble_and_send().await, Some(expected));
    }
    assert_eq!(asm.assemble_and_send().await, Some(65535));
    assert_eq!(asm.assemble_and_send().await, Some(0));
    assert_eq!(asm.sequence(), 1);

    let packets = asm.stream().packets();
    assert_eq!(packets.len(), 65537);
    assert_eq!(&packets[65535][2..4], &[0xFF, 0xFF]);
    assert_eq!(&packets[65536][2..4], &[0x00, 0x00]);
    assert_eq!(decode(&packets[65536], &layout).unwrap().sequence, 0);
}

#[futures_test::test]
async fn idle_assembler_cycles_buffers_without_sending() {
    let (bioamp, _spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    asm.configure(&[2, 2]).unwrap();

    assert_eq!(asm.assemble_and_send().await, Some(0));
    assert_eq!(asm.assemble_and_send().await, Some(1));
    assert_eq!(asm.stream().events, vec![StreamEvent::Flush, StreamEvent::Flush]);
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn lifecycle_misuse_is_rejected() {
    let (bioamp, _spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());

    assert_eq!(asm.start().await, Err(RecordingError::NotConfigured));
    assert_eq!(asm.stop().await, Err(RecordingError::NotRecording));
    assert_eq!(asm.assemble_and_send().await, None);

    assert_eq!(
        asm.configure(&[2, 4]),
        Err(ConfigError::InvalidDivisor { channel: 1, divisor: 4 })
    );
    assert_eq!(asm.configure(&[2, 5, 10]), Err(ConfigError::ChannelCount(3)));
    assert!(asm.layout().is_none());

    asm.configure(&[5, 5]).unwrap();
    asm.start().await.unwrap();
    assert_eq!(asm.state(), RecordingState::Recording);
    assert_eq!(asm.start().await, Err(RecordingError::AlreadyRecording));
    assert_eq!(asm.configure(&[1, 1]), Err(ConfigError::Recording));

    asm.stop().await.unwrap();
    assert_eq!(asm.state(), RecordingState::Idle);
}

#[futures_test::test]
async fn restart_discards_partial_batch() {
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    let layout = asm.configure(&[10, 10]).unwrap();
    asm.start().await.unwrap();

    feed(&mut asm, &spi, [[1000, 1000]; 3]).await;
    asm.stop().await.unwrap();

    // Data-ready after stop is ignored, so nothing is read.
    spi.queue([5, 5]);
    asm.on_work(Work::BIOAMP);
    assert_eq!(asm.process().await, None);
    assert_eq!(spi.frames_left(), 1);
    spi.frames.borrow_mut().clear();

    asm.start().await.unwrap();
    assert_eq!(feed(&mut asm, &spi, [[16, 16]; 10]).await, vec![0]);

    let decoded = decode(&asm.stream().packets()[0], &layout).unwrap();
    assert_eq!(decoded.channels[0].as_slice(), &[10]);
    assert_eq!(decoded.channels[1].as_slice(), &[10]);
}

#[futures_test::test]
async fn start_and_stop_drive_the_bioamp() {
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, None, None, MockStream::default());
    asm.configure(&[2, 5]).unwrap();
    asm.start().await.unwrap();
    asm.stop().await.unwrap();

    assert_eq!(
        *spi.commands.borrow(),
        vec![vec![0x10], vec![0x08], vec![0x11], vec![0x0A]]
    );
}

// ---------------------------------------------------------------------------
// Tail layouts
// ---------------------------------------------------------------------------

/// Records one batch with the given sources after feeding each of them once.
async fn one_batch_tail(
    adc: Option<&SharedAdc<NoopRawMutex>>,
    motion: Option<&SharedMotion<NoopRawMutex>>,
) -> (TailLayout, Vec<u8>) {
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, adc, motion, MockStream::default());
    let layout = asm.configure(&[10, 10]).unwrap();
    asm.start().await.unwrap();

    if let Some(adc) = adc {
        adc.lock(|adc| {
            let mut adc = adc.borrow_mut();
            assert_eq!(adc.on_tick(), Some(0));
            for raw in [100, 200, 300, 400] {
                adc.on_conversion(raw);
            }
        });
    }
    if let Some(motion) = motion {
        motion.lock(|motion| assert!(motion.borrow_mut().on_sample([16, -32, 160])));
    }

    feed(&mut asm, &spi, [[0, 0]; 10]).await;
    let packet = asm.stream().packets().remove(0);
    (asm.tail_layout(), packet[layout.tail_range()].to_vec())
}

#[futures_test::test]
async fn tail_with_adc_and_motion() {
    let adc: SharedAdc<NoopRawMutex> = shared(AdcAcquisition::default());
    let motion: SharedMotion<NoopRawMutex> = shared(MotionAcquisition::new());

    let (layout, tail) = one_batch_tail(Some(&adc), Some(&motion)).await;
    assert_eq!(layout, TailLayout::AdcAndMotion);
    // ADC ch0 = 100, X = 16/16 + 32768, Y = -32/16 + 32768
    assert_eq!(tail, vec![0x64, 0x00, 0x01, 0x80, 0xFE, 0x7F]);
}

#[futures_test::test]
async fn tail_with_motion_only() {
    let motion: SharedMotion<NoopRawMutex> = shared(MotionAcquisition::new());

    let (layout, tail) = one_batch_tail(None, Some(&motion)).await;
    assert_eq!(layout, TailLayout::MotionOnly);
    assert_eq!(tail, vec![0x01, 0x80, 0xFE, 0x7F, 0x0A, 0x80]);
}

#[futures_test::test]
async fn tail_with_adc_only() {
    let adc: SharedAdc<NoopRawMutex> = shared(AdcAcquisition::default());

    let (layout, tail) = one_batch_tail(Some(&adc), None).await;
    assert_eq!(layout, TailLayout::AdcOnly);
    assert_eq!(tail, vec![0x64, 0x00, 0, 0, 0, 0]);
}

#[futures_test::test]
async fn tail_without_auxiliary_sources() {
    let (layout, tail) = one_batch_tail(None, None).await;
    assert_eq!(layout, TailLayout::Empty);
    assert_eq!(tail, vec![0; 6]);
}

#[futures_test::test]
async fn each_batch_drains_the_auxiliary_sources() {
    let adc: SharedAdc<NoopRawMutex> = shared(AdcAcquisition::default());
    let (bioamp, spi) = bioamp();
    let mut asm: Assembler = BatchAssembler::new(bioamp, Some(&adc), None, MockStream::default());
    let layout = asm.configure(&[10, 10]).unwrap();
    asm.start().await.unwrap();

    adc.lock(|adc| {
        let mut adc = adc.borrow_mut();
        for raw in [500, 0, 0, 0] {
            adc.on_conversion(raw);
        }
    });
    feed(&mut asm, &spi, [[0, 0]; 20]).await;

    let packets = asm.stream().packets();
    assert_eq!(decode(&packets[0], &layout).unwrap().tail[0], 500);
    assert_eq!(decode(&packets[1], &layout).unwrap().tail[0], 0);
}

mod common;

use ads1292::LoffStat;
use biorec_core::adc::ADC_PASSES_PER_BATCH;
use biorec_core::motion::MOTION_SAMPLE_CAP;
use biorec_core::{AdcAcquisition, Conversion, MotionAcquisition, Work, WorkPending};
use common::{bioamp, frame};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

// ---------------------------------------------------------------------------
// Motion
// ---------------------------------------------------------------------------

#[test]
fn motion_sums_only_the_first_sixteen_samples() {
    let mut motion = MotionAcquisition::new();
    motion.arm();

    let accepted = (0..20).filter(|_| motion.on_sample([16, 16, -16])).count();
    assert_eq!(accepted as u32, MOTION_SAMPLE_CAP);
    assert_eq!(motion.dropped(), 4);

    // 16 * 16 / 16 + 32768
    assert_eq!(motion.drain(), &[32784, 32784, 32752]);
}

#[test]
fn motion_drain_hands_over_a_fresh_accumulator() {
    let mut motion = MotionAcquisition::new();
    motion.arm();
    motion.on_sample([1600, 0, 0]);
    assert_eq!(motion.drain(), &[32868, 32768, 32768]);

    // Nothing arrived since: midpoint on every axis.
    assert_eq!(motion.drain(), &[32768; 3]);

    // The cap applies per accumulator, so a full window fits again.
    for _ in 0..16 {
        assert!(motion.on_sample([1, 1, 1]));
    }
    assert!(!motion.on_sample([1, 1, 1]));
}

#[test]
fn motion_average_truncates_toward_zero() {
    let mut motion = MotionAcquisition::new();
    motion.arm();
    motion.on_sample([-8, 8, -16]);
    assert_eq!(motion.drain(), &[32768, 32768, 32767]);
}

#[test]
fn motion_full_scale_stays_in_range() {
    let mut motion = MotionAcquisition::new();
    motion.arm();
    for _ in 0..16 {
        motion.on_sample([i16::MIN, i16::MAX, 0]);
    }
    assert_eq!(motion.drain(), &[0, 65535, 32768]);
}

#[test]
fn motion_rearm_discards_leftovers() {
    let mut motion = MotionAcquisition::new();
    motion.arm();
    motion.on_sample([1600, 1600, 1600]);
    motion.disarm();
    assert!(!motion.on_sample([1600, 1600, 1600]));

    motion.arm();
    assert_eq!(motion.drain(), &[32768; 3]);
}

// ---------------------------------------------------------------------------
// Auxiliary ADC
// ---------------------------------------------------------------------------

/// One timer tick followed by the conversions it triggers.
fn pass(adc: &mut AdcAcquisition, raws: [u16; 4]) -> Vec<Conversion> {
    let mut steps = Vec::new();
    if adc.on_tick().is_some() {
        for raw in raws {
            steps.push(adc.on_conversion(raw));
        }
    }
    steps
}

#[test]
fn adc_round_robins_over_all_channels() {
    let mut adc = AdcAcquisition::default();
    adc.start();

    assert_eq!(
        pass(&mut adc, [1, 2, 3, 4]),
        vec![
            Conversion::Next(1),
            Conversion::Next(2),
            Conversion::Next(3),
            Conversion::PassComplete
        ]
    );
    assert_eq!(adc.on_tick(), Some(0));
}

#[test]
fn adc_sum_saturates_at_sixteen_bits() {
    let mut adc = AdcAcquisition::default();
    adc.start();
    for _ in 0..ADC_PASSES_PER_BATCH {
        pass(&mut adc, [4375, 10, 0, 4095]);
    }
    // 4375 * 16 = 70000
    assert_eq!(adc.drain(), &[65535, 160, 0, 65520]);
}

#[test]
fn adc_discards_after_limit_until_drained() {
    let mut adc = AdcAcquisition::default();
    adc.start();
    for _ in 0..ADC_PASSES_PER_BATCH {
        pass(&mut adc, [1, 1, 1, 1]);
    }
    assert!(adc.is_saturated());
    assert_eq!(adc.on_tick(), None);
    assert_eq!(adc.on_conversion(999), Conversion::Discarded);
    assert_eq!(adc.discarded(), 1);

    assert_eq!(adc.drain(), &[16; 4]);
    assert_eq!(adc.on_tick(), Some(0));
    assert_eq!(adc.on_conversion(5), Conversion::Next(1));
    assert!(!adc.is_saturated());
}

#[test]
fn adc_stop_suppresses_accumulation() {
    let mut adc = AdcAcquisition::default();
    adc.start();
    adc.on_conversion(7);
    adc.stop();

    assert_eq!(adc.on_tick(), None);
    assert_eq!(adc.on_conversion(100), Conversion::Discarded);
    assert_eq!(adc.drain(), &[7, 0, 0, 0]);

    adc.start();
    assert_eq!(adc.drain(), &[0; 4]);
}

// ---------------------------------------------------------------------------
// Bioamp
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn bioamp_keeps_only_the_latest_frame() {
    let (mut amp, spi) = bioamp();
    amp.start().await.unwrap();
    spi.queue([1, 1]);
    spi.queue([2, 2]);

    amp.on_data_ready();
    assert!(amp.poll_ready().await.unwrap());
    amp.on_data_ready();
    assert!(amp.poll_ready().await.unwrap());

    let latest = frame([2, 2]);
    assert_eq!(amp.take_frame(), Some(latest[3..].try_into().unwrap()));
    assert_eq!(amp.take_frame(), None);
    assert!(!amp.poll_ready().await.unwrap());
}

#[futures_test::test]
async fn bioamp_ignores_data_ready_while_stopped() {
    let (mut amp, spi) = bioamp();
    spi.queue([1, 1]);

    amp.on_data_ready();
    assert!(!amp.poll_ready().await.unwrap());
    assert_eq!(spi.frames_left(), 1);

    amp.start().await.unwrap();
    amp.on_data_ready();
    amp.stop().await.unwrap();
    assert!(!amp.poll_ready().await.unwrap());
    assert!(!amp.is_armed());
}

#[futures_test::test]
async fn bioamp_exposes_lead_off_status() {
    let (mut amp, spi) = bioamp();
    amp.start().await.unwrap();
    let mut raw = frame([0, 0]);
    raw[0] = 0xC1;
    raw[1] = 0x80;
    spi.frames.borrow_mut().push_back(raw);

    amp.on_data_ready();
    amp.poll_ready().await.unwrap();
    assert_eq!(amp.lead_off(), LoffStat::IN1N_OFF | LoffStat::IN1P_OFF);
}

// ---------------------------------------------------------------------------
// Work pending
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn pending_work_is_taken_all_at_once() {
    let pending: WorkPending<CriticalSectionRawMutex> = WorkPending::new();
    pending.post(Work::BIOAMP);
    pending.post(Work::ADC);
    pending.post(Work::BIOAMP);

    assert_eq!(pending.wait().await, Work::BIOAMP | Work::ADC);
    assert!(pending.take().is_empty());

    pending.post(Work::MOTION);
    assert_eq!(pending.wait().await, Work::MOTION);
}

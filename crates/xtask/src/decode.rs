use std::path::Path;

use anyhow::{anyhow, Context, Result};
use biorec_core::{decode, BatchConfig, PacketLayout};

/// Walks a capture packet by packet. Bytes that do not start a valid packet
/// are skipped one at a time until framing is found again.
pub fn decode_capture(capture: &Path, divisors: &[u8]) -> Result<()> {
    let config = BatchConfig::from_raw(divisors)
        .map_err(|e| anyhow!("Invalid divisors: {e}"))?;
    let layout = PacketLayout::new(&config);
    let bytes = std::fs::read(capture)
        .with_context(|| format!("Failed to read {}", capture.display()))?;

    let mut at = 0;
    let mut packets = 0usize;
    let mut skipped = 0usize;
    let mut gaps = 0usize;
    let mut last: Option<u16> = None;

    while at + layout.len() <= bytes.len() {
        let Ok(packet) = decode(&bytes[at..at + layout.len()], &layout) else {
            skipped += 1;
            at += 1;
            continue;
        };

        if let Some(prev) = last {
            if packet.sequence != prev.wrapping_add(1) {
                gaps += 1;
                println!("gap: {} -> {}", prev, packet.sequence);
            }
        }
        last = Some(packet.sequence);

        println!(
            "{:5}  ch0 {:?}  ch1 {:?}  tail {:04x?}",
            packet.sequence,
            packet.channels[0].as_slice(),
            packet.channels[1].as_slice(),
            packet.tail,
        );
        packets += 1;
        at += layout.len();
    }

    println!(
        "{packets} packets of {} bytes, {gaps} sequence gaps, {skipped} bytes skipped",
        layout.len()
    );
    Ok(())
}

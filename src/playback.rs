use std::{io, path::Path};

use rcswitch_shared::{Capturer, DecodedMessage, Inbox, MessageConsumer, MessageQueue};

use crate::vcdutils::vcdfile_to_vec;

/// Decode every message in a vcd capture.
pub fn command(path: &Path, tolerance: u8) -> io::Result<Vec<DecodedMessage>> {
    let edges = vcdfile_to_vec(path)?;
    log::info!("{} edges in {}", edges.len(), path.display());

    let inbox = Inbox::new();
    inbox.set_tolerance(tolerance);

    let mut queue = MessageQueue::new();
    let (producer, mut consumer) = queue.split();

    let mut capturer = Capturer::new(&inbox, producer);
    let res = play_edges(&edges, &mut capturer, &mut consumer);

    let stats = capturer.stats();
    log::debug!(
        "{} decode attempts, {} overflows",
        stats.attempts,
        stats.overflows
    );

    Ok(res)
}

/// Feed edge timestamps in microseconds to `capturer`, as its interrupt
/// would, and collect what it queues.
pub fn play_edges(
    edges: &[(u64, bool)],
    capturer: &mut Capturer<'_>,
    messages: &mut MessageConsumer<'_>,
) -> Vec<DecodedMessage> {
    let mut res = Vec::new();

    for (t, _) in edges {
        // The capture clock is a wrapping 32 bit microsecond counter
        capturer.sample(*t as u32);
        res.extend(std::iter::from_fn(|| messages.dequeue()));
    }

    res
}

#[cfg(test)]
mod tests {
    use rcswitch_shared::{codeword, trace::PulseTrace, RcSwitch};

    use super::*;

    #[test]
    fn decodes_transmitted_edges() {
        let trace = PulseTrace::new();
        let inbox = Inbox::new();
        let mut tx_queue = MessageQueue::new();
        let (_, tx_messages) = tx_queue.split();
        let mut switch = RcSwitch::new(trace.delay(), &inbox, tx_messages);
        switch.enable_transmit(trace.pin());
        switch.select_protocol(2);
        switch.switch_on_b(3, 1).unwrap();

        let mut queue = MessageQueue::new();
        let (producer, mut consumer) = queue.split();
        let mut capturer = Capturer::new(&inbox, producer);
        let messages = play_edges(&trace.edges(), &mut capturer, &mut consumer);

        let expected = codeword::codeword_b(3, 1, true).unwrap().code().unwrap();
        // 10 repeats, every second gap confirms a frame
        assert_eq!(messages.len(), 4);
        assert_eq!(capturer.stats().dropped, 0);
        for msg in messages {
            assert_eq!(msg.value, expected.value);
            assert_eq!(msg.bit_length, 24);
            assert_eq!(msg.protocol, 2);
            assert_eq!(msg.delay, 650);
        }
    }
}

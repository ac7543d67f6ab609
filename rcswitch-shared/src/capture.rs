use heapless::Vec;

use crate::{
    decoder::{self, DecodedMessage},
    inbox::{Inbox, MessageProducer},
    protocol::ProtocolTable,
};

/// Capacity of the timing buffer: 32 bits at two edges per bit plus sync.
pub const MAX_CHANGES: usize = 67;
/// A pause longer than this may be the gap between two repeated frames.
pub const SEPARATION_LIMIT: u32 = 4300;
/// Two gaps closer than this are taken as the same sender repeating a frame.
pub const REPEAT_GAP_TOLERANCE: u32 = 200;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CaptureStats {
    /// Frames handed to the decoder
    pub attempts: u32,
    /// Frames dropped for not fitting the buffer
    pub overflows: u32,
    /// Decoded messages dropped because the foreground did not drain the queue
    pub dropped: u32,
}

/// Interrupt side of the receiver.
///
/// Call [`on_edge`](Self::on_edge) from the handler of an any-edge interrupt
/// on the receive line. Senders repeat a frame several times with nearly the
/// same gap in between; a frame is decoded only once two consecutive gaps
/// agree, which filters most noise before any decode work is done.
///
/// Decoded messages are enqueued to the [`RcSwitch`](crate::RcSwitch)
/// holding the consumer half of the same queue.
pub struct Capturer<'a> {
    inbox: &'a Inbox,
    messages: MessageProducer<'a>,
    protocols: ProtocolTable<'a>,
    timings: Vec<u32, MAX_CHANGES>,
    repeat_count: u8,
    last_edge: u32,
    stats: CaptureStats,
}

impl<'a> Capturer<'a> {
    pub fn new(inbox: &'a Inbox, messages: MessageProducer<'a>) -> Self {
        Self::with_protocols(inbox, messages, ProtocolTable::builtin())
    }

    pub fn with_protocols(
        inbox: &'a Inbox,
        messages: MessageProducer<'a>,
        protocols: ProtocolTable<'a>,
    ) -> Self {
        Self {
            inbox,
            messages,
            protocols,
            timings: Vec::new(),
            repeat_count: 0,
            last_edge: 0,
            stats: CaptureStats::default(),
        }
    }

    pub fn reset(&mut self) {
        self.timings.clear();
        self.repeat_count = 0;
        self.last_edge = 0;
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    /// Edge on `line` at `now` microseconds of a free running clock.
    /// Ignored unless receiving is enabled for `line`.
    ///
    /// The interrupt handler reads the platform's monotonic microsecond
    /// clock and passes it as `now`; any 32 bit counter that wraps works.
    pub fn on_edge(&mut self, line: u8, now: u32) -> Option<DecodedMessage> {
        if !self.inbox.is_listening(line) {
            return None;
        }
        self.sample(now)
    }

    /// Record an edge at `now` and decode when a frame is complete. A decoded
    /// message is also enqueued for the foreground.
    pub fn sample(&mut self, now: u32) -> Option<DecodedMessage> {
        let duration = now.wrapping_sub(self.last_edge);
        self.last_edge = now;

        let mut decoded = None;

        if duration > SEPARATION_LIMIT {
            // The first gap has nothing to compare against yet
            let first = self.timings.first().copied().unwrap_or(0);
            if self.repeat_count == 0 || duration.abs_diff(first) < REPEAT_GAP_TOLERANCE {
                self.repeat_count += 1;
                if self.repeat_count == 2 {
                    decoded = self.decode();
                    self.repeat_count = 0;
                }
            }
            self.timings.clear();
        }

        if self.timings.is_full() {
            log::trace!("Capture overflow, dropping frame");
            self.stats.overflows = self.stats.overflows.wrapping_add(1);
            self.timings.clear();
            self.repeat_count = 0;
        }

        // Never full at this point
        let _ = self.timings.push(duration);

        decoded
    }

    fn decode(&mut self) -> Option<DecodedMessage> {
        self.stats.attempts = self.stats.attempts.wrapping_add(1);
        let tolerance = self.inbox.tolerance();

        let decoded = self.protocols.iter().find_map(|(id, protocol)| {
            match decoder::decode(id, protocol, &self.timings, tolerance) {
                Ok(message) => Some(message),
                Err(err) => {
                    log::trace!("Protocol {}: {}", id, err);
                    None
                }
            }
        });

        if let Some(message) = decoded {
            if self.messages.enqueue(message).is_err() {
                log::trace!("Message queue full, dropping {:?}", message);
                self.stats.dropped = self.stats.dropped.wrapping_add(1);
            }
        }

        decoded
    }
}

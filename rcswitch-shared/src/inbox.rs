//! State shared between the edge interrupt and foreground code.
//!
//! [`Inbox`] holds the receive settings the foreground changes while the
//! interrupt runs: the enabled line and the tolerance. Decoded messages travel
//! the other way through a [`MessageQueue`]: the
//! [`Capturer`](crate::Capturer) holds its producer half and the
//! [`RcSwitch`](crate::RcSwitch) its consumer half.
//!
//! ```ignore
//! static INBOX: Inbox = Inbox::new();
//! static mut QUEUE: MessageQueue = MessageQueue::new();
//!
//! let (producer, consumer) = unsafe { QUEUE.split() };
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use heapless::spsc::{Consumer, Producer, Queue};

use crate::decoder::DecodedMessage;

/// Default receive tolerance in percent of the base pulse length.
pub const DEFAULT_TOLERANCE: u8 = 60;
/// Queue size; holds one message less than this.
pub const QUEUE_LEN: usize = 8;

pub type MessageQueue = Queue<DecodedMessage, QUEUE_LEN>;
pub type MessageProducer<'a> = Producer<'a, DecodedMessage, QUEUE_LEN>;
pub type MessageConsumer<'a> = Consumer<'a, DecodedMessage, QUEUE_LEN>;

pub struct Inbox {
    listening: AtomicBool,
    line: AtomicU8,
    tolerance: AtomicU8,
}

impl Inbox {
    pub const fn new() -> Self {
        Self {
            listening: AtomicBool::new(false),
            line: AtomicU8::new(0),
            tolerance: AtomicU8::new(DEFAULT_TOLERANCE),
        }
    }

    /// Accept edges from `line`.
    pub fn enable(&self, line: u8) {
        self.line.store(line, Ordering::Relaxed);
        self.listening.store(true, Ordering::Release);
    }

    pub fn disable(&self) {
        self.listening.store(false, Ordering::Release);
    }

    pub fn is_listening(&self, line: u8) -> bool {
        self.listening.load(Ordering::Acquire) && self.line.load(Ordering::Relaxed) == line
    }

    pub fn set_tolerance(&self, percent: u8) {
        self.tolerance.store(percent, Ordering::Relaxed);
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance.load(Ordering::Relaxed)
    }
}

impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_selects_line() {
        let inbox = Inbox::new();
        assert!(!inbox.is_listening(0));

        inbox.enable(4);
        assert!(inbox.is_listening(4));
        assert!(!inbox.is_listening(5));

        inbox.enable(5);
        assert!(!inbox.is_listening(4));
        assert!(inbox.is_listening(5));

        inbox.disable();
        assert!(!inbox.is_listening(5));
    }

    #[test]
    fn tolerance_defaults_to_60_percent() {
        let inbox = Inbox::new();
        assert_eq!(inbox.tolerance(), DEFAULT_TOLERANCE);

        inbox.set_tolerance(25);
        assert_eq!(inbox.tolerance(), 25);
    }

    #[test]
    fn queue_keeps_one_slot_free() {
        let mut queue = MessageQueue::new();
        let (mut producer, mut consumer) = queue.split();

        for value in 0..QUEUE_LEN as u64 - 1 {
            let msg = DecodedMessage {
                value,
                ..DecodedMessage::default()
            };
            assert_eq!(producer.enqueue(msg), Ok(()));
        }
        assert!(producer.enqueue(DecodedMessage::default()).is_err());

        assert_eq!(consumer.dequeue().map(|msg| msg.value), Some(0));
    }
}

//! Recording output pin and delay.
//!
//! A [`PulseTrace`] hands out a pin and a delay that share one timeline, so a
//! [`Transmitter`](crate::transmitter::Transmitter) driving them leaves the
//! pulse train it would have put on the air.

use std::{cell::RefCell, convert::Infallible, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{ErrorType, OutputPin},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Line driven to a level
    Level(bool),
    /// Microseconds passed
    Wait(u32),
}

#[derive(Debug, Clone, Default)]
pub struct PulseTrace {
    steps: Rc<RefCell<Vec<Step>>>,
}

impl PulseTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(&self) -> TracePin {
        TracePin {
            steps: Rc::clone(&self.steps),
        }
    }

    pub fn delay(&self) -> TraceDelay {
        TraceDelay {
            steps: Rc::clone(&self.steps),
        }
    }

    pub fn steps(&self) -> Vec<Step> {
        self.steps.borrow().clone()
    }

    pub fn clear(&self) {
        self.steps.borrow_mut().clear();
    }

    /// `(level, microseconds)` of every wait, with the level the line was
    /// driven to last. The line starts low.
    pub fn pulses(&self) -> Vec<(bool, u32)> {
        let mut level = false;
        let steps = self.steps.borrow();

        steps
            .iter()
            .filter_map(|step| match *step {
                Step::Level(l) => {
                    level = l;
                    None
                }
                Step::Wait(us) => Some((level, us)),
            })
            .collect()
    }

    /// `(timestamp, level)` of every level change, timestamps in
    /// microseconds from the start of the trace. The line starts low.
    pub fn edges(&self) -> Vec<(u64, bool)> {
        let mut now = 0u64;
        let mut level = false;
        let mut edges = Vec::new();

        for step in self.steps.borrow().iter() {
            match *step {
                Step::Level(l) if l != level => {
                    level = l;
                    edges.push((now, level));
                }
                Step::Level(_) => {}
                Step::Wait(us) => now += u64::from(us),
            }
        }

        edges
    }

    /// Total length of the trace in microseconds.
    pub fn duration(&self) -> u64 {
        self.steps
            .borrow()
            .iter()
            .map(|step| match *step {
                Step::Wait(us) => u64::from(us),
                Step::Level(_) => 0,
            })
            .sum()
    }
}

pub struct TracePin {
    steps: Rc<RefCell<Vec<Step>>>,
}

impl ErrorType for TracePin {
    type Error = Infallible;
}

impl OutputPin for TracePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.steps.borrow_mut().push(Step::Level(false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.steps.borrow_mut().push(Step::Level(true));
        Ok(())
    }
}

pub struct TraceDelay {
    steps: Rc<RefCell<Vec<Step>>>,
}

impl DelayNs for TraceDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.steps.borrow_mut().push(Step::Wait(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.steps.borrow_mut().push(Step::Wait(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.steps
            .borrow_mut()
            .push(Step::Wait(ms.saturating_mul(1_000)));
    }
}

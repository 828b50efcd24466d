//! Single-slot pending-event mailbox.
//!
//! The only state shared between the transfer-complete ISR (producer) and
//! the main loop (consumer). Holds at most one outstanding half-ready event.
//!
//! # Safety Contract
//!
//! - Only the ISR calls [`post()`](EventSlot::post).
//! - Only main-loop code calls [`take()`](EventSlot::take) and
//!   [`clear()`](EventSlot::clear).
//!
//! Every operation is a single atomic access, so the ISR may preempt the
//! consumer at any instruction boundary.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::buffer::Half;
use crate::config::OverrunPolicy;

const NONE: u8 = 0;
const HALF_A: u8 = 1;
const HALF_B: u8 = 2;

/// Snapshot of the mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PendingEvent {
    None,
    HalfAReady,
    HalfBReady,
}

impl PendingEvent {
    /// Buffer half this event makes readable.
    pub const fn half(self) -> Option<Half> {
        match self {
            PendingEvent::None => None,
            PendingEvent::HalfAReady => Some(Half::A),
            PendingEvent::HalfBReady => Some(Half::B),
        }
    }
}

impl From<Half> for PendingEvent {
    fn from(half: Half) -> Self {
        match half {
            Half::A => PendingEvent::HalfAReady,
            Half::B => PendingEvent::HalfBReady,
        }
    }
}

/// Result of posting an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PostOutcome {
    /// The slot was empty.
    Posted,
    /// An unconsumed event for the given half was overwritten.
    Replaced(Half),
    /// The slot was occupied and the new event was dropped.
    Dropped,
}

/// Lock-free single-slot mailbox for half-ready events.
pub struct EventSlot {
    slot: AtomicU8,
    /// Events lost to overrun, whichever policy applied.
    overruns: AtomicU32,
}

impl EventSlot {
    pub const fn new() -> Self {
        EventSlot {
            slot: AtomicU8::new(NONE),
            overruns: AtomicU32::new(0),
        }
    }

    /// Post a ready event for `half` (producer side).
    pub fn post(&self, half: Half, policy: OverrunPolicy) -> PostOutcome {
        let code = encode(half);
        match policy {
            OverrunPolicy::Overwrite => match decode(self.slot.swap(code, Ordering::AcqRel)) {
                None => PostOutcome::Posted,
                Some(prev) => {
                    self.overruns.fetch_add(1, Ordering::Relaxed);
                    PostOutcome::Replaced(prev)
                }
            },
            OverrunPolicy::KeepOldest => {
                match self
                    .slot
                    .compare_exchange(NONE, code, Ordering::AcqRel, Ordering::Acquire)
                {
                    Ok(_) => PostOutcome::Posted,
                    Err(_) => {
                        self.overruns.fetch_add(1, Ordering::Relaxed);
                        PostOutcome::Dropped
                    }
                }
            }
        }
    }

    /// Take the pending event, leaving the slot empty (consumer side).
    pub fn take(&self) -> Option<Half> {
        decode(self.slot.swap(NONE, Ordering::AcqRel))
    }

    /// Discard any pending event.
    pub fn clear(&self) {
        self.slot.store(NONE, Ordering::Release);
    }

    /// Current content without consuming it.
    pub fn peek(&self) -> PendingEvent {
        match decode(self.slot.load(Ordering::Acquire)) {
            None => PendingEvent::None,
            Some(half) => half.into(),
        }
    }

    /// Total number of events lost to overrun.
    pub fn overruns(&self) -> u32 {
        self.overruns.load(Ordering::Relaxed)
    }
}

impl Default for EventSlot {
    fn default() -> Self {
        Self::new()
    }
}

const fn encode(half: Half) -> u8 {
    match half {
        Half::A => HALF_A,
        Half::B => HALF_B,
    }
}

const fn decode(code: u8) -> Option<Half> {
    match code {
        HALF_A => Some(Half::A),
        HALF_B => Some(Half::B),
        _ => None,
    }
}

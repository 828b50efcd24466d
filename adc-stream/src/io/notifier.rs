//! Transfer-complete interrupt handler.
//!
//! [`TransferNotifier`] is the producer side of the pipeline. It runs in
//! interrupt context twice per buffer cycle, acknowledges the completion
//! flag that fired and marks the matching half as ready. It does nothing
//! else: no sample is read and nothing is sent from the ISR.
//!
//! ## Usage with RTIC
//!
//! ```ignore
//! #[task(binds = DMA1_CH1, local = [notifier], priority = 2)]
//! fn dma_isr(cx: dma_isr::Context) {
//!     cx.local.notifier.on_interrupt();
//! }
//! ```

use crate::buffer::Half;
use crate::config::OverrunPolicy;
use crate::hal::{Completion, CompletionSignals};

use super::mailbox::EventSlot;

/// Interrupt-context producer of half-ready events.
pub struct TransferNotifier<'a, C> {
    signals: C,
    events: &'a EventSlot,
    policy: OverrunPolicy,
}

impl<'a, C: CompletionSignals> TransferNotifier<'a, C> {
    pub fn new(signals: C, events: &'a EventSlot, policy: OverrunPolicy) -> Self {
        TransferNotifier {
            signals,
            events,
            policy,
        }
    }

    /// Handle a transfer-engine interrupt.
    ///
    /// Half-transfer is handled before full-transfer, so when both are
    /// pending (a late interrupt) the Half B event is posted last.
    ///
    /// # Returns
    ///
    /// The last half reported ready, or `None` for a spurious interrupt.
    pub fn on_interrupt(&mut self) -> Option<Half> {
        let mut ready = None;
        for (completion, half) in [
            (Completion::HalfTransfer, Half::A),
            (Completion::FullTransfer, Half::B),
        ] {
            if self.signals.is_pending(completion) {
                self.signals.acknowledge(completion);
                self.events.post(half, self.policy);
                ready = Some(half);
            }
        }
        ready
    }

    pub fn policy(&self) -> OverrunPolicy {
        self.policy
    }

    /// Release the completion-flag handle.
    pub fn release(self) -> C {
        self.signals
    }
}

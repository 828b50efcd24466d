//! Main-loop consumer of half-ready events.
//!
//! [`BlockProcessor`] takes the pending event from the mailbox and streams
//! the matching buffer half to a [`StreamSink`], in index order. A block may
//! span several main-loop iterations when `samples_per_poll` is smaller
//! than a half; the control state machine can abandon it in between.
//!
//! The half being streamed must be fully sent before the write cursor wraps
//! back into it. With `N` samples at `fs` Hz the consumer has `N / (2 · fs)`
//! seconds per block.

use crate::buffer::{CircularSampleBuffer, Half, Sample};

use super::mailbox::EventSlot;
use super::sink::StreamSink;

/// What one call to [`BlockProcessor::poll()`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Progress {
    /// No event pending and no block in progress.
    Idle,
    /// Part of a block was sent; `sent` samples of it are out so far.
    Streaming { half: Half, sent: usize },
    /// The last sample of the block was sent.
    Completed(Half),
}

#[derive(Debug, Clone, Copy)]
struct ActiveBlock {
    half: Half,
    /// Offset of the next sample within the half.
    next: usize,
}

/// Streams ready buffer halves to the sink.
pub struct BlockProcessor {
    active: Option<ActiveBlock>,
    samples_per_poll: usize,
    blocks_streamed: u32,
    blocks_abandoned: u32,
    bytes_sent: u32,
    /// Mailbox overrun count last reported.
    seen_overruns: u32,
}

impl BlockProcessor {
    /// Create a processor sending at most `samples_per_poll` samples per
    /// [`poll()`](Self::poll). `usize::MAX` sends whole halves.
    pub const fn new(samples_per_poll: usize) -> Self {
        BlockProcessor {
            active: None,
            samples_per_poll: if samples_per_poll == 0 { 1 } else { samples_per_poll },
            blocks_streamed: 0,
            blocks_abandoned: 0,
            bytes_sent: 0,
            seen_overruns: 0,
        }
    }

    /// Run one main-loop step.
    ///
    /// Takes the pending event if no block is in progress, then sends up to
    /// `samples_per_poll` samples of the current block, one blocking
    /// exchange per byte.
    ///
    /// A sink error abandons the block; no retry is attempted.
    pub fn poll<S, K, const N: usize>(
        &mut self,
        events: &EventSlot,
        buffer: &CircularSampleBuffer<S, N>,
        sink: &mut K,
    ) -> Result<Progress, K::Error>
    where
        S: Sample,
        K: StreamSink + ?Sized,
    {
        let mut block = match self.active.take() {
            Some(block) => block,
            None => match events.take() {
                Some(half) => {
                    self.report_overruns(events);
                    trace!("streaming half {}", half);
                    ActiveBlock { half, next: 0 }
                }
                None => return Ok(Progress::Idle),
            },
        };

        let half_len = buffer.half_len();
        let end = block.next.saturating_add(self.samples_per_poll).min(half_len);

        for sample in buffer.half_from(block.half, block.next).take(end - block.next) {
            if let Err(e) = sink.send_all(sample.to_wire().as_ref()) {
                self.blocks_abandoned = self.blocks_abandoned.wrapping_add(1);
                warn!("sink error, half {} abandoned at {}", block.half, block.next);
                return Err(e);
            }
            self.bytes_sent = self.bytes_sent.wrapping_add(S::WIDTH.bytes() as u32);
            block.next += 1;
        }

        if block.next >= half_len {
            self.blocks_streamed = self.blocks_streamed.wrapping_add(1);
            Ok(Progress::Completed(block.half))
        } else {
            self.active = Some(block);
            Ok(Progress::Streaming {
                half: block.half,
                sent: block.next,
            })
        }
    }

    /// Drop the block in progress, if any. Returns its half.
    pub fn abandon(&mut self) -> Option<Half> {
        let block = self.active.take()?;
        self.blocks_abandoned = self.blocks_abandoned.wrapping_add(1);
        debug!("half {} abandoned after {} samples", block.half, block.next);
        Some(block.half)
    }

    /// Whether a block is partially sent.
    pub fn is_streaming(&self) -> bool {
        self.active.is_some()
    }

    pub fn blocks_streamed(&self) -> u32 {
        self.blocks_streamed
    }

    pub fn blocks_abandoned(&self) -> u32 {
        self.blocks_abandoned
    }

    pub fn bytes_sent(&self) -> u32 {
        self.bytes_sent
    }

    fn report_overruns(&mut self, events: &EventSlot) {
        let total = events.overruns();
        let lost = total.wrapping_sub(self.seen_overruns);
        if lost != 0 {
            warn!("{} ready events lost to overrun", lost);
            self.seen_overruns = total;
        }
    }
}

impl Default for BlockProcessor {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

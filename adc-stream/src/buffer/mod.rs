//! Circular sample storage shared with the transfer engine.
//!
//! The acquisition buffer is one contiguous region of `N` samples that the
//! DMA engine fills continuously in circular mode. It is split into two
//! halves so one can be streamed out while the other is being written:
//!
//! ```text
//!            write cursor ──►
//! ┌──────────────────────┬──────────────────────┐
//! │        Half A        │        Half B        │
//! │   indices 0..N/2     │   indices N/2..N     │
//! └──────────────────────┴──────────────────────┘
//!   half-transfer event ─┘  full-transfer event ─┘ (cursor wraps to 0)
//! ```

mod circular;
mod sample;

pub use circular::{CircularSampleBuffer, Half, HalfIter};
pub use sample::{Sample, SampleWidth};

//! Event hand-off and streaming between interrupt and main loop.
//!
//! ## Components
//!
//! | Part | Context | Description |
//! |------|---------|-------------|
//! | [`TransferNotifier`] | ISR | Acknowledges half/full flags, posts ready events |
//! | [`EventSlot`] | shared | Lock-free single-slot mailbox |
//! | [`BlockProcessor`] | main loop | Streams the ready half to the sink |
//! | [`StreamSink`] | main loop | Blocking byte-wise output (SPI by default) |
//!
//! ## Buffer halves
//!
//! The transfer engine raises a half-transfer flag when the write cursor
//! crosses `N/2` and a full-transfer flag when it wraps to 0. Each flag
//! makes the half just written readable while the engine fills the other:
//!
//! ```text
//! half-transfer  → Half A (0..N/2) ready, DMA writing Half B
//! full-transfer  → Half B (N/2..N) ready, DMA writing Half A
//! ```

pub mod mailbox;
pub mod notifier;
pub mod processor;
pub mod sink;

pub use mailbox::{EventSlot, PendingEvent, PostOutcome};
pub use notifier::TransferNotifier;
pub use processor::{BlockProcessor, Progress};
pub use sink::StreamSink;
#[cfg(feature = "spi")]
pub use sink::SpiStreamSink;

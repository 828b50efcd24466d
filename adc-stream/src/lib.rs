//! # adc-stream
//!
//! A `no_std`, zero-allocation pipeline that samples an ADC continuously into
//! a circular DMA buffer and streams each completed half out over SPI, one
//! byte at a time. A digital input starts and stops acquisition at runtime
//! without losing or duplicating data.
//!
//! The register-level drivers (ADC, DMA channel, SPI, GPIO) stay outside the
//! crate and are reached through narrow traits in [`hal`] and through
//! `embedded-hal` 1.0.
//!
//! ## Architecture
//!
//! | Layer | Module | Purpose |
//! |-------|--------|---------|
//! | Memory | [`buffer`] | Circular sample buffer written by DMA |
//! | Hardware | [`hal`] | ADC / transfer-engine / completion-flag traits |
//! | Acquisition | [`acquisition`] | Prescaler selection, start/stop of conversions |
//! | I/O | [`io`] | ISR notifier, event mailbox, block processor, SPI sink |
//! | Control | [`control`] | Start/stop state machine on a digital input |
//! | Context | [`pipeline`] | Owns the main-loop side and runs it |
//!
//! ## Quick start
//!
//! ```ignore
//! use adc_stream::prelude::*;
//!
//! static BUFFER: CircularSampleBuffer<u8, 1024> = CircularSampleBuffer::new();
//! static EVENTS: EventSlot = EventSlot::new();
//! const CONFIG: PipelineConfig = PipelineConfig::new();
//!
//! // Main: configure once, then loop forever
//! let engine = AcquisitionEngine::configure(adc, dma_ch1, &BUFFER, &CONFIG)?;
//! let mut pipeline = Pipeline::new(engine, SpiStreamSink::new(spi1), button, &EVENTS, &CONFIG);
//! pipeline.run()?;
//!
//! // DMA1 channel 1 interrupt
//! notifier.on_interrupt();
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Enables |
//! |---------|---------|---------|
//! | `spi` | yes | [`io::SpiStreamSink`] over `embedded_hal::spi::SpiBus` |
//! | `defmt` | no | Logging through `defmt`, `defmt::Format` on public types |
//!
//! ## Acquisition parameters
//!
//! - **Buffer:** 1024 samples ([`constants::DEFAULT_BUFFER_LEN`])
//! - **Sample rate:** 50 kHz requested ([`constants::DEFAULT_SAMPLE_RATE_HZ`])
//! - **Sample format:** `u8` (8-bit) or `u16` (up to 12-bit, sent MSB first)
//! - **Block:** one buffer half, `N / 2` samples

#![no_std]

#[macro_use]
mod fmt;

pub mod constants;
pub mod config;
pub mod error;
pub mod buffer;
pub mod hal;
pub mod acquisition;
pub mod io;
pub mod control;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod sim;

/// Everything needed to wire up a pipeline.
pub mod prelude {
    pub use crate::acquisition::AcquisitionEngine;
    pub use crate::buffer::{CircularSampleBuffer, Half, Sample};
    pub use crate::config::{ActiveLevel, OverrunPolicy, PipelineConfig, Resolution, SampleTime};
    pub use crate::control::{AcquisitionState, Transition};
    pub use crate::error::{ConfigError, PipelineError};
    pub use crate::hal::{AdcPeripheral, CompletionSignals, TransferEngine};
    pub use crate::io::{EventSlot, StreamSink, TransferNotifier};
    #[cfg(feature = "spi")]
    pub use crate::io::SpiStreamSink;
    pub use crate::pipeline::Pipeline;
}

//! Acquisition engine: continuous ADC conversions into the circular buffer.
//!
//! The ADC runs in continuous mode and raises a DMA request per conversion;
//! the transfer engine moves each result into the [`CircularSampleBuffer`]
//! and wraps back to index 0 on its own. Software only configures, starts
//! and stops the pair.
//!
//! [`CircularSampleBuffer`]: crate::buffer::CircularSampleBuffer

mod engine;
pub mod timing;

pub use engine::AcquisitionEngine;
pub use timing::AdcTiming;

//! Narrow hardware interfaces the pipeline drives.
//!
//! Register-level configuration (clock trees, pin muxing, bus timing) stays
//! behind these traits. Board support code implements them on top of its
//! PAC or HAL; the crate's tests implement them on a simulated ADC + DMA.
//!
//! Register accesses are assumed infallible. Hardware conditions the
//! pipeline waits on are polled, never timed out.

use crate::buffer::SampleWidth;
use crate::config::{Resolution, SampleTime};

/// Sampling parameters applied to the ADC once at configuration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcSetup {
    pub resolution: Resolution,
    pub channel: u8,
    /// Kernel clock divisor.
    pub prescaler: u16,
    /// `PRESC` field encoding of `prescaler`.
    pub prescaler_code: u8,
    pub sample_time: SampleTime,
}

/// Continuous-conversion ADC with DMA requests enabled.
pub trait AdcPeripheral {
    /// Apply sampling parameters and enable DMA requests in circular mode.
    fn configure(&mut self, setup: &AdcSetup);

    /// Address of the conversion data register (transfer source).
    fn data_register_address(&self) -> usize;

    /// Begin continuous conversions.
    fn start_conversions(&mut self);

    /// Ask the ADC to stop after the conversion in progress.
    fn request_stop(&mut self);

    /// Whether conversions are still running. Turns `false` once a requested
    /// stop has been acknowledged by hardware.
    fn is_running(&mut self) -> bool;
}

/// Transfer engine channel setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferSetup {
    pub source: usize,
    pub destination: usize,
    /// Number of elements per full cycle.
    pub length: u16,
    /// Restart at the destination start after `length` elements.
    pub circular: bool,
    pub width: SampleWidth,
}

/// Peripheral-to-memory DMA channel.
pub trait TransferEngine {
    /// Program addresses, length, width and mode. The channel is disabled.
    fn configure(&mut self, setup: &TransferSetup);

    /// Reload the transfer counter, moving the write cursor back to the
    /// destination start. Only valid while the channel is disabled.
    fn set_length(&mut self, length: u16);

    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    /// Clear every half/full completion flag of the channel.
    fn clear_completion_flags(&mut self);
}

/// Completion condition raised by the transfer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Completion {
    /// Write cursor crossed the buffer midpoint.
    HalfTransfer,
    /// Write cursor wrapped back to the start.
    FullTransfer,
}

/// Interrupt-side view of the transfer engine's completion flags.
pub trait CompletionSignals {
    fn is_pending(&self, completion: Completion) -> bool;

    /// Clear the flag. Must happen before the ISR returns or it re-fires.
    fn acknowledge(&mut self, completion: Completion);
}

impl<T: AdcPeripheral + ?Sized> AdcPeripheral for &mut T {
    fn configure(&mut self, setup: &AdcSetup) {
        T::configure(self, setup)
    }

    fn data_register_address(&self) -> usize {
        T::data_register_address(self)
    }

    fn start_conversions(&mut self) {
        T::start_conversions(self)
    }

    fn request_stop(&mut self) {
        T::request_stop(self)
    }

    fn is_running(&mut self) -> bool {
        T::is_running(self)
    }
}

impl<T: TransferEngine + ?Sized> TransferEngine for &mut T {
    fn configure(&mut self, setup: &TransferSetup) {
        T::configure(self, setup)
    }

    fn set_length(&mut self, length: u16) {
        T::set_length(self, length)
    }

    fn enable(&mut self) {
        T::enable(self)
    }

    fn disable(&mut self) {
        T::disable(self)
    }

    fn is_enabled(&self) -> bool {
        T::is_enabled(self)
    }

    fn clear_completion_flags(&mut self) {
        T::clear_completion_flags(self)
    }
}

impl<T: CompletionSignals + ?Sized> CompletionSignals for &mut T {
    fn is_pending(&self, completion: Completion) -> bool {
        T::is_pending(self, completion)
    }

    fn acknowledge(&mut self, completion: Completion) {
        T::acknowledge(self, completion)
    }
}

use crate::buffer::{CircularSampleBuffer, Sample};
use crate::config::PipelineConfig;
use crate::constants::MAX_CHANNEL;
use crate::error::ConfigError;
use crate::hal::{AdcPeripheral, AdcSetup, TransferEngine, TransferSetup};

use super::timing::{self, AdcTiming};

/// Drives the ADC and its transfer channel.
///
/// An engine only exists once configured: [`configure()`](Self::configure)
/// consumes the raw peripherals, so the one-time setup cannot be repeated
/// or skipped.
///
/// # Example
///
/// ```ignore
/// static BUFFER: CircularSampleBuffer<u8, 1024> = CircularSampleBuffer::new();
///
/// let mut engine = AcquisitionEngine::configure(adc, dma_ch1, &BUFFER, &CONFIG)
///     .unwrap_or_else(|_| halt());
/// engine.start();
/// ```
pub struct AcquisitionEngine<'a, A, T, S: Sample, const N: usize> {
    adc: A,
    transfer: T,
    buffer: &'a CircularSampleBuffer<S, N>,
    timing: AdcTiming,
}

impl<'a, A, T, S, const N: usize> AcquisitionEngine<'a, A, T, S, N>
where
    A: AdcPeripheral,
    T: TransferEngine,
    S: Sample,
{
    /// One-time setup of sampling parameters and the transfer target.
    ///
    /// Programs the ADC (resolution, channel, prescaler, sample time) and a
    /// circular transfer of `N` elements from the ADC data register into
    /// `buffer`. The transfer channel is left disabled and the ADC idle.
    ///
    /// # Errors
    ///
    /// Fails without touching hardware if the sample rate cannot be reached
    /// within tolerance, or the resolution does not fit the sample type.
    pub fn configure(
        mut adc: A,
        mut transfer: T,
        buffer: &'a CircularSampleBuffer<S, N>,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        if config.channel > MAX_CHANNEL {
            return Err(ConfigError::InvalidChannel(config.channel));
        }
        if config.resolution.bits() > S::WIDTH.bits() {
            return Err(ConfigError::ResolutionExceedsSampleWidth {
                resolution_bits: config.resolution.bits(),
                sample_bits: S::WIDTH.bits(),
            });
        }
        let timing = timing::solve(
            config.kernel_clock_hz,
            config.sample_rate_hz,
            config.resolution,
            config.sample_time,
            config.rate_tolerance_permille,
        )?;

        transfer.disable();
        adc.configure(&AdcSetup {
            resolution: config.resolution,
            channel: config.channel,
            prescaler: timing.prescaler,
            prescaler_code: timing.prescaler_code,
            sample_time: config.sample_time,
        });
        transfer.configure(&TransferSetup {
            source: adc.data_register_address(),
            destination: buffer.address(),
            length: N as u16,
            circular: true,
            width: S::WIDTH,
        });

        info!(
            "acquisition configured: {} Hz (prescaler /{}), {} samples",
            timing.achieved_rate_hz,
            timing.prescaler,
            N
        );

        Ok(AcquisitionEngine {
            adc,
            transfer,
            buffer,
            timing,
        })
    }

    /// Begin continuous acquisition. No-op while already running.
    ///
    /// If the transfer channel has not been armed yet, its counter is reset
    /// to `N` and it is enabled before conversions start.
    pub fn start(&mut self) {
        if self.adc.is_running() {
            return;
        }
        if !self.transfer.is_enabled() {
            self.transfer.set_length(N as u16);
            self.transfer.enable();
        }
        self.adc.start_conversions();
    }

    /// Stop acquisition and wait until the ADC acknowledges. No-op while
    /// stopped.
    ///
    /// Must be called before [`disable_transfer()`](Self::disable_transfer)
    /// so no conversion is left in flight.
    pub fn stop(&mut self) {
        if !self.adc.is_running() {
            return;
        }
        self.adc.request_stop();
        while self.adc.is_running() {
            core::hint::spin_loop();
        }
    }

    /// Move the write cursor back to index 0.
    ///
    /// Only valid while the transfer channel is disabled.
    pub fn reset_cursor(&mut self) {
        debug_assert!(
            !self.transfer.is_enabled(),
            "write cursor reset while the transfer channel is enabled"
        );
        self.transfer.set_length(N as u16);
    }

    pub fn enable_transfer(&mut self) {
        self.transfer.enable();
    }

    pub fn disable_transfer(&mut self) {
        self.transfer.disable();
    }

    pub fn clear_completion_flags(&mut self) {
        self.transfer.clear_completion_flags();
    }

    pub fn is_running(&mut self) -> bool {
        self.adc.is_running()
    }

    /// Clocking chosen at configuration time.
    pub fn timing(&self) -> AdcTiming {
        self.timing
    }

    /// The buffer the transfer channel writes into.
    pub fn buffer(&self) -> &'a CircularSampleBuffer<S, N> {
        self.buffer
    }

    /// Release the peripherals.
    pub fn release(self) -> (A, T) {
        (self.adc, self.transfer)
    }
}

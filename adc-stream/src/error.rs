//! Error types.
//!
//! Configuration errors are detected once, at setup. Runtime errors only
//! come from the external collaborators (stream sink, control input) and
//! carry their own error types.

use core::fmt;

/// Rejected acquisition configuration.
///
/// Configuration errors are fatal: firmware is expected to halt rather than
/// run with a sample rate it did not ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No prescaler brings the kernel clock within tolerance of the
    /// requested rate.
    UnreachableSampleRate { requested_hz: u32, closest_hz: u32 },
    /// The resolution needs more bits than one buffer sample holds.
    ResolutionExceedsSampleWidth { resolution_bits: u8, sample_bits: u8 },
    ZeroSampleRate,
    InvalidChannel(u8),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnreachableSampleRate {
                requested_hz,
                closest_hz,
            } => write!(
                f,
                "sample rate {requested_hz} Hz unreachable (closest {closest_hz} Hz)"
            ),
            ConfigError::ResolutionExceedsSampleWidth {
                resolution_bits,
                sample_bits,
            } => write!(
                f,
                "{resolution_bits}-bit resolution does not fit {sample_bits}-bit samples"
            ),
            ConfigError::ZeroSampleRate => f.write_str("sample rate must be non-zero"),
            ConfigError::InvalidChannel(ch) => write!(f, "invalid ADC channel {ch}"),
        }
    }
}

impl core::error::Error for ConfigError {}

/// Runtime failure of one of the pipeline's collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PipelineError<SinkE, PinE> {
    /// The stream sink failed; the block in progress is abandoned.
    Sink(SinkE),
    /// The control input could not be read.
    Input(PinE),
}

impl<SinkE: fmt::Debug, PinE: fmt::Debug> fmt::Display for PipelineError<SinkE, PinE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Sink(e) => write!(f, "stream sink error: {e:?}"),
            PipelineError::Input(e) => write!(f, "control input error: {e:?}"),
        }
    }
}

impl<SinkE: fmt::Debug, PinE: fmt::Debug> core::error::Error for PipelineError<SinkE, PinE> {}

//! ADC clock prescaler selection.
//!
//! One conversion takes `sample_time + conversion_time` ADC clock cycles, so
//! the achieved rate is
//!
//! ```text
//! fs = f_kernel / (prescaler · (t_sample + t_conv))
//! ```
//!
//! The prescaler is picked from the hardware table to bring `fs` closest to
//! the requested rate. If even the best divisor misses by more than the
//! configured tolerance the configuration is rejected.

use crate::config::{Resolution, SampleTime};
use crate::constants::ADC_PRESCALERS;
use crate::error::ConfigError;

/// Chosen ADC clocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcTiming {
    /// Kernel clock divisor.
    pub prescaler: u16,
    /// Index of `prescaler` in the `PRESC` table.
    pub prescaler_code: u8,
    /// Conversion rate actually achieved, in Hz (rounded down).
    pub achieved_rate_hz: u32,
}

/// Pick the prescaler that best approximates `sample_rate_hz`.
pub fn solve(
    kernel_clock_hz: u32,
    sample_rate_hz: u32,
    resolution: Resolution,
    sample_time: SampleTime,
    tolerance_permille: u16,
) -> Result<AdcTiming, ConfigError> {
    if sample_rate_hz == 0 {
        return Err(ConfigError::ZeroSampleRate);
    }

    let half_cycles = sample_time.half_cycles() + resolution.conversion_half_cycles();
    let requested = sample_rate_hz as f32;

    let mut best: Option<(AdcTiming, f32)> = None;
    for (code, &prescaler) in ADC_PRESCALERS.iter().enumerate() {
        let divisor = prescaler as u64 * half_cycles as u64;
        let achieved = (2 * kernel_clock_hz as u64 / divisor) as u32;
        let error = libm::fabsf(achieved as f32 - requested) / requested;

        if best.map_or(true, |(_, e)| error < e) {
            best = Some((
                AdcTiming {
                    prescaler,
                    prescaler_code: code as u8,
                    achieved_rate_hz: achieved,
                },
                error,
            ));
        }
    }

    let Some((timing, error)) = best else {
        return Err(ConfigError::UnreachableSampleRate {
            requested_hz: sample_rate_hz,
            closest_hz: 0,
        });
    };

    if error * 1000.0 > tolerance_permille as f32 {
        return Err(ConfigError::UnreachableSampleRate {
            requested_hz: sample_rate_hz,
            closest_hz: timing.achieved_rate_hz,
        });
    }
    Ok(timing)
}

//! Acquisition and pipeline configuration.
//!
//! [`PipelineConfig`] gathers every tunable of the pipeline in one `Copy`
//! value that can live in a `const`:
//!
//! ```ignore
//! const CONFIG: PipelineConfig = PipelineConfig::new()
//!     .with_sample_rate(50_000)
//!     .with_resolution(Resolution::Bits8)
//!     .with_overrun_policy(OverrunPolicy::Overwrite);
//! ```

use crate::constants::{
    DEFAULT_CHANNEL, DEFAULT_KERNEL_CLOCK_HZ, DEFAULT_RATE_TOLERANCE_PERMILLE,
    DEFAULT_SAMPLE_RATE_HZ,
};

/// ADC conversion resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    Bits12,
    Bits10,
    Bits8,
    Bits6,
}

impl Resolution {
    /// Number of significant bits per conversion.
    pub const fn bits(self) -> u8 {
        match self {
            Resolution::Bits12 => 12,
            Resolution::Bits10 => 10,
            Resolution::Bits8 => 8,
            Resolution::Bits6 => 6,
        }
    }

    /// Largest raw code the ADC produces at this resolution.
    pub const fn max_code(self) -> u16 {
        (1u16 << self.bits()) - 1
    }

    /// `RES` field encoding.
    pub const fn code(self) -> u8 {
        match self {
            Resolution::Bits12 => 0,
            Resolution::Bits10 => 1,
            Resolution::Bits8 => 2,
            Resolution::Bits6 => 3,
        }
    }

    /// Successive-approximation time, in half ADC clock cycles.
    pub(crate) const fn conversion_half_cycles(self) -> u32 {
        // 12.5, 10.5, 8.5, 6.5 cycles
        match self {
            Resolution::Bits12 => 25,
            Resolution::Bits10 => 21,
            Resolution::Bits8 => 17,
            Resolution::Bits6 => 13,
        }
    }

    /// Convert a raw code to volts against reference `vref`.
    ///
    /// Codes above [`max_code()`](Self::max_code) are clamped.
    pub fn to_volts(self, raw: u16, vref: f32) -> f32 {
        let max = self.max_code();
        vref * raw.min(max) as f32 / max as f32
    }
}

/// Channel sampling time, in ADC clock cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleTime {
    Cycles2_5,
    Cycles6_5,
    Cycles12_5,
    Cycles24_5,
    Cycles47_5,
    Cycles92_5,
    Cycles247_5,
    Cycles640_5,
}

impl SampleTime {
    /// `SMPx` field encoding.
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub(crate) const fn half_cycles(self) -> u32 {
        match self {
            SampleTime::Cycles2_5 => 5,
            SampleTime::Cycles6_5 => 13,
            SampleTime::Cycles12_5 => 25,
            SampleTime::Cycles24_5 => 49,
            SampleTime::Cycles47_5 => 95,
            SampleTime::Cycles92_5 => 185,
            SampleTime::Cycles247_5 => 495,
            SampleTime::Cycles640_5 => 1281,
        }
    }
}

/// What happens when a half-ready event arrives before the previous one
/// has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverrunPolicy {
    /// The newer event replaces the pending one.
    #[default]
    Overwrite,
    /// The pending event is kept and the newer one is dropped.
    KeepOldest,
}

/// Input level that counts as "asserted" (stop requested).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveLevel {
    /// Pressed pulls the pin low (button to ground, pull-up enabled).
    #[default]
    Low,
    High,
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PipelineConfig {
    /// Clock feeding the ADC prescaler, in Hz.
    pub kernel_clock_hz: u32,
    /// Requested conversion rate, in Hz.
    pub sample_rate_hz: u32,
    pub resolution: Resolution,
    pub sample_time: SampleTime,
    /// Regular channel to convert.
    pub channel: u8,
    /// Accepted relative error on the achieved sample rate, in ‰.
    pub rate_tolerance_permille: u16,
    pub overrun_policy: OverrunPolicy,
    pub active_level: ActiveLevel,
    /// Samples streamed per main-loop iteration; `usize::MAX` streams a
    /// whole half at once.
    pub samples_per_poll: usize,
}

impl PipelineConfig {
    /// 8-bit samples at ~50 kHz from an 80 MHz kernel clock.
    pub const fn new() -> Self {
        PipelineConfig {
            kernel_clock_hz: DEFAULT_KERNEL_CLOCK_HZ,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            resolution: Resolution::Bits8,
            sample_time: SampleTime::Cycles92_5,
            channel: DEFAULT_CHANNEL,
            rate_tolerance_permille: DEFAULT_RATE_TOLERANCE_PERMILLE,
            overrun_policy: OverrunPolicy::Overwrite,
            active_level: ActiveLevel::Low,
            samples_per_poll: usize::MAX,
        }
    }

    pub const fn with_kernel_clock(mut self, hz: u32) -> Self {
        self.kernel_clock_hz = hz;
        self
    }

    pub const fn with_sample_rate(mut self, hz: u32) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    pub const fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub const fn with_sample_time(mut self, sample_time: SampleTime) -> Self {
        self.sample_time = sample_time;
        self
    }

    pub const fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub const fn with_rate_tolerance(mut self, permille: u16) -> Self {
        self.rate_tolerance_permille = permille;
        self
    }

    pub const fn with_overrun_policy(mut self, policy: OverrunPolicy) -> Self {
        self.overrun_policy = policy;
        self
    }

    pub const fn with_active_level(mut self, level: ActiveLevel) -> Self {
        self.active_level = level;
        self
    }

    pub const fn with_samples_per_poll(mut self, samples: usize) -> Self {
        self.samples_per_poll = samples;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new()
    }
}

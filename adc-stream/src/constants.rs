/// Number of samples in the default circular acquisition buffer.
pub const DEFAULT_BUFFER_LEN: usize = 1024;

/// ADC kernel clock in Hz (SYSCLK routed to the ADC, 80 MHz PLL).
pub const DEFAULT_KERNEL_CLOCK_HZ: u32 = 80_000_000;

/// Requested sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 50_000;

/// Largest relative error between requested and achieved sample rate, in ‰.
pub const DEFAULT_RATE_TOLERANCE_PERMILLE: u16 = 50;

/// Default regular channel (ADC1_IN5).
pub const DEFAULT_CHANNEL: u8 = 5;

/// Highest regular channel number the ADC accepts.
pub const MAX_CHANNEL: u8 = 18;

/// ADC common clock prescaler divisors, indexed by their `PRESC` field code.
pub const ADC_PRESCALERS: [u16; 12] = [1, 2, 4, 6, 8, 10, 12, 16, 32, 64, 128, 256];

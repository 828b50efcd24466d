/// Width of one element moved by the transfer engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SampleWidth {
    /// 8-bit transfers.
    Byte,
    /// 16-bit transfers.
    HalfWord,
}

impl SampleWidth {
    pub const fn bits(self) -> u8 {
        match self {
            SampleWidth::Byte => 8,
            SampleWidth::HalfWord => 16,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }
}

/// A sample type the acquisition buffer can hold.
///
/// Implemented for `u8` (one byte on the wire) and `u16` (two bytes, most
/// significant first).
///
/// # Safety
///
/// The all-zero bit pattern must be a valid value of the type: buffers are
/// zero-initialized in a `const` context.
pub unsafe trait Sample: Copy + Send + 'static {
    /// Transfer width matching `size_of::<Self>()`.
    const WIDTH: SampleWidth;

    /// Wire encoding of one sample.
    type Bytes: AsRef<[u8]>;

    /// Encode the sample in the order it is sent to the stream sink.
    fn to_wire(self) -> Self::Bytes;
}

// SAFETY: zero is a valid u8.
unsafe impl Sample for u8 {
    const WIDTH: SampleWidth = SampleWidth::Byte;
    type Bytes = [u8; 1];

    fn to_wire(self) -> [u8; 1] {
        [self]
    }
}

// SAFETY: zero is a valid u16.
unsafe impl Sample for u16 {
    const WIDTH: SampleWidth = SampleWidth::HalfWord;
    type Bytes = [u8; 2];

    fn to_wire(self) -> [u8; 2] {
        self.to_be_bytes()
    }
}

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::ops::Range;
use core::ptr;
use core::sync::atomic::{compiler_fence, Ordering};

use super::sample::Sample;

/// One half of the circular buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Half {
    /// Indices `0..N/2`, complete at the half-transfer event.
    A,
    /// Indices `N/2..N`, complete at the full-transfer event.
    B,
}

impl Half {
    /// Index range of this half in a buffer of `len` samples.
    pub const fn range(self, len: usize) -> Range<usize> {
        let mid = len / 2;
        match self {
            Half::A => 0..mid,
            Half::B => mid..len,
        }
    }

    /// The half the transfer engine writes while this one is read.
    pub const fn other(self) -> Half {
        match self {
            Half::A => Half::B,
            Half::B => Half::A,
        }
    }
}

/// Fixed-capacity sample region written by the transfer engine.
///
/// The buffer is normally placed in a `static` and handed to the DMA engine
/// by address. Software never takes a reference into the sample storage;
/// every access is a volatile read or write, since hardware mutates the
/// memory outside the compiler's view.
///
/// Reading a half is only meaningful once its ready event has been observed
/// and until the write cursor wraps back into it. That timing is a property
/// of the event protocol, not something this type enforces.
///
/// # Type Parameters
///
/// - `S`: Sample type (`u8` or `u16`), fixes the transfer width.
/// - `N`: Capacity in samples. Must be even, at least 2 and fit the 16-bit
///   transfer counter.
#[repr(C, align(4))]
pub struct CircularSampleBuffer<S: Sample, const N: usize> {
    data: UnsafeCell<[S; N]>,
}

// SAFETY: All access to `data` goes through volatile reads/writes of whole
// `S` values; there is no reference into the storage that could alias a
// concurrent hardware or ISR write.
unsafe impl<S: Sample, const N: usize> Sync for CircularSampleBuffer<S, N> {}

impl<S: Sample, const N: usize> CircularSampleBuffer<S, N> {
    const VALID_CAPACITY: () = assert!(
        N >= 2 && N % 2 == 0 && N <= u16::MAX as usize,
        "buffer capacity must be even, >= 2 and fit a 16-bit transfer count"
    );

    /// Create a zero-filled buffer.
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID_CAPACITY;
        CircularSampleBuffer {
            // SAFETY: `Sample` guarantees zero is a valid bit pattern.
            data: UnsafeCell::new(unsafe { MaybeUninit::<[S; N]>::zeroed().assume_init() }),
        }
    }

    /// Capacity in samples.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Samples per half.
    pub const fn half_len(&self) -> usize {
        N / 2
    }

    /// Start of the sample storage, for programming the transfer engine.
    pub fn as_mut_ptr(&self) -> *mut S {
        self.data.get() as *mut S
    }

    /// Memory address of the first sample.
    pub fn address(&self) -> usize {
        self.as_mut_ptr() as usize
    }

    /// Volatile read of the sample at `index` (modulo `N`).
    pub fn load(&self, index: usize) -> S {
        // SAFETY: index is reduced modulo N, so the pointer stays in bounds.
        unsafe { ptr::read_volatile(self.as_mut_ptr().add(index % N)) }
    }

    /// Volatile write of the sample at `index` (modulo `N`).
    ///
    /// On hardware the DMA engine is the only writer; this is for software
    /// transfer engines and simulation.
    pub fn store(&self, index: usize, sample: S) {
        // SAFETY: index is reduced modulo N, so the pointer stays in bounds.
        unsafe { ptr::write_volatile(self.as_mut_ptr().add(index % N), sample) }
    }

    /// Iterate over one half in ascending index order.
    pub fn half(&self, half: Half) -> HalfIter<'_, S, N> {
        self.half_from(half, 0)
    }

    /// Iterate over one half starting `offset` samples into it.
    pub fn half_from(&self, half: Half, offset: usize) -> HalfIter<'_, S, N> {
        // Keep the reads after whatever load observed the ready event.
        compiler_fence(Ordering::Acquire);
        let range = half.range(N);
        HalfIter {
            buffer: self,
            next: (range.start + offset).min(range.end),
            end: range.end,
        }
    }

    /// Copy one half into `out`. Returns the number of samples copied.
    pub fn copy_half(&self, half: Half, out: &mut [S]) -> usize {
        let mut copied = 0;
        for (dst, src) in out.iter_mut().zip(self.half(half)) {
            *dst = src;
            copied += 1;
        }
        copied
    }
}

impl<S: Sample, const N: usize> Default for CircularSampleBuffer<S, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the samples of one buffer half.
pub struct HalfIter<'a, S: Sample, const N: usize> {
    buffer: &'a CircularSampleBuffer<S, N>,
    next: usize,
    end: usize,
}

impl<S: Sample, const N: usize> Iterator for HalfIter<'_, S, N> {
    type Item = S;

    fn next(&mut self) -> Option<S> {
        if self.next >= self.end {
            return None;
        }
        let sample = self.buffer.load(self.next);
        self.next += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl<S: Sample, const N: usize> ExactSizeIterator for HalfIter<'_, S, N> {}

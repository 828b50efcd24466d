//! Simulated hardware for the crate's tests.
//!
//! [`SimHardware`] stands in for an ADC feeding a circular DMA channel. Each
//! call to [`convert()`](SimHardware::convert) is one finished conversion:
//! the sample lands at the write cursor, the transfer counter counts down
//! and the half/full flags rise exactly where the real channel raises them.
//!
//! Every trait is implemented on `&SimHardware`, so the engine, the
//! notifier and the test itself can all hold a handle to the same device.

use core::cell::{Cell, Ref, RefCell};
use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};

use crate::buffer::{CircularSampleBuffer, Sample};
use crate::hal::{
    AdcPeripheral, AdcSetup, Completion, CompletionSignals, TransferEngine, TransferSetup,
};
use crate::io::sink::StreamSink;

/// Address reported for the ADC data register.
pub(crate) const ADC_DR_ADDRESS: usize = 0x5004_0040;

/// Hardware operation, in the order the simulation saw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    AdcConfigure,
    AdcStart,
    AdcStopRequest,
    TransferConfigure,
    SetLength(u16),
    TransferEnable,
    TransferDisable,
    ClearFlags,
    Acknowledge(Completion),
}

const LOG_LEN: usize = 64;

struct OpLog {
    entries: [Op; LOG_LEN],
    len: usize,
}

pub(crate) struct SimHardware<'a, S: Sample, const N: usize> {
    buffer: &'a CircularSampleBuffer<S, N>,
    adc_setup: Cell<Option<AdcSetup>>,
    transfer_setup: Cell<Option<TransferSetup>>,
    adc_running: Cell<bool>,
    stop_requested: Cell<bool>,
    /// `is_running()` polls before a requested stop is acknowledged.
    stop_latency: Cell<u32>,
    stop_countdown: Cell<u32>,
    running_polls: Cell<u32>,
    dma_enabled: Cell<bool>,
    /// Elements left before wrap (the DMA `CNDTR` register).
    remaining: Cell<u16>,
    half_flag: Cell<bool>,
    full_flag: Cell<bool>,
    log: RefCell<OpLog>,
}

impl<'a, S: Sample, const N: usize> SimHardware<'a, S, N> {
    pub(crate) fn new(buffer: &'a CircularSampleBuffer<S, N>) -> Self {
        SimHardware {
            buffer,
            adc_setup: Cell::new(None),
            transfer_setup: Cell::new(None),
            adc_running: Cell::new(false),
            stop_requested: Cell::new(false),
            stop_latency: Cell::new(0),
            stop_countdown: Cell::new(0),
            running_polls: Cell::new(0),
            dma_enabled: Cell::new(false),
            remaining: Cell::new(N as u16),
            half_flag: Cell::new(false),
            full_flag: Cell::new(false),
            log: RefCell::new(OpLog {
                entries: [Op::ClearFlags; LOG_LEN],
                len: 0,
            }),
        }
    }

    /// Number of `is_running()` polls that still report `true` after a stop
    /// request.
    pub(crate) fn set_stop_latency(&self, polls: u32) {
        self.stop_latency.set(polls);
    }

    /// One finished conversion. Returns `false` if nothing was written
    /// because the ADC or the channel is off.
    pub(crate) fn convert(&self, sample: S) -> bool {
        if !(self.adc_running.get() && self.dma_enabled.get()) {
            return false;
        }
        self.buffer.store(self.cursor(), sample);
        let remaining = self.remaining.get() - 1;
        if remaining as usize == N / 2 {
            self.half_flag.set(true);
        }
        if remaining == 0 {
            self.full_flag.set(true);
            self.remaining.set(N as u16);
        } else {
            self.remaining.set(remaining);
        }
        true
    }

    /// Index the next conversion will be written to.
    pub(crate) fn cursor(&self) -> usize {
        N - self.remaining.get() as usize
    }

    pub(crate) fn adc_running(&self) -> bool {
        self.adc_running.get()
    }

    pub(crate) fn dma_enabled(&self) -> bool {
        self.dma_enabled.get()
    }

    pub(crate) fn flags(&self) -> (bool, bool) {
        (self.half_flag.get(), self.full_flag.get())
    }

    pub(crate) fn running_polls(&self) -> u32 {
        self.running_polls.get()
    }

    pub(crate) fn adc_setup(&self) -> Option<AdcSetup> {
        self.adc_setup.get()
    }

    pub(crate) fn transfer_setup(&self) -> Option<TransferSetup> {
        self.transfer_setup.get()
    }

    pub(crate) fn ops(&self) -> Ref<'_, [Op]> {
        Ref::map(self.log.borrow(), |log| &log.entries[..log.len])
    }

    pub(crate) fn op_count(&self) -> usize {
        self.log.borrow().len
    }

    pub(crate) fn count(&self, op: Op) -> usize {
        self.ops().iter().filter(|&&o| o == op).count()
    }

    fn record(&self, op: Op) {
        let mut log = self.log.borrow_mut();
        let len = log.len;
        if len < LOG_LEN {
            log.entries[len] = op;
            log.len = len + 1;
        }
    }
}

impl<S: Sample, const N: usize> AdcPeripheral for &SimHardware<'_, S, N> {
    fn configure(&mut self, setup: &AdcSetup) {
        self.adc_setup.set(Some(*setup));
        self.record(Op::AdcConfigure);
    }

    fn data_register_address(&self) -> usize {
        ADC_DR_ADDRESS
    }

    fn start_conversions(&mut self) {
        self.adc_running.set(true);
        self.stop_requested.set(false);
        self.record(Op::AdcStart);
    }

    fn request_stop(&mut self) {
        self.stop_requested.set(true);
        self.stop_countdown.set(self.stop_latency.get());
        self.record(Op::AdcStopRequest);
    }

    fn is_running(&mut self) -> bool {
        self.running_polls.set(self.running_polls.get() + 1);
        if self.adc_running.get() && self.stop_requested.get() {
            let left = self.stop_countdown.get();
            if left == 0 {
                self.adc_running.set(false);
                self.stop_requested.set(false);
            } else {
                self.stop_countdown.set(left - 1);
            }
        }
        self.adc_running.get()
    }
}

impl<S: Sample, const N: usize> TransferEngine for &SimHardware<'_, S, N> {
    fn configure(&mut self, setup: &TransferSetup) {
        self.transfer_setup.set(Some(*setup));
        self.remaining.set(setup.length);
        self.record(Op::TransferConfigure);
    }

    fn set_length(&mut self, length: u16) {
        assert!(!self.dma_enabled.get(), "CNDTR written while channel enabled");
        self.remaining.set(length);
        self.record(Op::SetLength(length));
    }

    fn enable(&mut self) {
        self.dma_enabled.set(true);
        self.record(Op::TransferEnable);
    }

    fn disable(&mut self) {
        self.dma_enabled.set(false);
        self.record(Op::TransferDisable);
    }

    fn is_enabled(&self) -> bool {
        self.dma_enabled.get()
    }

    fn clear_completion_flags(&mut self) {
        self.half_flag.set(false);
        self.full_flag.set(false);
        self.record(Op::ClearFlags);
    }
}

impl<S: Sample, const N: usize> CompletionSignals for &SimHardware<'_, S, N> {
    fn is_pending(&self, completion: Completion) -> bool {
        match completion {
            Completion::HalfTransfer => self.half_flag.get(),
            Completion::FullTransfer => self.full_flag.get(),
        }
    }

    fn acknowledge(&mut self, completion: Completion) {
        match completion {
            Completion::HalfTransfer => self.half_flag.set(false),
            Completion::FullTransfer => self.full_flag.set(false),
        }
        self.record(Op::Acknowledge(completion));
    }
}

/// Sink error raised by [`RecordingSink::failing_after()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SinkFault;

const SINK_CAPACITY: usize = 8192;

/// Sink that records every byte sent.
pub(crate) struct RecordingSink {
    bytes: [u8; SINK_CAPACITY],
    len: usize,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        RecordingSink {
            bytes: [0; SINK_CAPACITY],
            len: 0,
            fail_after: None,
        }
    }

    /// Accept `count` bytes, then fail every exchange.
    pub(crate) fn failing_after(count: usize) -> Self {
        RecordingSink {
            fail_after: Some(count),
            ..Self::new()
        }
    }

    pub(crate) fn sent(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }
}

impl StreamSink for RecordingSink {
    type Error = SinkFault;

    fn send_receive(&mut self, byte: u8) -> Result<u8, SinkFault> {
        if self.fail_after.is_some_and(|n| self.len >= n) || self.len == SINK_CAPACITY {
            return Err(SinkFault);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        Ok(0)
    }
}

/// Push button with a settable level.
pub(crate) struct MockButton {
    high: Cell<bool>,
}

impl MockButton {
    pub(crate) fn new(high: bool) -> Self {
        MockButton {
            high: Cell::new(high),
        }
    }

    pub(crate) fn set_high(&self, high: bool) {
        self.high.set(high);
    }
}

impl ErrorType for &MockButton {
    type Error = Infallible;
}

impl InputPin for &MockButton {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.high.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.high.get())
    }
}

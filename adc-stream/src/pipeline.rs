//! Main-loop context owning every consumer-side part.
//!
//! The interrupt side only needs the [`EventSlot`] and a completion-flag
//! handle (see [`TransferNotifier`](crate::io::TransferNotifier)); the buffer
//! and the mailbox are the two shared statics. Everything else lives here.
//!
//! ```ignore
//! static BUFFER: CircularSampleBuffer<u8, 1024> = CircularSampleBuffer::new();
//! static EVENTS: EventSlot = EventSlot::new();
//! const CONFIG: PipelineConfig = PipelineConfig::new();
//!
//! let engine = AcquisitionEngine::configure(adc, dma_ch1, &BUFFER, &CONFIG)?;
//! let mut pipeline = Pipeline::new(engine, SpiStreamSink::new(spi1), button, &EVENTS, &CONFIG);
//! pipeline.run()?;
//! ```

use core::convert::Infallible;

use embedded_hal::digital::InputPin;

use crate::acquisition::AcquisitionEngine;
use crate::buffer::Sample;
use crate::config::PipelineConfig;
use crate::control::{AcquisitionState, Controller, Transition};
use crate::error::PipelineError;
use crate::hal::{AdcPeripheral, TransferEngine};
use crate::io::mailbox::EventSlot;
use crate::io::processor::{BlockProcessor, Progress};
use crate::io::sink::StreamSink;

/// What one [`Pipeline::run_once()`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Step {
    pub transition: Transition,
    /// `Idle` while stopped.
    pub progress: Progress,
}

/// ADC → circular buffer → sink streaming pipeline, consumer side.
pub struct Pipeline<'a, A, T, S, const N: usize, K, P>
where
    S: Sample,
{
    engine: AcquisitionEngine<'a, A, T, S, N>,
    controller: Controller,
    processor: BlockProcessor,
    sink: K,
    input: P,
    events: &'a EventSlot,
}

impl<'a, A, T, S, const N: usize, K, P> Pipeline<'a, A, T, S, N, K, P>
where
    A: AdcPeripheral,
    T: TransferEngine,
    S: Sample,
    K: StreamSink,
    P: InputPin,
{
    /// Assemble the pipeline in the `Stopped` state.
    ///
    /// `config` supplies the input's active level and the per-iteration
    /// streaming chunk. The engine must already be configured with it.
    pub fn new(
        engine: AcquisitionEngine<'a, A, T, S, N>,
        sink: K,
        input: P,
        events: &'a EventSlot,
        config: &PipelineConfig,
    ) -> Self {
        Pipeline {
            engine,
            controller: Controller::new(config.active_level),
            processor: BlockProcessor::new(config.samples_per_poll),
            sink,
            input,
            events,
        }
    }

    /// One main-loop iteration: control step, then processing while
    /// running.
    ///
    /// # Errors
    ///
    /// An input read error leaves the state untouched. A sink error abandons
    /// the current block; the pipeline keeps running and the next event is
    /// handled normally on the following call.
    pub fn run_once(&mut self) -> Result<Step, PipelineError<K::Error, P::Error>> {
        let transition = self
            .controller
            .poll(
                &mut self.input,
                &mut self.engine,
                self.events,
                &mut self.processor,
            )
            .map_err(PipelineError::Input)?;

        let progress = match self.controller.state() {
            AcquisitionState::Running => self
                .processor
                .poll(self.events, self.engine.buffer(), &mut self.sink)
                .map_err(PipelineError::Sink)?,
            AcquisitionState::Stopped => Progress::Idle,
        };

        Ok(Step {
            transition,
            progress,
        })
    }

    /// Run forever. Returns only on the first error.
    pub fn run(&mut self) -> Result<Infallible, PipelineError<K::Error, P::Error>> {
        loop {
            self.run_once()?;
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.controller.state()
    }

    pub fn processor(&self) -> &BlockProcessor {
        &self.processor
    }

    pub fn engine(&self) -> &AcquisitionEngine<'a, A, T, S, N> {
        &self.engine
    }

    pub fn events(&self) -> &'a EventSlot {
        self.events
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut K {
        &mut self.sink
    }

    /// Tear the pipeline apart, returning engine, sink and input.
    pub fn release(self) -> (AcquisitionEngine<'a, A, T, S, N>, K, P) {
        (self.engine, self.sink, self.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{CircularSampleBuffer, Half};
    use crate::config::OverrunPolicy;
    use crate::sim::{MockButton, RecordingSink, SimHardware, SinkFault};

    const N: usize = 8;

    #[test]
    fn stopped_pipeline_does_not_stream() {
        let buffer: CircularSampleBuffer<u8, N> = CircularSampleBuffer::new();
        let hw = SimHardware::new(&buffer);
        let config = PipelineConfig::new();
        let engine = AcquisitionEngine::configure(&hw, &hw, &buffer, &config).unwrap();
        let events = EventSlot::new();
        let button = MockButton::new(false);
        let mut p = Pipeline::new(engine, RecordingSink::new(), &button, &events, &config);

        // A stale event is never streamed while stopped
        events.post(Half::A, OverrunPolicy::Overwrite);
        let step = p.run_once().unwrap();
        assert_eq!(
            step,
            Step {
                transition: Transition::None,
                progress: Progress::Idle
            }
        );
        assert_eq!(p.state(), AcquisitionState::Stopped);
        assert!(p.sink().sent().is_empty());
    }

    #[test]
    fn start_and_stream_one_half() {
        let buffer: CircularSampleBuffer<u8, N> = CircularSampleBuffer::new();
        let hw = SimHardware::new(&buffer);
        let config = PipelineConfig::new();
        let engine = AcquisitionEngine::configure(&hw, &hw, &buffer, &config).unwrap();
        let events = EventSlot::new();
        let button = MockButton::new(true);
        let mut p = Pipeline::new(engine, RecordingSink::new(), &button, &events, &config);

        assert_eq!(p.run_once().unwrap().transition, Transition::Started);
        for i in 10..14 {
            hw.convert(i);
        }
        events.post(Half::A, OverrunPolicy::Overwrite);

        let step = p.run_once().unwrap();
        assert_eq!(step.transition, Transition::None);
        assert_eq!(step.progress, Progress::Completed(Half::A));
        assert_eq!(p.sink().sent(), &[10, 11, 12, 13]);
        assert_eq!(p.processor().blocks_streamed(), 1);
        assert_eq!(p.engine().timing().prescaler, 16);
    }

    #[test]
    fn sink_error_surfaces_and_pipeline_continues() {
        let buffer: CircularSampleBuffer<u8, N> = CircularSampleBuffer::new();
        let hw = SimHardware::new(&buffer);
        let config = PipelineConfig::new();
        let engine = AcquisitionEngine::configure(&hw, &hw, &buffer, &config).unwrap();
        let events = EventSlot::new();
        let button = MockButton::new(true);
        let mut p = Pipeline::new(
            engine,
            RecordingSink::failing_after(2),
            &button,
            &events,
            &config,
        );

        p.run_once().unwrap();
        events.post(Half::B, OverrunPolicy::Overwrite);
        assert_eq!(p.run_once(), Err(PipelineError::Sink(SinkFault)));
        assert_eq!(p.processor().blocks_abandoned(), 1);
        assert_eq!(p.state(), AcquisitionState::Running);

        // Idle afterwards, the failed block is not retried
        p.sink_mut().clear();
        assert_eq!(p.run_once().unwrap().progress, Progress::Idle);
    }

    #[test]
    fn run_returns_first_error() {
        let buffer: CircularSampleBuffer<u8, N> = CircularSampleBuffer::new();
        let hw = SimHardware::new(&buffer);
        let config = PipelineConfig::new();
        let engine = AcquisitionEngine::configure(&hw, &hw, &buffer, &config).unwrap();
        let events = EventSlot::new();
        let button = MockButton::new(true);
        let mut p = Pipeline::new(
            engine,
            RecordingSink::failing_after(0),
            &button,
            &events,
            &config,
        );

        events.post(Half::A, OverrunPolicy::Overwrite);
        assert!(matches!(p.run(), Err(PipelineError::Sink(SinkFault))));

        let (engine, sink, _button) = p.release();
        assert!(sink.sent().is_empty());
        let (_adc, dma) = engine.release();
        assert!(dma.is_enabled());
    }
}

//! Start/stop state machine driven by a digital input.
//!
//! Evaluated once per main-loop iteration. The input is level-triggered:
//! while it is asserted acquisition is held stopped, while released it runs.
//!
//! ```text
//!            released
//!   Stopped ──────────▶ Running
//!      ▲                   │
//!      └───────────────────┘
//!            asserted
//! ```

use embedded_hal::digital::InputPin;

use crate::acquisition::AcquisitionEngine;
use crate::buffer::Sample;
use crate::config::ActiveLevel;
use crate::hal::{AdcPeripheral, TransferEngine};
use crate::io::mailbox::EventSlot;
use crate::io::processor::BlockProcessor;

/// Whether the ADC and transfer engine are producing samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    #[default]
    Stopped,
    Running,
}

/// Transition taken by one [`Controller::poll()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    None,
    Started,
    Stopped,
}

/// Owner of [`AcquisitionState`].
pub struct Controller {
    state: AcquisitionState,
    active_level: ActiveLevel,
}

impl Controller {
    /// Create a controller in the `Stopped` state.
    pub const fn new(active_level: ActiveLevel) -> Self {
        Controller {
            state: AcquisitionState::Stopped,
            active_level,
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn active_level(&self) -> ActiveLevel {
        self.active_level
    }

    /// Read the input and report whether it is at its active level.
    pub fn is_asserted<P: InputPin>(&self, pin: &mut P) -> Result<bool, P::Error> {
        match self.active_level {
            ActiveLevel::Low => pin.is_low(),
            ActiveLevel::High => pin.is_high(),
        }
    }

    /// Sample the input and move towards the state it asks for.
    pub fn poll<P, A, T, S, const N: usize>(
        &mut self,
        pin: &mut P,
        engine: &mut AcquisitionEngine<'_, A, T, S, N>,
        events: &EventSlot,
        processor: &mut BlockProcessor,
    ) -> Result<Transition, P::Error>
    where
        P: InputPin,
        A: AdcPeripheral,
        T: TransferEngine,
        S: Sample,
    {
        let asserted = self.is_asserted(pin)?;
        Ok(self.apply(asserted, engine, events, processor))
    }

    /// Apply an already-sampled input level.
    ///
    /// Stopping runs: ADC stop (waiting for the acknowledge), transfer
    /// disable, flag clear, mailbox clear, then drops any partly sent block.
    /// Nothing from before the stop can surface after a restart.
    ///
    /// Starting runs: cursor reset, transfer enable, ADC start. The first
    /// conversion after a restart lands at index 0.
    pub fn apply<A, T, S, const N: usize>(
        &mut self,
        asserted: bool,
        engine: &mut AcquisitionEngine<'_, A, T, S, N>,
        events: &EventSlot,
        processor: &mut BlockProcessor,
    ) -> Transition
    where
        A: AdcPeripheral,
        T: TransferEngine,
        S: Sample,
    {
        match (asserted, self.state) {
            (true, AcquisitionState::Running) => {
                engine.stop();
                engine.disable_transfer();
                engine.clear_completion_flags();
                events.clear();
                processor.abandon();
                self.state = AcquisitionState::Stopped;
                info!("acquisition stopped");
                Transition::Stopped
            }
            (false, AcquisitionState::Stopped) => {
                engine.reset_cursor();
                engine.enable_transfer();
                engine.start();
                self.state = AcquisitionState::Running;
                info!("acquisition started");
                Transition::Started
            }
            _ => Transition::None,
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new(ActiveLevel::default())
    }
}

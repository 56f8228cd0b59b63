//! Sensing cycle and bus command handling
//!
//! [`Sensor`] runs the periodic sample → median → angle → distance pipeline.
//! [`CommandInterface`] serves the controller's reads and writes. Both hold a
//! reference to the same [`SharedTracker`], so the bus callbacks can run
//! between cycles without tearing the distance.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{
    angle::angle_code,
    command::{Command, DISTANCE_LEN, Snapshot, encode_distance},
    config::Config,
    error::Error,
    indicator::{Color, Indicator},
    sampler::{AnalogInput, Reading, Sampler},
    tracker::SharedTracker,
};

/// Colour shown from power-up until the controller picks one
pub const POWER_ON_COLOR: Color = Color::Red;

/// Periodic position sensing
pub struct Sensor<'a, M: RawMutex, C, S> {
    sampler: Sampler<C, S>,
    tracker: &'a SharedTracker<M>,
    cycle_delay_us: u32,
}

impl<'a, M, C, S, E> Sensor<'a, M, C, S>
where
    M: RawMutex,
    C: AnalogInput<Error = E>,
    S: AnalogInput<Error = E>,
{
    pub fn new(config: &Config, cosine: C, sine: S, tracker: &'a SharedTracker<M>) -> Self {
        Self {
            sampler: Sampler::new(config, cosine, sine),
            tracker,
            cycle_delay_us: config.cycle_delay_us,
        }
    }

    /// Release both analog channels, consuming the sensor
    pub fn release(self) -> (C, S) {
        self.sampler.release()
    }

    /// Run one complete cycle, blocking through the settle delays
    ///
    /// # Errors
    ///
    /// Returns [`Error::Analog`] if a conversion fails; the tracker is not
    /// touched in that case
    pub fn cycle(&mut self, delay: &mut impl DelayNs) -> Result<Snapshot, Error<E>> {
        let reading = self.sampler.acquire(delay)?;
        let snapshot = self.track(reading);
        delay.delay_us(self.cycle_delay_us);
        Ok(snapshot)
    }

    /// Run one complete cycle, yielding during the settle delays
    ///
    /// # Errors
    ///
    /// Returns [`Error::Analog`] if a conversion fails; the tracker is not
    /// touched in that case
    pub async fn cycle_async(
        &mut self,
        delay: &mut impl embedded_hal_async::delay::DelayNs,
    ) -> Result<Snapshot, Error<E>> {
        let reading = self.sampler.acquire_async(delay).await?;
        let snapshot = self.track(reading);
        delay.delay_us(self.cycle_delay_us).await;
        Ok(snapshot)
    }

    fn track(&self, reading: Reading) -> Snapshot {
        let angle = angle_code(reading.cosine, reading.sine);
        let (_motion, state) = self.tracker.update(angle);

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Angle {} -> {}, distance {}",
            angle,
            _motion,
            state.absolute_distance()
        );

        Snapshot {
            cosine: reading.cosine,
            sine: reading.sine,
            angle,
            absolute_distance: state.absolute_distance(),
            lower_bound: state.lower_bound(),
        }
    }
}

/// Controller-facing side of the device
pub struct CommandInterface<'a, M: RawMutex, P> {
    tracker: &'a SharedTracker<M>,
    indicator: Indicator<P>,
}

impl<'a, M, P, E> CommandInterface<'a, M, P>
where
    M: RawMutex,
    P: OutputPin<Error = E>,
{
    /// Take over the indicator and show [`POWER_ON_COLOR`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the indicator cannot be driven
    pub fn new(
        tracker: &'a SharedTracker<M>,
        mut indicator: Indicator<P>,
    ) -> Result<Self, Error<E>> {
        indicator.set(POWER_ON_COLOR)?;
        Ok(Self { tracker, indicator })
    }

    /// Release the indicator, consuming the interface
    pub fn release(self) -> Indicator<P> {
        self.indicator
    }

    /// Colour currently shown
    #[must_use]
    pub fn color(&self) -> Color {
        self.indicator.color()
    }

    /// Bytes to send when the controller reads
    #[must_use]
    pub fn on_request(&self) -> [u8; DISTANCE_LEN] {
        encode_distance(self.tracker.absolute_distance())
    }

    /// Apply every byte the controller wrote, in order
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the indicator cannot be driven; bytes after
    /// the failing one are not applied
    pub fn on_receive(&mut self, bytes: &[u8]) -> Result<(), Error<E>> {
        bytes
            .iter()
            .try_for_each(|&byte| self.execute(Command::from(byte)))
    }

    /// Apply a single decoded command
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pin`] if the indicator cannot be driven
    pub fn execute(&mut self, command: Command) -> Result<(), Error<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Command {}", command);

        match command {
            Command::Reset => {
                self.tracker.reset();
                Ok(())
            }
            Command::SetColor(color) => self.indicator.set(color),
        }
    }
}

//! Resolver channel acquisition
//!
//! Each cycle reads both channels [`SAMPLES_PER_CYCLE`] times, `settle_us`
//! apart, centring every raw reading on the converter midpoint and removing
//! the channel's calibration offset. The window is reused between cycles and reduced to
//! one median value per channel.

use embedded_hal::delay::DelayNs;

use crate::{config::Config, error::Error, median::median};

/// Acquisitions per channel per cycle
pub const SAMPLES_PER_CYCLE: usize = 10;

/// Raw value of a centred signal on a 10-bit converter
pub const ADC_MIDPOINT: i16 = 512;

/// One analog channel of the resolver front end
pub trait AnalogInput {
    type Error;

    /// Take a single raw conversion
    fn read(&mut self) -> Result<u16, Self::Error>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    type Error = T::Error;

    fn read(&mut self) -> Result<u16, Self::Error> {
        T::read(self)
    }
}

/// Median-filtered channel values of one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub cosine: i16,
    pub sine: i16,
}

/// Reusable per-cycle sample buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleWindow<const N: usize> {
    cosine: [i16; N],
    sine: [i16; N],
}

impl<const N: usize> SampleWindow<N> {
    const NON_EMPTY: () = assert!(N > 0, "sample window must hold at least one sample");

    #[must_use]
    pub const fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            cosine: [0; N],
            sine: [0; N],
        }
    }

    /// Store the `index`th acquisition of both channels
    pub fn record(&mut self, index: usize, cosine: i16, sine: i16) {
        self.cosine[index] = cosine;
        self.sine[index] = sine;
    }

    /// Sort both buffers in place and reduce them to their medians
    pub fn filter(&mut self) -> Reading {
        Reading {
            cosine: median(&mut self.cosine).unwrap_or_default(),
            sine: median(&mut self.sine).unwrap_or_default(),
        }
    }
}

impl<const N: usize> Default for SampleWindow<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two-channel sampler with fixed calibration offsets
#[derive(Debug)]
pub struct Sampler<C, S> {
    cosine: C,
    sine: S,
    cosine_offset: i16,
    sine_offset: i16,
    settle_us: u32,
    window: SampleWindow<SAMPLES_PER_CYCLE>,
}

impl<C, S, E> Sampler<C, S>
where
    C: AnalogInput<Error = E>,
    S: AnalogInput<Error = E>,
{
    pub fn new(config: &Config, cosine: C, sine: S) -> Self {
        Self {
            cosine,
            sine,
            cosine_offset: config.cosine_offset,
            sine_offset: config.sine_offset,
            settle_us: config.settle_us,
            window: SampleWindow::new(),
        }
    }

    /// Release both channels, consuming the sampler
    pub fn release(self) -> (C, S) {
        (self.cosine, self.sine)
    }

    /// Fill the window and return the filtered reading
    ///
    /// # Errors
    ///
    /// Returns [`Error::Analog`] if either channel fails to convert
    pub fn acquire(&mut self, delay: &mut impl DelayNs) -> Result<Reading, Error<E>> {
        for index in 0..SAMPLES_PER_CYCLE {
            self.sample(index)?;
            delay.delay_us(self.settle_us);
        }
        Ok(self.finish())
    }

    /// Same as [`Self::acquire`], yielding to the executor while settling
    ///
    /// # Errors
    ///
    /// Returns [`Error::Analog`] if either channel fails to convert
    pub async fn acquire_async(
        &mut self,
        delay: &mut impl embedded_hal_async::delay::DelayNs,
    ) -> Result<Reading, Error<E>> {
        for index in 0..SAMPLES_PER_CYCLE {
            self.sample(index)?;
            delay.delay_us(self.settle_us).await;
        }
        Ok(self.finish())
    }

    fn sample(&mut self, index: usize) -> Result<(), Error<E>> {
        let cosine = centre(self.cosine.read().map_err(Error::Analog)?, self.cosine_offset);
        let sine = centre(self.sine.read().map_err(Error::Analog)?, self.sine_offset);
        self.window.record(index, cosine, sine);
        Ok(())
    }

    fn finish(&mut self) -> Reading {
        let reading = self.window.filter();

        #[cfg(feature = "defmt")]
        defmt::trace!("Filtered cosine {}, sine {}", reading.cosine, reading.sine);

        reading
    }
}

/// Shift a raw conversion onto a signed scale around zero
///
/// Conversions beyond `i16::MAX` saturate rather than flipping sign.
fn centre(raw: u16, offset: i16) -> i16 {
    i16::try_from(raw)
        .unwrap_or(i16::MAX)
        .saturating_sub(ADC_MIDPOINT)
        .saturating_sub(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centres_on_midpoint_then_removes_offset() {
        assert_eq!(centre(512, 0), 0);
        assert_eq!(centre(0, 0), -512);
        assert_eq!(centre(1023, 0), 511);
        assert_eq!(centre(600, 75), 13);
        assert_eq!(centre(500, -20), 8);
    }

    #[test]
    fn faulty_conversions_saturate_instead_of_wrapping() {
        assert_eq!(centre(0x8000, 0), i16::MAX - ADC_MIDPOINT);
        assert_eq!(centre(u16::MAX, 0), i16::MAX - ADC_MIDPOINT);
        assert_eq!(centre(u16::MAX, -600), i16::MAX);
        assert_eq!(centre(0, i16::MAX), i16::MIN);
    }

    struct Fixed(u16);

    impl AnalogInput for Fixed {
        type Error = ();

        fn read(&mut self) -> Result<u16, ()> {
            Ok(self.0)
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn default_window_needs_no_annotations() {
        let mut sampler = Sampler::new(&Config::default(), Fixed(612), Fixed(412));
        assert_eq!(
            sampler.acquire(&mut NoDelay),
            Ok(Reading { cosine: 100, sine: -100 })
        );
    }

    #[test]
    fn window_filters_each_channel_independently() {
        let mut window = SampleWindow::<4>::new();
        window.record(0, 10, -4);
        window.record(1, 40, -1);
        window.record(2, 20, -3);
        window.record(3, 30, -2);
        assert_eq!(window.filter(), Reading { cosine: 25, sine: -2 });
    }
}

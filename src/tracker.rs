//! Wrap-aware absolute distance tracking
//!
//! Each cycle the tracker compares the new angle code with the previous one.
//! A jump of more than half the angle range can only come from crossing the
//! 0/1000 boundary, so it is credited through the wrap formulas instead of
//! being added as-is. All arithmetic is 16-bit two's complement and wraps on
//! overflow, like the counter it reports over the bus.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};

use crate::angle::ANGLE_RANGE;

/// Largest per-cycle change still treated as continuous motion
pub const WRAP_THRESHOLD: u16 = 500;

/// Branch taken by one tracker update, with the change applied to the distance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motion {
    /// Ordinary movement; the angle delta was added directly
    Tracking(i16),
    /// Crossed the top of the range and reappeared near the bottom
    WrapUp(i16),
    /// Crossed the bottom of the range and reappeared near the top
    WrapDown(i16),
}

impl Motion {
    /// Signed amount this step added to the absolute distance
    #[must_use]
    pub const fn change(self) -> i16 {
        match self {
            Self::Tracking(change) | Self::WrapUp(change) | Self::WrapDown(change) => change,
        }
    }
}

/// Persistent tracking state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DistanceTracker {
    previous_angle: i16,
    lower_bound: i16,
    absolute_distance: i16,
}

impl DistanceTracker {
    /// Start tracking from the first angle code seen after power-up
    ///
    /// The first update with the same angle therefore has a delta of zero.
    #[must_use]
    pub const fn new(initial_angle: i16) -> Self {
        Self {
            previous_angle: initial_angle,
            lower_bound: 0,
            absolute_distance: 0,
        }
    }

    /// Fold one angle code into the distance
    pub fn update(&mut self, angle: i16) -> Motion {
        let previous = self.previous_angle;
        let delta = angle.wrapping_sub(previous);

        if angle < self.lower_bound {
            self.lower_bound = angle;
        }

        let motion = if delta.unsigned_abs() > WRAP_THRESHOLD {
            if delta < 0 {
                let gain = ANGLE_RANGE
                    .wrapping_sub(previous)
                    .wrapping_add(angle.wrapping_sub(self.lower_bound));
                self.absolute_distance = self.absolute_distance.wrapping_add(gain);
                Motion::WrapUp(gain)
            } else {
                let loss = angle
                    .wrapping_sub(ANGLE_RANGE)
                    .wrapping_add(previous.wrapping_sub(self.lower_bound));
                self.absolute_distance = self.absolute_distance.wrapping_sub(loss);
                Motion::WrapDown(loss.wrapping_neg())
            }
        } else {
            self.absolute_distance = self.absolute_distance.wrapping_add(delta);
            Motion::Tracking(delta)
        };

        self.previous_angle = angle;
        motion
    }

    /// Zero the distance; the angle history is kept
    pub fn reset(&mut self) {
        self.absolute_distance = 0;
    }

    #[must_use]
    pub const fn absolute_distance(&self) -> i16 {
        self.absolute_distance
    }

    #[must_use]
    pub const fn previous_angle(&self) -> i16 {
        self.previous_angle
    }

    /// Lowest angle code observed since power-up
    #[must_use]
    pub const fn lower_bound(&self) -> i16 {
        self.lower_bound
    }
}

/// Tracker shared between the sensing cycle and the bus handlers
///
/// Every access runs under the raw mutex `M`, so a bus read never observes a
/// half-written distance and a reset can't be lost inside a cycle's
/// read-modify-write. Until the first angle arrives the tracker is unprimed:
/// reads report zero and resets do nothing.
pub struct SharedTracker<M: RawMutex> {
    inner: Mutex<M, RefCell<Option<DistanceTracker>>>,
}

impl<M: RawMutex> SharedTracker<M> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    /// Feed one angle code, priming the tracker on the first call
    ///
    /// Returns the branch taken together with the state it left behind.
    pub fn update(&self, angle: i16) -> (Motion, DistanceTracker) {
        self.inner.lock(|cell| {
            let mut slot = cell.borrow_mut();
            let tracker = slot.get_or_insert_with(|| {
                #[cfg(feature = "defmt")]
                defmt::debug!("Tracker primed at angle {}", angle);
                DistanceTracker::new(angle)
            });
            let motion = tracker.update(angle);
            (motion, *tracker)
        })
    }

    /// Zero the distance
    pub fn reset(&self) {
        self.inner.lock(|cell| {
            if let Some(tracker) = cell.borrow_mut().as_mut() {
                tracker.reset();
            }
        });
    }

    #[must_use]
    pub fn absolute_distance(&self) -> i16 {
        self.inner
            .lock(|cell| cell.borrow().map_or(0, |tracker| tracker.absolute_distance()))
    }

    /// Copy of the full tracking state, `None` before the first update
    #[must_use]
    pub fn state(&self) -> Option<DistanceTracker> {
        self.inner.lock(|cell| *cell.borrow())
    }
}

impl<M: RawMutex> Default for SharedTracker<M> {
    fn default() -> Self {
        Self::new()
    }
}

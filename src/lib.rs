#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

mod angle;
mod command;
mod config;
mod device;
mod error;
mod indicator;
mod median;
mod sampler;
mod tracker;

pub use angle::{ANGLE_MIDPOINT, ANGLE_RANGE, angle_code};
pub use command::{Command, DISTANCE_LEN, RESET_COMMAND, Snapshot, TELEMETRY_LEN, encode_distance};
pub use config::{Config, DEFAULT_ADDRESS, DEFAULT_CYCLE_DELAY_US, DEFAULT_SETTLE_US};
pub use device::{CommandInterface, POWER_ON_COLOR, Sensor};
pub use error::{ConfigError, Error};
pub use indicator::{Color, Indicator, LedPair};
pub use median::median;
pub use sampler::{ADC_MIDPOINT, AnalogInput, Reading, SAMPLES_PER_CYCLE, SampleWindow, Sampler};
pub use tracker::{DistanceTracker, Motion, SharedTracker, WRAP_THRESHOLD};

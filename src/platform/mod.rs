//! Platform abstraction layer
//!
//! Interfaces to the device services a game screen depends on:
//! - Motion sensor sampling
//! - Power/sleep policy
//! - Display objects (renderer)
//! - Screen lifecycle and navigation
//!
//! Audio and button input live in `crate::audio` and `crate::input`.

use crate::sim::Frame;

/// One accelerometer reading, in g per axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImuSample {
    pub accel_x: f32,
    pub accel_y: f32,
    pub accel_z: f32,
}

/// Accelerometer component a game steers with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiltAxis {
    /// Left/right tilt (`accel_x`)
    Roll,
    /// Forward/back tilt (`accel_y`)
    Pitch,
}

impl TiltAxis {
    #[inline]
    pub fn read(&self, sample: &ImuSample) -> f32 {
        match self {
            TiltAxis::Roll => sample.accel_x,
            TiltAxis::Pitch => sample.accel_y,
        }
    }
}

/// Motion sensor, polled once per tick from the tick thread.
///
/// Must not block. `None` means no reading is available yet.
pub trait Sensor: Send + Sync {
    fn sample(&self) -> Option<ImuSample>;
}

/// Device idle-sleep policy
pub trait PowerPolicy: Send + Sync {
    fn set_auto_sleep(&self, enabled: bool);
}

/// Display objects owned by the UI context.
///
/// Implementations write position, visibility and label text onto objects
/// created up front; no objects are created per frame.
pub trait Renderer {
    fn present(&mut self, frame: &Frame);
}

/// Screen navigation framework
pub trait Navigator {
    /// Hand control back to the previous screen (menu)
    fn request_exit(&mut self);
}

/// Lifecycle hooks the screen framework calls on the active screen
pub trait Screen {
    /// Screen became active
    fn on_start(&mut self) -> Result<(), crate::HostError>;
    /// Screen is being deactivated
    fn on_stop(&mut self) -> Result<(), crate::HostError>;
    /// One iteration of the UI context
    fn run_loop(&mut self);
}

//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations. Serial links use the
//! `embedded-io` traits directly.

pub mod clock;
pub mod sensor;

pub use clock::Clock;
pub use sensor::{SensorError, ThermalSensor};

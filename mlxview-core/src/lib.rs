//! Board-agnostic core logic for the MLX90640 viewer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (thermal sensor, clock)
//! - Frame buffer and threshold/centroid analysis
//! - Host command dispatch
//! - The acquisition loop and its session state
//! - Sensor control word and loop configuration

#![no_std]
#![deny(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod control;
pub mod dispatcher;
pub mod frame;
pub mod heartbeat;
pub mod session;
pub mod traits;

pub use control::{ControlLoop, Cycle, LoopError};
pub use session::Session;

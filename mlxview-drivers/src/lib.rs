//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in mlxview-core:
//!
//! - Thermal sensors (MLX90640 over I2C)

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;

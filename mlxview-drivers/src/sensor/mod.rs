//! Thermal sensor drivers

pub mod mlx90640;

pub use mlx90640::{Mlx90640, Mlx90640Config, Radiometry};

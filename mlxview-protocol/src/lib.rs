//! Thermal Viewer Serial Protocol
//!
//! This crate defines the binary protocol between the MLX90640 viewer
//! firmware (device) and the desktop viewer (host). The same packet shape
//! is used in both directions:
//!
//! ```text
//! ┌──────┬─────┬──────────────┬─────────────┐
//! │ SYNC │ CMD │ LENGTH (LE)  │ PAYLOAD     │
//! │ 0xA0 │ 1B  │ 2B           │ LENGTH B    │
//! └──────┴─────┴──────────────┴─────────────┘
//! ```
//!
//! The device streams a frame, timing and analysis packet every cycle and
//! accepts tuning packets from the host. Inbound payloads are limited to
//! [`MAX_PAYLOAD_SIZE`] bytes.

#![no_std]
#![deny(unsafe_code)]

pub mod debug;
pub mod messages;
pub mod packet;
pub mod tuning;

pub use debug::{write_debug, DebugText, MAX_DEBUG_LEN};
pub use messages::{
    AnalysisResult, DeviceMessage, HostCommand, TimingMetrics, FRAME_HEIGHT, FRAME_PIXELS,
    FRAME_WIDTH,
};
pub use packet::{
    write_header, Packet, PacketError, PacketParser, MAX_PAYLOAD_SIZE, SYNC_BYTE,
};
pub use tuning::{TuningError, TuningParameters};

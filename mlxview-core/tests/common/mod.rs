//! In-memory stand-ins for the sensor, clock and serial links

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use mlxview_core::config::ControlWord;
use mlxview_core::frame::{RawFrame, Temperatures, RAW_SUBPAGE_INDEX};
use mlxview_core::traits::{Clock, SensorError, ThermalSensor};
use mlxview_protocol::{FRAME_PIXELS, SYNC_BYTE};

/// Sensor that always sees the same scene
pub struct FakeSensor {
    pub scene: Temperatures,
    /// Zero-based fetch numbers that fail
    pub failing_fetches: Vec<usize>,
    pub fail_control: bool,
    pub control: Option<ControlWord>,
    pub fetches: usize,
}

impl FakeSensor {
    pub fn new(scene: Temperatures) -> Self {
        Self {
            scene,
            failing_fetches: Vec::new(),
            fail_control: false,
            control: None,
            fetches: 0,
        }
    }

    pub fn uniform(value: f32) -> Self {
        Self::new([value; FRAME_PIXELS])
    }
}

impl ThermalSensor for FakeSensor {
    fn write_control(&mut self, word: ControlWord) -> Result<(), SensorError> {
        if self.fail_control {
            return Err(SensorError::Bus);
        }
        self.control = Some(word);
        Ok(())
    }

    fn read_control(&mut self) -> Result<ControlWord, SensorError> {
        self.control.ok_or(SensorError::Bus)
    }

    fn fetch_raw(&mut self, raw: &mut RawFrame) -> Result<(), SensorError> {
        let n = self.fetches;
        self.fetches += 1;
        if self.failing_fetches.contains(&n) {
            return Err(SensorError::FrameData);
        }
        raw[RAW_SUBPAGE_INDEX] = (n % 2) as u16;
        Ok(())
    }

    fn convert(&mut self, _raw: &RawFrame, temperatures: &mut Temperatures) {
        temperatures.copy_from_slice(&self.scene);
    }
}

/// Clock that advances by `step` every time it is read
#[derive(Clone)]
pub struct FakeClock {
    now: Rc<Cell<u32>>,
    step: u32,
}

impl FakeClock {
    pub fn new(step: u32) -> Self {
        Self {
            now: Rc::new(Cell::new(0)),
            step,
        }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u32 {
        let t = self.now.get();
        self.now.set(t.wrapping_add(self.step));
        t
    }
}

/// Write half of a serial link, collecting everything
#[derive(Default)]
pub struct SerialSink(pub Vec<u8>);

impl embedded_io::ErrorType for SerialSink {
    type Error = Infallible;
}

impl embedded_io::Write for SerialSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Read half of a serial link; the test keeps a handle to push bytes
#[derive(Clone, Default)]
pub struct SerialSource(pub Rc<RefCell<VecDeque<u8>>>);

impl SerialSource {
    pub fn push(&self, bytes: &[u8]) {
        self.0.borrow_mut().extend(bytes.iter().copied());
    }
}

impl embedded_io::ErrorType for SerialSource {
    type Error = Infallible;
}

impl embedded_io::Read for SerialSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut queue = self.0.borrow_mut();
        let n = buf.len().min(queue.len());
        for (slot, byte) in buf.iter_mut().zip(queue.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for SerialSource {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.0.borrow().is_empty())
    }
}

/// Split a well-formed outbound stream into `(cmd, payload)` pairs
///
/// Unlike the device-side parser this accepts payloads of any length,
/// since frames are 3072 bytes.
pub fn split_packets(mut bytes: &[u8]) -> Vec<(u8, Vec<u8>)> {
    let mut packets = Vec::new();
    while !bytes.is_empty() {
        assert_eq!(bytes[0], SYNC_BYTE, "stream out of sync");
        let cmd = bytes[1];
        let len = u16::from_le_bytes([bytes[2], bytes[3]]) as usize;
        packets.push((cmd, bytes[4..4 + len].to_vec()));
        bytes = &bytes[4 + len..];
    }
    packets
}

/// Text of every debug packet in an outbound stream
pub fn debug_lines(bytes: &[u8]) -> Vec<String> {
    split_packets(bytes)
        .into_iter()
        .filter(|(cmd, _)| *cmd == mlxview_protocol::messages::CMD_DEBUG)
        .map(|(_, payload)| String::from_utf8(payload).unwrap())
        .collect()
}

/// Host → device tuning packet bytes
pub fn tuning_bytes(tmin: f32, tamb_min: f32, tmax: f32) -> Vec<u8> {
    let mut out = vec![SYNC_BYTE, 0x01, 12, 0];
    out.extend_from_slice(&tmin.to_le_bytes());
    out.extend_from_slice(&tamb_min.to_le_bytes());
    out.extend_from_slice(&tmax.to_le_bytes());
    out
}

pub fn le_f32(bytes: &[u8]) -> f32 {
    f32::from_le_bytes(bytes.try_into().unwrap())
}

pub fn le_i32(bytes: &[u8]) -> i32 {
    i32::from_le_bytes(bytes.try_into().unwrap())
}

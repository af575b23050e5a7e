//! Acquisition and host I/O loop
//!
//! One [`ControlLoop::poll`] call is one iteration:
//!
//! 1. Heartbeat on the auxiliary channel if due
//! 2. Fetch a raw frame, convert it, threshold it and locate the centroid
//! 3. Send frame, timings and analysis packets to the host, in that order
//! 4. Drain whatever the host has sent and dispatch complete packets
//!
//! A failed sensor fetch skips steps 2 and 3 for that iteration only and
//! sends nothing to the host.
//! Serial errors are returned to the caller.

use embedded_io::{Error as _, ErrorKind, Read, ReadReady, Write};
use mlxview_protocol::{write_debug, DeviceMessage};

use crate::analysis::analyze;
use crate::config::{ControlWord, LoopConfig};
use crate::dispatcher::dispatch;
use crate::frame::Frame;
use crate::heartbeat::Heartbeat;
use crate::session::Session;
use crate::traits::{Clock, SensorError, ThermalSensor};

/// Bytes read from the host per read call
const RX_CHUNK_SIZE: usize = 64;

/// Serial failures that abort an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoopError {
    /// Writing to the host failed
    HostTx(ErrorKind),
    /// Reading from the host failed
    HostRx(ErrorKind),
    /// Writing the heartbeat line failed
    Heartbeat(ErrorKind),
}

/// Summary of one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cycle {
    /// A heartbeat line was written
    pub heartbeat: bool,
    /// Frame, timings and analysis were sent
    pub frame_sent: bool,
    /// Why the frame was skipped, if it was
    pub sensor_error: Option<SensorError>,
    /// Inbound bytes consumed
    pub inbound_bytes: usize,
}

/// Owns the hardware handles and the session
///
/// - `tx` / `rx`: the host link carrying packets
/// - `aux`: secondary text channel for the heartbeat
pub struct ControlLoop<S, C, TX, RX, AUX> {
    sensor: S,
    clock: C,
    tx: TX,
    rx: RX,
    aux: AUX,
    session: Session,
    frame: Frame,
    heartbeat: Heartbeat,
}

impl<S, C, TX, RX, AUX> ControlLoop<S, C, TX, RX, AUX>
where
    S: ThermalSensor,
    C: Clock,
    TX: Write,
    RX: Read + ReadReady,
    AUX: Write,
{
    /// Create a loop with a fresh session
    pub fn new(sensor: S, clock: C, tx: TX, rx: RX, aux: AUX, config: LoopConfig) -> Self {
        Self {
            sensor,
            clock,
            tx,
            rx,
            aux,
            session: Session::new(),
            frame: Frame::new(),
            heartbeat: Heartbeat::new(config.heartbeat_period_ms),
        }
    }

    /// Configure the sensor
    ///
    /// Writes the session's control word and stores what the sensor reads
    /// back. The host always sees the same two init messages; whether the
    /// sensor accepted the word is only returned (and logged). The loop can
    /// run either way; failed fetches just produce no frames.
    pub fn init(&mut self) -> Result<bool, LoopError> {
        write_debug(&mut self.tx, format_args!("Initializing MLX90640!")).map_err(tx_error)?;

        let configured = match self.configure_sensor() {
            Ok(word) => {
                #[cfg(feature = "defmt")]
                defmt::info!("Sensor configured: {=u16:#06x}", word.bits());

                self.session.control = word;
                true
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Sensor init failed: {}", _e);

                false
            }
        };

        write_debug(&mut self.tx, format_args!("Initialized!")).map_err(tx_error)?;
        Ok(configured)
    }

    /// Run one iteration
    pub fn poll(&mut self) -> Result<Cycle, LoopError> {
        let mut cycle = Cycle::default();

        let now = self.clock.now_ms();
        cycle.heartbeat = self
            .heartbeat
            .poll(now, &mut self.aux)
            .map_err(|e| LoopError::Heartbeat(e.kind()))?;

        match self.acquire() {
            Ok(()) => {
                self.transmit()?;
                cycle.frame_sent = true;
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Frame fetch failed: {}", e);

                cycle.sensor_error = Some(e);
            }
        }

        cycle.inbound_bytes = self.drain_inbound()?;
        Ok(cycle)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Most recent frame (holds the mask once analysed)
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn tx(&self) -> &TX {
        &self.tx
    }

    pub fn aux(&self) -> &AUX {
        &self.aux
    }

    /// Tear down the loop and hand back the hardware
    pub fn release(self) -> (S, C, TX, RX, AUX) {
        (self.sensor, self.clock, self.tx, self.rx, self.aux)
    }

    fn configure_sensor(&mut self) -> Result<ControlWord, SensorError> {
        self.sensor.write_control(self.session.control)?;
        self.sensor.read_control()
    }

    /// Fetch, convert and analyse one frame
    fn acquire(&mut self) -> Result<(), SensorError> {
        let start = self.clock.now_ms();
        let fetched = self.sensor.fetch_raw(&mut self.frame.raw);
        self.session.timing.frame_fetch_ms = self.clock.elapsed_ms(start) as i32;
        fetched?;

        let start = self.clock.now_ms();
        self.sensor.convert(&self.frame.raw, &mut self.frame.temperatures);
        self.session.timing.calc_ms = self.clock.elapsed_ms(start) as i32;

        self.session.analysis = analyze(&mut self.frame, &self.session.tuning);
        Ok(())
    }

    fn transmit(&mut self) -> Result<(), LoopError> {
        let start = self.clock.now_ms();
        DeviceMessage::Frame(&self.frame.temperatures)
            .write_to(&mut self.tx)
            .map_err(tx_error)?;
        self.session.timing.frame_tx_ms = self.clock.elapsed_ms(start) as i32;

        DeviceMessage::Timings(self.session.timing)
            .write_to(&mut self.tx)
            .map_err(tx_error)?;
        DeviceMessage::Analysis(self.session.analysis)
            .write_to(&mut self.tx)
            .map_err(tx_error)?;
        Ok(())
    }

    /// Consume every byte the host link has ready
    fn drain_inbound(&mut self) -> Result<usize, LoopError> {
        let mut buf = [0u8; RX_CHUNK_SIZE];
        let mut total = 0;

        while self.rx.read_ready().map_err(rx_error)? {
            let n = self.rx.read(&mut buf).map_err(rx_error)?;
            if n == 0 {
                break;
            }

            #[cfg(feature = "defmt")]
            defmt::trace!("RX: {} bytes", n);

            if total == 0 {
                write_debug(&mut self.tx, format_args!("Serial Byte RXd!! {}", n))
                    .map_err(tx_error)?;
            }
            total += n;

            for decoded in self.session.parser.decode(&buf[..n]) {
                match decoded {
                    Ok(packet) => {
                        dispatch(&mut self.session.tuning, &packet, &mut self.tx)
                            .map_err(tx_error)?;
                    }
                    Err(_e) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("Packet parse error: {}", _e);
                    }
                }
            }
        }

        Ok(total)
    }
}

fn tx_error<E: embedded_io::Error>(e: E) -> LoopError {
    LoopError::HostTx(e.kind())
}

fn rx_error<E: embedded_io::Error>(e: E) -> LoopError {
    LoopError::HostRx(e.kind())
}

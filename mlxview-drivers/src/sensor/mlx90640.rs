//! Melexis MLX90640 32×24 thermopile array
//!
//! Registers are 16-bit words addressed by 16-bit register numbers, both
//! sent big-endian. A frame fetch follows the sensor's data-ready
//! handshake:
//!
//! 1. Poll the status register until the new-data flag (bit 3) is set
//! 2. Clear the flag, read the 832 pixel RAM words
//! 3. Re-read status; if new data arrived during the read, go again
//!    (at most 5 reads)
//! 4. Append control register 1 and the subpage number
//!
//! Radiometric conversion needs the EEPROM calibration set and the vendor
//! math. That lives behind [`Radiometry`]; this driver only supplies the
//! emissivity and the open-air ambient correction.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use mlxview_core::config::{ControlWord, RefreshRate};
use mlxview_core::frame::{
    RawFrame, Temperatures, RAM_WORDS, RAW_CONTROL_INDEX, RAW_SUBPAGE_INDEX,
};
use mlxview_core::traits::{SensorError, ThermalSensor};

/// Factory-default 7-bit I2C address
pub const DEFAULT_ADDRESS: u8 = 0x33;

/// Calibration EEPROM size in words
pub const EEPROM_WORDS: usize = 832;

const REG_STATUS: u16 = 0x8000;
const REG_CONTROL_1: u16 = 0x800D;
const RAM_START: u16 = 0x0400;
const EEPROM_START: u16 = 0x2400;

const STATUS_NEW_DATA: u16 = 0x0008;
const STATUS_SUBPAGE: u16 = 0x0001;
/// Clears the new-data flag, keeps overwrite enabled
const STATUS_CLEAR: u16 = 0x0030;

const MAX_FRAME_READS: u8 = 5;
const READ_CHUNK_WORDS: usize = 32;
const READY_POLL_MS: u32 = 1;

/// Vendor radiometric model
///
/// Implementations hold the calibration parameters extracted from the
/// sensor EEPROM (see [`Mlx90640::dump_eeprom`]).
pub trait Radiometry {
    /// Sensor ambient temperature (°C) for this raw frame
    fn ambient(&self, raw: &RawFrame) -> f32;

    /// Object temperatures (°C) for every pixel
    ///
    /// `reflected` is the temperature of the surroundings reflected by
    /// the target.
    fn object_temperatures(
        &self,
        raw: &RawFrame,
        emissivity: f32,
        reflected: f32,
        out: &mut Temperatures,
    );
}

/// Driver settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mlx90640Config {
    /// 7-bit I2C address
    pub address: u8,
    /// Target emissivity
    pub emissivity: f32,
    /// Subtracted from the sensor ambient to estimate reflected temperature
    pub ta_shift: f32,
    /// How long to wait for the new-data flag before giving up
    ///
    /// Replaced by two subpage periods whenever a control word is written.
    pub ready_timeout_ms: u32,
}

impl Default for Mlx90640Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            emissivity: 0.95,
            // Open-air sensor
            ta_shift: 8.0,
            // Refresh rate unknown until configured; assume the slowest
            ready_timeout_ms: RefreshRate::Hz0_5.subpage_period_ms(),
        }
    }
}

/// MLX90640 on a blocking I2C bus
pub struct Mlx90640<I2C, D, R> {
    i2c: I2C,
    delay: D,
    radiometry: R,
    config: Mlx90640Config,
}

impl<I2C, D, R> Mlx90640<I2C, D, R>
where
    I2C: I2c,
    D: DelayNs,
    R: Radiometry,
{
    /// Create a new driver
    ///
    /// No bus traffic happens until the first call.
    pub fn new(i2c: I2C, delay: D, radiometry: R, config: Mlx90640Config) -> Self {
        Self {
            i2c,
            delay,
            radiometry,
            config,
        }
    }

    pub fn config(&self) -> &Mlx90640Config {
        &self.config
    }

    /// Release the bus, delay and radiometric model
    pub fn release(self) -> (I2C, D, R) {
        (self.i2c, self.delay, self.radiometry)
    }

    /// Read one register
    pub fn read_word(&mut self, reg: u16) -> Result<u16, SensorError> {
        let mut word = [0u16; 1];
        self.read_words(reg, &mut word)?;
        Ok(word[0])
    }

    /// Read consecutive registers starting at `start`
    pub fn read_words(&mut self, start: u16, out: &mut [u16]) -> Result<(), SensorError> {
        let mut bytes = [0u8; READ_CHUNK_WORDS * 2];

        for (i, chunk) in out.chunks_mut(READ_CHUNK_WORDS).enumerate() {
            let reg = start.wrapping_add((i * READ_CHUNK_WORDS) as u16);
            let bytes = &mut bytes[..chunk.len() * 2];
            self.i2c
                .write_read(self.config.address, &reg.to_be_bytes(), bytes)
                .map_err(bus_error)?;

            for (word, pair) in chunk.iter_mut().zip(bytes.chunks_exact(2)) {
                *word = u16::from_be_bytes([pair[0], pair[1]]);
            }
        }
        Ok(())
    }

    /// Write one register
    pub fn write_word(&mut self, reg: u16, value: u16) -> Result<(), SensorError> {
        let [reg_hi, reg_lo] = reg.to_be_bytes();
        let [val_hi, val_lo] = value.to_be_bytes();
        self.i2c
            .write(self.config.address, &[reg_hi, reg_lo, val_hi, val_lo])
            .map_err(bus_error)
    }

    /// Write one register and check that it reads back unchanged
    pub fn write_word_verified(&mut self, reg: u16, value: u16) -> Result<(), SensorError> {
        self.write_word(reg, value)?;
        if self.read_word(reg)? != value {
            #[cfg(feature = "defmt")]
            defmt::warn!("MLX90640 register {=u16:#x} did not verify", reg);
            return Err(SensorError::WriteVerify);
        }
        Ok(())
    }

    /// Read the calibration EEPROM
    pub fn dump_eeprom(&mut self, out: &mut [u16; EEPROM_WORDS]) -> Result<(), SensorError> {
        self.read_words(EEPROM_START, out)
    }

    /// Poll status until new data is flagged, returning that status
    fn wait_for_data(&mut self) -> Result<u16, SensorError> {
        let mut waited_ms = 0;
        loop {
            let status = self.read_word(REG_STATUS)?;
            if status & STATUS_NEW_DATA != 0 {
                return Ok(status);
            }
            if waited_ms >= self.config.ready_timeout_ms {
                #[cfg(feature = "defmt")]
                defmt::warn!("MLX90640 no data after {} ms", waited_ms);
                return Err(SensorError::Timeout);
            }
            self.delay.delay_ms(READY_POLL_MS);
            waited_ms += READY_POLL_MS;
        }
    }
}

impl<I2C, D, R> ThermalSensor for Mlx90640<I2C, D, R>
where
    I2C: I2c,
    D: DelayNs,
    R: Radiometry,
{
    fn write_control(&mut self, word: ControlWord) -> Result<(), SensorError> {
        self.write_word_verified(REG_CONTROL_1, word.bits())?;
        self.config.ready_timeout_ms = 2 * word.refresh_rate().subpage_period_ms();
        Ok(())
    }

    fn read_control(&mut self) -> Result<ControlWord, SensorError> {
        Ok(ControlWord::from_bits(self.read_word(REG_CONTROL_1)?))
    }

    fn fetch_raw(&mut self, raw: &mut RawFrame) -> Result<(), SensorError> {
        let mut status = self.wait_for_data()?;
        let mut reads = 0;

        while status & STATUS_NEW_DATA != 0 {
            if reads == MAX_FRAME_READS {
                return Err(SensorError::FrameData);
            }
            self.write_word(REG_STATUS, STATUS_CLEAR)?;
            self.read_words(RAM_START, &mut raw[..RAM_WORDS])?;
            status = self.read_word(REG_STATUS)?;
            reads += 1;
        }

        if reads > 1 {
            #[cfg(feature = "defmt")]
            defmt::debug!("MLX90640 frame took {} reads", reads);
        }

        raw[RAW_CONTROL_INDEX] = self.read_word(REG_CONTROL_1)?;
        raw[RAW_SUBPAGE_INDEX] = status & STATUS_SUBPAGE;
        Ok(())
    }

    fn convert(&mut self, raw: &RawFrame, temperatures: &mut Temperatures) {
        let reflected = self.radiometry.ambient(raw) - self.config.ta_shift;
        self.radiometry
            .object_temperatures(raw, self.config.emissivity, reflected, temperatures);
    }
}

fn bus_error<E: embedded_hal::i2c::Error>(_e: E) -> SensorError {
    #[cfg(feature = "defmt")]
    defmt::warn!("MLX90640 I2C error: {}", defmt::Debug2Format(&_e.kind()));
    SensorError::Bus
}

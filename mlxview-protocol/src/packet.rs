//! Packet encoding and decoding for the viewer protocol.
//!
//! Packet format:
//! - SYNC (1 byte): 0xA0 synchronization byte
//! - CMD (1 byte): command identifier
//! - LENGTH (2 bytes): payload length, little-endian
//! - PAYLOAD (LENGTH bytes): command-specific data
//!
//! There is no escaping and no checksum. Outbound payloads may be larger
//! than [`MAX_PAYLOAD_SIZE`] (a full frame is 3072 bytes); those are
//! streamed with [`write_header`] followed by the raw payload.

use embedded_io::Write;
use heapless::Vec;

/// Packet synchronization byte
pub const SYNC_BYTE: u8 = 0xA0;

/// SYNC + CMD + LENGTH
pub const HEADER_SIZE: usize = 4;

/// Maximum payload the receiver will buffer
pub const MAX_PAYLOAD_SIZE: usize = 255;

/// Maximum complete buffered packet size (header + MAX_PAYLOAD)
pub const MAX_PACKET_SIZE: usize = HEADER_SIZE + MAX_PAYLOAD_SIZE;

/// Errors that can occur during packet parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed packet with a bounded payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Command identifier
    pub cmd: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Packet {
    /// Create a new packet with the given command and payload
    pub fn new(cmd: u8, payload: &[u8]) -> Result<Self, PacketError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| PacketError::PayloadTooLarge)?;

        Ok(Self {
            cmd,
            payload: payload_vec,
        })
    }

    /// Create a packet with no payload
    pub fn empty(cmd: u8) -> Self {
        Self {
            cmd,
            payload: Vec::new(),
        }
    }

    /// Total encoded size of this packet
    pub fn encoded_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Encode this packet into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, PacketError> {
        let packet_len = self.encoded_len();
        if buffer.len() < packet_len {
            return Err(PacketError::BufferTooSmall);
        }

        let [len_lo, len_hi] = (self.payload.len() as u16).to_le_bytes();
        buffer[0] = SYNC_BYTE;
        buffer[1] = self.cmd;
        buffer[2] = len_lo;
        buffer[3] = len_hi;
        buffer[HEADER_SIZE..packet_len].copy_from_slice(&self.payload);

        Ok(packet_len)
    }

    /// Encode this packet into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_PACKET_SIZE>, PacketError> {
        let mut buffer = [0u8; MAX_PACKET_SIZE];
        let len = self.encode(&mut buffer)?;
        let mut vec = Vec::new();
        vec.extend_from_slice(&buffer[..len])
            .map_err(|_| PacketError::BufferTooSmall)?;
        Ok(vec)
    }

    /// Write this packet to a serial sink
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), W::Error> {
        write_header(w, self.cmd, self.payload.len() as u16)?;
        w.write_all(&self.payload)
    }
}

/// Write the four header bytes for a payload of `len` bytes
///
/// The caller must follow up with exactly `len` payload bytes.
pub fn write_header<W: Write>(w: &mut W, cmd: u8, len: u16) -> Result<(), W::Error> {
    let [len_lo, len_hi] = len.to_le_bytes();
    w.write_all(&[SYNC_BYTE, cmd, len_lo, len_hi])
}

/// State machine for parsing incoming packets
#[derive(Debug, Clone)]
pub struct PacketParser {
    state: ParseState,
    cmd: u8,
    length_lo: u8,
    expected_length: u16,
    buffer: Vec<u8, MAX_PAYLOAD_SIZE>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Discarding bytes until SYNC
    WaitingForSync,
    /// Got SYNC, next byte is the command
    WaitingForCommand,
    /// Waiting for the low LENGTH byte
    WaitingForLengthLo,
    /// Waiting for the high LENGTH byte
    WaitingForLengthHi,
    /// Reading payload bytes
    ReadingPayload,
}

impl Default for PacketParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketParser {
    /// Create a new packet parser
    pub fn new() -> Self {
        Self {
            state: ParseState::WaitingForSync,
            cmd: 0,
            length_lo: 0,
            expected_length: 0,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::WaitingForSync;
        self.cmd = 0;
        self.length_lo = 0;
        self.expected_length = 0;
        self.buffer.clear();
    }

    /// True while hunting for a sync byte (no packet in progress)
    pub fn is_idle(&self) -> bool {
        self.state == ParseState::WaitingForSync
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(packet))` when a complete packet is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when a header was
    /// rejected. The parser is always ready for the next byte afterwards.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, PacketError> {
        match self.state {
            ParseState::WaitingForSync => {
                if byte == SYNC_BYTE {
                    self.state = ParseState::WaitingForCommand;
                }
                // Silently ignore non-SYNC bytes while waiting
                Ok(None)
            }
            ParseState::WaitingForCommand => {
                self.cmd = byte;
                self.state = ParseState::WaitingForLengthLo;
                Ok(None)
            }
            ParseState::WaitingForLengthLo => {
                self.length_lo = byte;
                self.state = ParseState::WaitingForLengthHi;
                Ok(None)
            }
            ParseState::WaitingForLengthHi => {
                let length = u16::from_le_bytes([self.length_lo, byte]);
                if length as usize > MAX_PAYLOAD_SIZE {
                    self.resync_after_header(byte);
                    return Err(PacketError::PayloadTooLarge);
                }

                self.expected_length = length;
                self.buffer.clear();
                if length == 0 {
                    return Ok(Some(self.take_packet()));
                }
                self.state = ParseState::ReadingPayload;
                Ok(None)
            }
            ParseState::ReadingPayload => {
                // Cannot overflow: expected_length was checked against capacity
                let _ = self.buffer.push(byte);
                if self.buffer.len() == self.expected_length as usize {
                    return Ok(Some(self.take_packet()));
                }
                Ok(None)
            }
        }
    }

    /// Decode every packet contained in `bytes`
    ///
    /// All bytes are consumed; a packet left incomplete at the end of the
    /// slice continues with the next call.
    pub fn decode<'a>(&'a mut self, bytes: &'a [u8]) -> Decoded<'a> {
        Decoded {
            parser: self,
            bytes: bytes.iter(),
        }
    }

    fn take_packet(&mut self) -> Packet {
        let packet = Packet {
            cmd: self.cmd,
            payload: core::mem::take(&mut self.buffer),
        };
        self.reset();
        packet
    }

    /// Drop a rejected header and rescan the bytes that followed its SYNC.
    ///
    /// At most three bytes (CMD + LENGTH) are replayed. Three bytes can never
    /// complete or reject another header, so the replay is silent.
    fn resync_after_header(&mut self, length_hi: u8) {
        let replay = [self.cmd, self.length_lo, length_hi];
        self.reset();
        for byte in replay {
            let _ = self.feed(byte);
        }
    }
}

/// Iterator over the packets decoded from a byte slice
pub struct Decoded<'a> {
    parser: &'a mut PacketParser,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Decoded<'_> {
    type Item = Result<Packet, PacketError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            match self.parser.feed(byte) {
                Ok(Some(packet)) => return Some(Ok(packet)),
                Ok(None) => {}
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

//! Host command dispatch
//!
//! Applies a completed inbound packet to the session tuning and reports
//! what happened over the debug channel.

use embedded_io::Write;
use mlxview_protocol::{write_debug, HostCommand, Packet, TuningError, TuningParameters};

/// What a dispatched packet did
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// New tuning committed
    TuningApplied(TuningParameters),
    /// Tuning payload refused; previous tuning kept
    TuningRejected(TuningError),
    /// Command identifier not handled by this device
    Ignored(u8),
}

/// Interpret one packet from the host
///
/// Accepted tuning is echoed as three debug messages (TMIN, TMAX, TAMB).
/// A rejected payload produces a single debug message and leaves `tuning`
/// as it was. Unknown commands produce nothing.
pub fn dispatch<W: Write>(
    tuning: &mut TuningParameters,
    packet: &Packet,
    out: &mut W,
) -> Result<Outcome, W::Error> {
    match HostCommand::from_packet(packet) {
        Ok(HostCommand::SetTuning(params)) => {
            *tuning = params;

            #[cfg(feature = "defmt")]
            defmt::info!("Tuning applied: {}", params);

            write_debug(out, format_args!("Tuning TMIN {:.6}", params.tmin))?;
            write_debug(out, format_args!("Tuning TMAX {:.6}", params.tmax))?;
            write_debug(out, format_args!("Tuning TAMB {:.6}", params.tamb_min))?;
            Ok(Outcome::TuningApplied(params))
        }
        Ok(HostCommand::Unknown(cmd)) => {
            #[cfg(feature = "defmt")]
            defmt::trace!("Ignoring command {=u8:#x}", cmd);

            Ok(Outcome::Ignored(cmd))
        }
        Err(e) => {
            #[cfg(feature = "defmt")]
            defmt::warn!("Tuning rejected: {}", e);

            write_debug(out, format_args!("Tuning rejected: {:?}", e))?;
            Ok(Outcome::TuningRejected(e))
        }
    }
}

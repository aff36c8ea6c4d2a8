//! Mixer actions to wire messages.
//!
//! Channels and buses are 1-indexed, as on the device's UI. `0` stands for
//! the Main LR output where the action supports it.

use std::{fmt, sync::Arc};

use super::{level::Step, Error};
use crate::midi::{ShortMsg, Tag};

pub const MAIN: u8 = 0;

/// MIDI channel on which the device listens for mute toggles.
pub const MUTE_CHANNEL: u8 = 2;
/// Control Change number of the Main LR mute.
pub const MAIN_MUTE_NOTE: u8 = 31;

pub const ON: u8 = 127;
pub const OFF: u8 = 0;

const CHANNEL_RANGE: &str = "1-32";
const BUS_RANGE: &str = "0(main) and 1-16";
const BUS_ONLY_RANGE: &str = "1-16";

/// An OSC-style address and value, tunneled to the device as sysex.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OscPayload(Arc<str>);

impl OscPayload {
    fn new(address: fmt::Arguments<'_>, step: Step) -> Self {
        Self(format!("{address} {}", step.db()).into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for OscPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message ready to be queued.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outgoing {
    Midi(ShortMsg),
    SysEx(OscPayload),
}

impl From<ShortMsg> for Outgoing {
    fn from(msg: ShortMsg) -> Self {
        Outgoing::Midi(msg)
    }
}

impl From<OscPayload> for Outgoing {
    fn from(payload: OscPayload) -> Self {
        Outgoing::SysEx(payload)
    }
}

/// Mutes or unmutes `channel`, `0` being the Main LR.
///
/// `channel` is not range checked. Up to 128, unknown notes are ignored by
/// the device. Above that, the data byte gets its high bit set and reads as
/// a status byte: the driver may refuse to send it, which stops the writer
/// and with it every outbound msg.
pub fn channel_mute(channel: u8, mute: bool) -> ShortMsg {
    let value = if mute { ON } else { OFF };
    let note = if channel == MAIN {
        MAIN_MUTE_NOTE
    } else {
        // 1-indexed on the UI, 0-indexed via MIDI
        channel - 1
    };

    ShortMsg::build(Tag::CONTROL_CHANGE, MUTE_CHANNEL, note, value)
}

/// Sets the send level of `channel` to `bus`, `0` being the Main LR fader.
pub fn channel_level(channel: u8, bus: u8, level: u8) -> Result<OscPayload, Error> {
    if bus > 16 {
        return Err(Error::BusOutOfRange {
            bus,
            range: BUS_RANGE,
        });
    }

    if !(1..=32).contains(&channel) {
        return Err(Error::ChannelOutOfRange {
            channel,
            range: CHANNEL_RANGE,
        });
    }

    let step = Step::try_from(level)?;

    Ok(if bus == MAIN {
        OscPayload::new(format_args!("/ch/{channel:02}/mix/fader"), step)
    } else {
        OscPayload::new(format_args!("/ch/{channel:02}/mix/{bus:02}/level"), step)
    })
}

pub fn main_level(level: u8) -> Result<OscPayload, Error> {
    let step = Step::try_from(level)?;

    Ok(OscPayload::new(format_args!("/main/st/mix/fader"), step))
}

pub fn bus_level(bus: u8, level: u8) -> Result<OscPayload, Error> {
    if !(1..=16).contains(&bus) {
        return Err(Error::BusOutOfRange {
            bus,
            range: BUS_ONLY_RANGE,
        });
    }

    let step = Step::try_from(level)?;

    Ok(OscPayload::new(format_args!("/bus/{bus:02}/mix/fader"), step))
}

/// Asks the device to dump its whole state: `B0 7F 7F`.
pub const fn midi_dump() -> ShortMsg {
    ShortMsg::build(Tag::CONTROL_CHANGE, 1, 127, 127)
}

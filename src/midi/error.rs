use std::sync::Arc;

use crate::bytes;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("MIDI initialization failed")]
    Init(#[from] midir::InitError),

    #[error("Error connecting to MIDI port {}", .0)]
    Connection(Arc<str>),

    #[error("Couldn't retrieve a MIDI port name")]
    PortInfo(#[from] midir::PortInfoError),

    #[error("No MIDI device is connected matching {}", .0)]
    DeviceNotFound(Arc<str>),

    #[error("Invalid size for sysex msg: {}", .0)]
    InvalidSysExSize(bytes::Hex<'static>),

    #[error("Invalid sysex init tag for msg: {}", .0)]
    InvalidSysExInitTag(bytes::Hex<'static>),

    #[error("Invalid sysex final tag for msg: {}", .0)]
    InvalidSysExFinalTag(bytes::Hex<'static>),

    #[error("Couldn't send MIDI message: {}", .0)]
    Send(#[from] midir::SendError),

    #[error("MIDI input stream closed")]
    InputClosed,
}

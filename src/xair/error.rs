use std::fmt;

use crate::midi;

/// Outbound queue identification.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Queue {
    Midi,
    SysEx,
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Queue::Midi => "midi",
            Queue::SysEx => "sysex",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Bus out of range, got '{bus}', range: {range}")]
    BusOutOfRange { bus: u8, range: &'static str },

    #[error("Channel out of range, got '{channel}', range: {range}")]
    ChannelOutOfRange { channel: u8, range: &'static str },

    #[error("Unknown level step '{}', available: 1-7", .0)]
    UnknownLevelStep(u8),

    #[error("The {} outbound queue is full", .0)]
    QueueFull(Queue),

    #[error("The outbound writer stopped, {} msg not queued", .0)]
    WriterStopped(Queue),

    #[error("The {} task panicked", .0)]
    TaskPanicked(&'static str),

    #[error("MIDI error: {}", .0)]
    Midi(#[from] midi::Error),
}

mod error;
pub use error::Error;

pub mod io;
pub use io::{frames, FrameSink, FrameSource, Input, Output};

pub mod msg;
pub use msg::ShortMsg;

pub mod port;
pub use port::Ports;

pub mod sysex;

/// Command nibble of a channel voice status byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Tag(u8);

impl Tag {
    pub const NOTE_OFF: Tag = Tag::from_cmd(0b1000);
    pub const NOTE_ON: Tag = Tag::from_cmd(0b1001);
    pub const CONTROL_CHANGE: Tag = Tag::from_cmd(0b1011);
    pub const PROGRAM_CHANGE: Tag = Tag::from_cmd(0b1100);

    /// Builds the tag from the 4 bits command, e.g. `0b1011` for Control Change.
    pub const fn from_cmd(cmd: u8) -> Self {
        Self((cmd << 4) & 0xf0)
    }

    pub const fn from_status(status: u8) -> Self {
        Self(status & 0xf0)
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag.0
    }
}

/// Zero-indexed MIDI channel nibble.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Channel(u8);

impl Channel {
    /// Converts a 1-indexed channel, as shown to users, to its wire nibble.
    ///
    /// Channel `0` wraps to `0x0f` like any other out of range value:
    /// only the low nibble is kept.
    pub const fn from_one_based(chan: u8) -> Self {
        Self(chan.wrapping_sub(1) & 0x0f)
    }

    pub const fn from_status(status: u8) -> Self {
        Self(status & 0x0f)
    }
}

impl From<Channel> for u8 {
    fn from(chan: Channel) -> u8 {
        chan.0
    }
}

impl std::ops::BitOr<Channel> for Tag {
    type Output = u8;

    fn bitor(self, chan: Channel) -> Self::Output {
        self.0 | chan.0
    }
}

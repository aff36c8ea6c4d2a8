use super::{Channel, Tag};
use crate::bytes;

/// A 3 bytes channel voice message.
///
/// Built once and handed over to the outbound queue which owns it
/// until it is written.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ShortMsg {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl ShortMsg {
    /// Builds the message for the 1-indexed `chan`.
    ///
    /// Data bytes are not range checked.
    pub const fn build(tag: Tag, chan: u8, note: u8, value: u8) -> Self {
        Self {
            status: tag.0 | Channel::from_one_based(chan).0,
            data1: note,
            data2: value,
        }
    }

    pub fn tag(&self) -> Tag {
        Tag::from_status(self.status)
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.status, self.data1, self.data2]
    }

    pub fn display(&self) -> bytes::Hex<'static> {
        bytes::Hex::from(self.to_bytes().to_vec())
    }
}

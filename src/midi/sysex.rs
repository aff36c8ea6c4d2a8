//! X-Air SysEx envelope.
//!
//! OSC-style text commands are tunneled to the device as
//! `F0 00 20 32 32 <payload> F7`.

use super::Error;
use crate::bytes;

pub const TAG: u8 = 0xf0;
pub const END_TAG: u8 = 0xf7;

/// `TAG` followed by the Behringer manufacturer id and the X-Air model id.
pub const PREFIX: [u8; 5] = [TAG, 0x00, 0x20, 0x32, 0x32];
pub const SUFFIX: [u8; 1] = [END_TAG];

pub fn wrap(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(PREFIX.len() + payload.len() + SUFFIX.len());

    frame.extend_from_slice(&PREFIX);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&SUFFIX);

    frame
}

/// Returns the payload of a frame built by [`wrap`].
pub fn unwrap(frame: &[u8]) -> Result<&[u8], Error> {
    if frame.len() < PREFIX.len() + SUFFIX.len() {
        return Err(Error::InvalidSysExSize(bytes::Hex::from(frame).to_owned()));
    }

    if !frame.starts_with(&PREFIX) {
        return Err(Error::InvalidSysExInitTag(
            bytes::Hex::from(frame).to_owned(),
        ));
    }

    if !frame.ends_with(&SUFFIX) {
        return Err(Error::InvalidSysExFinalTag(
            bytes::Hex::from(frame).to_owned(),
        ));
    }

    Ok(&frame[PREFIX.len()..frame.len() - SUFFIX.len()])
}

use std::{borrow::Cow, fmt};

/// Hex rendering of a raw frame, e.g. `F0 00 20 32 32 2F F7`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hex<'a>(Cow<'a, [u8]>);

impl<'a> From<&'a [u8]> for Hex<'a> {
    fn from(buf: &'a [u8]) -> Self {
        Self(Cow::Borrowed(buf))
    }
}

impl From<Vec<u8>> for Hex<'static> {
    fn from(buf: Vec<u8>) -> Self {
        Self(Cow::Owned(buf))
    }
}

impl<'a> Hex<'a> {
    pub fn to_owned(&self) -> Hex<'static> {
        Hex::from(self.0.to_vec())
    }
}

impl<'a> fmt::Display for Hex<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();

        match iter.next() {
            Some(first) => write!(f, "{first:02X}")?,
            None => return Ok(()),
        };

        for byte in iter {
            write!(f, " {byte:02X}")?;
        }

        Ok(())
    }
}

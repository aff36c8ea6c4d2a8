use super::Error;

pub const MIN: u8 = 1;
pub const MAX: u8 = 7;

// Fader positions on the device's 1024 steps scale:
// 225, 448, 640, 708, 770, 830 & 895.
const DB: [&str; MAX as usize] = ["-35", "-15", "-5", "-2.4", "0", "2.4", "5"];

/// A discrete fader position, from `1` (lowest) to `7` (highest).
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct Step(u8);

impl Step {
    /// The decibel string the device expects for this step.
    pub fn db(self) -> &'static str {
        DB[(self.0 - MIN) as usize]
    }
}

impl TryFrom<u8> for Step {
    type Error = Error;

    fn try_from(step: u8) -> Result<Self, Error> {
        if (MIN..=MAX).contains(&step) {
            Ok(Step(step))
        } else {
            Err(Error::UnknownLevelStep(step))
        }
    }
}

/// Looks up the decibel string for `step`.
pub fn db(step: u8) -> Result<&'static str, Error> {
    Step::try_from(step).map(Step::db)
}

pub mod bytes;

pub mod midi;

pub mod xair;
pub use xair::{Bridge, Config, Console};

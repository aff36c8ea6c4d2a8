use std::{num::NonZeroUsize, sync::Arc, time::Duration};

const fn non_zero(n: usize) -> NonZeroUsize {
    match NonZeroUsize::new(n) {
        Some(n) => n,
        None => panic!("capacity must not be zero"),
    }
}

pub const QUEUE_CAPACITY: NonZeroUsize = non_zero(16);
pub const INBOUND_CAPACITY: NonZeroUsize = non_zero(64);

#[derive(Clone, Debug)]
pub struct Config {
    /// Name under which the MIDI ports are opened.
    pub client_name: Arc<str>,
    /// Substring of the device's MIDI port names.
    pub device_name: Arc<str>,
    /// Pending msgs allowed in each outbound queue.
    ///
    /// Non zero: a rendezvous queue would only accept msgs while the writer waits.
    pub queue_capacity: NonZeroUsize,
    pub poll_interval: Duration,
    pub max_frame_len: usize,
    /// Inbound frames kept until read from [`Bridge::inbound`](super::Bridge::inbound).
    pub inbound_capacity: NonZeroUsize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            client_name: "xair-bridge".into(),
            device_name: "XR12".into(),
            queue_capacity: QUEUE_CAPACITY,
            poll_interval: Duration::from_millis(50),
            max_frame_len: 1024,
            inbound_capacity: INBOUND_CAPACITY,
        }
    }
}

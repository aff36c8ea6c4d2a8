use crossbeam_channel as channel;
use std::{thread, time::Duration};

use super::Error;
use crate::{bytes, midi};

/// Best effort reader of the device's sysex frames.
///
/// Frames are logged and forwarded as is, they are not decoded.
pub(super) struct Poller<I: midi::Input> {
    pub input: I,
    pub interval: Duration,
    pub max_frame_len: usize,
    pub frame_tx: channel::Sender<Vec<u8>>,
    pub shutdown_rx: channel::Receiver<()>,
}

impl<I: midi::Input> Poller<I> {
    pub fn spawn(self) -> thread::JoinHandle<Result<(), Error>> {
        thread::spawn(move || {
            log::debug!("Starting inbound poller");
            let res = self.run();
            if let Err(ref err) = res {
                log::error!("Inbound poller: {err}");
            }
            log::debug!("Inbound poller stopped");

            res
        })
    }

    fn run(mut self) -> Result<(), Error> {
        // One poll per tick.
        let ticker = channel::tick(self.interval);

        loop {
            channel::select! {
                recv(self.shutdown_rx) -> _ => break,
                recv(ticker) -> _ => {
                    let frame = self.input.poll_sysex(self.max_frame_len)?;
                    if frame.is_empty() {
                        continue;
                    }

                    log::info!("<-xair {}", bytes::Hex::from(frame.as_slice()));

                    if let Err(channel::TrySendError::Full(_)) = self.frame_tx.try_send(frame) {
                        log::warn!("Inbound frames queue full, dropping frame");
                    }
                }
            }
        }

        Ok(())
    }
}

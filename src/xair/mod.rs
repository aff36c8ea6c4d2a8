//! Behringer X-Air (XR12 & al.) bridge.
//!
//! Mixer actions are queued through the [`Console`] and written to the
//! device by a dedicated writer task. A poller task reads the sysex frames
//! the device sends back and forwards them to [`Bridge::inbound`].

pub mod command;
pub use command::{OscPayload, Outgoing};

pub mod config;
pub use config::Config;

mod dispatch;
pub use dispatch::{queues, Console, Drain};

mod error;
pub use error::{Error, Queue};

pub mod level;
pub use level::Step;

mod poller;

use crossbeam_channel as channel;
use std::thread;

use crate::midi;

type Task = thread::JoinHandle<Result<(), Error>>;

/// Owner of the device streams and of the tasks using them.
pub struct Bridge {
    console: Console,
    inbound: channel::Receiver<Vec<u8>>,
    shutdown_tx: Option<channel::Sender<()>>,
    writer: Option<Task>,
    poller: Option<Task>,
}

impl Bridge {
    /// Discovers the device named after `config.device_name` and starts the bridge.
    pub fn open(config: &Config) -> Result<Self, Error> {
        let ports = midi::Ports::discover(config.client_name.clone(), &config.device_name)?;
        let (in_name, out_name) = ports.names();
        log::debug!("Found {} on {in_name} / {out_name}", config.device_name);

        let (input, output) = ports.connect(config.inbound_capacity.get())?;

        Ok(Self::spawn(input, output, config))
    }

    /// Starts the writer & poller tasks on the provided streams.
    pub fn spawn(input: impl midi::Input, output: impl midi::Output, config: &Config) -> Self {
        let (console, drain) = queues(config.queue_capacity.get());
        let (frame_tx, inbound) = channel::bounded(config.inbound_capacity.get());
        let (shutdown_tx, shutdown_rx) = channel::bounded(0);

        let writer = dispatch::Writer {
            output,
            drain,
            shutdown_rx: shutdown_rx.clone(),
        }
        .spawn();

        let poller = poller::Poller {
            input,
            interval: config.poll_interval,
            max_frame_len: config.max_frame_len,
            frame_tx,
            shutdown_rx,
        }
        .spawn();

        Self {
            console,
            inbound,
            shutdown_tx: Some(shutdown_tx),
            writer: Some(writer),
            poller: Some(poller),
        }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Raw sysex frames received from the device.
    pub fn inbound(&self) -> &channel::Receiver<Vec<u8>> {
        &self.inbound
    }

    /// Stops both tasks, releasing the device streams.
    ///
    /// Msgs queued before this call are written first. Returns the first
    /// task failure, the writer's being reported first.
    pub fn close(mut self) -> Result<(), Error> {
        log::debug!("Closing bridge");
        self.shutdown_tx = None;

        let writer = join(self.writer.take(), "writer");
        let poller = join(self.poller.take(), "poller");

        writer.and(poller)
    }
}

impl Drop for Bridge {
    fn drop(&mut self) {
        // Dropping the sender is the shutdown signal.
        self.shutdown_tx = None;
    }
}

fn join(task: Option<Task>, name: &'static str) -> Result<(), Error> {
    match task {
        Some(task) => task.join().map_err(|_| Error::TaskPanicked(name))?,
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::midi::{sysex, ShortMsg};

    #[derive(Debug, PartialEq)]
    enum Written {
        Short([u8; 3]),
        SysEx(Vec<u8>),
    }

    struct MockOutput {
        written_tx: channel::Sender<Written>,
        fail: bool,
    }

    impl midi::Output for MockOutput {
        fn write_short(&mut self, msg: ShortMsg) -> Result<(), midi::Error> {
            if self.fail {
                return Err(midi::Error::Connection("mock out".into()));
            }
            self.written_tx.send(Written::Short(msg.to_bytes())).unwrap();
            Ok(())
        }

        fn write_sysex(&mut self, _timestamp: u64, frame: &[u8]) -> Result<(), midi::Error> {
            if self.fail {
                return Err(midi::Error::Connection("mock out".into()));
            }
            self.written_tx.send(Written::SysEx(frame.to_vec())).unwrap();
            Ok(())
        }
    }

    /// Reports its release by disconnecting `_released_tx`.
    struct TrackedInput {
        source: midi::FrameSource,
        _released_tx: channel::Sender<()>,
    }

    impl midi::Input for TrackedInput {
        fn poll_sysex(&mut self, max_len: usize) -> Result<Vec<u8>, midi::Error> {
            self.source.poll_sysex(max_len)
        }
    }

    struct Harness {
        bridge: Bridge,
        written_rx: channel::Receiver<Written>,
        frame_tx: midi::FrameSink,
        released_rx: channel::Receiver<()>,
    }

    fn harness(fail: bool) -> Harness {
        let (written_tx, written_rx) = channel::unbounded();
        let (frame_tx, source) = midi::frames(8);
        let (released_tx, released_rx) = channel::bounded(0);

        let config = Config {
            poll_interval: Duration::from_millis(5),
            max_frame_len: 16,
            ..Config::default()
        };

        let bridge = Bridge::spawn(
            TrackedInput {
                source,
                _released_tx: released_tx,
            },
            MockOutput { written_tx, fail },
            &config,
        );

        Harness {
            bridge,
            written_rx,
            frame_tx,
            released_rx,
        }
    }

    fn sysex_text(frame: &[u8]) -> String {
        String::from_utf8(sysex::unwrap(frame).unwrap().to_vec()).unwrap()
    }

    #[test]
    fn writes_both_queues() {
        let Harness {
            bridge,
            written_rx,
            frame_tx: _frame_tx,
            ..
        } = harness(false);

        let console = bridge.console();
        console.channel_level(5, 0, 5).unwrap();
        console.channel_mute(0, true).unwrap();
        console.channel_level(5, 3, 1).unwrap();
        console.trigger_midi_dump().unwrap();
        console.bus_level(16, 7).unwrap();

        bridge.close().unwrap();

        let written: Vec<Written> = written_rx.try_iter().collect();
        assert_eq!(written.len(), 5);

        // No order across queues, only within each queue.
        let shorts: Vec<[u8; 3]> = written
            .iter()
            .filter_map(|w| match w {
                Written::Short(bytes) => Some(*bytes),
                _ => None,
            })
            .collect();
        assert_eq!(shorts, [[0xb1, 31, 127], [0xb0, 0x7f, 0x7f]]);

        let texts: Vec<String> = written
            .iter()
            .filter_map(|w| match w {
                Written::SysEx(frame) => Some(sysex_text(frame)),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            [
                "/ch/05/mix/fader 0",
                "/ch/05/mix/03/level -35",
                "/bus/16/mix/fader 5",
            ]
        );
    }

    #[test]
    fn sysex_frames_are_enveloped() {
        let Harness {
            bridge,
            written_rx,
            frame_tx: _frame_tx,
            ..
        } = harness(false);

        bridge.console().main_level(5).unwrap();

        let written = written_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let mut expected = vec![0xf0, 0x00, 0x20, 0x32, 0x32];
        expected.extend_from_slice(b"/main/st/mix/fader 0");
        expected.push(0xf7);
        assert_eq!(written, Written::SysEx(expected));

        bridge.close().unwrap();
    }

    #[test]
    fn write_failure_stops_writer() {
        let Harness {
            bridge,
            written_rx,
            frame_tx: _frame_tx,
            ..
        } = harness(true);

        bridge.console().trigger_midi_dump().unwrap();

        // Wait for the writer to give up: its queues are then disconnected.
        let mut res = Ok(());
        for _ in 0..500 {
            res = bridge.console().bus_level(1, 1);
            if res.is_err() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(matches!(res, Err(Error::WriterStopped(Queue::SysEx))));

        assert!(matches!(
            bridge.close(),
            Err(Error::Midi(midi::Error::Connection(_)))
        ));
        assert!(written_rx.try_recv().is_err());
    }

    #[test]
    fn inbound_frames_are_forwarded() {
        let Harness {
            bridge,
            written_rx: _written_rx,
            frame_tx,
            ..
        } = harness(false);

        // Only sysex frames are forwarded.
        frame_tx.push(&[0xb0, 0x7f, 0x7f]);

        let frame = sysex::wrap(b"/-stat/x");
        frame_tx.push(&frame);

        let received = bridge
            .inbound()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(received, frame);

        // Frames are truncated to `max_frame_len`.
        frame_tx.push(&[0xf0; 32]);
        let received = bridge
            .inbound()
            .recv_timeout(Duration::from_secs(5))
            .unwrap();
        assert_eq!(received, vec![0xf0; 16]);

        bridge.close().unwrap();
    }

    #[test]
    fn read_failure_stops_poller() {
        let Harness {
            bridge,
            written_rx: _written_rx,
            frame_tx,
            ..
        } = harness(false);

        drop(frame_tx);

        // The poller drops its side of the inbound channel when it stops.
        assert_eq!(
            bridge.inbound().recv_timeout(Duration::from_secs(5)),
            Err(channel::RecvTimeoutError::Disconnected)
        );

        // Outbound is not affected.
        bridge.console().trigger_midi_dump().unwrap();

        assert!(matches!(
            bridge.close(),
            Err(Error::Midi(midi::Error::InputClosed))
        ));
    }

    #[test]
    fn drop_flushes_and_releases_streams() {
        let Harness {
            bridge,
            written_rx,
            frame_tx: _frame_tx,
            released_rx,
        } = harness(false);

        bridge.console().channel_mute(3, true).unwrap();
        bridge.console().main_level(7).unwrap();
        drop(bridge);

        let mut written = Vec::new();
        loop {
            match written_rx.recv_timeout(Duration::from_secs(5)) {
                Ok(msg) => written.push(msg),
                Err(err) => {
                    // The writer dropped the output when it stopped.
                    assert_eq!(err, channel::RecvTimeoutError::Disconnected);
                    break;
                }
            }
        }
        assert_eq!(written.len(), 2);
        assert!(written.contains(&Written::Short([0xb1, 2, 127])));
        assert!(written.iter().any(|w| match w {
            Written::SysEx(frame) => sysex_text(frame) == "/main/st/mix/fader 5",
            _ => false,
        }));

        // The poller dropped the input when it stopped.
        assert_eq!(
            released_rx.recv_timeout(Duration::from_secs(5)),
            Err(channel::RecvTimeoutError::Disconnected)
        );
    }
}

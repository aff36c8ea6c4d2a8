use crossbeam_channel as channel;

use super::{sysex, Error, ShortMsg};
use crate::bytes;

/// Device bound half of the duplex stream.
pub trait Output: Send + 'static {
    /// Writes a channel voice message. Blocks until the message is handed to the driver.
    fn write_short(&mut self, msg: ShortMsg) -> Result<(), Error>;

    /// Writes a complete SysEx `frame`, envelope included.
    ///
    /// `timestamp` is expressed in microseconds since the stream was opened.
    fn write_sysex(&mut self, timestamp: u64, frame: &[u8]) -> Result<(), Error>;
}

/// Host bound half of the duplex stream.
pub trait Input: Send + 'static {
    /// Returns the next pending SysEx frame, truncated to `max_len` bytes.
    ///
    /// Never blocks: returns an empty frame if nothing is pending.
    fn poll_sysex(&mut self, max_len: usize) -> Result<Vec<u8>, Error>;
}

pub struct MidirOutput(midir::MidiOutputConnection);

impl MidirOutput {
    pub(super) fn new(conn: midir::MidiOutputConnection) -> Self {
        Self(conn)
    }

    pub fn close(self) -> midir::MidiOutput {
        self.0.close()
    }
}

impl Output for MidirOutput {
    fn write_short(&mut self, msg: ShortMsg) -> Result<(), Error> {
        self.0.send(&msg.to_bytes()).map_err(|err| {
            log::error!("Failed to send MIDI msg {}: {err}", msg.display());
            err
        })?;

        Ok(())
    }

    fn write_sysex(&mut self, _timestamp: u64, frame: &[u8]) -> Result<(), Error> {
        // midir sends right away, there is no scheduling on our side.
        self.0.send(frame).map_err(|err| {
            log::error!("Failed to send sysex {}: {err}", bytes::Hex::from(frame));
            err
        })?;

        Ok(())
    }
}

/// Builds the pair carrying sysex frames from the driver callback to the poller.
///
/// At most `capacity` frames are kept until polled.
pub fn frames(capacity: usize) -> (FrameSink, FrameSource) {
    let (frame_tx, frame_rx) = channel::bounded(capacity);

    (FrameSink(frame_tx), FrameSource(frame_rx))
}

#[derive(Debug)]
pub struct FrameSink(channel::Sender<Vec<u8>>);

impl FrameSink {
    /// Keeps `msg` if it is a sysex frame and there is room left.
    pub fn push(&self, msg: &[u8]) {
        if msg.first() != Some(&sysex::TAG) {
            log::trace!("Ignoring non sysex msg {}", bytes::Hex::from(msg));
            return;
        }

        if let Err(channel::TrySendError::Full(_)) = self.0.try_send(msg.to_vec()) {
            log::warn!("Inbound sysex dropped: {}", bytes::Hex::from(msg));
        }
    }
}

#[derive(Debug)]
pub struct FrameSource(channel::Receiver<Vec<u8>>);

impl Input for FrameSource {
    fn poll_sysex(&mut self, max_len: usize) -> Result<Vec<u8>, Error> {
        match self.0.try_recv() {
            Ok(mut frame) => {
                frame.truncate(max_len);
                Ok(frame)
            }
            Err(channel::TryRecvError::Empty) => Ok(Vec::new()),
            Err(channel::TryRecvError::Disconnected) => Err(Error::InputClosed),
        }
    }
}

pub struct MidirInput {
    _conn: midir::MidiInputConnection<FrameSink>,
    source: FrameSource,
}

impl MidirInput {
    pub(super) fn connect(
        mut midi_input: midir::MidiInput,
        port: &midir::MidiInputPort,
        port_name: &str,
        client_port_name: &str,
        capacity: usize,
    ) -> Result<Self, Error> {
        midi_input.ignore(midir::Ignore::None);

        let (sink, source) = frames(capacity);
        let conn = midi_input
            .connect(
                port,
                client_port_name,
                |_ts, msg, sink: &mut FrameSink| sink.push(msg),
                sink,
            )
            .map_err(|_| {
                let err = Error::Connection(port_name.into());
                log::error!("{}", err);
                err
            })?;

        Ok(Self {
            _conn: conn,
            source,
        })
    }
}

impl Input for MidirInput {
    fn poll_sysex(&mut self, max_len: usize) -> Result<Vec<u8>, Error> {
        self.source.poll_sysex(max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_sysex_ignored() {
        let (sink, mut source) = frames(4);

        sink.push(&[0xb0, 0x01, 0x7f]);
        sink.push(&[]);
        assert!(source.poll_sysex(1024).unwrap().is_empty());

        sink.push(&[0xf0, 0x01, 0xf7]);
        assert_eq!(source.poll_sysex(1024).unwrap(), [0xf0, 0x01, 0xf7]);
    }

    #[test]
    fn dropped_when_full() {
        let (sink, mut source) = frames(1);

        sink.push(&[0xf0, 0x01, 0xf7]);
        sink.push(&[0xf0, 0x02, 0xf7]);

        assert_eq!(source.poll_sysex(1024).unwrap(), [0xf0, 0x01, 0xf7]);
        assert!(source.poll_sysex(1024).unwrap().is_empty());
    }

    #[test]
    fn truncated_to_max_len() {
        let (sink, mut source) = frames(4);

        sink.push(&[0xf0; 32]);
        assert_eq!(source.poll_sysex(16).unwrap(), vec![0xf0; 16]);

        sink.push(&[0xf0, 0x01, 0xf7]);
        assert_eq!(source.poll_sysex(16).unwrap(), [0xf0, 0x01, 0xf7]);
    }

    #[test]
    fn closed_when_sink_dropped() {
        let (sink, mut source) = frames(4);

        sink.push(&[0xf0, 0x01, 0xf7]);
        drop(sink);

        // Pending frames are still delivered.
        assert_eq!(source.poll_sysex(1024).unwrap(), [0xf0, 0x01, 0xf7]);
        assert!(matches!(source.poll_sysex(1024), Err(Error::InputClosed)));
    }
}

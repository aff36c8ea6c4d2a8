use crossbeam_channel as channel;
use std::{thread, time::Instant};

use super::{
    command::{self, OscPayload, Outgoing},
    Error, Queue,
};
use crate::midi::{self, sysex, ShortMsg};

/// Builds the two bounded outbound queues.
///
/// Each queue holds at most `capacity` pending msgs.
pub fn queues(capacity: usize) -> (Console, Drain) {
    let (midi_tx, midi_rx) = channel::bounded(capacity);
    let (sysex_tx, sysex_rx) = channel::bounded(capacity);

    (
        Console { midi_tx, sysex_tx },
        Drain { midi_rx, sysex_rx },
    )
}

/// Mixer actions entry point.
///
/// Actions never block: they either queue exactly one msg or fail.
/// Clones share the same queues.
#[derive(Clone, Debug)]
pub struct Console {
    midi_tx: channel::Sender<ShortMsg>,
    sysex_tx: channel::Sender<OscPayload>,
}

impl Console {
    pub fn send(&self, msg: impl Into<Outgoing>) -> Result<(), Error> {
        use channel::TrySendError::*;

        match msg.into() {
            Outgoing::Midi(msg) => self.midi_tx.try_send(msg).map_err(|err| match err {
                Full(_) => Error::QueueFull(Queue::Midi),
                Disconnected(_) => Error::WriterStopped(Queue::Midi),
            }),
            Outgoing::SysEx(payload) => {
                self.sysex_tx.try_send(payload).map_err(|err| match err {
                    Full(_) => Error::QueueFull(Queue::SysEx),
                    Disconnected(_) => Error::WriterStopped(Queue::SysEx),
                })
            }
        }
    }

    /// Mutes or unmutes `channel`, `0` being the Main LR.
    pub fn channel_mute(&self, channel: u8, mute: bool) -> Result<(), Error> {
        self.send(command::channel_mute(channel, mute))
    }

    /// Sets the level of `channel` (1-32) on `bus` (1-16), `0` being the Main LR.
    pub fn channel_level(&self, channel: u8, bus: u8, level: u8) -> Result<(), Error> {
        self.send(command::channel_level(channel, bus, level)?)
    }

    pub fn main_level(&self, level: u8) -> Result<(), Error> {
        self.send(command::main_level(level)?)
    }

    pub fn bus_level(&self, bus: u8, level: u8) -> Result<(), Error> {
        self.send(command::bus_level(bus, level)?)
    }

    pub fn trigger_midi_dump(&self) -> Result<(), Error> {
        self.send(command::midi_dump())
    }
}

/// Receiving side of the outbound queues.
#[derive(Debug)]
pub struct Drain {
    midi_rx: channel::Receiver<ShortMsg>,
    sysex_rx: channel::Receiver<OscPayload>,
}

impl Drain {
    pub fn try_next(&self) -> Option<Outgoing> {
        self.midi_rx
            .try_recv()
            .map(Outgoing::from)
            .or_else(|_| self.sysex_rx.try_recv().map(Outgoing::from))
            .ok()
    }
}

/// Single task writing queued msgs to the device.
pub(super) struct Writer<O: midi::Output> {
    pub output: O,
    pub drain: Drain,
    pub shutdown_rx: channel::Receiver<()>,
}

impl<O: midi::Output> Writer<O> {
    pub fn spawn(self) -> thread::JoinHandle<Result<(), Error>> {
        thread::spawn(move || {
            log::debug!("Starting outbound writer");
            let res = self.run();
            if let Err(ref err) = res {
                log::error!("Outbound writer: {err}");
            }
            log::debug!("Outbound writer stopped");

            res
        })
    }

    fn run(self) -> Result<(), Error> {
        let Writer {
            mut output,
            drain,
            shutdown_rx,
        } = self;
        let started = Instant::now();

        loop {
            // Order between both queues is whatever select! picks.
            channel::select! {
                recv(shutdown_rx) -> _ => break,
                recv(drain.midi_rx) -> msg => {
                    match msg {
                        Ok(msg) => write(&mut output, Outgoing::Midi(msg), started)?,
                        Err(_) => break,
                    }
                }
                recv(drain.sysex_rx) -> payload => {
                    match payload {
                        Ok(payload) => write(&mut output, Outgoing::SysEx(payload), started)?,
                        Err(_) => break,
                    }
                }
            }
        }

        // Flush what was queued before the shutdown request.
        while let Some(msg) = drain.try_next() {
            write(&mut output, msg, started)?;
        }

        Ok(())
    }
}

fn write(output: &mut impl midi::Output, msg: Outgoing, started: Instant) -> Result<(), Error> {
    match msg {
        Outgoing::Midi(msg) => {
            log::debug!(
                "->xair [midi] {:08b} {} {}",
                msg.status,
                msg.data1,
                msg.data2
            );
            output.write_short(msg)?;
        }
        Outgoing::SysEx(payload) => {
            log::debug!("->xair [sysex] {payload}");
            let frame = sysex::wrap(payload.as_bytes());
            output.write_sysex(started.elapsed().as_micros() as u64, &frame)?;
        }
    }

    Ok(())
}

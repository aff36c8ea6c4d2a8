use std::{fmt, sync::Arc};

use super::{
    io::{MidirInput, MidirOutput},
    Error,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Direction {
    In,
    Out,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &str {
        match self {
            Direction::In => "In Port",
            Direction::Out => "Out Port",
        }
    }
}

/// Returns the last port of `conn` whose name contains `device_name`.
fn find<IO: midir::MidiIO>(
    conn: &IO,
    direction: Direction,
    device_name: &str,
) -> Result<Option<(Arc<str>, IO::Port)>, Error> {
    let mut found = None;

    for port in conn.ports().iter() {
        let name = conn.port_name(port)?;
        log::debug!("{direction}: {name}");

        if name.contains(device_name) {
            found = Some((name.into(), port.clone()));
        }
    }

    Ok(found)
}

/// Lists the names of all the available ports.
pub fn list(client_name: &str) -> Result<Vec<(Direction, Arc<str>)>, Error> {
    let midi_in = midir::MidiInput::new(&format!("{client_name} list In ports"))?;
    let midi_out = midir::MidiOutput::new(&format!("{client_name} list Out ports"))?;

    let mut names = Vec::new();
    for port in midi_in.ports().iter() {
        names.push((Direction::In, midi_in.port_name(port)?.into()));
    }
    for port in midi_out.ports().iter() {
        names.push((Direction::Out, midi_out.port_name(port)?.into()));
    }

    Ok(names)
}

/// The matching input and output ports of a device, not connected yet.
pub struct Ports {
    client_name: Arc<str>,
    midi_in: midir::MidiInput,
    in_port: (Arc<str>, midir::MidiInputPort),
    midi_out: midir::MidiOutput,
    out_port: (Arc<str>, midir::MidiOutputPort),
}

impl fmt::Debug for Ports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ports")
            .field("client_name", &self.client_name)
            .field("in", &self.in_port.0)
            .field("out", &self.out_port.0)
            .finish()
    }
}

impl Ports {
    /// Looks up the input and output ports whose name contains `device_name`.
    ///
    /// Both sides are required.
    pub fn discover(client_name: Arc<str>, device_name: &str) -> Result<Self, Error> {
        let midi_in = midir::MidiInput::new(&format!("{client_name} In"))?;
        let midi_out = midir::MidiOutput::new(&format!("{client_name} Out"))?;

        let in_port = find(&midi_in, Direction::In, device_name)?;
        let out_port = find(&midi_out, Direction::Out, device_name)?;

        match (in_port, out_port) {
            (Some(in_port), Some(out_port)) => Ok(Self {
                client_name,
                midi_in,
                in_port,
                midi_out,
                out_port,
            }),
            _ => {
                let err = Error::DeviceNotFound(device_name.into());
                log::error!("{err}");
                Err(err)
            }
        }
    }

    pub fn names(&self) -> (Arc<str>, Arc<str>) {
        (self.in_port.0.clone(), self.out_port.0.clone())
    }

    /// Connects both ports.
    ///
    /// Inbound sysex frames are buffered up to `in_capacity` until polled.
    pub fn connect(self, in_capacity: usize) -> Result<(MidirInput, MidirOutput), Error> {
        let (in_name, in_port) = self.in_port;
        let input = MidirInput::connect(
            self.midi_in,
            &in_port,
            &in_name,
            &self.client_name,
            in_capacity,
        )?;
        log::info!("Connected for Input to {in_name}");

        let (out_name, out_port) = self.out_port;
        let conn = self
            .midi_out
            .connect(&out_port, &self.client_name)
            .map_err(|_| {
                let err = Error::Connection(out_name.clone());
                log::error!("{err}");
                err
            })?;
        log::info!("Connected for Output to {out_name}");

        Ok((input, MidirOutput::new(conn)))
    }
}

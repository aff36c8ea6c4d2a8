use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{io::BufRead, num::NonZeroUsize, time::Duration};

use xair_bridge::{bytes, midi, Bridge, Config};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Substring of the mixer's MIDI port names
    #[arg(short, long, env = "XAIR_DEVICE", default_value = "XR12")]
    device: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: log::LevelFilter,

    /// Pending msgs allowed in each outbound queue
    #[arg(long, default_value = "16")]
    queue_capacity: NonZeroUsize,

    /// Inbound polling interval in milliseconds
    #[arg(long, default_value = "50")]
    poll_ms: u64,

    /// List available MIDI ports and exit
    #[arg(long)]
    list_ports: bool,

    #[command(subcommand)]
    action: Option<Action>,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Mute or unmute a channel, 0 being the Main LR
    Mute {
        channel: u8,
        #[arg(value_parser = ["on", "off"])]
        state: String,
    },
    /// Set a channel level on a bus (1-16), 0 being the Main LR
    ChannelLevel { channel: u8, bus: u8, step: u8 },
    /// Set the Main LR level
    MainLevel { step: u8 },
    /// Set a bus master level
    BusLevel { bus: u8, step: u8 },
    /// Ask the mixer to dump its state
    Dump,
    /// Print the frames received from the mixer until stdin is closed
    Monitor,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.log_level)
        .init();

    let config = Config {
        device_name: args.device.as_str().into(),
        queue_capacity: args.queue_capacity,
        poll_interval: Duration::from_millis(args.poll_ms),
        ..Config::default()
    };

    if args.list_ports {
        for (direction, name) in midi::port::list(&config.client_name)? {
            println!("{direction}: {name}");
        }
        return Ok(());
    }

    let Some(action) = args.action else {
        log::warn!("Nothing to do");
        return Ok(());
    };

    let bridge = Bridge::open(&config)
        .with_context(|| format!("Couldn't open mixer {}", config.device_name))?;

    if let Err(err) = run(&bridge, action) {
        if let Err(close_err) = bridge.close() {
            use std::error::Error;

            log::error!("Error closing bridge: {}", close_err);
            if let Some(source) = close_err.source() {
                log::error!("\t{}", source)
            }
        }
        return Err(err);
    }

    // Leave some time for the mixer to answer.
    std::thread::sleep(config.poll_interval * 2);
    bridge.close()?;
    log::info!("Exiting");

    Ok(())
}

fn run(bridge: &Bridge, action: Action) -> anyhow::Result<()> {
    let console = bridge.console();

    match action {
        Action::Mute { channel, state } => console.channel_mute(channel, state == "on")?,
        Action::ChannelLevel { channel, bus, step } => {
            console.channel_level(channel, bus, step)?
        }
        Action::MainLevel { step } => console.main_level(step)?,
        Action::BusLevel { bus, step } => console.bus_level(bus, step)?,
        Action::Dump => console.trigger_midi_dump()?,
        Action::Monitor => {
            let inbound = bridge.inbound().clone();
            std::thread::spawn(move || {
                for frame in inbound.iter() {
                    println!("{}", bytes::Hex::from(frame));
                }
            });

            console.trigger_midi_dump()?;

            // Ctrl-D to stop
            for line in std::io::stdin().lock().lines() {
                line?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_queue_capacity_rejected() {
        assert!(Args::try_parse_from(["xair-bridge", "--queue-capacity", "0", "dump"]).is_err());

        let args =
            Args::try_parse_from(["xair-bridge", "--queue-capacity", "1", "dump"]).unwrap();
        assert_eq!(args.queue_capacity.get(), 1);
        assert!(matches!(args.action, Some(Action::Dump)));
    }

    #[test]
    fn default_capacities() {
        let args = Args::try_parse_from(["xair-bridge", "main-level", "5"]).unwrap();
        assert_eq!(args.queue_capacity, xair_bridge::xair::config::QUEUE_CAPACITY);
        assert!(matches!(args.action, Some(Action::MainLevel { step: 5 })));
    }
}

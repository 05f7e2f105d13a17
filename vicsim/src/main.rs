use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use vicsim_core::{process_pending_commands, wire, CommandQueue, SimConfig};

mod scenario;

use scenario::Scenario;

/// Replays a scenario's command timeline and prints the final world checksum.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON world plus command timeline)
    #[arg(long)]
    scenario: PathBuf,

    /// Simulation config (JSON); overrides the scenario's defines
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 10)]
    ticks: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = std::str::FromStr::from_str(&args.log_level).unwrap_or(log::LevelFilter::Info);
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .init();

    let mut scenario = Scenario::load(&args.scenario)?;
    let config = match &args.config {
        Some(path) => Some(
            SimConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        ),
        None => None,
    };

    let mut state = std::mem::take(&mut scenario.world);
    let capacity = match &config {
        Some(config) => {
            state.defines = config.defines.clone();
            config.queue_capacity
        }
        None => SimConfig::default().queue_capacity,
    };
    state.incoming_commands = CommandQueue::with_capacity(capacity);

    if let Some(last) = scenario.last_tick() {
        if last >= args.ticks {
            log::warn!(
                "Timeline runs to tick {} but only {} ticks requested",
                last,
                args.ticks
            );
        }
    }

    log::info!(
        "Starting at {} with {} nations",
        state.date,
        state.nations.len()
    );

    for tick in 0..args.ticks {
        // Everything goes through the wire codec, as it would from a peer.
        for payload in scenario.commands_at(tick) {
            let frame = wire::encode(payload)?;
            if !wire::receive(&state, &frame)? {
                log::warn!(
                    "Tick {}: queue full, dropped {:?} from {}",
                    tick,
                    payload.command.kind(),
                    payload.source
                );
            }
        }

        let processed = process_pending_commands(&mut state);
        if state.take_state_changed() {
            log::info!("Tick {} ({}): {} commands", tick, state.date, processed);
        }
        state.date = state.date.add_days(1);
    }

    log::info!("Simulation finished at {}", state.date);
    println!("checksum: {:016x}", state.checksum());

    Ok(())
}

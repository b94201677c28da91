//! polysynth - play the engine from a MIDI keyboard
//!
//! Run with: cargo run --features cpal -- --port 0

mod demo;
mod input;

use clap::Parser;
use color_eyre::eyre::Result as EyreResult;

use polysynth::{
    audio::AudioSession,
    config::DEFAULT_QUEUE_CAPACITY,
    io::dispatch::MidiDispatcher,
    synth::synthesizer::Synthesizer,
    voices, SynthConfig,
};

#[derive(Debug, Parser)]
#[command(name = "polysynth", about = "16-channel polyphonic MIDI synthesizer")]
struct Args {
    /// MIDI input port index (see --list)
    #[arg(short, long)]
    port: Option<usize>,

    /// List MIDI input ports and exit
    #[arg(short, long)]
    list: bool,

    /// Play a short built-in sequence instead of listening for MIDI
    #[arg(long)]
    demo: bool,

    /// Open the audio device at startup instead of on the first MIDI message
    #[arg(long)]
    eager: bool,

    /// Log every MIDI message
    #[arg(short, long)]
    verbose: bool,

    /// Preferred device buffer size in frames (0 = device default)
    #[arg(long, default_value_t = 1024)]
    block_size: u32,

    /// Capacity of the MIDI → audio message queue
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue: usize,

    /// Use the soft triangle patch instead of the square chip patch
    #[arg(long)]
    soft: bool,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();

    env_logger::builder()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .parse_default_env()
        .init();

    if args.list {
        return input::list_ports();
    }

    let config = SynthConfig::default()
        .verbose(args.verbose)
        .queue_capacity(args.queue)
        .block_size((args.block_size > 0).then_some(args.block_size));

    let factory = if args.soft { voices::soft } else { voices::chip };
    let (synth, producer) = Synthesizer::with_queue(&factory, config.queue_capacity);
    let session = AudioSession::new(synth, config.clone());
    let mut dispatcher = MidiDispatcher::from_config(&config, producer, session);

    if args.eager {
        dispatcher.start_session();
    }

    if args.demo {
        return demo::play(&mut dispatcher);
    }

    input::run(args.port, &mut dispatcher)
}

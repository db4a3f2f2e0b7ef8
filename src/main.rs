//! ═══════════════════════════════════════════════════════════════════════════════
//! NEUROSWARM CLI — Run the Signal-Driven Flock
//! ═══════════════════════════════════════════════════════════════════════════════

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use neuroswarm::classifier::ClassifierKind;
use neuroswarm::config::SwarmConfig;
use neuroswarm::display;
use neuroswarm::driver::SimLoop;
use neuroswarm::stream::{
    spawn_csv_playback, spawn_fake_brain, FakeBrainConfig, PlaybackConfig, StreamInfo,
};

#[derive(Parser)]
#[command(name = "neuroswarm")]
#[command(about = "A boids flock steered by a live EEG-style signal stream")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print the per-second dashboard and state transitions
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config file (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    /// Synthetic producer toggling between relaxed and stressed signal
    Fake,
    /// Replay a pre-recorded CSV
    Csv,
    /// No producer: the flock runs permanently relaxed
    None,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    Spectral,
    Magnitude,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation (default)
    Run {
        /// Sample producer to launch in-process
        #[arg(short, long, value_enum, default_value = "fake")]
        source: Source,

        /// CSV recording to replay (required with --source csv)
        #[arg(short = 'f', long)]
        recording: Option<PathBuf>,

        /// Divisor applied to recorded values
        #[arg(long, default_value = "100.0")]
        scale: f64,

        /// Classification strategy
        #[arg(long, value_enum, default_value = "spectral")]
        classifier: Strategy,

        /// Stop after this many ticks
        #[arg(short, long, default_value = "3600")]
        ticks: u64,
    },

    /// Scripted demo: fake brain + simulation for a fixed duration
    Showcase {
        /// Demo length in seconds
        #[arg(short, long, default_value = "30")]
        duration: u64,
    },

    /// Write the default configuration to a JSON file
    Init {
        /// Output path
        #[arg(default_value = "neuroswarm.json")]
        path: PathBuf,
    },
}

fn stream_info(config: &SwarmConfig, name: &str, source_id: &str) -> StreamInfo {
    StreamInfo {
        name: name.to_string(),
        stream_type: config.stream_type.clone(),
        channel_count: 4,
        nominal_srate: config.sample_rate as f64,
        source_id: source_id.to_string(),
    }
}

fn run(
    mut config: SwarmConfig,
    source: Source,
    recording: Option<PathBuf>,
    scale: f64,
    classifier: Strategy,
    ticks: u64,
) -> anyhow::Result<()> {
    config.classifier = match classifier {
        Strategy::Spectral => ClassifierKind::Spectral,
        Strategy::Magnitude => ClassifierKind::Magnitude,
    };

    let producer = match source {
        Source::Fake => Some(spawn_fake_brain(
            stream_info(&config, "BioSemi", "fake_brain_001"),
            FakeBrainConfig::default(),
        )),
        Source::Csv => {
            let path = recording
                .ok_or_else(|| anyhow::anyhow!("--source csv requires --recording <file>"))?;
            let playback = PlaybackConfig {
                scale,
                looped: true,
            };
            Some(spawn_csv_playback(
                stream_info(&config, "Playback", "playback_001"),
                &path,
                playback,
            )?)
        }
        Source::None => None,
    };

    display::welcome(config.flock.boid_count, &config.stream_type);

    let mut sim = SimLoop::new(config);
    sim.run(Some(ticks));
    display::summary(sim.tick_count(), sim.transitions(), sim.state());

    if let Some(producer) = producer {
        producer.stop();
    }
    Ok(())
}

fn showcase(mut config: SwarmConfig, duration: u64) -> anyhow::Result<()> {
    // Short toggle interval so the demo shows both temperaments
    let brain = FakeBrainConfig {
        toggle_interval_secs: (duration as f64 / 3.0).max(5.0),
        ..FakeBrainConfig::default()
    };
    let producer = spawn_fake_brain(stream_info(&config, "BioSemi", "showcase_001"), brain);

    config.verbose = true;
    display::welcome(config.flock.boid_count, &config.stream_type);
    display::info(&format!("showcase: {}s, watch for the state flips", duration));

    let total_ticks = (duration as f64 * config.frame_rate) as u64;
    let mut sim = SimLoop::new(config);
    sim.run(Some(total_ticks));
    display::summary(sim.tick_count(), sim.transitions(), sim.state());

    producer.stop();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = SwarmConfig::load(cli.config.as_deref())?;
    config.verbose = config.verbose || cli.verbose;

    match cli.command {
        None => run(
            config,
            Source::Fake,
            None,
            100.0,
            Strategy::Spectral,
            3600,
        ),
        Some(Commands::Run {
            source,
            recording,
            scale,
            classifier,
            ticks,
        }) => run(config, source, recording, scale, classifier, ticks),
        Some(Commands::Showcase { duration }) => showcase(config, duration),
        Some(Commands::Init { path }) => {
            config.save(&path)?;
            display::info(&format!("wrote default config to {}", path.display()));
            Ok(())
        }
    }
}

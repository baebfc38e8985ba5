#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Chaos Summoner.

mod config;
mod headless;
mod simulation;

use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result};
use chaos_summoner_core::{StereoBuffer, TAGLINE, WELCOME_BANNER};
use chaos_summoner_rendering::{Color, Presentation, RenderingBackend, Scene};
use chaos_summoner_rendering_macroquad::MacroquadBackend;
use chaos_summoner_system_tone_synth::{encode_wav, synthesize};
use clap::{ArgAction, Parser};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{FileConfig, Overrides, Settings},
    simulation::{sparkles, synth_seed, Simulation},
};

/// Press the button, summon harmless chaos.
#[derive(Debug, Parser)]
#[command(name = "chaos-summoner", version, about)]
struct Args {
    /// Seed for every random generator; a random seed is logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without a window, pressing the button `--presses` times.
    #[arg(long)]
    headless: bool,

    /// Number of scripted presses in headless mode.
    #[arg(long, value_name = "N", default_value_t = 1)]
    presses: u32,

    /// Freeze the synthetic global counters.
    #[arg(long)]
    no_drift: bool,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL", default_value_t = true, action = ArgAction::Set)]
    vsync: bool,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,

    /// Write the summon effect to a WAV file and exit.
    #[arg(long, value_name = "PATH")]
    export_wav: Option<PathBuf>,

    /// Log filter directives, overriding `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

/// Entry point for the Chaos Summoner command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref());

    let file = args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()
        .context("failed to load configuration")?;
    let settings = Settings::resolve(
        file.as_ref(),
        Overrides {
            seed: args.seed,
            disable_drift: args.no_drift,
        },
        rand::random(),
    );
    info!(seed = settings.seed, "starting session");

    if let Some(path) = args.export_wav {
        let effect = summon_effect(&settings);
        let bytes = encode_wav(&effect).context("failed to encode summon effect")?;
        fs::write(&path, bytes)
            .with_context(|| format!("failed to write wav file at {}", path.display()))?;
        info!(path = %path.display(), frames = effect.frames(), "exported summon effect");
        return Ok(());
    }

    let mut simulation = Simulation::new(&settings);

    if args.headless {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        return headless::run(&mut simulation, args.presses, &mut out);
    }

    let effect = summon_effect(&settings);
    let mut sparkle_rng = ChaCha8Rng::seed_from_u64(settings.seed);
    let mut scene = Scene::new(WELCOME_BANNER, TAGLINE, sparkles(&mut sparkle_rng));
    simulation.populate_scene(&mut scene);

    let presentation = Presentation::new(
        WELCOME_BANNER,
        Color::from_rgb_u8(15, 23, 42),
        scene,
        effect,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);

    backend.run(presentation, move |dt, input, scene| {
        simulation.frame(dt, input, scene)
    })
}

fn summon_effect(settings: &Settings) -> StereoBuffer {
    let mut rng = ChaCha8Rng::seed_from_u64(synth_seed(settings.seed));
    synthesize(
        settings.sample_rate,
        settings.effect_duration_seconds,
        &mut rng,
    )
}

fn init_tracing(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

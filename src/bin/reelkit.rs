use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelkit", version)]
struct Cli {
    /// Engine config JSON. Flags below override its fields.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Group images by prefix and render one segment per group (requires `ffmpeg` on PATH).
    Compose(ComposeArgs),
    /// Render all images, in the given order, as a single segment (requires `ffmpeg` on PATH).
    Single(ComposeArgs),
    /// Print green-screen intervals of a video as JSON (requires `ffmpeg` on PATH).
    Detect(DetectArgs),
    /// Print how images would be grouped, as JSON.
    Groups(GroupsArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Reference audio file.
    #[arg(long)]
    audio: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Aspect preset: 1:1, 16:9 or 9:16.
    #[arg(long)]
    aspect: Option<String>,

    #[arg(long)]
    fps: Option<u32>,

    /// Separator length in seconds.
    #[arg(long)]
    separator_sec: Option<f64>,

    /// Fail instead of replacing an existing output.
    #[arg(long)]
    no_overwrite: bool,

    /// Input images.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Video to scan.
    video: PathBuf,

    /// Seconds between sampled frames.
    #[arg(long)]
    interval: Option<f64>,

    /// Fraction of green pixels that marks a frame as green.
    #[arg(long)]
    threshold: Option<f64>,
}

#[derive(Parser, Debug)]
struct GroupsArgs {
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;
    match cli.cmd {
        Command::Compose(args) => cmd_compose(cfg, args),
        Command::Single(args) => cmd_single(cfg, args),
        Command::Detect(args) => cmd_detect(cfg, args),
        Command::Groups(args) => cmd_groups(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<reelkit::EngineConfig> {
    match path {
        Some(path) => Ok(reelkit::EngineConfig::from_json_file(path)?),
        None => Ok(reelkit::EngineConfig::default()),
    }
}

fn apply_overrides(mut cfg: reelkit::EngineConfig, args: &ComposeArgs) -> reelkit::EngineConfig {
    if let Some(aspect) = &args.aspect {
        cfg.aspect_ratio = aspect.clone();
    }
    if let Some(fps) = args.fps {
        cfg.fps = fps;
    }
    if let Some(sec) = args.separator_sec {
        cfg.separator_duration_sec = sec;
    }
    if args.no_overwrite {
        cfg.overwrite = false;
    }
    cfg
}

fn cmd_compose(cfg: reelkit::EngineConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let cfg = apply_overrides(cfg, &args);
    let media = reelkit::FfmpegMedia::detect()?;
    let report = reelkit::render_multi(
        &media,
        &args.images,
        &args.audio,
        &args.out,
        &cfg,
        &mut reelkit::LogProgress,
    )?;
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("serialize render report")?
    );
    Ok(())
}

fn cmd_single(cfg: reelkit::EngineConfig, args: ComposeArgs) -> anyhow::Result<()> {
    let cfg = apply_overrides(cfg, &args);
    let media = reelkit::FfmpegMedia::detect()?;
    reelkit::render_single(
        &media,
        &args.images,
        &args.audio,
        Some(&args.out),
        &cfg,
        &mut reelkit::LogProgress,
    )?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_detect(mut cfg: reelkit::EngineConfig, args: DetectArgs) -> anyhow::Result<()> {
    if let Some(interval) = args.interval {
        cfg.chroma.sample_interval_sec = interval;
    }
    if let Some(threshold) = args.threshold {
        cfg.chroma.green_threshold = threshold;
    }
    let media = reelkit::FfmpegMedia::detect()?;
    let intervals = reelkit::detect_green_screen(
        &media,
        &args.video,
        &cfg.chroma,
        &mut reelkit::LogProgress,
    )?;
    println!(
        "{}",
        serde_json::to_string_pretty(&intervals).context("serialize intervals")?
    );
    Ok(())
}

fn cmd_groups(args: GroupsArgs) -> anyhow::Result<()> {
    let groups = reelkit::group_images(&args.images);
    let listing: BTreeMap<&str, Vec<String>> = groups
        .iter()
        .map(|(prefix, assets)| {
            let names = assets
                .iter()
                .map(|a| reelkit::display_name(&a.path))
                .collect();
            (prefix.as_str(), names)
        })
        .collect();
    println!(
        "{}",
        serde_json::to_string_pretty(&listing).context("serialize groups")?
    );
    Ok(())
}

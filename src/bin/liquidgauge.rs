use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "liquidgauge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input panel JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input panel JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,

    /// Render frames on a rayon worker pool.
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
}

// Dark page background the gauges sit on.
const CLEAR_RGBA: [u8; 4] = [18, 20, 28, 255];

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn read_panel_json(path: &Path) -> anyhow::Result<liquidgauge::GaugePanel> {
    let f = File::open(path).with_context(|| format!("open panel '{}'", path.display()))?;
    let r = BufReader::new(f);
    let panel: liquidgauge::GaugePanel =
        serde_json::from_reader(r).with_context(|| "parse panel JSON")?;
    Ok(panel)
}

fn make_backend(
    choice: BackendChoice,
    settings: &liquidgauge::RenderSettings,
) -> anyhow::Result<Box<dyn liquidgauge::RenderBackend>> {
    let kind = match choice {
        BackendChoice::Cpu => liquidgauge::BackendKind::Cpu,
    };
    Ok(liquidgauge::create_backend(kind, settings)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let panel = read_panel_json(&args.in_path)?;
    panel.validate()?;

    let settings = liquidgauge::RenderSettings {
        clear_rgba: Some(CLEAR_RGBA),
    };
    let mut backend = make_backend(args.backend, &settings)?;

    let assets_root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let labels = liquidgauge::PreparedLabelStore::prepare(&panel, assets_root)?;

    let frame = liquidgauge::render_frame(
        &panel,
        liquidgauge::FrameIndex(args.frame),
        backend.as_mut(),
        &labels,
    )?;

    liquidgauge::write_png(&frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let panel = read_panel_json(&args.in_path)?;
    panel.validate()?;

    let settings = liquidgauge::RenderSettings {
        clear_rgba: Some(CLEAR_RGBA),
    };
    let mut backend = make_backend(args.backend, &settings)?;

    let assets_root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
    let labels = liquidgauge::PreparedLabelStore::prepare(&panel, assets_root)?;

    let opts = liquidgauge::RenderToMp4Opts {
        range: liquidgauge::FrameRange::new(liquidgauge::FrameIndex(0), panel.duration)?,
        bg_rgba: CLEAR_RGBA,
        overwrite: true,
        threading: liquidgauge::RenderThreading {
            parallel: args.parallel,
            ..liquidgauge::RenderThreading::default()
        },
    };

    liquidgauge::render_to_mp4(&panel, &args.out, opts, backend.as_mut(), &labels)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

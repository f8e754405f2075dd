use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use spine_export::logging::{LoggingConfig, init_logging};
use spine_export::{
    ExportConfig, Exporter, FORMAT_NAMES, Renderable, Rgba8, SceneFile, VideoOpts,
    format_with_video,
};

#[derive(Parser, Debug)]
#[command(name = "spine-export", version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the models of a scene file.
    Export(ExportArgs),
    /// List export format names.
    Formats,
    /// Write a text atlas from a JSON atlas description.
    Atlas(AtlasArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Scene JSON listing the models, front to back.
    #[arg(long)]
    scene: PathBuf,

    /// Export settings JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Format name (see `formats`).
    #[arg(long, default_value = "frame")]
    format: String,

    /// Output directory; overrides the config.
    #[arg(long)]
    out: Option<PathBuf>,

    /// One combined output instead of one per model.
    #[arg(long, default_value_t = false)]
    single: bool,

    /// Export only selected models.
    #[arg(long, default_value_t = false)]
    selected_only: bool,

    /// Fit the output to the models' bounds.
    #[arg(long, default_value_t = false)]
    auto_resolution: bool,

    /// Background as #RRGGBB or #RRGGBBAA.
    #[arg(long)]
    background: Option<Rgba8>,

    /// Frames per second for video formats.
    #[arg(long, default_value_t = 30.0)]
    fps: f32,

    /// Duration in seconds; negative uses the longest animation.
    #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
    duration: f32,

    /// Extra ffmpeg output arguments.
    #[arg(long, default_value = "")]
    ffmpeg_args: String,
}

#[derive(Parser, Debug)]
struct AtlasArgs {
    /// Atlas description JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output atlas path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Formats => {
            for name in FORMAT_NAMES {
                println!("{name}");
            }
            Ok(())
        }
        Command::Atlas(args) => cmd_atlas(args),
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(p) => ExportConfig::from_path(p)?,
        None => ExportConfig::default(),
    };
    if args.out.is_some() {
        config.output_dir = args.out.clone();
    }
    config.export_single |= args.single;
    config.render_selected_only |= args.selected_only;
    config.auto_resolution |= args.auto_resolution;
    if let Some(bg) = args.background {
        config.background = bg;
    }

    let video = VideoOpts {
        fps: args.fps,
        duration_secs: args.duration,
        custom_argument: args.ffmpeg_args.clone(),
    };
    let format = format_with_video(&args.format, video).with_context(|| {
        format!(
            "unknown format '{}' (expected one of: {})",
            args.format,
            FORMAT_NAMES.join(", ")
        )
    })?;

    let scene = SceneFile::from_path(&args.scene)?;
    let root = args
        .scene
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut models: Vec<Box<dyn Renderable>> = scene
        .load_models(&root)?
        .into_iter()
        .map(|m| Box::new(m) as Box<dyn Renderable>)
        .collect();

    let mut exporter = Exporter::new(config, format);
    let report = exporter.export(&mut models, None)?;
    for path in &report.written {
        println!("{}", path.display());
    }
    if !report.failed.is_empty() {
        anyhow::bail!("{} output(s) failed", report.failed.len());
    }
    Ok(())
}

fn cmd_atlas(args: AtlasArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read atlas description '{}'", args.in_path.display()))?;
    let images = spine_export::atlas::images_from_json(&text)?;
    spine_export::write_atlas_file(&args.out, &images)?;
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use inkgrid_poster::{EngineConfig, PosterEngine, RenderOptions, RenderRequest, RenderResult};

#[derive(Parser, Debug)]
#[command(name = "inkgrid-poster", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a tagged request JSON (`{"render": "poster" | "new_year" | ...}`) to PNG.
    Render(RenderArgs),
    /// Render the square concept card of a New-Year day.
    Concept(ConceptArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Output PNG path.
    #[arg(long, default_value = "mozhen_poster.png")]
    out: PathBuf,

    /// Engine config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output scale in [0.25, 1]. Overrides the request's value.
    #[arg(long)]
    scale: Option<f32>,

    /// Pixel ratio in [0.5, 4]. Overrides the request's value.
    #[arg(long)]
    pixel_ratio: Option<f32>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args, Debug)]
struct ConceptArgs {
    /// Day id: `ny_01`..`ny_09` or a bare day number.
    #[arg(long)]
    id: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inkgrid_poster=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args).await,
        Command::Concept(args) => cmd_concept(args).await,
    }
}

async fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let raw = std::fs::read(&args.in_path)
        .with_context(|| format!("read request '{}'", args.in_path.display()))?;
    let request: RenderRequest = serde_json::from_slice(&raw)
        .with_context(|| format!("parse request '{}'", args.in_path.display()))?;
    let options = merge_options(request.options(), &args.common);
    let request = request.with_options(options);

    let engine = build_engine(args.common.config.as_deref())?;
    let result = engine.render_request(&request).await?;
    write_png(&args.common.out, &result)
}

async fn cmd_concept(args: ConceptArgs) -> anyhow::Result<()> {
    let engine = build_engine(args.common.config.as_deref())?;
    let options = merge_options(RenderOptions::default(), &args.common);
    let result = engine.render_new_year_concept_png(&args.id, options).await?;
    write_png(&args.common.out, &result)
}

fn build_engine(config: Option<&Path>) -> anyhow::Result<PosterEngine> {
    let config = match config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    }
    .with_env_overrides();
    if !config.asset_root.is_dir() {
        tracing::warn!(
            root = %config.asset_root.display(),
            "asset root does not exist; brand assets will fall back"
        );
    }
    Ok(PosterEngine::new(config)?)
}

fn merge_options(base: RenderOptions, args: &CommonArgs) -> RenderOptions {
    RenderOptions {
        scale: args.scale.or(base.scale),
        pixel_ratio: args.pixel_ratio.or(base.pixel_ratio),
    }
}

fn write_png(out: &Path, result: &RenderResult) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(out, &result.png).with_context(|| format!("write png '{}'", out.display()))?;
    eprintln!(
        "wrote {} ({}x{} @{}x)",
        out.display(),
        result.width,
        result.height,
        result.pixel_ratio
    );
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use wavyte_filters::{CpuRenderer, CpuRendererOpts, EffectRequest, Entity, ISize};

#[derive(Parser, Debug)]
#[command(name = "wavyte-fx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an effect request as a PNG.
    Render(RenderArgs),
    /// Print the filter graph an effect request builds.
    Dump(DumpArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input effect request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Canvas width in pixels.
    #[arg(long, default_value_t = 256)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long, default_value_t = 256)]
    height: u32,

    /// Straight RGBA background, e.g. `0,0,0,255`. Transparent when omitted.
    #[arg(long, value_parser = parse_rgba)]
    background: Option<[u8; 4]>,
}

#[derive(Parser, Debug)]
struct DumpArgs {
    /// Input effect request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn read_request(path: &Path) -> anyhow::Result<EffectRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("read request '{}'", path.display()))?;
    Ok(EffectRequest::from_json(&json)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let request = read_request(&args.in_path)?;
    let mut renderer =
        CpuRenderer::new(CpuRendererOpts::default().with_clear_rgba(args.background));
    let root = request.build_root(&mut renderer)?;

    let mut frame = renderer.render_frame(ISize::new(args.width, args.height), |r, pass| {
        root.render(r, &Entity::new(), pass)
    })?;
    frame.unpremultiply();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let request = read_request(&args.in_path)?;
    let mut renderer = CpuRenderer::default();
    let root = request.build_root(&mut renderer)?;
    print!("{}", root.dump());
    println!("fingerprint {:016x}", root.fingerprint());
    Ok(())
}

fn parse_rgba(s: &str) -> Result<[u8; 4], String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u8>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    <[u8; 4]>::try_from(parts).map_err(|v| format!("expected 4 components, got {}", v.len()))
}

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use layercomp::{
    Adjustments, BlendMode, Composite, EditorSettings, FilterKind, LayerPatch, LayerStack,
    PixelBuffer, Point, SourceImage,
};

#[derive(Parser, Debug)]
#[command(name = "layercomp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a stack of images into one PNG.
    Composite(CompositeArgs),
    /// Apply a filter and tonal adjustments to a single image.
    Edit(EditArgs),
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Layer as `PATH[:key=value,...]`. Keys: blend, filter, opacity, brightness, contrast,
    /// saturation, hue, x, y, scale, hidden. A `:` suffix whose keys are not all in this list is
    /// part of the path.
    #[arg(long = "layer", required = true)]
    layers: Vec<LayerArg>,

    /// Treat the first `--layer` as the top of the stack instead of the bottom.
    #[arg(long)]
    top_first: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Engine settings JSON (canvas bounds, blur and sharpen parameters).
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print composite statistics as JSON on stdout.
    #[arg(long)]
    stats_json: bool,
}

#[derive(Parser, Debug)]
struct EditArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value = "normal")]
    filter: FilterKind,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    brightness: i32,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    contrast: i32,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    saturation: i32,

    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    hue: i32,

    #[arg(long, default_value_t = 100)]
    opacity: i32,

    /// Engine settings JSON (canvas bounds, blur and sharpen parameters).
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
struct LayerArg {
    path: PathBuf,
    patch: LayerPatch,
    x: Option<f64>,
    y: Option<f64>,
}

const LAYER_KEYS: [&str; 11] = [
    "blend",
    "filter",
    "opacity",
    "brightness",
    "contrast",
    "saturation",
    "hue",
    "x",
    "y",
    "scale",
    "hidden",
];

fn is_layer_options(tail: &str) -> bool {
    tail.split(',').all(|kv| {
        kv.split_once('=')
            .is_some_and(|(key, _)| LAYER_KEYS.contains(&key.trim()))
    })
}

impl FromStr for LayerArg {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, opts) = match s.rsplit_once(':') {
            Some((path, opts)) if is_layer_options(opts) => (path, Some(opts)),
            _ => (s, None),
        };
        if path.is_empty() {
            anyhow::bail!("layer path must be non-empty");
        }

        let mut arg = LayerArg {
            path: PathBuf::from(path),
            ..LayerArg::default()
        };
        let mut adjustments = Adjustments::default();
        let mut touched_adjustments = false;

        for kv in opts.into_iter().flat_map(|o| o.split(',')) {
            let (key, value) = kv
                .split_once('=')
                .with_context(|| format!("layer option '{kv}' must be key=value"))?;
            let value = value.trim();
            match key.trim() {
                "blend" => arg.patch.blend_mode = Some(value.parse::<BlendMode>()?),
                "filter" => arg.patch.filter = Some(value.parse::<FilterKind>()?),
                "opacity" => arg.patch.opacity = Some(parse_num(key, value)?),
                "brightness" => {
                    adjustments.brightness = parse_num(key, value)?;
                    touched_adjustments = true;
                }
                "contrast" => {
                    adjustments.contrast = parse_num(key, value)?;
                    touched_adjustments = true;
                }
                "saturation" => {
                    adjustments.saturation = parse_num(key, value)?;
                    touched_adjustments = true;
                }
                "hue" => {
                    adjustments.hue = parse_num(key, value)?;
                    touched_adjustments = true;
                }
                "x" => arg.x = Some(parse_num(key, value)?),
                "y" => arg.y = Some(parse_num(key, value)?),
                "scale" => arg.patch.scale = Some(parse_num(key, value)?),
                "hidden" => arg.patch.visible = Some(!parse_num::<bool>(key, value)?),
                other => anyhow::bail!("unknown layer option '{other}'"),
            }
        }
        if touched_adjustments {
            arg.patch.adjustments = Some(adjustments);
        }
        Ok(arg)
    }
}

fn parse_num<T>(key: &str, value: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse::<T>()
        .with_context(|| format!("invalid value '{value}' for layer option '{key}'"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Composite(args) => cmd_composite(args),
        Command::Edit(args) => cmd_edit(args),
    }
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let settings = read_settings(args.settings.as_deref())?;
    let mut layers = args.layers;
    if args.top_first {
        layers.reverse();
    }

    let mut stack = LayerStack::new(settings);
    for arg in layers {
        let source = SourceImage::new(read_image(&arg.path)?);
        let name = arg
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        let (next, id) = stack.add_layer(source, name.as_deref())?;

        let mut patch = arg.patch;
        if arg.x.is_some() || arg.y.is_some() {
            let center = next.get(id).map(|l| l.position).unwrap_or(Point::ZERO);
            patch.position = Some(Point::new(
                arg.x.unwrap_or(center.x),
                arg.y.unwrap_or(center.y),
            ));
        }
        stack = next
            .update_layer(id, patch)
            .with_context(|| format!("configure layer '{}'", arg.path.display()))?;
    }

    let composite = stack.composite()?;
    write_png(&args.out, &composite.buffer)?;

    if args.stats_json {
        println!("{}", stats_json(&composite));
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_edit(args: EditArgs) -> anyhow::Result<()> {
    let settings = read_settings(args.settings.as_deref())?;
    let image = read_image(&args.in_path)?;
    let canvas = layercomp::Canvas::fit(image.width(), image.height(), settings.canvas_bounds)?;

    let adjustments = Adjustments {
        brightness: args.brightness,
        contrast: args.contrast,
        saturation: args.saturation,
        hue: args.hue,
        opacity: args.opacity,
    };
    let composite = layercomp::composite_image(
        &image,
        canvas,
        args.filter,
        &adjustments,
        &settings.filters,
    )?;
    write_png(&args.out, &composite.buffer)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn read_settings(path: Option<&Path>) -> anyhow::Result<EditorSettings> {
    let Some(path) = path else {
        return Ok(EditorSettings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read settings '{}'", path.display()))?;
    Ok(EditorSettings::from_json_str(&text)?)
}

fn read_image(path: &Path) -> anyhow::Result<PixelBuffer> {
    let bytes = std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    layercomp::decode_image(&bytes).with_context(|| format!("decode image '{}'", path.display()))
}

fn write_png(path: &Path, buf: &PixelBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let png = layercomp::encode_png(buf)?;
    std::fs::write(path, png).with_context(|| format!("write png '{}'", path.display()))
}

fn stats_json(composite: &Composite) -> serde_json::Value {
    serde_json::json!({
        "width": composite.buffer.width(),
        "height": composite.buffer.height(),
        "layers_drawn": composite.layers_drawn,
        "layers_skipped": composite.layers_skipped,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/bin/layercomp.rs"]
mod tests;

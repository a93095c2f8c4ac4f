//! lvimg - Convert images to LVGL image descriptors
//!
//! A command-line tool turning PNG/JPEG/GIF/BMP/WebP files into LVGL C sources
//! and binary blobs, and turning those back into PNG.

mod prepare;
mod sizes;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use lvgl_image::{
    decode_to_rgba, parse_binary, parse_c_source, render_binary, render_c_source,
    render_c_source_all_depths, sanitize_symbol, ColorFormat, ConversionOutput, ConvertOptions,
    FrameConverter, Image, TrueColorDepth,
};
use sizes::{SizeConfig, TargetSize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "webp"];

#[derive(Parser)]
#[command(name = "lvimg")]
#[command(version)]
#[command(about = "Convert images to LVGL C arrays and binary blobs", long_about = None)]
struct Cli {
    /// Log every conversion step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single image
    Convert {
        /// Input image file (PNG, JPEG, GIF, BMP, WebP)
        input: PathBuf,

        /// C symbol name (default: the input file stem)
        #[arg(short, long)]
        name: Option<String>,

        /// Resize to WIDTHxHEIGHT before converting
        #[arg(short, long)]
        size: Option<TargetSize>,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Convert every image in a directory
    Batch {
        /// Directory holding the images (not searched recursively)
        dir: PathBuf,

        /// JSON file mapping file name prefixes to target sizes
        #[arg(long)]
        sizes: Option<PathBuf>,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Decode an LVGL C source or binary blob to PNG
    Decode {
        /// Input `.c` source or `.bin` blob
        input: PathBuf,

        /// Output PNG file (default: input with .png extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Color depth the true-color bytes were generated for
        #[arg(short, long, value_enum, default_value = "16")]
        depth: DepthArg,
    },
}

#[derive(Args, Clone)]
struct ConvertArgs {
    /// Output color format (true_color_332, true_color_565, true_color_565_swap,
    /// true_color_888, indexed_1, raw, raw_alpha, raw_chroma)
    #[arg(short, long, default_value = "true_color_565")]
    format: ColorFormat,

    /// Append an alpha byte to every pixel
    #[arg(short, long)]
    alpha: bool,

    /// Tag true-color output as chroma keyed (LV_IMG_CF_TRUE_COLOR_CHROMA_KEYED)
    #[arg(long)]
    chroma_keyed: bool,

    /// Floyd-Steinberg dithering for true-color formats
    #[arg(long)]
    dither: bool,

    /// Crop fully transparent borders first
    #[arg(long)]
    trim: bool,

    /// Emit every true-color depth into one C source
    #[arg(long)]
    all_depths: bool,

    /// Directory the outputs are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Which outputs to write
    #[arg(long, value_enum, default_value_t = Emit::C)]
    emit: Emit,
}

impl ConvertArgs {
    fn validate(&self) -> anyhow::Result<()> {
        if self.chroma_keyed {
            if !self.format.display(false).is_true_color() {
                bail!("--chroma-keyed needs a true-color format, got {}", self.format);
            }
            if self.alpha || self.all_depths {
                bail!("--chroma-keyed cannot be combined with --alpha or --all-depths");
            }
        }
        Ok(())
    }

    fn convert(&self, image: &Image<'_>, options: ConvertOptions) -> anyhow::Result<ConversionOutput> {
        let output = FrameConverter::new(image, options).convert(self.format, self.alpha)?;
        Ok(if self.chroma_keyed {
            output.chroma_keyed()
        } else {
            output
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    C,
    Bin,
    Both,
}

impl Emit {
    fn c_source(self) -> bool {
        matches!(self, Emit::C | Emit::Both)
    }

    fn binary(self) -> bool {
        matches!(self, Emit::Bin | Emit::Both)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DepthArg {
    #[value(name = "8")]
    Eight,
    #[value(name = "16")]
    Sixteen,
    #[value(name = "16swap")]
    SixteenSwap,
    #[value(name = "32")]
    ThirtyTwo,
}

impl From<DepthArg> for TrueColorDepth {
    fn from(depth: DepthArg) -> Self {
        match depth {
            DepthArg::Eight => TrueColorDepth::Rgb332,
            DepthArg::Sixteen => TrueColorDepth::Rgb565,
            DepthArg::SixteenSwap => TrueColorDepth::Rgb565Swap,
            DepthArg::ThirtyTwo => TrueColorDepth::Rgb888,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            name,
            size,
            args,
        } => {
            let name = match name {
                Some(name) => name,
                None => file_stem(&input)?,
            };
            args.validate()?;
            convert_file(&input, &name, size, &args)
        }
        Commands::Batch { dir, sizes, args } => {
            args.validate()?;
            run_batch(&dir, sizes.as_deref(), &args)
        }
        Commands::Decode {
            input,
            output,
            depth,
        } => {
            let output = output.unwrap_or_else(|| input.with_extension("png"));
            decode_file(&input, &output, depth.into())
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "lvimg=debug,lvgl_image=debug"
    } else {
        "lvimg=info,lvgl_image=warn"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn file_stem(path: &Path) -> anyhow::Result<String> {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .with_context(|| format!("'{}' has no file name", path.display()))
}

fn convert_file(
    input: &Path,
    name: &str,
    size: Option<TargetSize>,
    args: &ConvertArgs,
) -> anyhow::Result<()> {
    let img = image::open(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?
        .to_rgba8();
    let img = prepare::prepare(img, args.trim, size);
    let (width, height) = img.dimensions();
    let image = Image::new(width as usize, height as usize, img.as_raw())?;

    let options = ConvertOptions {
        dither: args.dither,
    };
    let symbol = sanitize_symbol(name);
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create '{}'", args.out_dir.display()))?;

    // every output gets its own converter
    if args.emit.c_source() {
        let source = if args.all_depths {
            render_c_source_all_depths(&image, &symbol, args.alpha, &options)?
        } else {
            render_c_source(&args.convert(&image, options.clone())?, &symbol)
        };
        write_output(&args.out_dir.join(format!("{}.c", symbol)), source.as_bytes())?;
    }
    if args.emit.binary() {
        let blob = render_binary(&args.convert(&image, options)?)?;
        write_output(&args.out_dir.join(format!("{}.bin", symbol)), &blob)?;
    }

    tracing::info!(
        input = %input.display(),
        symbol = %symbol,
        format = %args.format,
        width,
        height,
        "converted"
    );
    Ok(())
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write '{}'", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "written");
    Ok(())
}

/// Image files directly inside `dir`, sorted by path.
fn collect_images(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory '{}'", dir.display()))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if is_image {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

fn run_batch(dir: &Path, sizes: Option<&Path>, args: &ConvertArgs) -> anyhow::Result<()> {
    let config = match sizes {
        Some(path) => SizeConfig::load(path)?,
        None => SizeConfig::default(),
    };
    let images = collect_images(dir)?;
    if images.is_empty() {
        tracing::warn!(dir = %dir.display(), "no images found");
        return Ok(());
    }
    tracing::info!(count = images.len(), sizes = config.len(), "converting directory");

    let mut failed = 0;
    for path in &images {
        let result = file_stem(path).and_then(|stem| {
            let size = config.lookup(&stem);
            convert_file(path, &stem, size, args)
        });
        if let Err(e) = result {
            tracing::error!(input = %path.display(), "{:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} images failed to convert", failed, images.len());
    }
    Ok(())
}

fn decode_file(input: &Path, output: &Path, depth: TrueColorDepth) -> anyhow::Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read '{}'", input.display()))?;
    let is_source = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("c") || ext.eq_ignore_ascii_case("h"));
    let parsed = if is_source {
        let text = std::str::from_utf8(&bytes)
            .with_context(|| format!("'{}' is not UTF-8 text", input.display()))?;
        parse_c_source(text)
    } else {
        parse_binary(&bytes)
    }
    .with_context(|| format!("Failed to parse '{}'", input.display()))?;

    let rgba = decode_to_rgba(&parsed, depth)?;
    let img = image::RgbaImage::from_raw(parsed.width as u32, parsed.height as u32, rgba)
        .context("Decoded pixels do not match the image size")?;
    img.save(output)
        .with_context(|| format!("Failed to write '{}'", output.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        format = ?parsed.format,
        width = parsed.width,
        height = parsed.height,
        "decoded"
    );
    Ok(())
}

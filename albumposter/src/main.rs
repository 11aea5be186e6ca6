use albumposter_rs::{GeneratorConfig, OutputFormat, PosterData, PosterGenerator, PosterOutput};
use anyhow::{anyhow, bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// albumposter: Render a printable album poster from a JSON description
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the input poster JSON file
    #[clap(short, long)]
    pub input: String,

    /// Path to the output file to be created
    #[clap(short, long)]
    pub output: String,

    /// Output format, one of pdf or png. Inferred from the output extension when omitted
    #[clap(short, long)]
    pub format: Option<String>,

    /// Path to a JSON generator configuration file
    #[clap(long)]
    pub config: Option<String>,

    /// Raster page scale for PNG output
    #[clap(long)]
    pub scale: Option<f32>,

    /// Supersampling of the fade gradient (2 to 3)
    #[clap(long)]
    pub supersample: Option<f64>,

    /// Font URL, font file or installed family name, overriding customFont
    #[clap(long)]
    pub font: Option<String>,

    /// Additional directory to search for fonts (may be repeated)
    #[clap(long)]
    pub font_dir: Vec<String>,

    /// Do not load system fonts
    #[clap(long)]
    pub no_system_fonts: bool,

    /// Never fetch remote assets
    #[clap(long)]
    pub offline: bool,

    /// Leave out the scan code
    #[clap(long)]
    pub no_scan_code: bool,

    /// Store the auto-fitted title size back into the input file
    #[clap(long)]
    pub write_back: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[tokio::main]
async fn main() {
    let args: Args = Args::parse();
    init_logger(args.verbose);

    if let Err(err) = run(args).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let input = normalize_path(&args.input)?;
    let output = normalize_path(&args.output)?;

    let input_str = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let mut data: PosterData = serde_json::from_str(&input_str)
        .with_context(|| format!("Failed to parse input file as poster JSON: {}", input.display()))?;
    if let Some(font) = &args.font {
        data.custom_font = Some(font.clone());
    }

    let config = build_config(&args, &input, &output)?;
    let generator = PosterGenerator::new(config)?;
    let result = generator
        .generate_with_callback(&data, |size, _| {
            log::info!("Title auto-fitted to {size}px");
        })
        .await
        .context("Poster generation failed")?;

    std::fs::write(&output, &result.bytes)
        .with_context(|| format!("Failed to write output to {}", output.display()))?;
    log::info!("Wrote {} ({} bytes)", output.display(), result.bytes.len());

    if args.write_back {
        write_back(&input, &input_str, &result)?;
    }
    Ok(())
}

fn build_config(args: &Args, input: &Path, output: &Path) -> anyhow::Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let path = normalize_path(path)?;
            let config_str = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&config_str)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        }
        None => GeneratorConfig::default(),
    };

    config.format = match (&args.format, output.extension().and_then(|e| e.to_str())) {
        (Some(format), _) => OutputFormat::from_str(format)?,
        (None, Some(ext)) if ext.eq_ignore_ascii_case("png") => OutputFormat::Png,
        (None, Some(ext)) if ext.eq_ignore_ascii_case("pdf") => OutputFormat::Pdf,
        (None, _) => config.format,
    };
    if let Some(scale) = args.scale {
        config.scale = scale;
    }
    if let Some(supersample) = args.supersample {
        config.supersample = supersample;
    }
    for dir in &args.font_dir {
        config.fonts.font_dirs.push(normalize_path(dir)?);
    }
    if args.no_system_fonts {
        config.fonts.load_system_fonts = false;
    }
    if args.offline {
        config.allow_remote = false;
    }
    if args.no_scan_code {
        config.scan_code.enabled = false;
    }
    if config.base_dir.is_none() {
        config.base_dir = input.parent().map(Path::to_path_buf);
    }
    Ok(config)
}

/// Persist the auto-fit result, keeping every other field of the input as is.
fn write_back(input: &Path, input_str: &str, result: &PosterOutput) -> anyhow::Result<()> {
    let fit = result.scene.title_fit;
    if !fit.auto_fitted {
        return Ok(());
    }
    let mut json: serde_json::Value = serde_json::from_str(input_str)?;
    let object = json
        .as_object_mut()
        .ok_or_else(|| anyhow!("Input file is not a JSON object"))?;
    object.insert("titleSize".to_string(), fit.size_px.into());
    object.insert("initialTitleSizeSet".to_string(), true.into());

    let updated = serde_json::to_string_pretty(&json)?;
    std::fs::write(input, updated)
        .with_context(|| format!("Failed to update input file: {}", input.display()))?;
    log::info!("Stored title size {}px in {}", fit.size_px, input.display());
    Ok(())
}

fn normalize_path(path: &str) -> anyhow::Result<PathBuf> {
    let expanded = shellexpand::tilde(path.trim());
    if expanded.is_empty() {
        bail!("Empty path");
    }
    Ok(PathBuf::from(expanded.as_ref()))
}

use anyhow::Context;
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eink_quantize::{Algorithm, Background, PackedBuffer, Rotation};
use inkframe::error::TransportError;
use inkframe::models::{AppConfig, DisplaySpec};
use inkframe::rendering::{decode_png, encode_frame_png, encode_packed_png, render_contact_sheet};
use inkframe::server;
use inkframe::services::{
    choose, crop_and_compare, Command, CropOptions, HttpTransport, PanelStore, PipelineController,
    PipelineEvent, ProgressFn, Transport,
};

#[derive(Parser)]
#[command(name = "inkframe")]
#[command(about = "Crop, dither and upload photos to 7-color e-paper picture frames")]
struct Cli {
    /// Config file (default: $INKFRAME_CONFIG, then ./inkframe.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PNG photo into a packed panel buffer
    Convert {
        /// Input PNG
        input: PathBuf,

        /// Output file for the packed 4-bit buffer
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        crop: CropArgs,

        /// Also write one PNG per algorithm plus a contact sheet here
        #[arg(long)]
        previews: Option<PathBuf>,
    },
    /// Send a photo (PNG) or a packed buffer (.bin) to the frame
    Upload {
        /// Input PNG or packed .bin
        input: PathBuf,

        /// Frame address, e.g. 192.168.1.50 (default: device_url from config)
        #[arg(short, long)]
        device: Option<String>,

        #[command(flatten)]
        crop: CropArgs,
    },
    /// Render a packed buffer back to a PNG
    Preview {
        /// Packed .bin file
        input: PathBuf,

        /// Output PNG
        #[arg(short, long)]
        output: PathBuf,
    },
    /// List the dithering algorithms
    Algorithms,
    /// Run a simulated frame that accepts uploads
    Simulate {
        /// Port to listen on (default: simulator.port from config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Crop flags shared by `convert` and `upload`
#[derive(Args)]
struct CropArgs {
    /// Dithering algorithm (default: algorithm from config)
    #[arg(short, long)]
    algorithm: Option<Algorithm>,

    /// Clockwise rotation in degrees: 0, 90, 180 or 270
    #[arg(long, default_value_t = 0)]
    rotate: i32,

    /// Zoom in percent (default: fill the canvas)
    #[arg(long)]
    zoom: Option<u32>,

    /// Shift after fitting, in canvas pixels, as DX,DY
    #[arg(long, allow_hyphen_values = true)]
    pan: Option<PanOffset>,

    /// Fill for uncovered canvas areas: white or black
    #[arg(long)]
    background: Option<Background>,
}

#[derive(Clone, Copy)]
struct PanOffset(f32, f32);

impl FromStr for PanOffset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dx, dy) = s
            .split_once(',')
            .ok_or_else(|| format!("expected DX,DY, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid offset '{v}': {e}"))
        };
        Ok(PanOffset(parse(dx)?, parse(dy)?))
    }
}

impl CropArgs {
    fn options(&self) -> anyhow::Result<CropOptions> {
        let rotation = Rotation::from_degrees(self.rotate)
            .with_context(|| format!("rotation must be 0, 90, 180 or 270, got {}", self.rotate))?;
        Ok(CropOptions {
            rotation,
            zoom_percent: self.zoom,
            pan: self.pan.map(|p| (p.0, p.1)),
            background: self.background,
        })
    }
}

/// Transport for commands that never upload
struct NoDevice;

#[async_trait]
impl Transport for NoDevice {
    async fn upload(&self, _payload: Vec<u8>, _progress: ProgressFn) -> Result<(), TransportError> {
        Err(TransportError::Request("no device configured".to_string()))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { port } => {
            init_logging("inkframe=info,tower_http=debug", true);
            let config = AppConfig::load(cli.config.as_deref());
            run_simulator(port.unwrap_or(config.simulator.port)).await
        }
        command => {
            init_logging("inkframe=warn", false);
            let config = AppConfig::load(cli.config.as_deref());
            match command {
                Commands::Convert {
                    input,
                    output,
                    crop,
                    previews,
                } => run_convert(&config, &input, &output, &crop, previews.as_deref()).await,
                Commands::Upload {
                    input,
                    device,
                    crop,
                } => run_upload(&config, &input, device.as_deref(), &crop).await,
                Commands::Preview { input, output } => run_preview(&input, &output),
                Commands::Algorithms => {
                    run_algorithms_command(&config);
                    Ok(())
                }
                Commands::Simulate { .. } => unreachable!("handled above"),
            }
        }
    }
}

fn init_logging(default_filter: &str, timestamps: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());
    let registry = tracing_subscriber::registry().with(filter);
    if timestamps {
        registry.with(tracing_subscriber::fmt::layer()).init();
    } else {
        // Minimal logging for CLI
        registry
            .with(tracing_subscriber::fmt::layer().without_time())
            .init();
    }
}

/// Decode, crop and dither a photo, leaving the controller `Ready`
async fn prepare(
    controller: &mut PipelineController,
    config: &AppConfig,
    input: &Path,
    crop: &CropArgs,
    previews: Option<&Path>,
) -> anyhow::Result<Algorithm> {
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let source = decode_png(&bytes).with_context(|| format!("Cannot use {}", input.display()))?;
    let options = crop.options()?;
    let algorithm = crop.algorithm.unwrap_or(config.algorithm);

    crop_and_compare(controller, source, &options).await?;

    if let Some(dir) = previews {
        write_previews(controller, dir)?;
    }

    choose(controller, algorithm).await?;
    Ok(algorithm)
}

fn write_previews(controller: &PipelineController, dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    for frame in controller.comparison() {
        let path = dir.join(format!("{}.png", frame.algorithm().slug()));
        std::fs::write(&path, encode_frame_png(frame)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let sheet = dir.join("contact-sheet.png");
    std::fs::write(&sheet, render_contact_sheet(controller.comparison(), 0.5)?)
        .with_context(|| format!("Failed to write {}", sheet.display()))?;

    println!("Wrote previews to {}", dir.display());
    Ok(())
}

async fn run_convert(
    config: &AppConfig,
    input: &Path,
    output: &Path,
    crop: &CropArgs,
    previews: Option<&Path>,
) -> anyhow::Result<()> {
    let background = crop.background.unwrap_or(config.background);
    let mut controller = PipelineController::with_background(Arc::new(NoDevice), background);
    let algorithm = prepare(&mut controller, config, input, crop, previews).await?;

    let packed = controller
        .packed()
        .context("Pipeline finished without a packed buffer")?;
    std::fs::write(output, packed.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Converted {} ({} bytes, {})",
        output.display(),
        packed.len(),
        algorithm
    );
    Ok(())
}

async fn run_upload(
    config: &AppConfig,
    input: &Path,
    device: Option<&str>,
    crop: &CropArgs,
) -> anyhow::Result<()> {
    let device = device
        .or(config.device_url.as_deref())
        .context("No device given: pass --device or set device_url in the config")?;
    let url = config.upload_url(device);
    let transport = Arc::new(HttpTransport::new(
        &url,
        Duration::from_secs(config.upload_timeout_secs),
    )?);

    let is_packed = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bin"));
    if is_packed {
        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;
        DisplaySpec::PANEL_565.validate_size(bytes.len())?;

        let progress: ProgressFn = Arc::new(|pct| eprint!("\rUploading... {pct:>3}%"));
        let result = transport.upload(bytes, progress).await;
        eprintln!();
        result.with_context(|| format!("Upload to {url} failed"))?;
    } else {
        let background = crop.background.unwrap_or(config.background);
        let mut controller = PipelineController::with_background(transport, background);
        prepare(&mut controller, config, input, crop, None).await?;

        let mut events = controller.subscribe();
        let printer = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    PipelineEvent::UploadProgress(pct) => eprint!("\rUploading... {pct:>3}%"),
                    PipelineEvent::UploadSucceeded | PipelineEvent::UploadFailed(_) => break,
                    _ => {}
                }
            }
            eprintln!();
        });

        let result = controller.dispatch(Command::Upload).await;
        drop(controller);
        let _ = printer.await;
        result.with_context(|| format!("Upload to {url} failed"))?;
    }

    println!("Uploaded {} to {}", input.display(), url);
    Ok(())
}

fn run_preview(input: &Path, output: &Path) -> anyhow::Result<()> {
    let spec = DisplaySpec::PANEL_565;
    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    spec.validate_size(bytes.len())?;
    let packed = PackedBuffer::from_bytes(bytes, spec.width as usize, spec.height as usize)?;

    let png_bytes = encode_packed_png(&packed)?;
    std::fs::write(output, &png_bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Rendered {} ({} bytes)", output.display(), png_bytes.len());
    Ok(())
}

fn run_algorithms_command(config: &AppConfig) {
    println!("Dithering algorithms:\n");
    for algorithm in Algorithm::ALL {
        let marker = if algorithm == config.algorithm { "*" } else { " " };
        println!(
            "{marker} {:<16} {:<16} {}",
            algorithm.slug(),
            algorithm.name(),
            algorithm.description()
        );
    }
    println!("\n* default");
}

async fn run_simulator(port: u16) -> anyhow::Result<()> {
    let store = Arc::new(PanelStore::new());
    let app = server::build_router(store);

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "Panel simulator listening");

    axum::serve(listener, app).await?;

    Ok(())
}

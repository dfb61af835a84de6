use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inkslate::Config;
use inkslate::backend::{BackendSelector, DeviceContext};
use inkslate::draw::StrokeCompositor;
use inkslate::input::InputRouter;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

mod replay;

const DMI_DIR: &str = "/sys/class/dmi/id";

#[derive(Parser, Debug)]
#[command(name = "inkslate")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("INKSLATE_GIT_HASH"), ")"),
    about = "Pressure-sensitive stroke engine"
)]
struct Cli {
    /// Config file to use instead of ~/.config/inkslate/config.toml
    #[arg(long, short = 'c', value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Override the detected device manufacturer
    #[arg(long, value_name = "NAME", global = true)]
    manufacturer: Option<String>,

    /// Override the detected device model
    #[arg(long, value_name = "NAME", global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded event script and write the resulting canvas as PNG
    Replay {
        /// JSON script with pointer events and commands
        script: PathBuf,

        /// Output PNG path
        #[arg(long, short = 'o', value_name = "FILE")]
        output: PathBuf,
    },
    /// Print the detected device and the backend that would handle it
    Device,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut device = config.device_context(detect_device());
    if let Some(manufacturer) = cli.manufacturer {
        device.manufacturer = manufacturer;
    }
    if let Some(model) = cli.model {
        device.model = model;
    }

    match cli.command {
        Command::Replay { script, output } => run_replay(&config, &device, &script, &output),
        Command::Device => {
            let selector = BackendSelector::with_default_backends(config.prediction_params());
            let candidates = selector.candidate_names().join(", ");
            let mut router = InputRouter::select(selector, &device);

            println!("Device:     {}", device);
            println!("Candidates: {}", candidates);
            println!("Backend:    {}", router.active_vendor());

            router.cleanup();
            Ok(())
        }
    }
}

fn run_replay(config: &Config, device: &DeviceContext, script: &Path, output: &Path) -> Result<()> {
    let script = replay::Script::load(script)?;
    let width = script.width.unwrap_or(config.canvas.width);
    let height = script.height.unwrap_or(config.canvas.height);

    let selector = BackendSelector::with_default_backends(config.prediction_params());
    let mut router = InputRouter::select(selector, device);
    let mut compositor = StrokeCompositor::new(width, height, config.compositor_settings())
        .with_context(|| format!("Failed to create {}x{} canvas", width, height))?;

    log::info!(
        "Replaying {} steps on {}x{} canvas with {} backend",
        script.steps.len(),
        width,
        height,
        router.active_vendor()
    );
    let stats = replay::run(&script, &mut router, &mut compositor)?;
    router.cleanup();

    let file = File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    compositor
        .write_png(&mut writer)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Replayed {} events ({} ignored, {} undone) into {} strokes; wrote {}",
        stats.events,
        stats.ignored_events,
        stats.undos,
        compositor.history().len(),
        output.display()
    );
    Ok(())
}

/// Reads the device identity from DMI, falling back to "unknown".
fn detect_device() -> DeviceContext {
    let read = |name: &str| {
        fs::read_to_string(Path::new(DMI_DIR).join(name))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    };

    let unknown = DeviceContext::unknown();
    DeviceContext::new(
        read("sys_vendor").unwrap_or(unknown.manufacturer),
        read("product_name").unwrap_or(unknown.model),
    )
}

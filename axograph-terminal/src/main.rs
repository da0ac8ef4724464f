/// Axograph - interactive axonometric point graph in the terminal
///
/// Controls:
///   - Mouse: buttons, sliders, and the point squares in the side panel
///   - Q/ESC: Quit
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::Context;
use axograph_core::Settings;
use axograph_terminal::TerminalApp;
use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(name = "axograph", version, about = "Project 3D points onto a 2D axonometric graph")]
struct Cli {
    /// Settings file (JSON); defaults are used when it does not exist
    #[arg(long, default_value = "axograph.json")]
    config: PathBuf,

    /// Directory of scene files cycled by "Get Input"
    #[arg(long)]
    inputs: Option<PathBuf>,

    /// Directory "Save Data" writes output_<n>.csv files into
    #[arg(long)]
    outputs: Option<PathBuf>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;
    if let Some(inputs) = cli.inputs {
        settings.input_dir = inputs;
    }
    if let Some(outputs) = cli.outputs {
        settings.output_dir = outputs;
    }
    if let Some(fps) = cli.fps {
        settings.frame_rate = fps;
    }
    if let Some(log_file) = cli.log_file {
        settings.log_file = log_file;
    }
    settings.validate()?;

    init_logging(&settings.log_file)?;
    info!(
        "inputs from {}, outputs to {}, {} fps",
        settings.input_dir.display(),
        settings.output_dir.display(),
        settings.frame_rate
    );

    let mut app = TerminalApp::new(&settings)?;
    app.run()?;
    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

/// Globe Terminal Demo - Interactive ASCII globe
///
/// Controls:
///   - Mouse drag: Rotate the globe
///   - Scroll / + -: Zoom
///   - WASD / Arrow Keys: Nudge rotation
///   - R: Reset view
///   - Q/ESC: Quit

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use globe_core::ViewerConfig;
use globe_terminal::TerminalApp;

#[derive(Parser, Debug)]
#[command(name = "globe-terminal", about = "Render the globe as ASCII art in the terminal")]
struct Args {
    /// JSON viewer configuration; omitted fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of latitude bands
    #[arg(long)]
    latitude_bands: Option<u32>,

    /// Override the number of longitude bands
    #[arg(long)]
    longitude_bands: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ViewerConfig::from_json(&json)?
        }
        None => ViewerConfig::default(),
    };
    if let Some(bands) = args.latitude_bands {
        config.sphere.latitude_bands = bands;
    }
    if let Some(bands) = args.longitude_bands {
        config.sphere.longitude_bands = bands;
    }
    config.validate()?;

    println!("Globe Terminal Renderer - Loading...");

    let mut app = TerminalApp::new(&config)?;
    app.run()?;

    println!("Thank you for using Globe Terminal Renderer!");
    Ok(())
}

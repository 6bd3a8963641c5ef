use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Terminal conflict map
#[derive(Parser, Debug, Clone)]
#[command(name = "conflict-atlas")]
#[command(about = "Braille conflict map with clustering, heatmap and relationship arcs", long_about = None)]
pub struct Config {
    /// Directory holding boundary GeoJSON (world.geojson / countries.geojson)
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Intel feed JSON (relationships + severity)
    #[arg(short, long)]
    pub intel: Option<PathBuf>,

    /// Asset table JSON overriding the built-in capitals
    #[arg(short, long)]
    pub assets: Option<PathBuf>,

    /// Start in heatmap mode
    #[arg(long)]
    pub heatmap: bool,

    /// Upper bound for each data load
    #[arg(long, default_value = "5000")]
    pub load_timeout_ms: u64,

    /// Minimum time between redraws
    #[arg(long, default_value = "16")]
    pub frame_ms: u64,

    /// Log destination (the terminal is taken by the UI)
    #[arg(long, default_value = "conflict-atlas.log")]
    pub log_file: PathBuf,
}

impl Config {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }
}

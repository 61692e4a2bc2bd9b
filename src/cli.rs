use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use phong_tracer::tonemap::ToneMap;

/// Verbosity of the tracer's own messages.
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    /// Scene summary, render time and the saved path.
    Info,
    /// Adds skipped mesh faces, hierarchy shape and rays without a normal.
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ToneMapArg {
    Clamp,
    Reinhard,
    Aces,
}

impl From<ToneMapArg> for ToneMap {
    fn from(arg: ToneMapArg) -> Self {
        match arg {
            ToneMapArg::Clamp => ToneMap::Clamp,
            ToneMapArg::Reinhard => ToneMap::Reinhard,
            ToneMapArg::Aces => ToneMap::Aces,
        }
    }
}

#[derive(Parser)]
#[command(name = "phong-tracer")]
#[command(about = "Render a JSON scene with local Phong lighting")]
pub struct Args {
    /// Scene description
    #[arg(default_value = "scene.json")]
    pub scene: PathBuf,

    /// Output image name, without extension (defaults to the scene name)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Directory the image is written to
    #[arg(long, default_value = "renders")]
    pub dir: PathBuf,

    /// Trace on a single thread
    #[arg(long)]
    pub single_thread: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Overlay a framing grid every N pixels
    #[arg(long, value_name = "N")]
    pub grid: Option<u32>,

    #[arg(long, value_enum, default_value = "clamp")]
    pub tone_map: ToneMapArg,

    /// Verbosity of tracer messages; dependencies stay at warn
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

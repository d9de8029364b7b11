pub mod toml_config;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
use crate::core::ExportFormat;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "gin-tasting")]
#[command(about = "Collect, rank and export gin tasting scores")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory the export files are written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Line-delimited list of known gin names offered when renaming
    #[arg(long)]
    pub known_samples: Option<String>,

    /// Export format preselected in the save prompt
    #[arg(long)]
    pub format: Option<ExportFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::adapters::prompt::PromptFrontend;
#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};

pub use crate::config::toml_config::TastingConfig;
pub use crate::core::command::{Command, CommandOutcome, CommandScript};
pub use crate::core::session::TastingSession;
pub use crate::core::{ExportFormat, Ledger};
pub use crate::domain::catalog::KnownSamples;
pub use crate::utils::error::{Result, TastingError};

pub mod command;
pub mod export;
pub mod ledger;
pub mod report;
pub mod session;

pub use crate::core::ledger::Ledger;
pub use crate::domain::model::{ExportFormat, ExportRow, RankedSample, Score};
pub use crate::domain::ports::{ConfigProvider, Storage};
pub use crate::utils::error::Result;

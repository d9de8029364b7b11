use crate::domain::model::ExportFormat;
use crate::utils::error::{Result, TastingError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 前端送進品酒會的指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    InitializeSession {
        sample_count: usize,
        rater_names: Vec<String>,
    },
    SetScore {
        sample_id: String,
        rater: String,
        value: i64,
    },
    SetComment {
        sample_id: String,
        rater: String,
        #[serde(default)]
        text: String,
    },
    RenameSample {
        sample_id: String,
        new_name: String,
    },
    Export {
        format: ExportFormat,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::InitializeSession { .. } => "initialize_session",
            Command::SetScore { .. } => "set_score",
            Command::SetComment { .. } => "set_comment",
            Command::RenameSample { .. } => "rename_sample",
            Command::Export { .. } => "export",
        }
    }
}

/// 指令執行後的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Initialized { samples: usize, raters: usize },
    Updated,
    Exported { path: String, rows: usize },
}

/// JSON 陣列形式的指令腳本
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandScript {
    pub commands: Vec<Command>,
}

impl CommandScript {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(content)?;

        // 匯出格式先走 FromStr，錯誤才會是 UnsupportedFormat 而不是 JSON 錯誤
        for value in &raw {
            if value.get("command").and_then(|c| c.as_str()) != Some("export") {
                continue;
            }
            if let Some(format) = value.get("format").and_then(|f| f.as_str()) {
                format.parse::<ExportFormat>()?;
            }
        }

        let commands = raw
            .into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Command>, _>>()?;
        Ok(Self { commands })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TastingError::IoError)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// 腳本中所有匯出指令的格式
    pub fn export_formats(&self) -> Vec<ExportFormat> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                Command::Export { format } => Some(*format),
                _ => None,
            })
            .collect()
    }
}

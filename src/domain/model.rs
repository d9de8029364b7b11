use crate::utils::error::{Result, TastingError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const MIN_SAMPLES: usize = 1;
pub const MAX_SAMPLES: usize = 20;
pub const MIN_RATERS: usize = 1;
pub const MAX_RATERS: usize = 5;

/// 單一評分，保證落在 1..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    pub const DEFAULT: Score = Score(5);

    pub fn new(value: i64) -> Result<Self> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(TastingError::invalid_value(
                "score",
                value,
                format!("must be between {} and {}", Self::MIN, Self::MAX),
            ));
        }
        Ok(Score(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::DEFAULT
    }
}

impl TryFrom<i64> for Score {
    type Error = TastingError;

    fn try_from(value: i64) -> Result<Self> {
        Score::new(value)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Score::new(raw).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 一位評審對一支樣品的評分與評語
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub score: Score,
    pub comment: String,
}

/// 受評樣品；`entries` 依評審登記順序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub id: String,
    pub display_name: String,
    pub entries: Vec<Entry>,
}

impl Sample {
    pub fn new(id: String, rater_count: usize) -> Self {
        Self {
            display_name: id.clone(),
            id,
            entries: vec![Entry::default(); rater_count],
        }
    }

    pub fn total(&self) -> u32 {
        self.entries.iter().map(|e| u32::from(e.score.value())).sum()
    }
}

/// 排名中的一筆
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedSample<'a> {
    pub id: &'a str,
    pub display_name: &'a str,
    pub total: u32,
}

/// 匯出用的扁平資料列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "Sample")]
    pub sample: &'a str,
    #[serde(rename = "Rater")]
    pub rater: &'a str,
    #[serde(rename = "Score")]
    pub score: Score,
    #[serde(rename = "Comment")]
    pub comment: &'a str,
}

impl ExportRow<'_> {
    pub const HEADERS: [&'static str; 4] = ["Sample", "Rater", "Score", "Comment"];
}

/// 匯出格式；所有輸入來源 (腳本、TOML、命令列、互動) 都經過 `FromStr`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Excel => "Excel",
            ExportFormat::Csv => "CSV",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExportFormat {
    type Err = TastingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            _ => Err(TastingError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for ExportFormat {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        assert_eq!(Score::new(1).unwrap().value(), 1);
        assert_eq!(Score::new(10).unwrap().value(), 10);
        assert!(matches!(Score::new(0), Err(TastingError::InvalidValue { .. })));
        assert!(matches!(Score::new(11), Err(TastingError::InvalidValue { .. })));
        assert!(Score::new(-3).is_err());
        assert_eq!(Score::default(), Score::DEFAULT);
    }

    #[test]
    fn test_score_deserialize_rejects_out_of_range() {
        let ok: Score = serde_json::from_str("7").unwrap();
        assert_eq!(ok.value(), 7);
        assert!(serde_json::from_str::<Score>("42").is_err());
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("Excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!(" CSV ".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);

        match "pdf".parse::<ExportFormat>() {
            Err(TastingError::UnsupportedFormat(raw)) => assert_eq!(raw, "pdf"),
            other => panic!("expected UnsupportedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_export_format_deserialize_uses_same_rules() {
        let excel: ExportFormat = serde_json::from_str(r#""xlsx""#).unwrap();
        assert_eq!(excel, ExportFormat::Excel);
        let csv: ExportFormat = serde_json::from_str(r#""CSV""#).unwrap();
        assert_eq!(csv, ExportFormat::Csv);

        let err = serde_json::from_str::<ExportFormat>(r#""pdf""#).unwrap_err();
        assert!(err.to_string().contains("Unsupported export format: 'pdf'"));

        assert_eq!(serde_json::to_string(&ExportFormat::Excel).unwrap(), r#""excel""#);
    }

    #[test]
    fn test_new_sample_defaults() {
        let sample = Sample::new("Sample 1".to_string(), 3);
        assert_eq!(sample.display_name, "Sample 1");
        assert_eq!(sample.entries.len(), 3);
        assert_eq!(sample.total(), 15);
        assert!(sample.entries.iter().all(|e| e.comment.is_empty()));
    }
}

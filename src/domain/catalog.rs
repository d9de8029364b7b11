use crate::utils::error::Result;
use std::path::Path;

/// 啟動時讀入的已知琴酒名稱清單，重新命名時供選擇
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownSamples {
    names: Vec<String>,
}

impl KnownSamples {
    pub fn parse(content: &str) -> Self {
        let names = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { names }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let catalog = Self::parse(&content);
        tracing::debug!(
            "Loaded {} known samples from {}",
            catalog.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

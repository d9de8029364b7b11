use crate::domain::model::{
    Entry, ExportRow, RankedSample, Sample, Score, MAX_RATERS, MAX_SAMPLES, MIN_RATERS,
    MIN_SAMPLES,
};
use crate::utils::error::{Result, TastingError};
use crate::utils::validation::{validate_non_empty_string, validate_range};
use std::collections::HashMap;

/// 一次品酒會的全部評分與評語
///
/// 樣品與評審在 `initialize` 時建立，之後不會增減。
/// 所有查詢以樣品識別碼 (`"Sample 1"` ...) 與評審名稱為鍵；
/// 顯示名稱只影響輸出。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    samples: Vec<Sample>,
    raters: Vec<String>,
    sample_index: HashMap<String, usize>,
    rater_index: HashMap<String, usize>,
}

impl Ledger {
    pub fn initialize<S: AsRef<str>>(sample_count: usize, rater_names: &[S]) -> Result<Self> {
        validate_range("sample_count", sample_count, MIN_SAMPLES, MAX_SAMPLES)?;
        validate_range("rater_count", rater_names.len(), MIN_RATERS, MAX_RATERS)?;

        let mut raters = Vec::with_capacity(rater_names.len());
        let mut rater_index = HashMap::new();
        for (position, name) in rater_names.iter().enumerate() {
            let name = name.as_ref();
            validate_non_empty_string("rater_name", name)?;
            // 重複名稱不檢查；查詢時以第一位為準，後面同名者的格子停在預設分
            rater_index.entry(name.to_string()).or_insert(position);
            raters.push(name.to_string());
        }

        let mut samples = Vec::with_capacity(sample_count);
        let mut sample_index = HashMap::with_capacity(sample_count);
        for position in 0..sample_count {
            let id = format!("Sample {}", position + 1);
            sample_index.insert(id.clone(), position);
            samples.push(Sample::new(id, raters.len()));
        }

        tracing::debug!(
            "Initialized ledger with {} samples and {} raters",
            samples.len(),
            raters.len()
        );

        Ok(Self {
            samples,
            raters,
            sample_index,
            rater_index,
        })
    }

    pub fn set_score(&mut self, sample_id: &str, rater: &str, value: i64) -> Result<()> {
        let (sample_pos, rater_pos) = self.locate(sample_id, rater)?;
        let score = Score::new(value)?;
        self.samples[sample_pos].entries[rater_pos].score = score;
        tracing::trace!("Score for {} by {} set to {}", sample_id, rater, score);
        Ok(())
    }

    pub fn set_comment(&mut self, sample_id: &str, rater: &str, text: &str) -> Result<()> {
        let (sample_pos, rater_pos) = self.locate(sample_id, rater)?;
        self.samples[sample_pos].entries[rater_pos].comment = text.to_string();
        Ok(())
    }

    /// 不檢查與其他樣品的顯示名稱是否重複
    pub fn rename_sample(&mut self, sample_id: &str, new_name: &str) -> Result<()> {
        let sample_pos = self.sample_position(sample_id)?;
        if new_name.trim().is_empty() {
            return Err(TastingError::invalid_value(
                "display_name",
                new_name,
                "display name cannot be empty",
            ));
        }
        let sample = &mut self.samples[sample_pos];
        tracing::debug!("Renaming {} from '{}' to '{}'", sample.id, sample.display_name, new_name);
        sample.display_name = new_name.to_string();
        Ok(())
    }

    pub fn total_score(&self, sample_id: &str) -> Result<u32> {
        let sample_pos = self.sample_position(sample_id)?;
        Ok(self.samples[sample_pos].total())
    }

    /// 依總分由高到低排序；同分保留建立順序
    pub fn ranking(&self) -> Vec<RankedSample<'_>> {
        let mut ranked: Vec<RankedSample<'_>> = self
            .samples
            .iter()
            .map(|sample| RankedSample {
                id: sample.id.as_str(),
                display_name: sample.display_name.as_str(),
                total: sample.total(),
            })
            .collect();
        // sort_by 是穩定排序
        ranked.sort_by(|a, b| b.total.cmp(&a.total));
        ranked
    }

    pub fn top_n(&self, n: usize) -> Vec<RankedSample<'_>> {
        let mut ranked = self.ranking();
        ranked.truncate(n);
        ranked
    }

    /// 每個 (樣品, 評審) 一列；可重複呼叫，不會改變狀態
    pub fn export_rows(&self) -> impl Iterator<Item = ExportRow<'_>> + Clone + '_ {
        self.samples.iter().flat_map(move |sample| {
            self.raters
                .iter()
                .zip(sample.entries.iter())
                .map(move |(rater, entry)| ExportRow {
                    sample: sample.display_name.as_str(),
                    rater: rater.as_str(),
                    score: entry.score,
                    comment: entry.comment.as_str(),
                })
        })
    }

    pub fn score(&self, sample_id: &str, rater: &str) -> Result<Score> {
        self.entry(sample_id, rater).map(|entry| entry.score)
    }

    pub fn comment(&self, sample_id: &str, rater: &str) -> Result<&str> {
        self.entry(sample_id, rater).map(|entry| entry.comment.as_str())
    }

    pub fn display_name(&self, sample_id: &str) -> Result<&str> {
        let sample_pos = self.sample_position(sample_id)?;
        Ok(&self.samples[sample_pos].display_name)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn raters(&self) -> &[String] {
        &self.raters
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn rater_count(&self) -> usize {
        self.raters.len()
    }

    /// 單一樣品可能的最高總分
    pub fn max_total(&self) -> u32 {
        u32::from(Score::MAX) * self.raters.len() as u32
    }

    fn entry(&self, sample_id: &str, rater: &str) -> Result<&Entry> {
        let (sample_pos, rater_pos) = self.locate(sample_id, rater)?;
        Ok(&self.samples[sample_pos].entries[rater_pos])
    }

    fn locate(&self, sample_id: &str, rater: &str) -> Result<(usize, usize)> {
        let sample_pos = self.sample_position(sample_id)?;
        let rater_pos = *self
            .rater_index
            .get(rater)
            .ok_or_else(|| TastingError::unknown_rater(rater))?;
        Ok((sample_pos, rater_pos))
    }

    fn sample_position(&self, sample_id: &str) -> Result<usize> {
        self.sample_index
            .get(sample_id)
            .copied()
            .ok_or_else(|| TastingError::unknown_sample(sample_id))
    }
}

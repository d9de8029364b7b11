use crate::domain::model::ExportFormat;
use crate::utils::error::Result;

/// 匯出檔案的落地位置
pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
    /// 給使用者看的完整路徑
    fn describe(&self, path: &str) -> String {
        path.to_string()
    }
}

pub trait ConfigProvider {
    fn output_path(&self) -> &str;
    fn known_samples_file(&self) -> &str;
    fn default_format(&self) -> ExportFormat;
    fn chart_width(&self) -> usize;
    fn podium_places(&self) -> usize;
}

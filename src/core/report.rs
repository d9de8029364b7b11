use crate::core::Ledger;

pub const DEFAULT_PODIUM_PLACES: usize = 3;
pub const MAX_CHART_WIDTH: usize = 200;
const MEDALS: [&str; 3] = ["gold", "silver", "bronze"];

/// 總排名文字報告
pub fn ranking_report(ledger: &Ledger) -> String {
    let mut report = String::from("Overall ranking:");
    for entry in ledger.ranking() {
        report.push('\n');
        report.push_str(&format!("{}: {} points", entry.display_name, entry.total));
    }
    report
}

/// 每支樣品一條橫條，依建立順序；滿分 (10 × 評審數) 對應 `width` 格
///
/// `width` 超過 [`MAX_CHART_WIDTH`] 時以上限繪製。
pub fn bar_chart(ledger: &Ledger, width: usize) -> String {
    let width = width.min(MAX_CHART_WIDTH);
    let label_width = ledger
        .samples()
        .iter()
        .map(|s| s.display_name.chars().count())
        .max()
        .unwrap_or(0);
    let max_total = ledger.max_total().max(1) as usize;

    let mut lines = vec!["Total score per sample".to_string()];
    for sample in ledger.samples() {
        let total = sample.total() as usize;
        let bar_len = (total * width + max_total / 2) / max_total;
        lines.push(format!(
            "{:<label_width$} | {:<width$} {}",
            sample.display_name,
            "#".repeat(bar_len),
            total,
            label_width = label_width,
            width = width,
        ));
    }
    lines.join("\n")
}

/// 前幾名的頒獎台
pub fn podium(ledger: &Ledger, places: usize) -> String {
    let mut lines = vec![format!("Top {}", places)];
    for (index, entry) in ledger.top_n(places).iter().enumerate() {
        let medal = MEDALS.get(index).copied().unwrap_or("-");
        lines.push(format!(
            "{}. [{}] {} ({} points)",
            index + 1,
            medal,
            entry.display_name,
            entry.total
        ));
    }
    lines.join("\n")
}

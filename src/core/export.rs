use crate::core::{ExportFormat, ExportRow, Ledger, Storage};
use crate::utils::error::{Result, TastingError};
use chrono::NaiveDateTime;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const FILE_PREFIX: &str = "gin_tasting";
pub const SHEET_NAME: &str = "Tasting";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

pub type Clock = fn() -> NaiveDateTime;

pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// `gin_tasting_<YYYY-MM-DD_HH-MM-SS>.<ext>`
pub fn export_filename(format: ExportFormat, timestamp: NaiveDateTime) -> String {
    format!(
        "{}_{}.{}",
        FILE_PREFIX,
        timestamp.format(TIMESTAMP_FORMAT),
        format.extension()
    )
}

/// 一次成功匯出的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub format: ExportFormat,
    pub file_name: String,
    pub path: String,
    pub rows: usize,
}

pub struct Exporter<S: Storage> {
    storage: S,
    clock: Clock,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn export(&self, ledger: &Ledger, format: ExportFormat) -> Result<ExportReceipt> {
        let file_name = export_filename(format, (self.clock)());
        let path = self.storage.describe(&file_name);
        let rows = ledger.export_rows().count();

        tracing::debug!("Encoding {} rows as {}", rows, format);
        let data = match format {
            ExportFormat::Csv => encode_csv(ledger.export_rows()),
            ExportFormat::Excel => encode_xlsx(ledger.export_rows()),
        }
        .map_err(|reason| TastingError::export_failed(path.clone(), reason))?;

        tracing::debug!("Writing {} bytes to {}", data.len(), path);
        self.storage
            .write_file(&file_name, &data)
            .map_err(|e| TastingError::export_failed(path.clone(), e))?;

        tracing::info!("💾 Saved {} rows as {} to {}", rows, format, path);
        Ok(ExportReceipt {
            format,
            file_name,
            path,
            rows,
        })
    }
}

pub fn encode_csv<'a, I>(rows: I) -> std::result::Result<Vec<u8>, String>
where
    I: IntoIterator<Item = ExportRow<'a>>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer
        .write_record(ExportRow::HEADERS)
        .map_err(|e| e.to_string())?;
    for row in rows {
        writer.serialize(row).map_err(|e| e.to_string())?;
    }

    writer.into_inner().map_err(|e| e.to_string())
}

/// 最小的 SpreadsheetML 套件：單一工作表、行內字串
pub fn encode_xlsx<'a, I>(rows: I) -> std::result::Result<Vec<u8>, String>
where
    I: IntoIterator<Item = ExportRow<'a>>,
{
    build_xlsx(&sheet_xml(rows)).map_err(|e| e.to_string())
}

fn build_xlsx(sheet: &str) -> zip::result::ZipResult<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", workbook_xml()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/worksheets/sheet1.xml", sheet.to_string()),
    ];

    for (name, content) in parts.iter() {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

fn sheet_xml<'a, I>(rows: I) -> String
where
    I: IntoIterator<Item = ExportRow<'a>>,
{
    let mut xml = String::from(XML_DECLARATION);
    xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#);

    push_row(&mut xml, 1, |cells| {
        for (col, header) in ExportRow::HEADERS.iter().enumerate() {
            cells.push(string_cell(col, 1, header));
        }
    });

    for (index, row) in rows.into_iter().enumerate() {
        let r = index + 2;
        push_row(&mut xml, r, |cells| {
            cells.push(string_cell(0, r, row.sample));
            cells.push(string_cell(1, r, row.rater));
            cells.push(format!(
                r#"<c r="{}"><v>{}</v></c>"#,
                cell_ref(2, r),
                row.score.value()
            ));
            cells.push(string_cell(3, r, row.comment));
        });
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn push_row<F>(xml: &mut String, r: usize, fill: F)
where
    F: FnOnce(&mut Vec<String>),
{
    let mut cells = Vec::with_capacity(ExportRow::HEADERS.len());
    fill(&mut cells);
    xml.push_str(&format!(r#"<row r="{}">"#, r));
    for cell in cells {
        xml.push_str(&cell);
    }
    xml.push_str("</row>");
}

fn string_cell(col: usize, r: usize, text: &str) -> String {
    format!(
        r#"<c r="{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
        cell_ref(col, r),
        escape_xml(text)
    )
}

// 只有四欄，A..D 足夠
fn cell_ref(col: usize, r: usize) -> String {
    let letter = (b'A' + col as u8) as char;
    format!("{}{}", letter, r)
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            // XML 1.0 不允許的控制字元直接略過
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => escaped.push(c),
        }
    }
    escaped
}

fn workbook_xml() -> String {
    format!(
        r#"{}<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        XML_DECLARATION, SHEET_NAME
    )
}

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io::Read;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.borrow().get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.borrow_mut().insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn write_file(&self, _path: &str, _data: &[u8]) -> Result<()> {
            Err(TastingError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only filesystem",
            )))
        }
    }

    fn fixed_clock() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(18, 5, 7)
            .unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::initialize(2, &["Anna", "Ben"]).unwrap();
        ledger.set_score("Sample 1", "Anna", 8).unwrap();
        ledger.set_score("Sample 2", "Ben", 3).unwrap();
        ledger.set_comment("Sample 1", "Ben", "pepper, \"dry\", <sharp>").unwrap();
        ledger.rename_sample("Sample 2", "Tom & Jerry's").unwrap();
        ledger
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(
            export_filename(ExportFormat::Csv, fixed_clock()),
            "gin_tasting_2024-03-09_18-05-07.csv"
        );
        assert_eq!(
            export_filename(ExportFormat::Excel, fixed_clock()),
            "gin_tasting_2024-03-09_18-05-07.xlsx"
        );
    }

    #[test]
    fn test_csv_export_content() {
        let storage = MockStorage::default();
        let exporter = Exporter::new(storage.clone()).with_clock(fixed_clock);

        let receipt = exporter.export(&sample_ledger(), ExportFormat::Csv).unwrap();
        assert_eq!(receipt.rows, 4);
        assert_eq!(receipt.file_name, "gin_tasting_2024-03-09_18-05-07.csv");

        let data = storage.get_file(&receipt.file_name).unwrap();
        let mut reader = csv::Reader::from_reader(data.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["Sample", "Rater", "Score", "Comment"]);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 4);
        assert_eq!(&records[0][0], "Sample 1");
        assert_eq!(&records[0][2], "8");
        assert_eq!(&records[1][3], "pepper, \"dry\", <sharp>");
        assert_eq!(&records[3][0], "Tom & Jerry's");
        assert_eq!(&records[3][2], "3");
    }

    #[test]
    fn test_xlsx_export_package() {
        let storage = MockStorage::default();
        let exporter = Exporter::new(storage.clone()).with_clock(fixed_clock);

        let receipt = exporter.export(&sample_ledger(), ExportFormat::Excel).unwrap();
        let data = storage.get_file(&receipt.file_name).unwrap();

        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 5);
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("xl/workbook.xml").is_ok());

        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();

        assert!(sheet.contains(r#"<row r="1">"#));
        assert!(sheet.contains(r#"<row r="5">"#));
        assert!(!sheet.contains(r#"<row r="6">"#));
        assert!(sheet.contains(r#"<c r="C2"><v>8</v></c>"#));
        assert!(sheet.contains("Tom &amp; Jerry&apos;s"));
        assert!(sheet.contains("pepper, &quot;dry&quot;, &lt;sharp&gt;"));
    }

    #[test]
    fn test_write_failure_is_export_failed() {
        let exporter = Exporter::new(ReadOnlyStorage).with_clock(fixed_clock);

        let err = exporter.export(&sample_ledger(), ExportFormat::Csv).unwrap_err();
        match err {
            TastingError::ExportFailed { path, reason } => {
                assert_eq!(path, "gin_tasting_2024-03-09_18-05-07.csv");
                assert!(reason.contains("read-only"));
            }
            other => panic!("expected ExportFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_escape_xml_drops_control_chars() {
        assert_eq!(escape_xml("a\u{1}b\tc"), "ab\tc");
    }
}
